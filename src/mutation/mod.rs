//! Mutation runners shared by every service.
//!
//! The default contract: send the request, invalidate the affected cache keys on
//! success, toast either way, and leave the cache alone on failure. The optimistic
//! variant in [`optimistic`] is reserved for toggle-style actions.

pub mod optimistic;

use std::future::Future;

use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::{
    cache::QueryKey,
    error::ClientError,
    state::{AppState, Toast},
};

pub use self::optimistic::{OptimisticPlan, run_optimistic};

/// Toast texts for every outcome of a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationMessages {
    pub success: String,
    pub not_found: String,
    pub conflict: String,
    pub failure: String,
}

impl MutationMessages {
    /// Success and generic failure texts; 404/409 reuse the failure text until overridden.
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        let failure = failure.into();
        Self {
            success: success.into(),
            not_found: failure.clone(),
            conflict: failure.clone(),
            failure,
        }
    }

    /// Text shown when the API answers 404.
    pub fn not_found(mut self, message: impl Into<String>) -> Self {
        self.not_found = message.into();
        self
    }

    /// Text shown when the API answers 409.
    pub fn conflict(mut self, message: impl Into<String>) -> Self {
        self.conflict = message.into();
        self
    }

    /// Pick the text matching `err`.
    pub fn for_error(&self, err: &ClientError) -> String {
        match err {
            ClientError::Validation(errors) => {
                let mut fields = errors
                    .field_errors()
                    .keys()
                    .map(|field| field.to_string())
                    .collect::<Vec<_>>();
                fields.sort();
                format!("Please check the following fields: {}", fields.join(", "))
            }
            ClientError::NotSignedIn => "Please sign in first.".to_string(),
            ClientError::Forbidden(_) => "You are not allowed to do that.".to_string(),
            ClientError::Recurrence(err) => format!("Invalid schedule: {err}"),
            _ => match err.status() {
                Some(StatusCode::NOT_FOUND) => self.not_found.clone(),
                Some(StatusCode::CONFLICT) => self.conflict.clone(),
                _ => self.failure.clone(),
            },
        }
    }
}

/// What a non-optimistic mutation refreshes and says.
#[derive(Debug, Clone)]
pub struct MutationPlan {
    pub label: &'static str,
    pub invalidate: Vec<QueryKey>,
    pub messages: MutationMessages,
}

impl MutationPlan {
    /// Plan invalidating `invalidate` on success.
    pub fn new(
        label: &'static str,
        invalidate: impl IntoIterator<Item = QueryKey>,
        messages: MutationMessages,
    ) -> Self {
        Self {
            label,
            invalidate: invalidate.into_iter().collect(),
            messages,
        }
    }
}

/// Await `request`; on success invalidate the plan's keys, on failure leave the cache
/// untouched. Both outcomes raise a toast.
pub async fn run_mutation<T, Fut>(
    state: &AppState,
    plan: MutationPlan,
    request: Fut,
) -> Result<T, ClientError>
where
    Fut: Future<Output = Result<T, ClientError>>,
{
    debug!(mutation = plan.label, "sending mutation");
    match request.await {
        Ok(value) => {
            for key in &plan.invalidate {
                state.cache().invalidate(key);
            }
            info!(mutation = plan.label, "mutation succeeded");
            state.notifications().push(Toast::success(plan.messages.success));
            Ok(value)
        }
        Err(err) => Err(report_failure(state, plan.label, &plan.messages, err)),
    }
}

/// Log `err`, raise the matching error toast and hand the error back.
pub(crate) fn report_failure(
    state: &AppState,
    label: &'static str,
    messages: &MutationMessages,
    err: ClientError,
) -> ClientError {
    if err.is_local() {
        debug!(mutation = label, error = %err, "mutation rejected locally");
    } else {
        warn!(mutation = label, error = %err, "mutation failed");
    }
    state
        .notifications()
        .push(Toast::error(messages.for_error(&err)));
    err
}
