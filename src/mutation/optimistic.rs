//! Snapshot → apply → commit-or-rollback for toggle-style mutations.
//!
//! Ordering matters: in-flight queries for the affected keys are cancelled before the
//! snapshot is taken and the patch applied, otherwise a late response could overwrite
//! the optimistic edit. Whatever the outcome, the keys are invalidated once the request
//! settles so the next read reconciles with the server.

use std::future::Future;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    cache::QueryKey,
    error::ClientError,
    mutation::{MutationMessages, report_failure},
    state::{AppState, Toast},
};

/// Cache prefixes an optimistic mutation edits, and what it says.
#[derive(Debug, Clone)]
pub struct OptimisticPlan {
    pub label: &'static str,
    pub keys: Vec<QueryKey>,
    pub messages: MutationMessages,
}

impl OptimisticPlan {
    /// Plan covering every entry under `keys` (the single view and the lists holding it).
    pub fn new(
        label: &'static str,
        keys: impl IntoIterator<Item = QueryKey>,
        messages: MutationMessages,
    ) -> Self {
        Self {
            label,
            keys: disjoint(keys.into_iter().collect()),
            messages,
        }
    }
}

/// Drop prefixes already covered by a shorter one so no entry is patched twice.
fn disjoint(mut keys: Vec<QueryKey>) -> Vec<QueryKey> {
    keys.sort();
    keys.dedup();
    let mut kept: Vec<QueryKey> = Vec::with_capacity(keys.len());
    for key in keys {
        if !kept.iter().any(|prefix| key.starts_with(prefix)) {
            kept.push(key);
        }
    }
    kept
}

/// Apply `patch` to every cached entry under the plan's keys, then await `request`.
///
/// On failure every touched entry is restored verbatim from the pre-mutation snapshot.
pub async fn run_optimistic<T, P, Fut>(
    state: &AppState,
    plan: OptimisticPlan,
    mut patch: P,
    request: Fut,
) -> Result<T, ClientError>
where
    P: FnMut(&QueryKey, &mut Value),
    Fut: Future<Output = Result<T, ClientError>>,
{
    let cache = state.cache();

    for key in &plan.keys {
        cache.cancel(key);
    }
    let snapshot = cache.snapshot(&plan.keys);
    let patched = plan
        .keys
        .iter()
        .map(|key| cache.update(key, &mut patch))
        .sum::<usize>();
    debug!(mutation = plan.label, patched, "applied optimistic edit");

    let outcome = match request.await {
        Ok(value) => {
            info!(mutation = plan.label, "mutation succeeded");
            state.notifications().push(Toast::success(plan.messages.success.clone()));
            Ok(value)
        }
        Err(err) => {
            cache.restore(snapshot);
            warn!(mutation = plan.label, "rolled back optimistic edit");
            Err(report_failure(state, plan.label, &plan.messages, err))
        }
    };

    for key in &plan.keys {
        cache.invalidate(key);
    }

    outcome
}
