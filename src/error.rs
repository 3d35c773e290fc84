use reqwest::StatusCode;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{api::ApiError, schedule::RecurrenceError};

/// Errors surfaced by queries and mutations of the client core.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any request was sent.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The API call failed (transport or non-2xx status).
    #[error(transparent)]
    Api(#[from] ApiError),
    /// The operation needs a signed-in user.
    #[error("no signed-in user")]
    NotSignedIn,
    /// The signed-in user lacks the role claim the operation requires.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Schedule inputs could not be turned into a session date.
    #[error(transparent)]
    Recurrence(#[from] RecurrenceError),
    /// A JSON payload did not match the expected shape.
    #[error("malformed JSON payload")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status of the underlying API failure, if any.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api(err) => err.status(),
            _ => None,
        }
    }

    /// True for failures resolved locally without touching the network.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_)
                | ClientError::NotSignedIn
                | ClientError::Forbidden(_)
                | ClientError::Recurrence(_)
        )
    }
}
