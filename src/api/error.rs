//! Error types shared by club API transports.

use std::error::Error;

use reqwest::StatusCode;
use thiserror::Error;

/// Convenient result alias returning [`ApiError`] failures.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failures that can occur while talking to the club REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Building the HTTP client failed (invalid TLS setup, etc).
    #[error("failed to build API client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request never produced a response (connection refused, timeout, reset).
    #[error("failed to reach API at `{path}`")]
    Transport {
        path: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    /// The API answered 404.
    #[error("`{path}` not found")]
    NotFound { path: String },
    /// The API answered 409, usually a duplicate record.
    #[error("conflict on `{path}`{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Conflict {
        path: String,
        message: Option<String>,
    },
    /// The API rejected the caller's credentials or role claims.
    #[error("unauthorized request to `{path}` ({status})")]
    Unauthorized { path: String, status: StatusCode },
    /// The API failed with a 5xx status.
    #[error("server error {status} for `{path}`")]
    Server { path: String, status: StatusCode },
    /// Any other non-success status.
    #[error("unexpected response status {status} for `{path}`")]
    Unexpected { path: String, status: StatusCode },
    /// A success response carried a body that is not valid JSON.
    #[error("failed to decode API response for `{path}`")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Classify a non-success status code.
    pub fn from_status(path: impl Into<String>, status: StatusCode, message: Option<String>) -> Self {
        let path = path.into();
        match status {
            StatusCode::NOT_FOUND => ApiError::NotFound { path },
            StatusCode::CONFLICT => ApiError::Conflict { path, message },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ApiError::Unauthorized { path, status }
            }
            status if status.is_server_error() => ApiError::Server { path, status },
            status => ApiError::Unexpected { path, status },
        }
    }

    /// Wrap a transport-level failure.
    pub fn transport(path: impl Into<String>, source: impl Error + Send + Sync + 'static) -> Self {
        ApiError::Transport {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// HTTP status associated with the failure, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ApiError::Conflict { .. } => Some(StatusCode::CONFLICT),
            ApiError::Unauthorized { status, .. }
            | ApiError::Server { status, .. }
            | ApiError::Unexpected { status, .. } => Some(*status),
            ApiError::ClientBuilder { .. }
            | ApiError::Transport { .. }
            | ApiError::Decode { .. } => None,
        }
    }
}
