//! Seam between the client core and the club's REST API.

pub mod error;
#[cfg(test)]
pub(crate) mod fake;
pub mod http;

use std::fmt;

use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

pub use self::error::{ApiError, ApiResult};
pub use self::http::HttpClubApi;

/// HTTP verbs used by the club API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            ApiMethod::Get => "GET",
            ApiMethod::Post => "POST",
            ApiMethod::Patch => "PATCH",
            ApiMethod::Put => "PUT",
            ApiMethod::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// A single REST call: verb, route, query string and optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: ApiMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: ApiMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(ApiMethod::Get, path)
    }

    /// `POST path` without a body.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(ApiMethod::Post, path)
    }

    /// `PATCH path` without a body.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(ApiMethod::Patch, path)
    }

    /// `PUT path` without a body.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(ApiMethod::Put, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(ApiMethod::Delete, path)
    }

    /// Append query-string pairs.
    pub fn with_query(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Attach a JSON body.
    pub fn json<T>(mut self, body: &T) -> Result<Self, serde_json::Error>
    where
        T: ?Sized + Serialize,
    {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Abstraction over the club's REST backend.
///
/// Success responses resolve to their JSON body (`Value::Null` when empty); every
/// non-success status is classified into an [`ApiError`].
pub trait ClubApi: Send + Sync {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'static, ApiResult<Value>>;
}
