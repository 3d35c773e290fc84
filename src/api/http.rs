use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;

use super::{ApiError, ApiMethod, ApiRequest, ApiResult, ClubApi};

/// Body shape the API uses for error responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "error")]
    message: Option<String>,
}

/// [`ClubApi`] implementation speaking JSON over HTTP with `reqwest`.
#[derive(Clone)]
pub struct HttpClubApi {
    client: Client,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl HttpClubApi {
    /// Build a client for the configured base URL, bearer token and timeout.
    pub fn new(config: &ClientConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| ApiError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.api_base_url.trim_end_matches('/')),
            token: config.access_token.as_deref().map(Arc::from),
        })
    }

    fn request(&self, method: ApiMethod, path: &str) -> reqwest::RequestBuilder {
        let method = match method {
            ApiMethod::Get => Method::GET,
            ApiMethod::Post => Method::POST,
            ApiMethod::Patch => Method::PATCH,
            ApiMethod::Put => Method::PUT,
            ApiMethod::Delete => Method::DELETE,
        };
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.client.request(method, url);
        if let Some(ref token) = self.token {
            builder.bearer_auth(token.as_ref())
        } else {
            builder
        }
    }

    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let ApiRequest {
            method,
            path,
            query,
            body,
        } = request;

        let mut builder = self.request(method, &path);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(ref body) = body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| ApiError::transport(path.clone(), source))?;
        let status = response.status();
        debug!(%method, %path, %status, "API response");

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ApiError::transport(path.clone(), source))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|body| body.message);
            return Err(ApiError::from_status(path, status, message));
        }

        if status == StatusCode::NO_CONTENT || bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode { path, source })
    }
}

impl ClubApi for HttpClubApi {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'static, ApiResult<Value>> {
        let api = self.clone();
        Box::pin(async move { api.send(request).await })
    }
}
