//! Scripted in-memory [`ClubApi`] used by unit tests.

use std::{
    collections::HashMap,
    io,
    sync::{Arc, Mutex},
};

use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Notify;

use super::{ApiError, ApiMethod, ApiRequest, ApiResult, ClubApi};

#[derive(Clone)]
enum Reply {
    Json(Value),
    Status(StatusCode),
    Offline,
}

#[derive(Default)]
struct Inner {
    replies: Mutex<HashMap<(ApiMethod, String), Reply>>,
    holds: Mutex<HashMap<(ApiMethod, String), Arc<Notify>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

#[derive(Clone, Default)]
pub struct FakeClubApi {
    inner: Arc<Inner>,
}

impl FakeClubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `body` until replaced.
    pub fn respond(&self, method: ApiMethod, path: &str, body: Value) {
        self.set(method, path, Reply::Json(body));
    }

    /// Answer `method path` with an error status until replaced.
    pub fn fail(&self, method: ApiMethod, path: &str, status: StatusCode) {
        self.set(method, path, Reply::Status(status));
    }

    /// Make `method path` fail without reaching the server.
    pub fn offline(&self, method: ApiMethod, path: &str) {
        self.set(method, path, Reply::Offline);
    }

    /// Park every call to `method path` until the returned handle is notified.
    pub fn hold(&self, method: ApiMethod, path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.inner
            .holds
            .lock()
            .unwrap()
            .insert((method, path.to_string()), notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.inner.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: ApiMethod, path: &str) -> usize {
        self.inner
            .calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method && call.path == path)
            .count()
    }

    fn set(&self, method: ApiMethod, path: &str, reply: Reply) {
        self.inner
            .replies
            .lock()
            .unwrap()
            .insert((method, path.to_string()), reply);
    }
}

impl ClubApi for FakeClubApi {
    fn execute(&self, request: ApiRequest) -> BoxFuture<'static, ApiResult<Value>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let key = (request.method, request.path.clone());
            inner.calls.lock().unwrap().push(request.clone());

            let hold = inner.holds.lock().unwrap().get(&key).cloned();
            if let Some(hold) = hold {
                hold.notified().await;
            }

            let reply = inner
                .replies
                .lock()
                .unwrap()
                .get(&key)
                .cloned()
                .unwrap_or(Reply::Status(StatusCode::NOT_FOUND));

            match reply {
                Reply::Json(body) => Ok(body),
                Reply::Status(status) => Err(ApiError::from_status(request.path, status, None)),
                Reply::Offline => Err(ApiError::transport(
                    request.path,
                    io::Error::new(io::ErrorKind::ConnectionRefused, "offline"),
                )),
            }
        })
    }
}
