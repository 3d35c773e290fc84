pub mod modal;
pub mod notify;
pub mod session;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    api::{ApiRequest, ClubApi},
    cache::QueryCache,
    config::ClientConfig,
    dto::table::TableQuery,
    error::ClientError,
};

pub use self::modal::{ModalAction, ModalState};
pub use self::notify::{NotificationHub, Toast, ToastLevel};
pub use self::session::{Role, Session};

pub type SharedState = Arc<AppState>;

/// Application-session context handed to every query and mutation: the API
/// handle, the query cache, the toast hub and the signed-in user.
pub struct AppState {
    api: Arc<dyn ClubApi>,
    cache: QueryCache,
    notifications: NotificationHub,
    session: RwLock<Option<Session>>,
    default_page_size: u32,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The state starts signed out with an empty cache.
    pub fn new(api: Arc<dyn ClubApi>, config: &ClientConfig) -> SharedState {
        Arc::new(Self {
            api,
            cache: QueryCache::new(),
            notifications: NotificationHub::new(config.notification_capacity),
            session: RwLock::new(None),
            default_page_size: config.default_page_size,
        })
    }

    /// The REST collaborator.
    pub fn api(&self) -> &Arc<dyn ClubApi> {
        &self.api
    }

    /// The shared query cache.
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Toast hub.
    pub fn notifications(&self) -> &NotificationHub {
        &self.notifications
    }

    /// Send `request` and return its JSON body.
    pub async fn call(&self, request: ApiRequest) -> Result<Value, ClientError> {
        Ok(self.api.execute(request).await?)
    }

    /// Send `request` and decode its JSON body into `T`.
    pub async fn call_as<T>(&self, request: ApiRequest) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
    {
        let value = self.call(request).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// First page of a data table with the configured page size.
    pub fn table_query(&self) -> TableQuery {
        TableQuery::new(self.default_page_size)
    }

    /// Install the signed-in user. Cached views are per user, so the cache is cleared.
    pub async fn sign_in(&self, session: Session) {
        info!(user_id = %session.user_id, "signed in");
        let mut guard = self.session.write().await;
        *guard = Some(session);
        self.cache.clear();
    }

    /// Drop the signed-in user and everything cached on their behalf.
    pub async fn sign_out(&self) {
        let mut guard = self.session.write().await;
        if guard.take().is_some() {
            info!("signed out");
        }
        self.cache.clear();
    }

    /// Currently signed-in user, if any.
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    /// Identifier of the signed-in user, if any.
    pub async fn viewer_id(&self) -> Option<uuid::Uuid> {
        self.session.read().await.as_ref().map(|s| s.user_id)
    }

    /// Signed-in user or [`ClientError::NotSignedIn`].
    pub async fn require_session(&self) -> Result<Session, ClientError> {
        self.session().await.ok_or(ClientError::NotSignedIn)
    }

    /// Signed-in user holding `role` (admins satisfy every role).
    pub async fn require_role(&self, role: Role) -> Result<Session, ClientError> {
        let session = self.require_session().await?;
        let allowed = match role {
            Role::Admin => session.is_admin(),
            Role::Gamemaster => session.is_gamemaster(),
            Role::Member => true,
        };
        if allowed {
            Ok(session)
        } else {
            Err(ClientError::Forbidden(format!("{role:?} role required")))
        }
    }
}
