use tracing::{debug, info};

use crate::{
    api::ApiRequest,
    error::ClientError,
    state::{Session, SharedState},
};

/// Ask the API who the configured token belongs to and install that session.
///
/// A 401 means the token is no longer valid; any previous session is dropped.
pub async fn refresh_session(state: &SharedState) -> Result<Session, ClientError> {
    match state.call_as::<Session>(ApiRequest::get("/session")).await {
        Ok(session) => {
            info!(user_id = %session.user_id, roles = ?session.roles, "session refreshed");
            state.sign_in(session.clone()).await;
            Ok(session)
        }
        Err(err) => {
            if err.status().is_some_and(|status| status.as_u16() == 401) {
                debug!("session token rejected; signing out");
                state.sign_out().await;
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::{
        api::{ApiMethod, fake::FakeClubApi},
        state::{Role, test_support::*},
    };

    #[tokio::test]
    async fn refresh_installs_the_session() {
        let api = FakeClubApi::new();
        let user_id = Uuid::new_v4();
        api.respond(
            ApiMethod::Get,
            "/session",
            json!({"user_id": user_id, "display_name": "Alex", "roles": ["gamemaster"]}),
        );
        let state = state_with(&api);

        let session = refresh_session(&state).await.unwrap();
        assert!(session.is_gamemaster());
        assert_eq!(state.viewer_id().await, Some(user_id));
    }

    #[tokio::test]
    async fn rejected_token_signs_out() {
        let api = FakeClubApi::new();
        api.fail(ApiMethod::Get, "/session", StatusCode::UNAUTHORIZED);
        let state = state_with(&api);
        state.sign_in(session(&[Role::Member])).await;

        refresh_session(&state).await.unwrap_err();
        assert!(state.session().await.is_none());
    }
}
