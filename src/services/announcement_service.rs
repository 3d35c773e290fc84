use uuid::Uuid;
use validator::Validate;

use crate::{
    api::ApiRequest,
    cache::keys,
    dto::{
        announcement::{
            AnnouncementView, Audience, CreateAnnouncementRequest, UpdateAnnouncementRequest,
        },
        table::{ANNOUNCEMENT_TABLE, Page, TableQuery},
    },
    error::ClientError,
    mutation::{MutationMessages, MutationPlan, run_mutation},
    state::{Role, SharedState},
};

/// Announcements visible to the current viewer, optionally narrowed to one audience.
pub async fn list_announcements(
    state: &SharedState,
    query: TableQuery,
    audience: Option<Audience>,
) -> Result<Page<AnnouncementView>, ClientError> {
    let query = match audience {
        Some(audience) => query.filter("audience", audience.as_str()),
        None => query,
    };
    query.check(&ANNOUNCEMENT_TABLE)?;
    let key = keys::announcement_list(state.viewer_id().await, &query);
    let request = ApiRequest::get("/announcements").with_query(query.to_query_pairs());
    state
        .cache()
        .fetch_as(&key, || state.call(request))
        .await
}

pub async fn create_announcement(
    state: &SharedState,
    request: CreateAnnouncementRequest,
) -> Result<AnnouncementView, ClientError> {
    let plan = MutationPlan::new(
        "create announcement",
        [keys::announcements()],
        MutationMessages::new("Announcement published.", "Could not publish the announcement."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Gamemaster).await?;
        request.validate()?;
        state
            .call_as(ApiRequest::post("/announcements").json(&request)?)
            .await
    })
    .await
}

pub async fn update_announcement(
    state: &SharedState,
    id: Uuid,
    request: UpdateAnnouncementRequest,
) -> Result<AnnouncementView, ClientError> {
    let plan = MutationPlan::new(
        "update announcement",
        [keys::announcements()],
        MutationMessages::new("Announcement updated.", "Could not update the announcement.")
            .not_found("This announcement no longer exists."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Gamemaster).await?;
        request.validate()?;
        state
            .call_as(ApiRequest::patch(format!("/announcements/{id}")).json(&request)?)
            .await
    })
    .await
}

pub async fn delete_announcement(state: &SharedState, id: Uuid) -> Result<(), ClientError> {
    let plan = MutationPlan::new(
        "delete announcement",
        [keys::announcements()],
        MutationMessages::new("Announcement deleted.", "Could not delete the announcement.")
            .not_found("This announcement was already deleted."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Gamemaster).await?;
        state
            .call(ApiRequest::delete(format!("/announcements/{id}")))
            .await?;
        Ok::<_, ClientError>(())
    })
    .await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        api::{ApiMethod, fake::FakeClubApi},
        state::{ToastLevel, test_support::*},
    };

    fn empty_page() -> serde_json::Value {
        json!({"items": [], "total": 0, "page": 1, "page_size": 20})
    }

    #[tokio::test]
    async fn audience_becomes_a_filter() {
        let api = FakeClubApi::new();
        api.respond(ApiMethod::Get, "/announcements", empty_page());
        let state = state_with(&api);

        list_announcements(&state, state.table_query(), Some(Audience::Members))
            .await
            .unwrap();

        let calls = api.calls();
        assert!(
            calls[0]
                .query
                .contains(&("audience".to_string(), "members".to_string()))
        );
    }

    #[tokio::test]
    async fn each_audience_is_cached_separately() {
        let api = FakeClubApi::new();
        api.respond(ApiMethod::Get, "/announcements", empty_page());
        let state = state_with(&api);

        list_announcements(&state, state.table_query(), None)
            .await
            .unwrap();
        list_announcements(&state, state.table_query(), Some(Audience::Public))
            .await
            .unwrap();
        list_announcements(&state, state.table_query(), Some(Audience::Public))
            .await
            .unwrap();

        assert_eq!(api.calls_to(ApiMethod::Get, "/announcements"), 2);
    }

    #[tokio::test]
    async fn members_cannot_publish() {
        let api = FakeClubApi::new();
        let state = state_with(&api);
        state.sign_in(session(&[Role::Member])).await;
        let mut toasts = state.notifications().subscribe();

        let err = create_announcement(
            &state,
            CreateAnnouncementRequest {
                title: "Board game night".into(),
                body: "Bring snacks.".into(),
                audience: Audience::Members,
                pinned: false,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ClientError::Forbidden(_)));
        assert!(api.calls().is_empty());
        assert_eq!(toasts.recv().await.unwrap().level, ToastLevel::Error);
    }

    #[tokio::test]
    async fn deletion_marks_every_audience_stale() {
        let api = FakeClubApi::new();
        let id = Uuid::new_v4();
        api.respond(ApiMethod::Get, "/announcements", empty_page());
        api.respond(
            ApiMethod::Delete,
            &format!("/announcements/{id}"),
            serde_json::Value::Null,
        );
        let state = state_with(&api);
        state.sign_in(session(&[Role::Gamemaster])).await;

        list_announcements(&state, state.table_query(), None)
            .await
            .unwrap();
        list_announcements(&state, state.table_query(), Some(Audience::Gamemasters))
            .await
            .unwrap();
        delete_announcement(&state, id).await.unwrap();

        let viewer = state.viewer_id().await;
        let plain = keys::announcement_list(viewer, &state.table_query());
        assert!(state.cache().is_stale(&plain));
    }
}
