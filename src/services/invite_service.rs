use uuid::Uuid;
use validator::Validate;

use crate::{
    api::ApiRequest,
    cache::keys,
    dto::{
        invite::{AcceptInviteRequest, InviteView, SendInviteRequest},
        member::MemberView,
        table::{INVITE_TABLE, Page, TableQuery},
    },
    error::ClientError,
    mutation::{MutationMessages, MutationPlan, run_mutation},
    state::{Role, SharedState},
};

/// One page of the invites table; admins only.
pub async fn list_invites(
    state: &SharedState,
    query: &TableQuery,
) -> Result<Page<InviteView>, ClientError> {
    state.require_role(Role::Admin).await?;
    query.check(&INVITE_TABLE)?;
    let key = keys::invite_list(query);
    let request = ApiRequest::get("/invites").with_query(query.to_query_pairs());
    state
        .cache()
        .fetch_as(&key, || state.call(request))
        .await
}

pub async fn send_invite(
    state: &SharedState,
    request: SendInviteRequest,
) -> Result<InviteView, ClientError> {
    let plan = MutationPlan::new(
        "send invite",
        [keys::invites()],
        MutationMessages::new("Invite sent.", "Could not send the invite.")
            .conflict("This email already has a pending invite or membership."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Admin).await?;
        request.validate()?;
        state
            .call_as(ApiRequest::post("/invites").json(&request)?)
            .await
    })
    .await
}

pub async fn resend_invite(state: &SharedState, id: Uuid) -> Result<InviteView, ClientError> {
    let plan = MutationPlan::new(
        "resend invite",
        [keys::invites()],
        MutationMessages::new("Invite sent again.", "Could not resend the invite.")
            .not_found("This invite no longer exists.")
            .conflict("Only pending invites can be resent."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Admin).await?;
        state
            .call_as(ApiRequest::post(format!("/invites/{id}/resend")))
            .await
    })
    .await
}

pub async fn revoke_invite(state: &SharedState, id: Uuid) -> Result<(), ClientError> {
    let plan = MutationPlan::new(
        "revoke invite",
        [keys::invites()],
        MutationMessages::new("Invite revoked.", "Could not revoke the invite.")
            .not_found("This invite no longer exists."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Admin).await?;
        state.call(ApiRequest::delete(format!("/invites/{id}"))).await?;
        Ok::<_, ClientError>(())
    })
    .await
}

/// Redeem an invite token. Works without a session; the new member shows up in both
/// the invites and members tables.
pub async fn accept_invite(
    state: &SharedState,
    request: AcceptInviteRequest,
) -> Result<MemberView, ClientError> {
    let plan = MutationPlan::new(
        "accept invite",
        [keys::invites(), keys::members()],
        MutationMessages::new("Welcome to the club!", "Could not accept the invite.")
            .not_found("This invite is invalid or has expired.")
            .conflict("This invite was already used."),
    );
    run_mutation(state, plan, async {
        request.validate()?;
        state
            .call_as(ApiRequest::post("/invites/accept").json(&request)?)
            .await
    })
    .await
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::*;
    use crate::{
        api::{ApiMethod, fake::FakeClubApi},
        state::test_support::*,
    };

    #[tokio::test]
    async fn listing_requires_admin() {
        let api = FakeClubApi::new();
        let state = state_with(&api);
        state.sign_in(session(&[Role::Gamemaster])).await;

        let err = list_invites(&state, &state.table_query())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Forbidden(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn resend_conflict_uses_its_own_message() {
        let api = FakeClubApi::new();
        let id = Uuid::new_v4();
        api.fail(
            ApiMethod::Post,
            &format!("/invites/{id}/resend"),
            StatusCode::CONFLICT,
        );
        let state = state_with(&api);
        state.sign_in(session(&[Role::Admin])).await;
        let mut toasts = state.notifications().subscribe();

        resend_invite(&state, id).await.unwrap_err();
        assert_eq!(
            toasts.recv().await.unwrap().message,
            "Only pending invites can be resent."
        );
    }

    #[tokio::test]
    async fn accepting_refreshes_members_and_invites() {
        let api = FakeClubApi::new();
        let member = Uuid::new_v4();
        api.respond(
            ApiMethod::Post,
            "/invites/accept",
            json!({
                "id": member,
                "display_name": "Sam",
                "email": "sam@example.org",
                "role": "member",
            }),
        );
        let state = state_with(&api);
        let members = keys::member_list(&state.table_query());
        let invites = keys::invite_list(&state.table_query());
        state.cache().set(members.clone(), json!({"items": []}));
        state.cache().set(invites.clone(), json!({"items": []}));

        let joined = accept_invite(
            &state,
            AcceptInviteRequest {
                token: "tok-12345678".into(),
            },
        )
        .await
        .unwrap();

        assert_eq!(joined.id, member);
        assert!(state.cache().is_stale(&members));
        assert!(state.cache().is_stale(&invites));
    }
}
