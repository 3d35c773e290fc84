use uuid::Uuid;
use validator::Validate;

use crate::{
    api::ApiRequest,
    cache::keys,
    dto::{
        member::{AddMemberRequest, MemberView, UpdateMemberRoleRequest},
        table::{MEMBER_TABLE, Page, TableQuery},
    },
    error::ClientError,
    mutation::{MutationMessages, MutationPlan, run_mutation},
    state::{Role, SharedState},
};

/// One page of the members table.
pub async fn list_members(
    state: &SharedState,
    query: &TableQuery,
) -> Result<Page<MemberView>, ClientError> {
    query.check(&MEMBER_TABLE)?;
    let key = keys::member_list(query);
    let request = ApiRequest::get("/members").with_query(query.to_query_pairs());
    state
        .cache()
        .fetch_as(&key, || state.call(request))
        .await
}

/// Add a member directly; admins only.
pub async fn add_member(
    state: &SharedState,
    request: AddMemberRequest,
) -> Result<MemberView, ClientError> {
    let plan = MutationPlan::new(
        "add member",
        [keys::members()],
        MutationMessages::new("Member added.", "Could not add the member.")
            .conflict("A member with this email already exists."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Admin).await?;
        request.validate()?;
        state
            .call_as(ApiRequest::post("/members").json(&request)?)
            .await
    })
    .await
}

/// Change a member's role; admins only.
pub async fn update_member_role(
    state: &SharedState,
    id: Uuid,
    role: Role,
) -> Result<MemberView, ClientError> {
    let plan = MutationPlan::new(
        "update member role",
        [keys::members()],
        MutationMessages::new("Role updated.", "Could not update the role.")
            .not_found("This member no longer exists."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Admin).await?;
        state
            .call_as(
                ApiRequest::patch(format!("/members/{id}"))
                    .json(&UpdateMemberRoleRequest { role })?,
            )
            .await
    })
    .await
}

/// Remove a member; admins only. Their registrations disappear too.
pub async fn remove_member(state: &SharedState, id: Uuid) -> Result<(), ClientError> {
    let plan = MutationPlan::new(
        "remove member",
        [keys::members(), keys::games()],
        MutationMessages::new("Member removed.", "Could not remove the member.")
            .not_found("This member was already removed."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Admin).await?;
        state.call(ApiRequest::delete(format!("/members/{id}"))).await?;
        Ok::<_, ClientError>(())
    })
    .await
}
