use uuid::Uuid;
use validator::Validate;

use crate::{
    api::ApiRequest,
    cache::keys,
    dto::{
        message::{MarkReadRequest, MessageView, SendMessageRequest},
        table::{MESSAGE_TABLE, Page, TableQuery},
    },
    error::ClientError,
    mutation::{MutationMessages, MutationPlan, report_failure, run_mutation},
    state::SharedState,
};

/// One page of the signed-in member's inbox.
pub async fn list_messages(
    state: &SharedState,
    query: &TableQuery,
) -> Result<Page<MessageView>, ClientError> {
    let session = state.require_session().await?;
    query.check(&MESSAGE_TABLE)?;
    let key = keys::message_list(session.user_id, query);
    let request = ApiRequest::get("/messages").with_query(query.to_query_pairs());
    state
        .cache()
        .fetch_as(&key, || state.call(request))
        .await
}

pub async fn send_message(
    state: &SharedState,
    request: SendMessageRequest,
) -> Result<MessageView, ClientError> {
    let plan = MutationPlan::new(
        "send message",
        [keys::messages()],
        MutationMessages::new("Message sent.", "Could not send the message.")
            .not_found("The recipient is no longer a member."),
    );
    run_mutation(state, plan, async {
        state.require_session().await?;
        request.validate()?;
        state
            .call_as(ApiRequest::post("/messages").json(&request)?)
            .await
    })
    .await
}

/// Flip a message's read flag; the inbox is refetched once the server confirms.
pub async fn mark_message_read(
    state: &SharedState,
    id: Uuid,
    read: bool,
) -> Result<(), ClientError> {
    let messages = MutationMessages::new(
        if read { "Marked as read." } else { "Marked as unread." },
        "Could not update the message.",
    )
    .not_found("This message no longer exists.");

    let session = match state.require_session().await {
        Ok(session) => session,
        Err(err) => return Err(report_failure(state, "mark message read", &messages, err)),
    };

    let plan = MutationPlan::new("mark message read", [keys::inbox(session.user_id)], messages);
    run_mutation(state, plan, async {
        state
            .call(ApiRequest::patch(format!("/messages/{id}")).json(&MarkReadRequest { read })?)
            .await?;
        Ok::<_, ClientError>(())
    })
    .await
}

pub async fn delete_message(state: &SharedState, id: Uuid) -> Result<(), ClientError> {
    let plan = MutationPlan::new(
        "delete message",
        [keys::messages()],
        MutationMessages::new("Message deleted.", "Could not delete the message.")
            .not_found("This message was already deleted."),
    );
    run_mutation(state, plan, async {
        state.require_session().await?;
        state.call(ApiRequest::delete(format!("/messages/{id}"))).await?;
        Ok::<_, ClientError>(())
    })
    .await
}
