//! Schedule editing: pre-fills the next session with the recurrence calculator before
//! the schedule is submitted.

use uuid::Uuid;
use validator::Validate;

use crate::{
    api::ApiRequest,
    cache::keys,
    dto::game::{GameView, ScheduleInput},
    error::ClientError,
    mutation::{MutationMessages, MutationPlan, run_mutation},
    schedule::calculate_next_game_date,
    state::{Role, SharedState},
};

/// Next session for `input`: the known date when it lies in the future, otherwise the
/// next occurrence computed from the weekday and interval.
pub fn suggest_next_session(input: &ScheduleInput) -> Result<String, ClientError> {
    input.validate()?;
    Ok(calculate_next_game_date(
        &input.day_of_week,
        &input.interval,
        input.next_session.as_deref(),
    )?)
}

/// Replace a game's schedule, filling `next_session` before submission.
pub async fn update_schedule(
    state: &SharedState,
    game_id: Uuid,
    input: ScheduleInput,
) -> Result<GameView, ClientError> {
    let plan = MutationPlan::new(
        "update schedule",
        [keys::game(game_id), keys::game_lists()],
        MutationMessages::new("Schedule saved.", "Could not save the schedule.")
            .not_found("This game no longer exists."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Gamemaster).await?;
        let next_session = suggest_next_session(&input)?;
        let input = ScheduleInput {
            next_session: Some(next_session),
            ..input
        };
        state
            .call_as(ApiRequest::put(format!("/games/{game_id}/schedule")).json(&input)?)
            .await
    })
    .await
}
