//! Game queries and mutations, including the optimistic registration toggle.

use serde_json::{Value, json};
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::ApiRequest,
    cache::keys,
    dto::{
        game::{CreateGameRequest, GameView, UpdateGameRequest},
        table::{GAME_TABLE, Page, TableQuery},
    },
    error::ClientError,
    mutation::{
        MutationMessages, MutationPlan, OptimisticPlan, report_failure, run_mutation,
        run_optimistic,
    },
    state::{Role, Session, SharedState},
};

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// One page of the games table as seen by the signed-in user.
pub async fn list_games(
    state: &SharedState,
    query: &TableQuery,
) -> Result<Page<GameView>, ClientError> {
    query.check(&GAME_TABLE)?;
    let viewer = state.viewer_id().await;
    let key = keys::game_list(viewer, query);
    let request = ApiRequest::get("/games").with_query(query.to_query_pairs());
    state
        .cache()
        .fetch_as(&key, || state.call(request))
        .await
}

/// A single game as seen by the signed-in user.
pub async fn get_game(state: &SharedState, id: Uuid) -> Result<GameView, ClientError> {
    let viewer = state.viewer_id().await;
    let key = keys::game_detail(id, viewer);
    state
        .cache()
        .fetch_as(&key, || state.call(ApiRequest::get(format!("/games/{id}"))))
        .await
}

// ---------------------------------------------------------------------------
// Game definition
// ---------------------------------------------------------------------------

/// Create a game; gamemasters and admins only.
pub async fn create_game(
    state: &SharedState,
    request: CreateGameRequest,
) -> Result<GameView, ClientError> {
    let plan = MutationPlan::new(
        "create game",
        [keys::game_lists()],
        MutationMessages::new("Game created.", "Could not create the game.")
            .conflict("A game with this title already exists."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Gamemaster).await?;
        request.validate()?;
        state
            .call_as(ApiRequest::post("/games").json(&request)?)
            .await
    })
    .await
}

/// Edit a game's details.
pub async fn update_game(
    state: &SharedState,
    id: Uuid,
    request: UpdateGameRequest,
) -> Result<GameView, ClientError> {
    let plan = MutationPlan::new(
        "update game",
        [keys::game(id), keys::game_lists()],
        MutationMessages::new("Game updated.", "Could not update the game.")
            .not_found("This game no longer exists."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Gamemaster).await?;
        request.validate()?;
        state
            .call_as(ApiRequest::patch(format!("/games/{id}")).json(&request)?)
            .await
    })
    .await
}

/// Delete a game.
pub async fn delete_game(state: &SharedState, id: Uuid) -> Result<(), ClientError> {
    let plan = MutationPlan::new(
        "delete game",
        [keys::games()],
        MutationMessages::new("Game deleted.", "Could not delete the game.")
            .not_found("This game was already deleted."),
    );
    run_mutation(state, plan, async {
        state.require_role(Role::Gamemaster).await?;
        state.call(ApiRequest::delete(format!("/games/{id}"))).await?;
        Ok::<_, ClientError>(())
    })
    .await
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// Register the signed-in user for a game.
pub async fn register(state: &SharedState, game_id: Uuid) -> Result<(), ClientError> {
    set_registration(state, game_id, true).await
}

/// Cancel the signed-in user's registration.
pub async fn unregister(state: &SharedState, game_id: Uuid) -> Result<(), ClientError> {
    set_registration(state, game_id, false).await
}

/// Toggle the signed-in user's registration, reflecting the change in every cached
/// view of the game before the server confirms it.
pub async fn set_registration(
    state: &SharedState,
    game_id: Uuid,
    register: bool,
) -> Result<(), ClientError> {
    let messages = if register {
        MutationMessages::new("You are registered for this game.", "Could not register.")
            .conflict("You are already registered for this game.")
            .not_found("This game no longer exists.")
    } else {
        MutationMessages::new("Your registration was cancelled.", "Could not cancel.")
            .not_found("You were not registered for this game.")
    };

    let session = match state.require_session().await {
        Ok(session) => session,
        Err(err) => return Err(report_failure(state, "game registration", &messages, err)),
    };

    let plan = OptimisticPlan::new(
        "game registration",
        [keys::game(game_id), keys::game_lists()],
        messages,
    );
    let path = format!("/games/{game_id}/registrations");
    let request = if register {
        ApiRequest::post(path)
    } else {
        ApiRequest::delete(path)
    };

    run_optimistic(
        state,
        plan,
        |key, value| {
            debug!(%key, register, "patching cached game");
            patch_registration(value, game_id, &session, register);
        },
        async {
            state.call(request).await?;
            Ok::<_, ClientError>(())
        },
    )
    .await
}

/// Apply the registration toggle to a cached game view or page of games.
fn patch_registration(value: &mut Value, game_id: Uuid, session: &Session, register: bool) {
    match value.get_mut("items").and_then(Value::as_array_mut) {
        Some(items) => {
            for item in items {
                patch_game(item, game_id, session, register);
            }
        }
        None => patch_game(value, game_id, session, register),
    }
}

fn patch_game(game: &mut Value, game_id: Uuid, session: &Session, register: bool) {
    let matches = game
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| id.parse::<Uuid>().ok())
        == Some(game_id);
    if !matches {
        return;
    }
    let Some(object) = game.as_object_mut() else {
        return;
    };

    object.insert("registered".into(), Value::Bool(register));
    let registrations = object
        .entry("registrations")
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Some(list) = registrations.as_array_mut() {
        let user_id = session.user_id;
        list.retain(|entry| {
            entry
                .get("user_id")
                .and_then(Value::as_str)
                .and_then(|id| id.parse::<Uuid>().ok())
                != Some(user_id)
        });
        if register {
            list.push(json!({
                "user_id": user_id,
                "display_name": session.display_name,
                "pending": true,
            }));
        }
    }
}
