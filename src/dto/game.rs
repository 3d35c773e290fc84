use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use uuid::Uuid;
use validator::Validate;

use crate::dto::validation::{validate_interval, validate_not_blank, validate_weekday};

/// A game as listed in the games table or shown on its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameView {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub system: Option<String>,
    pub gamemaster_id: Uuid,
    pub max_players: u32,
    #[serde(default)]
    pub schedule: Option<ScheduleView>,
    /// Whether the viewing user is registered.
    #[serde(default)]
    pub registered: bool,
    #[serde(default)]
    pub registrations: Vec<RegistrationView>,
}

impl GameView {
    /// Seats still open.
    pub fn open_seats(&self) -> u32 {
        let taken = u32::try_from(self.registrations.len()).unwrap_or(u32::MAX);
        self.max_players.saturating_sub(taken)
    }
}

/// A player's seat at a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationView {
    pub user_id: Uuid,
    #[serde(default)]
    pub display_name: Option<String>,
    /// Placeholder inserted locally while the registration request is in flight.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub pending: bool,
}

/// Recurring schedule of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleView {
    pub day_of_week: String,
    pub interval: String,
    #[serde(default)]
    pub next_session: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Schedule form submitted when creating a game or editing its schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ScheduleInput {
    #[validate(custom(function = "validate_weekday"))]
    pub day_of_week: String,
    #[validate(custom(function = "validate_interval"))]
    pub interval: String,
    /// Already-known next session; recomputed when missing or not in the future.
    #[serde(default)]
    pub next_session: Option<String>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub location: Option<String>,
}

/// Payload used to create a game.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGameRequest {
    #[validate(length(min = 1, max = 120), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(length(max = 80))]
    pub system: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub max_players: u32,
    #[validate(nested)]
    pub schedule: Option<ScheduleInput>,
}

/// Partial update of a game's details; absent fields are left unchanged.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateGameRequest {
    #[validate(length(min = 1, max = 120), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(length(max = 80))]
    pub system: Option<String>,
    #[validate(range(min = 1, max = 20))]
    pub max_players: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule() -> ScheduleInput {
        ScheduleInput {
            day_of_week: "friday".into(),
            interval: "biweekly".into(),
            next_session: None,
            location: Some("Back room".into()),
        }
    }

    #[test]
    fn create_request_validates_nested_schedule() {
        let mut request = CreateGameRequest {
            title: "Masks of Nyarlathotep".into(),
            description: None,
            system: Some("Call of Cthulhu".into()),
            max_players: 5,
            schedule: Some(schedule()),
        };
        assert!(request.validate().is_ok());

        request.schedule.as_mut().unwrap().interval = "daily".into();
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_request_rejects_blank_title_and_empty_table() {
        let request = CreateGameRequest {
            title: "   ".into(),
            description: None,
            system: None,
            max_players: 0,
            schedule: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("max_players"));
    }

    #[test]
    fn update_request_omits_absent_fields() {
        let request = UpdateGameRequest {
            title: Some("Blades".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({ "title": "Blades" })
        );
    }

    #[test]
    fn game_view_defaults_missing_collections() {
        let game: GameView = serde_json::from_value(serde_json::json!({
            "id": "9b0f2a1e-3c4d-4e5f-8a9b-0c1d2e3f4a5b",
            "title": "Mothership",
            "gamemaster_id": "1b0f2a1e-3c4d-4e5f-8a9b-0c1d2e3f4a5b",
            "max_players": 4
        }))
        .unwrap();
        assert!(!game.registered);
        assert_eq!(game.open_seats(), 4);
    }
}
