use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use uuid::Uuid;
use validator::Validate;

use crate::dto::validation::validate_not_blank;

/// Visibility tier of an announcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Public,
    Members,
    Gamemasters,
    Admins,
}

impl Audience {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Audience::Public => "public",
            Audience::Members => "members",
            Audience::Gamemasters => "gamemasters",
            Audience::Admins => "admins",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An announcement row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementView {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub audience: Audience,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Payload used to publish an announcement.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAnnouncementRequest {
    #[validate(length(min = 1, max = 120), custom(function = "validate_not_blank"))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub body: String,
    pub audience: Audience,
    #[serde(default)]
    pub pinned: bool,
}

/// Partial update of an announcement.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAnnouncementRequest {
    #[validate(length(min = 1, max = 120), custom(function = "validate_not_blank"))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 10000))]
    pub body: Option<String>,
    pub audience: Option<Audience>,
    pub pinned: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audience_wire_names() {
        assert_eq!(
            serde_json::to_value(Audience::Gamemasters).unwrap(),
            serde_json::json!("gamemasters")
        );
        assert_eq!(Audience::Admins.to_string(), "admins");
    }

    #[test]
    fn empty_body_is_rejected() {
        let request = CreateAnnouncementRequest {
            title: "Con weekend".into(),
            body: String::new(),
            audience: Audience::Members,
            pinned: false,
        };
        assert!(request.validate().is_err());
    }
}
