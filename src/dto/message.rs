use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::validation::validate_not_blank;

/// A direct message in a member's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageView {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub sent_at: Option<String>,
}

/// Payload used to send a message to another member.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 150), custom(function = "validate_not_blank"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000))]
    pub body: String,
}

/// Payload flipping a message's read flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkReadRequest {
    pub read: bool,
}
