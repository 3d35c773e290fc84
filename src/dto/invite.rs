use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{dto::validation::validate_not_blank, state::Role};

/// Lifecycle of an invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Revoked,
    Expired,
}

/// An invite row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InviteView {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub status: InviteStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Payload used by admins to invite someone to the club.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendInviteRequest {
    #[validate(email)]
    pub email: String,
    pub role: Role,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub note: Option<String>,
}

/// Payload redeeming an invite token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AcceptInviteRequest {
    #[validate(length(min = 8, max = 256), custom(function = "validate_not_blank"))]
    pub token: String,
}
