use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{dto::validation::validate_not_blank, state::Role};

/// A club member row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberView {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub joined_at: Option<String>,
}

/// Payload used by admins to add a member directly.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(length(min = 1, max = 80), custom(function = "validate_not_blank"))]
    pub display_name: String,
    #[validate(email)]
    pub email: String,
    pub role: Role,
}

/// Payload changing a member's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMemberRoleRequest {
    pub role: Role,
}
