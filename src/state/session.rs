use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role claims issued by the authentication provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Gamemaster,
    Member,
}

/// The signed-in user as reported by the authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: Uuid,
    pub display_name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl Session {
    /// True when the session carries `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Club administrators.
    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }

    /// Gamemasters, administrators included.
    pub fn is_gamemaster(&self) -> bool {
        self.is_admin() || self.has_role(Role::Gamemaster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admins_count_as_gamemasters() {
        let session = Session {
            user_id: Uuid::new_v4(),
            display_name: "Ada".into(),
            roles: vec![Role::Admin],
        };
        assert!(session.is_gamemaster());
        assert!(!session.has_role(Role::Member));
    }

    #[test]
    fn decodes_role_claims() {
        let session: Session = serde_json::from_str(
            r#"{"user_id":"6f1c2f4e-9a55-4d4e-a0a4-0c3f4a1b2c3d","display_name":"Kit","roles":["gamemaster"]}"#,
        )
        .unwrap();
        assert!(session.is_gamemaster());
        assert!(!session.is_admin());
    }
}
