//! Explicit session state.
//!
//! The session is an ordinary value with a visible lifecycle: the gateway
//! creates one on login and drops it on logout. Nothing is stashed in
//! ambient global state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The account a session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Server-assigned account identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role token: `user` or `admin`.
    pub role: String,
}

/// An authenticated session: the account plus its bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: SessionUser,
    token: String,
}

impl Session {
    /// Bundle an account with the bearer token issued for it.
    pub fn new(user: SessionUser, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    /// The account this session authenticates.
    pub fn user(&self) -> &SessionUser {
        &self.user
    }

    /// The raw bearer token sent in the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether the session belongs to an administrator.
    pub fn is_admin(&self) -> bool {
        self.user.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{Session, SessionUser};

    fn user(role: &str) -> SessionUser {
        SessionUser {
            id: Uuid::new_v4(),
            name: "Warga Uji".into(),
            email: "warga@example.com".into(),
            role: role.into(),
        }
    }

    #[test]
    fn admin_flag_follows_the_role_token() {
        assert!(Session::new(user("admin"), "t").is_admin());
        assert!(!Session::new(user("user"), "t").is_admin());
    }
}
