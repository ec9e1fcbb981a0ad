//! Roles, users and the permission gate.
//!
//! Authentication is mocked: any credentials are accepted and the session
//! takes the role it is given.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Technician,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Technician => "technician",
        }
    }

    /// Display name given to a user logging in with this role.
    pub fn display_name(self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Manager",
            Role::Technician => "Technician",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: {0} (expected admin, manager or technician)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "technician" => Ok(Role::Technician),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// The current login, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// A logged-out session.
    pub fn new() -> Self {
        Session::default()
    }

    /// Logs in with any credentials.
    pub fn login(&mut self, email: impl Into<String>, _password: &str, role: Role) -> &User {
        let user = User {
            id: String::from("1"),
            email: email.into(),
            name: role.display_name().to_string(),
            role,
        };
        info!(email = %user.email, %role, "logged in");
        self.user.insert(user)
    }

    /// Shorthand for a session logged in as `role`.
    pub fn as_role(role: Role) -> Self {
        let mut session = Session::new();
        session.login(format!("{}@repairdesk.local", role), "", role);
        session
    }

    pub fn logout(&mut self) {
        self.user = None;
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// `true` when logged in with one of `roles`.
    pub fn has_permission(&self, roles: &[Role]) -> bool {
        self.user
            .as_ref()
            .map(|u| roles.contains(&u.role))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logged_out_has_no_permissions() {
        let session = Session::new();
        assert!(!session.is_authenticated());
        assert!(!session.has_permission(&[Role::Admin, Role::Manager, Role::Technician]));
    }

    #[test]
    fn login_takes_the_given_role() {
        let mut session = Session::new();
        let user = session.login("anna@example.com", "secret", Role::Manager);
        assert_eq!(user.name, "Manager");
        assert_eq!(user.email, "anna@example.com");

        assert!(session.has_permission(&[Role::Admin, Role::Manager]));
        assert!(!session.has_permission(&[Role::Admin]));
        assert!(!session.has_permission(&[]));

        session.logout();
        assert!(!session.has_permission(&[Role::Manager]));
    }

    #[test]
    fn parse_role() {
        assert_eq!("Technician".parse::<Role>().unwrap(), Role::Technician);
        assert_eq!(
            "owner".parse::<Role>().unwrap_err(),
            UnknownRole("owner".into())
        );
    }
}
