use garde::Validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::models::session::Session;
use crate::validation::auth::{matches_password, not_blank, password_length};

/// The role assigned to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Passenger,
    Staff,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Passenger => "PASSENGER",
            Role::Staff => "STAFF",
            Role::Admin => "ADMIN",
        };
        f.write_str(name)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "PASSENGER" => Ok(Role::Passenger),
            "STAFF" => Ok(Role::Staff),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Represents the signed-in account, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The unique identifier for the user.
    pub id: i64,
    /// The user's username.
    pub username: String,
    /// The user's email address.
    pub email: String,
    /// The user's first name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// The user's last name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// The user's role.
    pub role: Role,
    /// The staff employee number, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    /// The staff department, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Whether the user may use the staff dashboard.
    pub is_staff_member: bool,
    /// Whether the user may append status updates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_update_baggage_status: Option<bool>,
}

impl User {
    /// The full name when one is set, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if full.is_empty() {
            self.username.clone()
        } else {
            full
        }
    }

    /// Up to two uppercase initials for the account badge.
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Whether the user may append status updates to baggage records.
    pub fn can_update_status(&self) -> bool {
        self.can_update_baggage_status.unwrap_or(self.is_staff_member)
    }
}

/// The request payload for passenger and staff login.
#[derive(Serialize, Validate, Zeroize, ZeroizeOnDrop)]
pub struct LoginCredentials {
    #[garde(custom(not_blank))]
    pub username: String,
    #[garde(custom(not_blank))]
    pub password: String,
}

impl LoginCredentials {
    /// Creates a new `LoginCredentials`.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// The request payload for account registration.
#[derive(Clone, Default, Serialize, Validate)]
pub struct RegisterData {
    #[garde(custom(not_blank))]
    pub username: String,
    #[garde(custom(not_blank), email)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub last_name: Option<String>,
    #[garde(custom(password_length))]
    pub password: String,
    #[garde(custom(matches_password(&self.password)))]
    pub password_confirm: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub employee_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub department: Option<String>,
}

/// The response of the login, staff login and registration endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub tokens: Session,
    #[serde(default)]
    pub message: Option<String>,
}

/// The response of `GET /auth/user/`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserEnvelope {
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: Option<&str>, last: Option<&str>) -> User {
        User {
            id: 7,
            username: "jdoe".into(),
            email: "jdoe@example.com".into(),
            first_name: first.map(Into::into),
            last_name: last.map(Into::into),
            role: Role::Passenger,
            employee_id: None,
            department: None,
            is_staff_member: false,
            can_update_baggage_status: None,
        }
    }

    #[test]
    fn display_name_falls_back_to_username() {
        assert_eq!(user(Some("Jane"), Some("Doe")).display_name(), "Jane Doe");
        assert_eq!(user(Some(""), Some(" ")).display_name(), "jdoe");
        assert_eq!(user(None, None).initials(), "J");
        assert_eq!(user(Some("jane"), Some("doe")).initials(), "JD");
    }

    #[test]
    fn decodes_server_user() {
        let json = r#"{"id":3,"username":"staff1","email":"s@airport.ug","first_name":"","last_name":"",
            "role":"STAFF","employee_id":"EMP001","department":"Ground Handling",
            "is_staff_member":true,"can_update_baggage_status":true}"#;
        let user: User = sonic_rs::from_str(json).unwrap();
        assert_eq!(user.role, Role::Staff);
        assert_eq!(user.employee_id.as_deref(), Some("EMP001"));
        assert!(user.can_update_status());
    }
}
