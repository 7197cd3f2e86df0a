//! # Users & Roles
//!
//! Identity records for the portal. Users are created only by seeding;
//! nothing mutates or deletes them at runtime.

use serde::{Deserialize, Serialize};

/// Landing page for students
pub const STUDENT_LANDING: &str = "/dashboard";
/// Landing page for administrators
pub const ADMIN_LANDING: &str = "/admin";
/// Login page, the landing for everyone else
pub const LOGIN_PATH: &str = "/login";

/// Portal role
///
/// Closed set: a session carrying any other role value fails
/// deserialization and is treated as unauthorized by every guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Enrolled student
    Student,
    /// Portal administrator
    Admin,
    /// System administrator
    SystemAdmin,
}

impl Role {
    /// Returns string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Admin => "admin",
            Role::SystemAdmin => "system_admin",
        }
    }

    /// Whether this role lands on the admin console
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SystemAdmin)
    }

    /// The page this role is sent to after login
    pub fn landing_page(&self) -> &'static str {
        if self.is_admin() {
            ADMIN_LANDING
        } else {
            STUDENT_LANDING
        }
    }
}

/// A portal user
///
/// Wire field names match the session cookie format
/// (`registrationNumber` rather than snake_case).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque unique id
    pub id: String,
    /// Display name
    pub name: String,
    /// Email address, unique case-insensitively
    pub email: String,
    /// Portal role
    pub role: Role,
    /// Registration number, present iff role = student
    #[serde(
        rename = "registrationNumber",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_number: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization_is_snake_case() {
        assert_eq!(
            serde_json::to_string(&Role::SystemAdmin).unwrap(),
            "\"system_admin\""
        );
        assert_eq!(Role::SystemAdmin.as_str(), "system_admin");
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<Role, _> = serde_json::from_str("\"superuser\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_landing_pages() {
        assert_eq!(Role::Student.landing_page(), "/dashboard");
        assert_eq!(Role::Admin.landing_page(), "/admin");
        assert_eq!(Role::SystemAdmin.landing_page(), "/admin");
    }

    #[test]
    fn test_is_admin() {
        assert!(!Role::Student.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(Role::SystemAdmin.is_admin());
    }

    #[test]
    fn test_user_wire_format() {
        let user = User {
            id: "1".to_string(),
            name: "John Doe".to_string(),
            email: "john.doe@staustin.edu".to_string(),
            role: Role::Student,
            registration_number: Some("REG/2024/001".to_string()),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"registrationNumber\":\"REG/2024/001\""));

        let admin = User {
            id: "2".to_string(),
            name: "Admin User".to_string(),
            email: "admin@staustin.edu".to_string(),
            role: Role::Admin,
            registration_number: None,
        };
        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("registrationNumber"));
    }
}
