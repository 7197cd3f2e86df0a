//! # Authorization Service
//!
//! The single access-decision point shared by the request-level gate
//! and every page guard. Centralizing the policy here keeps the
//! redirect rules from drifting between pages.

use super::session::Session;
use super::user::{Role, LOGIN_PATH};

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render the page
    Allow,
    /// Do not render; send the client here instead
    DenyRedirect(&'static str),
}

/// Check whether a session may access a page restricted to `allowed` roles
///
/// - no session → redirect to login;
/// - session role in `allowed` → allow;
/// - session role not in `allowed` → redirect to that role's own
///   landing page (a student visiting `/admin` goes to `/dashboard`,
///   an admin visiting `/dashboard` goes to `/admin`).
pub fn check_access(session: Option<&Session>, allowed: &[Role]) -> AccessDecision {
    match session {
        None => AccessDecision::DenyRedirect(LOGIN_PATH),
        Some(session) if allowed.contains(&session.user.role) => AccessDecision::Allow,
        Some(session) => AccessDecision::DenyRedirect(session.user.role.landing_page()),
    }
}

/// Where a request with this session lands by default
///
/// Used by the root page and by the gate when an authenticated user
/// hits the login page.
pub fn landing_redirect(session: Option<&Session>) -> &'static str {
    match session {
        Some(session) => session.user.role.landing_page(),
        None => LOGIN_PATH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::user::User;
    use chrono::Utc;

    fn session_with_role(role: Role) -> Session {
        Session::new(
            User {
                id: "1".to_string(),
                name: "Test".to_string(),
                email: "test@staustin.edu".to_string(),
                role,
                registration_number: None,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_no_session_redirects_to_login() {
        assert_eq!(
            check_access(None, &[Role::Student]),
            AccessDecision::DenyRedirect("/login")
        );
        assert_eq!(
            check_access(None, &[Role::Admin, Role::SystemAdmin]),
            AccessDecision::DenyRedirect("/login")
        );
    }

    #[test]
    fn test_allowed_role_passes() {
        let student = session_with_role(Role::Student);
        assert_eq!(
            check_access(Some(&student), &[Role::Student]),
            AccessDecision::Allow
        );

        let sysadmin = session_with_role(Role::SystemAdmin);
        assert_eq!(
            check_access(Some(&sysadmin), &[Role::Admin, Role::SystemAdmin]),
            AccessDecision::Allow
        );
    }

    #[test]
    fn test_wrong_role_redirects_to_own_landing() {
        let student = session_with_role(Role::Student);
        assert_eq!(
            check_access(Some(&student), &[Role::Admin, Role::SystemAdmin]),
            AccessDecision::DenyRedirect("/dashboard")
        );

        let admin = session_with_role(Role::Admin);
        assert_eq!(
            check_access(Some(&admin), &[Role::Student]),
            AccessDecision::DenyRedirect("/admin")
        );
    }

    #[test]
    fn test_landing_redirect() {
        assert_eq!(landing_redirect(None), "/login");
        assert_eq!(
            landing_redirect(Some(&session_with_role(Role::Student))),
            "/dashboard"
        );
        assert_eq!(
            landing_redirect(Some(&session_with_role(Role::Admin))),
            "/admin"
        );
    }
}
