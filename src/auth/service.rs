//! # Auth Service
//!
//! Orchestrates credential validation and the session cookie for the
//! login and logout actions. The contract is: the action returns a
//! result and the only side effect is the cookie; the caller performs
//! the role-based redirect.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::observability::{AuditLog, AuthEvent};

use super::credentials::{CredentialValidator, InMemoryCredentialStore};
use super::errors::{AuthError, AuthResult};
use super::session::{Session, SessionManager, SessionRead};
use super::user::User;

/// Successful login: the user payload and the cookie persisting it
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// The authenticated user, returned to the client
    pub user: User,
    /// The created session
    pub session: Session,
    /// Set-Cookie value the response must carry
    pub set_cookie: String,
}

/// Login, logout, and session reads for the portal
#[derive(Clone)]
pub struct AuthService {
    validator: CredentialValidator,
    sessions: SessionManager,
    audit: Arc<AuditLog>,
}

impl AuthService {
    /// Create a service from its parts
    pub fn new(
        validator: CredentialValidator,
        sessions: SessionManager,
        audit: Arc<AuditLog>,
    ) -> Self {
        Self {
            validator,
            sessions,
            audit,
        }
    }

    /// Create a service over the seeded demo credential store
    pub fn seeded(
        signing_key: impl Into<Vec<u8>>,
        secure_cookies: bool,
        audit: Arc<AuditLog>,
    ) -> AuthResult<Self> {
        let store = Arc::new(InMemoryCredentialStore::seeded()?);
        Ok(Self::new(
            CredentialValidator::new(store),
            SessionManager::new(signing_key, secure_cookies),
            audit,
        ))
    }

    /// Authenticate and create a session
    ///
    /// Blank input fails with a generic validation error before any
    /// lookup. A miss fails with the one generic invalid-credentials
    /// error regardless of which field was wrong. Passwords are never
    /// logged.
    pub fn login(&self, identifier: &str, password: &str) -> AuthResult<LoginSuccess> {
        if identifier.trim().is_empty() || password.trim().is_empty() {
            self.audit.record(AuthEvent::LoginRejected, None, None);
            return Err(AuthError::MissingCredentials);
        }

        let user = match self.validator.validate(identifier, password) {
            Some(user) => user,
            None => {
                self.audit
                    .record(AuthEvent::LoginFailed, Some(identifier.trim()), None);
                return Err(AuthError::InvalidCredentials);
            }
        };

        let (session, set_cookie) = self.sessions.create(user.clone())?;
        self.audit
            .record(AuthEvent::LoginSucceeded, Some(identifier.trim()), None);

        Ok(LoginSuccess {
            user,
            session,
            set_cookie,
        })
    }

    /// End the session
    ///
    /// Unconditional and idempotent: returns the clearing Set-Cookie
    /// value whether or not a session existed, so the client is always
    /// free to navigate to the login page.
    pub fn logout(&self) -> String {
        self.audit.record(AuthEvent::LogoutCompleted, None, None);
        self.sessions.clear_cookie()
    }

    /// Read the request's session, recording anomalies
    pub fn read_session(&self, headers: &HeaderMap, path: &str) -> SessionRead {
        let read = self.sessions.read(headers);
        match read {
            SessionRead::Expired => {
                self.audit
                    .record(AuthEvent::SessionExpired, None, Some(path));
            }
            SessionRead::Invalid => {
                self.audit
                    .record(AuthEvent::SessionRejected, None, Some(path));
            }
            _ => {}
        }
        read
    }

    /// The Set-Cookie value that deletes the session cookie
    pub fn clear_cookie(&self) -> String {
        self.sessions.clear_cookie()
    }

    /// The audit log backing this service
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// Record an access denial from a guard
    pub fn record_denied(&self, path: &str) {
        self.audit.record(AuthEvent::AccessDenied, None, Some(path));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderValue};

    const KEY: &[u8] = b"test-signing-key-32-bytes-long!!";

    fn service() -> AuthService {
        AuthService::seeded(KEY, false, Arc::new(AuditLog::default())).unwrap()
    }

    fn headers_with_cookie(set_cookie: &str) -> HeaderMap {
        // Turn the Set-Cookie value back into a request Cookie header.
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    #[test]
    fn test_login_success_by_registration_number() {
        let svc = service();
        let success = svc.login("REG/2024/001", "password123").unwrap();
        assert_eq!(success.user.role, crate::auth::Role::Student);
        assert!(success.set_cookie.starts_with("session="));

        // The cookie reads back as the same session, ~24h out.
        let read = svc.read_session(&headers_with_cookie(&success.set_cookie), "/");
        assert_eq!(read.session(), Some(&success.session));
    }

    #[test]
    fn test_login_wrong_password_is_generic() {
        let svc = service();
        let err = svc.login("admin@staustin.edu", "wrongpass").unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        let unknown = svc.login("ghost@staustin.edu", "admin123").unwrap_err();
        // Identical message text for both causes.
        assert_eq!(err.to_string(), unknown.to_string());
    }

    #[test]
    fn test_login_blank_input_rejected() {
        let svc = service();
        assert!(matches!(
            svc.login("   ", "password123").unwrap_err(),
            AuthError::MissingCredentials
        ));
        assert!(matches!(
            svc.login("REG/2024/001", "   ").unwrap_err(),
            AuthError::MissingCredentials
        ));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let svc = service();
        let first = svc.logout();
        let second = svc.logout();
        assert_eq!(first, second);
        assert!(first.contains("Max-Age=0"));
    }

    #[test]
    fn test_audit_never_contains_passwords() {
        let audit = Arc::new(AuditLog::default());
        let svc = AuthService::seeded(KEY, false, audit.clone()).unwrap();

        let _ = svc.login("admin@staustin.edu", "admin123");
        let _ = svc.login("admin@staustin.edu", "wrongpass");

        let entries = audit.recent(10);
        assert_eq!(entries.len(), 2);
        for entry in &entries {
            let json = serde_json::to_string(entry).unwrap();
            assert!(!json.contains("admin123"));
            assert!(!json.contains("wrongpass"));
        }
    }
}
