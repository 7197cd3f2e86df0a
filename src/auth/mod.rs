//! # Portal Auth Module
//!
//! Authentication and authorization for the student portal: the
//! credential store and validator, the signed session cookie, the
//! access-decision service shared by the gate and the page guards,
//! and the login/logout actions.

pub mod authorization;
pub mod credentials;
pub mod errors;
pub mod service;
pub mod session;
pub mod user;

pub use authorization::{check_access, landing_redirect, AccessDecision};
pub use credentials::{CredentialRecord, CredentialStore, CredentialValidator, InMemoryCredentialStore};
pub use errors::{AuthError, AuthResult};
pub use service::{AuthService, LoginSuccess};
pub use session::{Session, SessionManager, SessionRead, SESSION_COOKIE_NAME};
pub use user::{Role, User};
