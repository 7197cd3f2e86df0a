//! # Auth Gate Middleware
//!
//! Request-level interception that runs before any page handler. It
//! decides redirect-or-proceed and never renders content:
//!
//! - unauthenticated requests to protected paths go to `/login`;
//! - authenticated requests to `/login` go to their role's landing
//!   page (a malformed session here proceeds as unauthenticated
//!   rather than hard-failing);
//! - everything else proceeds, leaving fine-grained role checks to
//!   the page guards.
//!
//! API and asset paths are never intercepted.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::user::LOGIN_PATH;

use super::{redirect_with_cleanup, PortalState};

/// Paths reachable without a session (prefix match)
pub const PUBLIC_PREFIXES: &[&str] = &["/login", "/forgot-password"];

/// Path prefixes the gate never inspects
const BYPASS_PREFIXES: &[&str] = &["/api/", "/assets/", "/images/"];

/// Exact paths the gate never inspects
const BYPASS_EXACT: &[&str] = &["/favicon.ico"];

/// Whether the gate leaves this path alone entirely
pub fn is_bypassed(path: &str) -> bool {
    BYPASS_EXACT.contains(&path) || BYPASS_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Whether this path is reachable without a session
pub fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// The gate middleware
pub async fn auth_gate(
    State(state): State<Arc<PortalState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_bypassed(&path) {
        return next.run(request).await;
    }

    let read = state.auth.read_session(request.headers(), &path);

    match read.session() {
        Some(session) => {
            if path == LOGIN_PATH {
                return Redirect::to(session.user.role.landing_page()).into_response();
            }
            next.run(request).await
        }
        None => {
            // Covers absent, expired, and corrupt cookies alike; a
            // corrupt session on the login path falls through here and
            // proceeds, so the login form still renders.
            if is_public(&path) {
                let mut response = next.run(request).await;
                // Lazy expiry cleanup applies on public pages too.
                if read.needs_cleanup() {
                    if let Ok(value) = HeaderValue::from_str(&state.auth.clear_cookie()) {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                }
                return response;
            }
            state.auth.record_denied(&path);
            redirect_with_cleanup(LOGIN_PATH, read.needs_cleanup(), &state)
        }
    }
}
