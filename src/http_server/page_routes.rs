//! # Page Routes & Guards
//!
//! Each protected page re-derives the session from the request and
//! applies its own policy through the shared authorization service,
//! so a page stays correct even if the gate's coarse pass let the
//! request through. Any session-read anomaly resolves to a redirect,
//! never an error page.
//!
//! The markup here is a deliberate stub; the visual layer is not part
//! of this service.

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};

use crate::auth::user::{Role, ADMIN_LANDING, LOGIN_PATH, STUDENT_LANDING};
use crate::auth::{check_access, landing_redirect, AccessDecision, Session};

use super::{redirect_with_cleanup, PortalState};

/// GET / — redirect to the session's landing page, or to login
pub async fn home_page(State(state): State<Arc<PortalState>>, headers: HeaderMap) -> Response {
    let read = state.auth.read_session(&headers, "/");
    let target = landing_redirect(read.session());
    redirect_with_cleanup(target, read.needs_cleanup(), &state)
}

/// GET /dashboard — student landing page
pub async fn student_dashboard(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
) -> Response {
    let read = state.auth.read_session(&headers, STUDENT_LANDING);
    match (check_access(read.session(), &[Role::Student]), read.session()) {
        (AccessDecision::Allow, Some(session)) => render_dashboard(session).into_response(),
        (AccessDecision::DenyRedirect(target), _) => {
            state.auth.record_denied(STUDENT_LANDING);
            redirect_with_cleanup(target, read.needs_cleanup(), &state)
        }
        // Fail closed: never render with a partial session.
        (AccessDecision::Allow, None) => redirect_with_cleanup(LOGIN_PATH, false, &state),
    }
}

/// GET /admin — administrator landing page
pub async fn admin_dashboard(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
) -> Response {
    let read = state.auth.read_session(&headers, ADMIN_LANDING);
    match (
        check_access(read.session(), &[Role::Admin, Role::SystemAdmin]),
        read.session(),
    ) {
        (AccessDecision::Allow, Some(session)) => render_admin(session).into_response(),
        (AccessDecision::DenyRedirect(target), _) => {
            state.auth.record_denied(ADMIN_LANDING);
            redirect_with_cleanup(target, read.needs_cleanup(), &state)
        }
        (AccessDecision::Allow, None) => redirect_with_cleanup(LOGIN_PATH, false, &state),
    }
}

/// GET /login — the login form
pub async fn login_page() -> Html<&'static str> {
    Html(
        "<h1>St. Austin Portal</h1>\
         <form method=\"post\" action=\"/api/login\">\
         <input name=\"identifier\" placeholder=\"Email or registration number\">\
         <input name=\"password\" type=\"password\">\
         <button type=\"submit\">Sign in</button>\
         </form>",
    )
}

/// GET /forgot-password — public stub page
pub async fn forgot_password_page() -> Html<&'static str> {
    Html("<h1>Forgot password</h1><p>Contact the registrar's office to reset your password.</p>")
}

fn render_dashboard(session: &Session) -> Html<String> {
    Html(format!(
        "<h1>Student Dashboard</h1><p>Welcome, {}</p>",
        session.user.name
    ))
}

fn render_admin(session: &Session) -> Html<String> {
    Html(format!(
        "<h1>Admin Console</h1><p>Signed in as {} ({})</p>",
        session.user.name,
        session.user.role.as_str()
    ))
}
