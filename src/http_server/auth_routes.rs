//! # Auth API Routes
//!
//! `POST /api/login` and `POST /api/logout`. Login returns a result
//! and sets the session cookie; the client performs the role-based
//! redirect. Logout clears the cookie and always sends the client to
//! the login page. `GET /api/audit` exposes recent auth events to
//! administrators.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::auth::user::{Role, User, LOGIN_PATH};
use crate::auth::{check_access, AccessDecision, AuthError};

use super::PortalState;

/// Login form payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Email or registration number
    pub identifier: String,
    /// Raw password, never logged
    pub password: String,
}

/// Login action result
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

/// Accepts either a JSON or a form-encoded body
///
/// The login page's plain form posts urlencoded; API clients post
/// JSON. Both deserialize into the same payload.
pub struct JsonOrForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("application/json") {
            let Json(payload) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(Self(payload));
        }

        let Form(payload) = Form::<T>::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Ok(Self(payload))
    }
}

/// POST /api/login — authenticate and set the session cookie
///
/// 200 with the user payload on success; 400 for blank input; 401 for
/// invalid credentials. Failure messages are generic by design.
pub async fn login(
    State(state): State<Arc<PortalState>>,
    JsonOrForm(body): JsonOrForm<LoginRequest>,
) -> Response {
    match state.auth.login(&body.identifier, &body.password) {
        Ok(success) => (
            StatusCode::OK,
            [(header::SET_COOKIE, success.set_cookie)],
            Json(LoginResponse {
                success: true,
                user: Some(success.user),
                error: None,
                code: None,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/logout — clear the session and go to the login page
///
/// Idempotent; succeeds whether or not a session existed, so the user
/// is never stranded on a page believing it is authenticated.
pub async fn logout(State(state): State<Arc<PortalState>>) -> Response {
    let clear_cookie = state.auth.logout();
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, LOGIN_PATH.to_string()),
            (header::SET_COOKIE, clear_cookie),
        ],
    )
        .into_response()
}

/// GET /api/audit — recent auth events, administrators only
///
/// 401 without a session, 403 for non-admin roles. API paths bypass
/// the gate, so the role check happens here.
pub async fn audit_log(
    State(state): State<Arc<PortalState>>,
    headers: HeaderMap,
) -> Response {
    let read = state.auth.read_session(&headers, "/api/audit");
    match check_access(read.session(), &[Role::Admin, Role::SystemAdmin]) {
        AccessDecision::Allow => Json(state.auth.audit().recent(50)).into_response(),
        AccessDecision::DenyRedirect(_) => {
            state.auth.record_denied("/api/audit");
            if read.session().is_none() {
                StatusCode::UNAUTHORIZED.into_response()
            } else {
                StatusCode::FORBIDDEN.into_response()
            }
        }
    }
}

fn error_response(e: AuthError) -> Response {
    (
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(LoginResponse {
            success: false,
            user: None,
            error: Some(e.to_string()),
            code: Some(e.code()),
        }),
    )
        .into_response()
}
