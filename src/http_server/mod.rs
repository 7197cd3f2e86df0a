//! # HTTP Server
//!
//! Wires the auth service into an axum application: page routes with
//! their guards, the login/logout API, and the auth gate middleware
//! in front of everything.

pub mod auth_gate;
pub mod auth_routes;
pub mod page_routes;

use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::AuthService;
use crate::config::PortalConfig;
use crate::config_validator::format_validation_errors;
use crate::observability::AuditLog;

/// Shared application state
pub struct PortalState {
    /// Auth service used by the gate, the guards, and the API
    pub auth: AuthService,
}

impl PortalState {
    /// Create state over a seeded auth service
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }
}

/// Build the portal router
pub fn portal_router(state: Arc<PortalState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(page_routes::home_page))
        .route("/dashboard", get(page_routes::student_dashboard))
        .route("/admin", get(page_routes::admin_dashboard))
        .route("/login", get(page_routes::login_page))
        .route("/forgot-password", get(page_routes::forgot_password_page))
        // Auth API
        .route("/api/login", post(auth_routes::login))
        .route("/api/logout", post(auth_routes::logout))
        .route("/api/audit", get(auth_routes::audit_log))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_gate::auth_gate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Redirect, clearing the stale session cookie when one was presented
///
/// Used by the gate and every page guard so expired-cookie cleanup
/// behaves the same everywhere.
pub(crate) fn redirect_with_cleanup(
    target: &str,
    cleanup: bool,
    state: &PortalState,
) -> Response {
    if cleanup {
        (
            StatusCode::SEE_OTHER,
            [
                (header::LOCATION, target.to_string()),
                (header::SET_COOKIE, state.auth.clear_cookie()),
            ],
        )
            .into_response()
    } else {
        Redirect::to(target).into_response()
    }
}

/// The portal HTTP server
pub struct HttpServer {
    config: PortalConfig,
}

impl HttpServer {
    /// Create a server with default configuration
    pub fn new() -> Self {
        Self::with_config(PortalConfig::default())
    }

    /// Create a server with the given configuration
    pub fn with_config(config: PortalConfig) -> Self {
        Self { config }
    }

    /// Validate configuration, bind, and serve
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error>> {
        if let Err(errors) = self.config.validate() {
            return Err(format!(
                "Configuration is invalid:\n{}",
                format_validation_errors(&errors)
            )
            .into());
        }

        if self.config.session_secret.is_none() {
            println!("No session_secret configured; using a random key (sessions will not survive restart)");
        }

        let audit = Arc::new(AuditLog::new(self.config.audit.clone()));
        let auth = AuthService::seeded(
            self.config.signing_key(),
            self.config.secure_cookies,
            audit,
        )?;
        let state = Arc::new(PortalState::new(auth));
        let router = portal_router(state);

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr()).await?;
        println!("Portal listening on http://{}", self.config.bind_addr());
        axum::serve(listener, router).await?;
        Ok(())
    }
}

impl Default for HttpServer {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn login_request(identifier: &str, password: &str) -> Request<Body> {
        Request::post("/api/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "identifier": identifier, "password": password })
                    .to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_login_success_sets_session_cookie() {
        let state = test_support::state();
        let response = portal_router(state)
            .oneshot(login_request("REG/2024/001", "password123"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("session="));
        assert!(set_cookie.contains("Max-Age=86400"));
        assert!(set_cookie.contains("HttpOnly"));

        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["role"], "student");
        assert_eq!(json["user"]["registrationNumber"], "REG/2024/001");
    }

    #[tokio::test]
    async fn test_login_failure_sets_no_cookie() {
        let state = test_support::state();
        let response = portal_router(state)
            .oneshot(login_request("admin@staustin.edu", "wrongpass"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Invalid credentials");
        assert_eq!(json["code"], "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_login_failure_message_identical_for_unknown_identifier() {
        let state = test_support::state();
        let wrong_password = portal_router(state.clone())
            .oneshot(login_request("admin@staustin.edu", "wrongpass"))
            .await
            .unwrap();
        let unknown = portal_router(state)
            .oneshot(login_request("ghost@staustin.edu", "wrongpass"))
            .await
            .unwrap();

        let a = body_json(wrong_password).await;
        let b = body_json(unknown).await;
        assert_eq!(a["error"], b["error"]);
    }

    #[tokio::test]
    async fn test_student_visiting_admin_is_sent_to_dashboard() {
        let state = test_support::state();
        let cookie = test_support::login_cookie(&state, "REG/2024/001", "password123");

        let response = portal_router(state)
            .oneshot(
                Request::get("/admin")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/dashboard");
    }

    #[tokio::test]
    async fn test_admin_visiting_dashboard_is_sent_to_admin() {
        let state = test_support::state();
        let cookie = test_support::login_cookie(&state, "admin@staustin.edu", "admin123");

        let response = portal_router(state)
            .oneshot(
                Request::get("/dashboard")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }

    #[tokio::test]
    async fn test_tampered_cookie_acts_as_unauthenticated_everywhere() {
        let state = test_support::state();
        for path in ["/", "/dashboard", "/admin"] {
            let response = portal_router(state.clone())
                .oneshot(
                    Request::get(path)
                        .header(header::COOKIE, "session=payload.deadbeef")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {}", path);
            assert_eq!(response.headers()[header::LOCATION], "/login");
        }
    }

    #[tokio::test]
    async fn test_root_redirects_by_role() {
        let state = test_support::state();

        let response = portal_router(state.clone())
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/login");

        let cookie = test_support::login_cookie(&state, "sysadmin@staustin.edu", "sysadmin123");
        let response = portal_router(state)
            .oneshot(
                Request::get("/")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }

    #[tokio::test]
    async fn test_logout_clears_cookie_and_redirects() {
        let state = test_support::state();
        let cookie = test_support::login_cookie(&state, "REG/2024/001", "password123");

        for _ in 0..2 {
            // Idempotent: the second logout behaves identically.
            let response = portal_router(state.clone())
                .oneshot(
                    Request::post("/api/logout")
                        .header(header::COOKIE, cookie.clone())
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SEE_OTHER);
            assert_eq!(response.headers()[header::LOCATION], "/login");
            let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
            assert!(set_cookie.contains("Max-Age=0"));
        }
    }

    #[tokio::test]
    async fn test_server_rejects_invalid_config() {
        let config = PortalConfig {
            port: 0,
            ..Default::default()
        };
        let err = HttpServer::with_config(config).start().await.unwrap_err();
        assert!(err.to_string().contains("port"));
    }
}
