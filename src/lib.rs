//! campus-portal - Session-based authentication and role routing
//! for the St. Austin student portal.
//!
//! The auth module owns credentials, sessions, and access decisions;
//! the http_server module wires them into axum routes and middleware.

pub mod auth;
pub mod config;
pub mod config_validator;
pub mod http_server;
pub mod observability;
pub mod version;
