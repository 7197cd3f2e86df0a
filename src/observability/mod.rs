//! # Observability
//!
//! Auth event auditing for the portal.

pub mod audit_log;

pub use audit_log::{AuditEntry, AuditLog, AuditLogConfig, AuthEvent};
