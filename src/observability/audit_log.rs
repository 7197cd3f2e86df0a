//! # Auth Audit Log
//!
//! Append-only, bounded in-memory log of authentication events for
//! diagnostics. Entries record who and where, never credentials: an
//! identifier may be logged, a password never is.

use std::collections::VecDeque;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Auth event type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthEvent {
    /// Credentials validated, session created
    LoginSucceeded,
    /// Unknown identifier or wrong password
    LoginFailed,
    /// Blank identifier or password, rejected before lookup
    LoginRejected,
    /// Session cookie cleared
    LogoutCompleted,
    /// Guard denied access and redirected
    AccessDenied,
    /// Session cookie presented past its expiry
    SessionExpired,
    /// Session cookie malformed or tampered
    SessionRejected,
}

impl AuthEvent {
    /// Returns string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthEvent::LoginSucceeded => "login_succeeded",
            AuthEvent::LoginFailed => "login_failed",
            AuthEvent::LoginRejected => "login_rejected",
            AuthEvent::LogoutCompleted => "logout_completed",
            AuthEvent::AccessDenied => "access_denied",
            AuthEvent::SessionExpired => "session_expired",
            AuthEvent::SessionRejected => "session_rejected",
        }
    }
}

/// A single audit entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Unique entry id
    pub id: Uuid,
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// What happened
    pub event: AuthEvent,
    /// Login identifier involved, if any (never a password)
    pub identifier: Option<String>,
    /// Request path involved, if any
    pub path: Option<String>,
}

/// Audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogConfig {
    /// Whether auth events are recorded
    pub enabled: bool,
    /// Maximum retained entries; oldest are evicted first
    pub capacity: usize,
}

impl Default for AuditLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1000,
        }
    }
}

/// Bounded, append-only audit log
pub struct AuditLog {
    config: AuditLogConfig,
    entries: RwLock<VecDeque<AuditEntry>>,
}

impl AuditLog {
    /// Create a log with the given configuration
    pub fn new(config: AuditLogConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(VecDeque::new()),
        }
    }

    /// Record an event
    ///
    /// No-op when disabled. Evicts the oldest entry at capacity.
    /// Logging must never crash the auth path: a poisoned lock drops
    /// the entry instead of panicking.
    pub fn record(&self, event: AuthEvent, identifier: Option<&str>, path: Option<&str>) {
        if !self.config.enabled {
            return;
        }

        let entry = AuditEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
            identifier: identifier.map(str::to_string),
            path: path.map(str::to_string),
        };

        if let Ok(mut entries) = self.entries.write() {
            if entries.len() >= self.config.capacity {
                entries.pop_front();
            }
            entries.push_back(entry);
        }
    }

    /// The most recent `limit` entries, newest last
    pub fn recent(&self, limit: usize) -> Vec<AuditEntry> {
        self.entries
            .read()
            .map(|entries| {
                let skip = entries.len().saturating_sub(limit);
                entries.iter().skip(skip).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(AuditLogConfig::default())
    }
}
