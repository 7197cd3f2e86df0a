//! # Portal Configuration
//!
//! TOML-loadable settings for the server: bind address, cookie
//! security, session signing secret, and audit log sizing.

use std::path::Path;

use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::auth::errors::{AuthError, AuthResult};
use crate::config_validator::{ConfigResult, ConfigValidator};
use crate::observability::AuditLogConfig;

/// Minimum length for a configured session secret
pub const MIN_SECRET_LENGTH: usize = 32;

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

/// Portal server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Mark the session cookie Secure
    ///
    /// Off for local development; on behind TLS in production.
    #[serde(default)]
    pub secure_cookies: bool,

    /// Session signing secret
    ///
    /// When absent a random key is generated at startup, which means
    /// sessions do not survive a restart.
    #[serde(default)]
    pub session_secret: Option<String>,

    /// Audit log settings
    #[serde(default)]
    pub audit: AuditLogConfig,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secure_cookies: false,
            session_secret: None,
            audit: AuditLogConfig::default(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> AuthResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AuthError::InvalidConfig(format!("Cannot read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            AuthError::InvalidConfig(format!("Cannot parse {}: {}", path.display(), e))
        })
    }

    /// Validate all fields, collecting every error
    pub fn validate(&self) -> ConfigResult<()> {
        let mut v = ConfigValidator::new();
        v.validate_non_empty("host", &self.host)
            .validate_port("port", self.port)
            .validate_range("audit.capacity", self.audit.capacity as i64, 1, 1_000_000);
        if let Some(secret) = &self.session_secret {
            v.validate_min_length("session_secret", secret, MIN_SECRET_LENGTH);
        }
        v.finish()
    }

    /// The session signing key
    ///
    /// The configured secret, or a fresh random key when none is set.
    pub fn signing_key(&self) -> Vec<u8> {
        match &self.session_secret {
            Some(secret) => secret.as_bytes().to_vec(),
            None => {
                let mut key = vec![0u8; MIN_SECRET_LENGTH];
                rand::thread_rng().fill_bytes(&mut key);
                key
            }
        }
    }

    /// Bind address string
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
