//! # Sessions
//!
//! The session is the browser's proof of authentication: the embedded
//! user plus an absolute expiry, carried in a single cookie. The server
//! keeps no session table — the cookie is the record.
//!
//! The cookie value is tamper-evident: `base64url(json).hex(hmac)`,
//! HMAC-SHA256 over the encoded payload. A bad signature or malformed
//! payload decodes to `Invalid`; an expired session decodes to
//! `Expired` so callers can clear the stale cookie (lazy expiry, no
//! background sweep). Every non-`Active` outcome is treated as
//! unauthenticated by the guards.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::errors::{AuthError, AuthResult};
use super::user::User;

type HmacSha256 = Hmac<Sha256>;

/// Cookie name holding the serialized session
pub const SESSION_COOKIE_NAME: &str = "session";

/// Session lifetime: 24 hours, absolute, not extended by activity
pub const SESSION_MAX_AGE_SECONDS: i64 = 24 * 60 * 60;

// ==================
// Session
// ==================

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated user (no credential material)
    pub user: User,
    /// Absolute expiry, ISO-8601 on the wire
    pub expires: DateTime<Utc>,
}

impl Session {
    /// Create a session expiring 24 hours from `now`
    pub fn new(user: User, now: DateTime<Utc>) -> Self {
        Self {
            user,
            expires: now + Duration::seconds(SESSION_MAX_AGE_SECONDS),
        }
    }

    /// Whether the session has expired as of `now`
    ///
    /// An `expires` exactly at `now` counts as expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires <= now
    }
}

// ==================
// Session Codec
// ==================

/// Why a cookie value failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionDecodeError {
    /// Not a valid token shape, payload, or JSON
    Malformed,
    /// Signature did not verify (tampered or wrong key)
    BadSignature,
    /// Well-formed and authentic, but past its expiry
    Expired,
}

/// Serializes sessions to and from signed cookie values
#[derive(Clone)]
pub struct SessionCodec {
    key: Vec<u8>,
}

impl SessionCodec {
    /// Create a codec with the given signing key
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self { key: key.into() }
    }

    /// Encode a session as `base64url(json).hex(mac)`
    pub fn encode(&self, session: &Session) -> AuthResult<String> {
        let json = serde_json::to_vec(session)
            .map_err(|e| AuthError::SessionEncoding(e.to_string()))?;
        let payload = URL_SAFE_NO_PAD.encode(json);

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|e| AuthError::SessionEncoding(e.to_string()))?;
        mac.update(payload.as_bytes());
        let tag = mac.finalize().into_bytes();

        Ok(format!("{}.{}", payload, hex::encode(tag)))
    }

    /// Decode and verify a cookie value
    ///
    /// The signature is checked before the payload is parsed; the MAC
    /// comparison is constant-time.
    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Session, SessionDecodeError> {
        let (payload, sig_hex) = token
            .split_once('.')
            .ok_or(SessionDecodeError::Malformed)?;
        let sig = hex::decode(sig_hex).map_err(|_| SessionDecodeError::Malformed)?;

        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|_| SessionDecodeError::Malformed)?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&sig)
            .map_err(|_| SessionDecodeError::BadSignature)?;

        let json = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| SessionDecodeError::Malformed)?;
        let session: Session =
            serde_json::from_slice(&json).map_err(|_| SessionDecodeError::Malformed)?;

        if session.is_expired(now) {
            return Err(SessionDecodeError::Expired);
        }
        Ok(session)
    }
}

// ==================
// Cookie Helpers
// ==================

/// Build the Set-Cookie value for a session token
///
/// HttpOnly, SameSite=Lax, site-wide, 24-hour max age; Secure only
/// outside local development.
pub fn set_cookie_header(token: &str, secure: bool) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax{}",
        SESSION_COOKIE_NAME,
        token,
        SESSION_MAX_AGE_SECONDS,
        if secure { "; Secure" } else { "" }
    )
}

/// Build the Set-Cookie value that removes the session cookie
pub fn clear_cookie_header() -> String {
    format!(
        "{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax",
        SESSION_COOKIE_NAME
    )
}

/// Extract the session cookie value from a Cookie header string
pub fn session_cookie_value(cookie_header: &str) -> Option<&str> {
    cookie_header.split(';').find_map(|cookie| {
        cookie
            .trim()
            .strip_prefix(SESSION_COOKIE_NAME)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

// ==================
// Session Manager
// ==================

/// Outcome of reading the session from a request
///
/// Guards treat everything except `Active` as unauthenticated;
/// `Expired` additionally gets a best-effort cookie cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionRead {
    /// No session cookie present
    Absent,
    /// Valid, unexpired session
    Active(Session),
    /// Cookie present but past its expiry
    Expired,
    /// Cookie present but malformed or tampered
    Invalid,
}

impl SessionRead {
    /// The session, if active
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionRead::Active(session) => Some(session),
            _ => None,
        }
    }

    /// Whether the presented cookie was expired and should be cleared
    pub fn needs_cleanup(&self) -> bool {
        matches!(self, SessionRead::Expired)
    }
}

/// Creates, reads, and deletes the session cookie
#[derive(Clone)]
pub struct SessionManager {
    codec: SessionCodec,
    secure_cookies: bool,
}

impl SessionManager {
    /// Create a manager with the given signing key
    pub fn new(key: impl Into<Vec<u8>>, secure_cookies: bool) -> Self {
        Self {
            codec: SessionCodec::new(key),
            secure_cookies,
        }
    }

    /// Create a session for a user
    ///
    /// Returns the session and the Set-Cookie value persisting it.
    pub fn create(&self, user: User) -> AuthResult<(Session, String)> {
        let session = Session::new(user, Utc::now());
        let token = self.codec.encode(&session)?;
        Ok((session, set_cookie_header(&token, self.secure_cookies)))
    }

    /// Read the session from request headers, applying the expiry check
    pub fn read(&self, headers: &HeaderMap) -> SessionRead {
        self.read_at(headers, Utc::now())
    }

    /// Read the session against an explicit clock
    pub fn read_at(&self, headers: &HeaderMap, now: DateTime<Utc>) -> SessionRead {
        let token = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(session_cookie_value);

        let token = match token {
            Some(token) => token,
            None => return SessionRead::Absent,
        };

        match self.codec.decode(token, now) {
            Ok(session) => SessionRead::Active(session),
            Err(SessionDecodeError::Expired) => SessionRead::Expired,
            Err(_) => SessionRead::Invalid,
        }
    }

    /// The Set-Cookie value that deletes the session
    ///
    /// Unconditional and idempotent: clearing an absent cookie is fine.
    pub fn clear_cookie(&self) -> String {
        clear_cookie_header()
    }
}
