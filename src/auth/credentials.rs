//! # Credential Store & Validator
//!
//! The system of record for identity. Credentials are stored as Argon2
//! hashes; raw passwords exist only transiently inside `validate`.
//!
//! Lookup is by identifier: either the user's email or their student
//! registration number, trimmed and compared case-insensitively. The
//! identifier set is globally unique across both fields.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};

use super::errors::{AuthError, AuthResult};
use super::user::{Role, User};

// ==================
// Credential Record
// ==================

/// A user plus their password hash (Argon2 PHC string)
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// The identity this credential belongs to
    pub user: User,
    /// Argon2 PHC-format hash, never the raw password
    pub password_hash: String,
}

// ==================
// Credential Store
// ==================

/// Repository for credential records
///
/// The in-memory implementation below is the seeded demo store; a real
/// datastore implements the same trait.
pub trait CredentialStore: Send + Sync {
    /// Find the record whose email or registration number matches the
    /// (already trimmed) identifier, case-insensitively.
    fn lookup(&self, identifier: &str) -> Option<CredentialRecord>;
}

/// In-memory credential store
///
/// Read-only after construction; shared behind an `Arc`.
pub struct InMemoryCredentialStore {
    records: Vec<CredentialRecord>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Add a user with a password, hashing it
    ///
    /// Rejects identifiers (email or registration number) already taken
    /// by another record — no two users may share a login handle.
    pub fn insert(&mut self, user: User, password: &str) -> AuthResult<()> {
        if self.lookup(user.email.trim()).is_some() {
            return Err(AuthError::DuplicateIdentifier(user.email));
        }
        if let Some(reg) = &user.registration_number {
            if self.lookup(reg.trim()).is_some() {
                return Err(AuthError::DuplicateIdentifier(reg.clone()));
            }
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::Internal(format!("Password hashing failed: {}", e)))?
            .to_string();

        self.records.push(CredentialRecord { user, password_hash });
        Ok(())
    }

    /// Build the seeded demo store matching the portal's mock data
    pub fn seeded() -> AuthResult<Self> {
        let mut store = Self::new();

        store.insert(
            User {
                id: "1".to_string(),
                name: "John Doe".to_string(),
                email: "john.doe@staustin.edu".to_string(),
                role: Role::Student,
                registration_number: Some("REG/2024/001".to_string()),
            },
            "password123",
        )?;

        store.insert(
            User {
                id: "2".to_string(),
                name: "Admin User".to_string(),
                email: "admin@staustin.edu".to_string(),
                role: Role::Admin,
                registration_number: None,
            },
            "admin123",
        )?;

        store.insert(
            User {
                id: "3".to_string(),
                name: "System Administrator".to_string(),
                email: "sysadmin@staustin.edu".to_string(),
                role: Role::SystemAdmin,
                registration_number: None,
            },
            "sysadmin123",
        )?;

        Ok(store)
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn lookup(&self, identifier: &str) -> Option<CredentialRecord> {
        self.records
            .iter()
            .find(|r| {
                r.user.email.eq_ignore_ascii_case(identifier)
                    || r.user
                        .registration_number
                        .as_deref()
                        .is_some_and(|reg| reg.eq_ignore_ascii_case(identifier))
            })
            .cloned()
    }
}

// ==================
// Credential Validator
// ==================

/// Checks an (identifier, password) pair against the credential store
#[derive(Clone)]
pub struct CredentialValidator {
    store: Arc<dyn CredentialStore>,
}

impl CredentialValidator {
    /// Create a validator over a store
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Validate a login attempt
    ///
    /// Returns the matching user, or `None` for both "unknown
    /// identifier" and "wrong password" — callers must not be able to
    /// tell the two apart.
    pub fn validate(&self, identifier: &str, password: &str) -> Option<User> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        let record = self.store.lookup(identifier)?;

        // Argon2 verification is constant-time over the hash output.
        let parsed = PasswordHash::new(&record.password_hash).ok()?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
        {
            Some(record.user)
        } else {
            None
        }
    }
}
