//! Version Information
//!
//! Single source of truth for the version reported by the binary and
//! the API.

/// Crate version from Cargo.toml
pub const BINARY_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Human-readable version line
pub fn version_string() -> String {
    format!("campus-portal {}", BINARY_VERSION)
}
