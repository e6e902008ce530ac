//! # Taskforge Shared Library
//!
//! Shared types and business logic for the Taskforge API server.
//!
//! ## Module Organization
//!
//! - `models`: database models and owner-scoped queries
//! - `auth`: password hashing, bearer tokens, and the session guard
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskforge shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
