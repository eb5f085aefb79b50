//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid username format.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] orderdesk_core::UsernameError),

    /// Invalid credentials (wrong password, unknown or disabled user).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The two password entries differ.
    #[error("the two passwords do not match")]
    PasswordMismatch,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
