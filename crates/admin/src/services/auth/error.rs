//! Operator authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during operator authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong password, unknown or disabled user).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Valid credentials, but the account is not staff.
    #[error("account is not staff")]
    NotStaff,

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
