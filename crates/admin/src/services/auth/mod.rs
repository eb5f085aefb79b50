//! Operator authentication.
//!
//! Login for staff accounts and the admin-side change-password flow.
//! Password hashing uses Argon2id PHC strings, the same scheme the site
//! writes at registration.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use orderdesk_core::{UserId, Username};

use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length for the change-password flow.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Operator authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Verify operator credentials.
    ///
    /// Unknown usernames, wrong passwords and disabled accounts all answer
    /// `InvalidCredentials`; a valid but non-staff account answers
    /// `NotStaff`. Both render the same message to the client.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` or `AuthError::NotStaff` on
    /// rejection; `AuthError::Repository` on database failure.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let username =
            Username::parse(username.trim()).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !user.is_active {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_staff {
            return Err(AuthError::NotStaff);
        }

        self.users.record_login(user.id).await?;

        Ok(user)
    }

    /// Replace a user's password (operator action).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` if the entries differ,
    /// `AuthError::WeakPassword` if too short, `AuthError::Repository` if
    /// the user doesn't exist or the write fails.
    pub async fn change_password(
        &self,
        user_id: UserId,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AuthError> {
        if password != password_confirm {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(password)?;

        let password_hash = hash_password(password)?;
        self.users.set_password_hash(user_id, &password_hash).await?;

        Ok(())
    }
}

fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` if the password doesn't match
/// or the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("operator-pass").unwrap();
        assert!(verify_password("operator-pass", &hash).is_ok());
        assert!(verify_password("wrong", &hash).is_err());
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("long enough").is_ok());
    }
}
