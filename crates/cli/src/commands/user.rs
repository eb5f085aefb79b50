//! User account management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a regular user
//! orderdesk-cli user create -u alice -p "secret password"
//!
//! # Create a staff superuser
//! orderdesk-cli user create -u admin -p "secret password" --staff --superuser
//! ```
//!
//! # Environment Variables
//!
//! - `SITE_DATABASE_URL` - `PostgreSQL` connection string

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use orderdesk_core::Username;

/// Minimum password length, matching the web registration flow.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors that can occur during user management.
#[derive(Debug, Error)]
pub enum UserError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] orderdesk_core::UsernameError),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters")]
    WeakPassword,

    /// Username already taken.
    #[error("User already exists with username: {0}")]
    UserExists(String),

    /// Password hashing error.
    #[error("Password hashing error")]
    PasswordHash,
}

/// Create a new user account.
///
/// The password is hashed with Argon2id before storage; the raw value is
/// never written anywhere.
///
/// # Errors
///
/// Returns `UserError` on validation failure, a taken username, or a
/// database error.
pub async fn create(
    username: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
    staff: bool,
    superuser: bool,
) -> Result<i32, UserError> {
    dotenvy::dotenv().ok();

    let username = Username::parse(username)?;
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(UserError::WeakPassword);
    }

    let database_url = std::env::var("SITE_DATABASE_URL")
        .map_err(|_| UserError::MissingEnvVar("SITE_DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(&database_url).await?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE username = $1")
        .bind(username.as_str())
        .fetch_optional(&pool)
        .await?;

    if existing.is_some() {
        return Err(UserError::UserExists(username.to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| UserError::PasswordHash)?
        .to_string();

    let user_id: i32 = sqlx::query_scalar(
        "INSERT INTO users (username, first_name, last_name, password_hash, is_staff, is_superuser)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(username.as_str())
    .bind(first_name)
    .bind(last_name)
    .bind(&password_hash)
    .bind(staff)
    .bind(superuser)
    .fetch_one(&pool)
    .await?;

    tracing::info!(
        "User created successfully! ID: {}, Username: {}, staff: {}, superuser: {}",
        user_id,
        username,
        staff,
        superuser
    );

    Ok(user_id)
}
