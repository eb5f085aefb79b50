//! User account model as seen by operators.

use chrono::{DateTime, Utc};

use orderdesk_core::{UserId, Username};

/// A user account (domain type).
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login username.
    pub username: Username,
    /// Given name (may be empty).
    pub first_name: String,
    /// Family name (may be empty).
    pub last_name: String,
    /// Whether the user may log in to the admin panel.
    pub is_staff: bool,
    /// Whether the user sees and manages all orders.
    pub is_superuser: bool,
    /// Whether the account may log in at all.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the user last logged in, if ever.
    pub last_login: Option<DateTime<Utc>>,
}

/// The editable subset of a user account.
///
/// The username is identity and the password has its own flow; neither is
/// written through a profile update.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}
