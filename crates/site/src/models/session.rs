//! Session-related types.
//!
//! Types stored in the session for authentication state. Handlers receive
//! the current user as an explicit extractor argument rather than reading
//! ambient global state.

use serde::{Deserialize, Serialize};

use orderdesk_core::UserId;

use crate::models::user::User;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user and
/// make the two access-control decisions the site needs (ownership scoping
/// and the superuser override).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's login username.
    pub username: String,
    /// Whether the user sees all orders.
    pub is_superuser: bool,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.to_string(),
            is_superuser: user.is_superuser,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
