//! Session-related types for the admin.

use serde::{Deserialize, Serialize};

use orderdesk_core::UserId;

use crate::models::user::User;

/// Session-stored operator identity.
///
/// Only staff accounts ever reach the session, so no flags ride along;
/// being present is the authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentOperator {
    /// Operator's database ID.
    pub id: UserId,
    /// Operator's login username.
    pub username: String,
}

impl From<&User> for CurrentOperator {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.to_string(),
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in operator.
    pub const CURRENT_OPERATOR: &str = "current_operator";
}
