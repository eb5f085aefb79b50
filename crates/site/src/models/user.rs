//! User domain type.
//!
//! Separate from the database row type; stored values are validated on load.

use chrono::{DateTime, Utc};

use orderdesk_core::{UserId, Username};

/// A user account (domain type).
///
/// Covers both regular users and staff operators; the flags decide which
/// surfaces an account may use.
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

impl User {
    /// Display name: "First Last", falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.to_string()
        } else {
            full.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: UserId::new(1),
            username: Username::parse("alice").unwrap(),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn test_display_name_full() {
        assert_eq!(user("Alice", "Smith").display_name(), "Alice Smith");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(user("", "").display_name(), "alice");
    }

    #[test]
    fn test_display_name_partial() {
        assert_eq!(user("Alice", "").display_name(), "Alice");
    }
}
