//! Username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// The input string is empty.
    #[error("username cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("username must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a disallowed character.
    #[error("username may only contain letters, digits and @/./+/-/_")]
    InvalidCharacter,
}

/// A login username.
///
/// ## Constraints
///
/// - Length: 1-150 characters
/// - Allowed characters: ASCII letters, digits, and `@`, `.`, `+`, `-`, `_`
///
/// ## Examples
///
/// ```
/// use orderdesk_core::Username;
///
/// // Valid usernames
/// assert!(Username::parse("alice").is_ok());
/// assert!(Username::parse("a.user+test@host").is_ok());
///
/// // Invalid usernames
/// assert!(Username::parse("").is_err());          // empty
/// assert!(Username::parse("two words").is_err()); // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Maximum length of a username.
    pub const MAX_LENGTH: usize = 150;

    /// Parse a `Username` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 150 characters
    /// - Contains a character outside the allowed set
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let valid = s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
        if !valid {
            return Err(UsernameError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Username {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Username {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Username {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Username::parse("alice").is_ok());
        assert!(Username::parse("bob_42").is_ok());
        assert!(Username::parse("user@example.com").is_ok());
        assert!(Username::parse("a.b+c-d").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Username::parse(""), Err(UsernameError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "a".repeat(Username::MAX_LENGTH + 1);
        assert!(matches!(
            Username::parse(&long),
            Err(UsernameError::TooLong { max: 150 })
        ));
    }

    #[test]
    fn test_parse_at_max_length() {
        let max = "a".repeat(Username::MAX_LENGTH);
        assert!(Username::parse(&max).is_ok());
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Username::parse("two words"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("semi;colon"),
            Err(UsernameError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_display() {
        let username = Username::parse("alice").unwrap();
        assert_eq!(format!("{username}"), "alice");
    }

    #[test]
    fn test_serde_roundtrip() {
        let username = Username::parse("alice").unwrap();
        let json = serde_json::to_string(&username).unwrap();
        assert_eq!(json, "\"alice\"");

        let parsed: Username = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, username);
    }

    #[test]
    fn test_from_str() {
        let username: Username = "alice".parse().unwrap();
        assert_eq!(username.as_str(), "alice");
    }
}
