//! Shipping postal code type.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Strict 5-digit ZIP code format. ZIP+4 and other formats are rejected.
static POSTAL_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("static postal code regex is valid"));

/// Returns `true` if `s` is exactly five ASCII digits.
///
/// No trimming is applied; callers trim before checking.
#[must_use]
pub fn is_valid_postal_code(s: &str) -> bool {
    POSTAL_CODE_RE.is_match(s)
}

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PostalCodeError {
    /// The input string is empty.
    #[error("postal code cannot be empty")]
    Empty,
    /// The input is not exactly five digits.
    #[error("postal code must be exactly 5 digits (got {0:?})")]
    InvalidFormat(String),
}

/// A 5-digit shipping postal code.
///
/// ## Constraints
///
/// - Exactly 5 characters, each `0-9`
/// - Leading zeros are significant (`"01234"` is kept as-is)
///
/// ## Examples
///
/// ```
/// use zipgate_core::PostalCode;
///
/// assert!(PostalCode::parse("80902").is_ok());
/// assert!(PostalCode::parse("01234").is_ok());
///
/// assert!(PostalCode::parse("").is_err());           // empty
/// assert!(PostalCode::parse("1234").is_err());       // too short
/// assert!(PostalCode::parse("80902-1234").is_err()); // ZIP+4
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Length of a valid postal code.
    pub const LENGTH: usize = 5;

    /// Parse a `PostalCode` from a string.
    ///
    /// The input is not trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not exactly five digits.
    pub fn parse(s: &str) -> Result<Self, PostalCodeError> {
        if s.is_empty() {
            return Err(PostalCodeError::Empty);
        }

        if !is_valid_postal_code(s) {
            return Err(PostalCodeError::InvalidFormat(s.to_owned()));
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the postal code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `PostalCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PostalCode {
    type Err = PostalCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(value: PostalCode) -> Self {
        value.0
    }
}

impl AsRef<str> for PostalCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for PostalCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for PostalCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for PostalCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(PostalCode::parse("80902").is_ok());
        assert!(PostalCode::parse("00000").is_ok());
        assert!(PostalCode::parse("01234").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PostalCode::parse(""), Err(PostalCodeError::Empty));
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            PostalCode::parse("1234"),
            Err(PostalCodeError::InvalidFormat(_))
        ));
        assert!(matches!(
            PostalCode::parse("809021"),
            Err(PostalCodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_digits_and_padding() {
        assert!(PostalCode::parse("abcde").is_err());
        assert!(PostalCode::parse(" 80902").is_err());
        assert!(PostalCode::parse("80902 ").is_err());
        assert!(PostalCode::parse("80902-1234").is_err());
        assert!(PostalCode::parse("8090\n").is_err());
    }

    #[test]
    fn test_rejects_non_ascii_digits() {
        // Arabic-Indic digits are Unicode digits but not [0-9]
        assert!(!is_valid_postal_code("٨٠٩٠٢"));
    }

    #[test]
    fn test_display() {
        let code = PostalCode::parse("80902").unwrap();
        assert_eq!(code.to_string(), "80902");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let parsed: Result<PostalCode, _> = serde_json::from_str("\"8090\"");
        assert!(parsed.is_err());

        let code: PostalCode = serde_json::from_str("\"80902\"").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"80902\"");
    }
}
