//! ZIP code allow-list.
//!
//! The allow-list is persisted as a single comma-delimited string under
//! [`ALLOWED_ZIPCODES_KEY`]. An empty list means every postal code is accepted.
//!
//! Writes go through [`AllowList::sanitize`], which silently drops anything that
//! is not a 5-digit code. Reads go through [`AllowList::from_stored`].

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::PostalCode;

/// Settings key holding the comma-delimited allow-list.
pub const ALLOWED_ZIPCODES_KEY: &str = "allowed_zipcodes";

/// Delimiter used in the persisted form.
const DELIMITER: char = ',';

/// Ordered list of accepted shipping postal codes.
///
/// Order is the order the admin entered them in. Duplicates are kept.
///
/// ## Examples
///
/// ```
/// use zipgate_core::AllowList;
///
/// let list = AllowList::sanitize("80902, abc, 809021, 80903");
/// assert_eq!(list.as_stored(), "80902,80903");
/// assert!(list.contains("80902"));
/// assert!(!list.contains("80904"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(Vec<PostalCode>);

impl AllowList {
    /// An empty allow-list (every postal code permitted).
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Sanitize raw admin input.
    ///
    /// Splits on commas, trims each token, and keeps only tokens matching
    /// `^[0-9]{5}$`. Surviving tokens keep their relative order. Nothing is
    /// reported for dropped tokens.
    #[must_use]
    pub fn sanitize(raw: &str) -> Self {
        Self(
            raw.split(DELIMITER)
                .map(str::trim)
                .filter_map(|token| PostalCode::parse(token).ok())
                .collect(),
        )
    }

    /// Decompose a persisted value.
    ///
    /// Tokens are trimmed and empty tokens dropped. Persisted values are always
    /// sanitized on write, so tokens that fail the format check can only come
    /// from rows edited outside the settings form; they are skipped.
    #[must_use]
    pub fn from_stored(stored: &str) -> Self {
        Self::sanitize(stored)
    }

    /// The persisted form: codes joined with commas, no whitespace.
    #[must_use]
    pub fn as_stored(&self) -> String {
        let mut out = String::with_capacity(self.0.len() * (PostalCode::LENGTH + 1));
        for (i, code) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(DELIMITER);
            }
            out.push_str(code.as_str());
        }
        out
    }

    /// Returns `true` if no codes are configured.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of configured codes (duplicates included).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Exact membership test against a postal code string.
    ///
    /// No trimming or normalization is applied to `postal_code`.
    #[must_use]
    pub fn contains(&self, postal_code: &str) -> bool {
        self.0.iter().any(|code| code.as_str() == postal_code)
    }

    /// Iterate over the configured codes in order.
    pub fn iter(&self) -> impl Iterator<Item = &PostalCode> {
        self.0.iter()
    }

    /// The codes as plain strings, in order.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|c| c.as_str().to_owned()).collect()
    }
}

impl fmt::Display for AllowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_stored())
    }
}

impl FromIterator<PostalCode> for AllowList {
    fn from_iter<I: IntoIterator<Item = PostalCode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_drops_invalid_tokens() {
        let list = AllowList::sanitize("80902, abc, 809021, 80903");
        assert_eq!(list.as_stored(), "80902,80903");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_sanitize_preserves_order_and_duplicates() {
        let list = AllowList::sanitize("80903,80902,80903");
        assert_eq!(list.as_stored(), "80903,80902,80903");
    }

    #[test]
    fn test_sanitize_trims_whitespace() {
        let list = AllowList::sanitize("  80902 ,\t80903\n, ");
        assert_eq!(list.as_stored(), "80902,80903");
    }

    #[test]
    fn test_sanitize_empty_inputs() {
        assert!(AllowList::sanitize("").is_empty());
        assert!(AllowList::sanitize(" , ,, ").is_empty());
        assert_eq!(AllowList::sanitize("").as_stored(), "");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let inputs = [
            "80902, abc, 809021, 80903",
            "",
            ",,,",
            "01234,1234,12345 ,x12345",
            "99999;88888,77777",
        ];
        for raw in inputs {
            let once = AllowList::sanitize(raw).as_stored();
            let twice = AllowList::sanitize(&once).as_stored();
            assert_eq!(once, twice, "sanitize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_sanitize_rejects_other_delimiters() {
        // Only commas split; "99999;88888" is one invalid token.
        let list = AllowList::sanitize("99999;88888,77777");
        assert_eq!(list.as_stored(), "77777");
    }

    #[test]
    fn test_from_stored_round_trip() {
        let list = AllowList::from_stored("80902,80903");
        assert_eq!(list.to_strings(), vec!["80902", "80903"]);
    }

    #[test]
    fn test_contains_is_exact() {
        let list = AllowList::from_stored("80902");
        assert!(list.contains("80902"));
        assert!(!list.contains(" 80902"));
        assert!(!list.contains("8090"));
        assert!(!list.contains(""));
    }

    #[test]
    fn test_serde_as_array() {
        let list = AllowList::from_stored("80902,80903");
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"["80902","80903"]"#);
    }
}
