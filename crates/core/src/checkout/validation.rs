//! Server-side checkout submission checks.
//!
//! This is the authoritative gate. The browser-side gatekeeper only hides
//! payment options; a crafted request still has to pass
//! [`validate_submission`] before an order is created.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::params::DENIAL_MESSAGE;
use crate::allow_list::AllowList;
use crate::types::{PostalCode, is_valid_postal_code};

/// A user-correctable problem with the submitted shipping postal code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationNotice {
    /// Not exactly five digits.
    InvalidFormat,
    /// Not in the configured allow-list.
    NotDeliverable,
}

impl ValidationNotice {
    /// Shopper-facing message.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidFormat => "Please enter a valid 5-digit ZIP code for shipping.",
            Self::NotDeliverable => DENIAL_MESSAGE,
        }
    }
}

impl fmt::Display for ValidationNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Checkout submission rejected with one or more notices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("checkout rejected: {}", join_messages(.notices))]
pub struct CheckoutRejection {
    /// Notices in the order they were raised.
    pub notices: Vec<ValidationNotice>,
}

fn join_messages(notices: &[ValidationNotice]) -> String {
    notices
        .iter()
        .map(|n| n.message())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Validate the submitted shipping postal code.
///
/// - Absent or blank: nothing is checked and the submission proceeds.
/// - Otherwise the format check and the allow-list check both run; a code can
///   fail both and produce two notices.
///
/// # Errors
///
/// Returns [`CheckoutRejection`] carrying every notice raised.
pub fn validate_submission(
    postal_code: Option<&str>,
    allow_list: &AllowList,
) -> Result<(), CheckoutRejection> {
    let postal_code = postal_code.map_or("", str::trim);
    if postal_code.is_empty() {
        return Ok(());
    }

    let mut notices = Vec::with_capacity(2);

    if !is_valid_postal_code(postal_code) {
        notices.push(ValidationNotice::InvalidFormat);
    }

    if !allow_list.is_empty() && !allow_list.contains(postal_code) {
        notices.push(ValidationNotice::NotDeliverable);
    }

    if notices.is_empty() {
        Ok(())
    } else {
        Err(CheckoutRejection { notices })
    }
}

/// The value to store as the order's `delivery_zipcode`, if any.
///
/// Blank submissions return `None` so an existing value is never overwritten
/// with an empty one. Anything that would not pass [`validate_submission`]
/// also returns `None`.
#[must_use]
pub fn delivery_zipcode_to_record(postal_code: Option<&str>) -> Option<PostalCode> {
    postal_code
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| PostalCode::parse(s).ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn notices(postal: Option<&str>, stored: &str) -> Vec<ValidationNotice> {
        validate_submission(postal, &AllowList::from_stored(stored))
            .err()
            .map(|e| e.notices)
            .unwrap_or_default()
    }

    #[test]
    fn test_empty_postal_code_bypasses_validation() {
        assert!(notices(None, "80902").is_empty());
        assert!(notices(Some(""), "80902").is_empty());
        assert!(notices(Some("  "), "80902").is_empty());
    }

    #[test]
    fn test_valid_listed_code_passes() {
        assert!(notices(Some("80902"), "80902,80903").is_empty());
    }

    #[test]
    fn test_any_valid_code_passes_with_empty_list() {
        assert!(notices(Some("12345"), "").is_empty());
    }

    #[test]
    fn test_unlisted_code_rejected() {
        assert_eq!(
            notices(Some("80904"), "80902,80903"),
            vec![ValidationNotice::NotDeliverable]
        );
    }

    #[test]
    fn test_bad_format_rejected_regardless_of_list() {
        assert_eq!(
            notices(Some("1234"), ""),
            vec![ValidationNotice::InvalidFormat]
        );
        assert_eq!(
            notices(Some("1234"), "80902"),
            vec![
                ValidationNotice::InvalidFormat,
                ValidationNotice::NotDeliverable
            ]
        );
    }

    #[test]
    fn test_rejection_message() {
        let err = validate_submission(Some("80904"), &AllowList::from_stored("80902")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "checkout rejected: Delivery not available in your location."
        );
    }

    #[test]
    fn test_delivery_zipcode_to_record() {
        assert_eq!(
            delivery_zipcode_to_record(Some(" 12345 ")).unwrap().as_str(),
            "12345"
        );
        assert_eq!(delivery_zipcode_to_record(Some("")), None);
        assert_eq!(delivery_zipcode_to_record(None), None);
        assert_eq!(delivery_zipcode_to_record(Some("1234")), None);
    }
}
