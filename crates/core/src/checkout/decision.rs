//! Allow/deny decision for a shipping postal code.

use serde::{Deserialize, Serialize};

use crate::allow_list::AllowList;

/// Outcome of checking a postal code against the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// No postal code entered yet; nothing is restricted.
    NoRestriction,
    /// Postal code accepted (listed, or the allow-list is empty).
    Allowed,
    /// Postal code not in a non-empty allow-list.
    Denied,
}

impl Decision {
    /// Whether the payment section and place-order control should be usable.
    #[must_use]
    pub const fn payment_allowed(self) -> bool {
        !matches!(self, Self::Denied)
    }

    /// The gate state this decision puts the checkout in.
    #[must_use]
    pub const fn state(self) -> GateState {
        match self {
            Self::NoRestriction | Self::Allowed => GateState::Allowed,
            Self::Denied => GateState::Denied,
        }
    }
}

/// Gate state of a checkout page.
///
/// Starts `Unknown` until the first decision is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    #[default]
    Unknown,
    Allowed,
    Denied,
}

/// Decide whether `postal_code` may pay.
///
/// The postal code is trimmed before the check. Format is not checked here;
/// an unlisted malformed code is simply denied, and the server validator
/// reports the format problem on submission.
#[must_use]
pub fn decide(postal_code: &str, allow_list: &AllowList) -> Decision {
    let postal_code = postal_code.trim();

    if postal_code.is_empty() {
        Decision::NoRestriction
    } else if allow_list.is_empty() || allow_list.contains(postal_code) {
        Decision::Allowed
    } else {
        Decision::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_postal_code_is_unrestricted() {
        let list = AllowList::from_stored("80902");
        assert_eq!(decide("", &list), Decision::NoRestriction);
        assert_eq!(decide("   ", &list), Decision::NoRestriction);
    }

    #[test]
    fn test_empty_allow_list_allows_everything() {
        let list = AllowList::empty();
        assert_eq!(decide("12345", &list), Decision::Allowed);
        assert_eq!(decide("not-a-zip", &list), Decision::Allowed);
    }

    #[test]
    fn test_listed_postal_code_is_allowed() {
        let list = AllowList::from_stored("80902,80903");
        assert_eq!(decide("80902", &list), Decision::Allowed);
        assert_eq!(decide(" 80903 ", &list), Decision::Allowed);
    }

    #[test]
    fn test_unlisted_postal_code_is_denied() {
        let list = AllowList::from_stored("80902,80903");
        assert_eq!(decide("80904", &list), Decision::Denied);
        assert_eq!(decide("1234", &list), Decision::Denied);
    }

    #[test]
    fn test_denied_iff_nonempty_unlisted() {
        let lists = [AllowList::empty(), AllowList::from_stored("80902,80903")];
        let codes = ["", "80902", "80903", "80904", "abc"];
        for list in &lists {
            for code in codes {
                let expected_denied = !code.is_empty() && !list.is_empty() && !list.contains(code);
                assert_eq!(
                    decide(code, list) == Decision::Denied,
                    expected_denied,
                    "code={code:?} list={list}"
                );
            }
        }
    }

    #[test]
    fn test_state_mapping() {
        assert_eq!(Decision::NoRestriction.state(), GateState::Allowed);
        assert_eq!(Decision::Allowed.state(), GateState::Allowed);
        assert_eq!(Decision::Denied.state(), GateState::Denied);
        assert!(!Decision::Denied.payment_allowed());
        assert_eq!(GateState::default(), GateState::Unknown);
    }
}
