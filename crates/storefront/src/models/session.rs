//! Session-related types.
//!
//! Checkout state kept in the session between HTMX requests.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shipping goes to the billing address unless the shopper ticked
/// ship-to-different.
#[must_use]
pub fn effective_postcode<'a>(
    billing: &'a str,
    shipping: &'a str,
    ship_to_different: bool,
) -> &'a str {
    if ship_to_different { shipping } else { billing }
}

/// Checkout state for the current shopper.
///
/// Acts as the checkout state store. Both postcode fields and the
/// ship-to-different toggle are kept as entered so a reload puts each value
/// back where it came from; the payment panel and the store-sync endpoint
/// work from [`CheckoutSession::effective_postcode`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Billing postal code as last entered (trimmed).
    pub billing_postcode: String,
    /// Whether the shopper ticked ship-to-different.
    pub ship_to_different_address: bool,
    /// Separate shipping postal code as last entered (trimmed).
    pub shipping_postcode: String,
    /// Last postal code seen by the store-sync trigger.
    pub last_synced_zipcode: String,
    /// Most recent order placed in this session.
    pub last_order_id: Option<Uuid>,
}

impl CheckoutSession {
    /// The postal code the order ships to.
    #[must_use]
    pub fn effective_postcode(&self) -> &str {
        effective_postcode(
            &self.billing_postcode,
            &self.shipping_postcode,
            self.ship_to_different_address,
        )
    }

    /// Store the postcode fields as entered. Returns `true` if anything changed.
    pub fn remember_postcodes(
        &mut self,
        billing: &str,
        ship_to_different: bool,
        shipping: &str,
    ) -> bool {
        let (billing, shipping) = (billing.trim(), shipping.trim());
        if self.billing_postcode == billing
            && self.ship_to_different_address == ship_to_different
            && self.shipping_postcode == shipping
        {
            return false;
        }

        billing.clone_into(&mut self.billing_postcode);
        self.ship_to_different_address = ship_to_different;
        shipping.clone_into(&mut self.shipping_postcode);
        true
    }
}

/// Session keys for checkout data.
pub mod keys {
    /// Key for storing [`super::CheckoutSession`].
    pub const CHECKOUT: &str = "checkout";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_postcode_follows_toggle() {
        let mut checkout = CheckoutSession::default();
        checkout.remember_postcodes("80902", false, "80904");
        assert_eq!(checkout.effective_postcode(), "80902");

        checkout.remember_postcodes("80902", true, "80904");
        assert_eq!(checkout.effective_postcode(), "80904");
    }

    #[test]
    fn test_remember_postcodes_keeps_fields_apart() {
        let mut checkout = CheckoutSession::default();
        assert!(checkout.remember_postcodes(" 80902 ", true, "80904 "));

        assert_eq!(checkout.billing_postcode, "80902");
        assert!(checkout.ship_to_different_address);
        assert_eq!(checkout.shipping_postcode, "80904");
    }

    #[test]
    fn test_remember_postcodes_reports_no_change() {
        let mut checkout = CheckoutSession::default();
        assert!(checkout.remember_postcodes("80902", false, ""));
        assert!(!checkout.remember_postcodes("80902 ", false, ""));
        assert!(checkout.remember_postcodes("80902", true, ""));
    }
}
