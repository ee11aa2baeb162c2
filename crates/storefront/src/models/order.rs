//! Checkout order domain types.

use chrono::{DateTime, Utc};
use uuid::Uuid;
use zipgate_core::PostalCode;

/// An order placed through checkout.
#[derive(Debug, Clone)]
pub struct Order {
    /// Order ID.
    pub id: Uuid,
    /// Contact email.
    pub email: String,
    /// Shipping recipient name.
    pub shipping_name: String,
    /// Shipping street address.
    pub shipping_address: String,
    /// Shipping city.
    pub shipping_city: String,
    /// Shipping postal code exactly as submitted (may be empty).
    pub shipping_postcode: String,
    /// Selected payment gateway ID.
    pub payment_method: String,
    /// Accepted delivery postal code, written once after the order is created.
    pub delivery_zipcode: Option<PostalCode>,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create an [`Order`].
#[derive(Debug, Clone)]
pub struct NewOrder<'a> {
    pub email: &'a str,
    pub shipping_name: &'a str,
    pub shipping_address: &'a str,
    pub shipping_city: &'a str,
    pub shipping_postcode: &'a str,
    pub payment_method: &'a str,
}
