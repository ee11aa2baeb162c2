//! Domain models for storefront.

pub mod order;
pub mod session;

pub use order::{NewOrder, Order};
pub use session::{CheckoutSession, effective_postcode, keys as session_keys};
