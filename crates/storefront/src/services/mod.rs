//! Business logic services for storefront.
//!
//! # Services
//!
//! - `payment_panel` - Server-rendered payment section driven by the checkout gatekeeper

pub mod payment_panel;

pub use payment_panel::{ImmediateScheduler, PaymentPanel, PaymentPanelView};
