//! Checkout gating rules.
//!
//! Everything the storefront needs to decide whether a shopper may pay:
//!
//! - [`decision`] - The pure allow/deny decision shared by every caller
//! - [`validation`] - Authoritative server-side submission checks
//! - [`gateway`] - Renderer mode and the available-gateways filter
//! - [`params`] - Snapshot injected into the checkout page
//! - [`gatekeeper`] - Event-driven state machine that keeps the payment UI in sync
//! - [`probe`] - Bounded retry used while waiting for the payment section

pub mod decision;
pub mod gatekeeper;
pub mod gateway;
pub mod params;
pub mod probe;
pub mod validation;

pub use decision::{Decision, GateState, decide};
pub use gatekeeper::{
    CheckoutUi, GateOutcome, GateTask, Gatekeeper, MISSING_PAYMENT_SECTION_ALERT, Scheduler,
    TOGGLE_DEBOUNCE, UiError,
};
pub use gateway::{CheckoutRenderer, PaymentGateway, filter_available_gateways};
pub use params::{DENIAL_MESSAGE, GatekeeperParams};
pub use probe::{ContainerProbe, ProbeStep};
pub use validation::{
    CheckoutRejection, ValidationNotice, delivery_zipcode_to_record, validate_submission,
};
