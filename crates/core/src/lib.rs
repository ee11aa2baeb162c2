//! Zipgate Core - Shared checkout gating library.
//!
//! This crate provides the types and rules used across all zipgate components:
//! - `storefront` - Public checkout (server validation, payment panel gating)
//! - `admin` - Private settings panel for the ZIP code allow-list
//! - `cli` - Command-line tools for migrations and allow-list management
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O, no
//! database access, no HTTP. Both binaries load an [`AllowList`] snapshot once
//! per request and hand it to the functions here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers (postal codes)
//! - [`allow_list`] - Allow-list sanitization and lookup
//! - [`checkout`] - Decision function, server validator, gateway filter, and
//!   the gatekeeper state machine

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod allow_list;
pub mod checkout;
pub mod types;

pub use allow_list::{ALLOWED_ZIPCODES_KEY, AllowList};
pub use types::*;
