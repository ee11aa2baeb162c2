//! Core types for zipgate.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod postal_code;

pub use postal_code::{PostalCode, PostalCodeError, is_valid_postal_code};
