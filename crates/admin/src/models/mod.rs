//! Types stored in the admin session.

pub mod session;

pub use session::{CurrentAdmin, Flash, FlashLevel, keys as session_keys};
