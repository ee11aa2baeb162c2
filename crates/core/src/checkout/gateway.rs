//! Checkout renderer mode and the available-gateways filter.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::decision::Decision;

/// How the checkout page is rendered.
///
/// Resolved once from configuration and passed down; nothing probes the page
/// to find out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutRenderer {
    /// Classic server-rendered form. Gating hides the payment section.
    Classic,
    /// Block-based reactive checkout. Gating also empties the gateway list.
    #[default]
    Block,
}

impl CheckoutRenderer {
    /// Whether this is the block-based renderer.
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(self, Self::Block)
    }
}

impl fmt::Display for CheckoutRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Classic => write!(f, "classic"),
            Self::Block => write!(f, "block"),
        }
    }
}

impl std::str::FromStr for CheckoutRenderer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "classic" => Ok(Self::Classic),
            "block" => Ok(Self::Block),
            _ => Err(format!("invalid checkout renderer: {s}")),
        }
    }
}

/// A payment method offered at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentGateway {
    /// Stable identifier (e.g. `stripe`, `cod`).
    pub id: String,
    /// Shopper-facing title.
    pub title: String,
    /// Optional shopper-facing description.
    pub description: Option<String>,
}

/// Apply a decision to the list of available gateways.
///
/// `Denied` yields an empty list; every other decision passes the list through
/// unchanged.
#[must_use]
pub fn filter_available_gateways<T>(gateways: Vec<T>, decision: Decision) -> Vec<T> {
    match decision {
        Decision::Denied => Vec::new(),
        Decision::NoRestriction | Decision::Allowed => gateways,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_from_str() {
        assert_eq!(
            "block".parse::<CheckoutRenderer>().unwrap(),
            CheckoutRenderer::Block
        );
        assert_eq!(
            " Classic ".parse::<CheckoutRenderer>().unwrap(),
            CheckoutRenderer::Classic
        );
        assert!("blocks".parse::<CheckoutRenderer>().is_err());
    }

    #[test]
    fn test_renderer_display_round_trip() {
        for renderer in [CheckoutRenderer::Classic, CheckoutRenderer::Block] {
            assert_eq!(
                renderer.to_string().parse::<CheckoutRenderer>().unwrap(),
                renderer
            );
        }
    }

    #[test]
    fn test_filter_denied_empties_list() {
        assert!(filter_available_gateways(vec!["stripe", "cod"], Decision::Denied).is_empty());
    }

    #[test]
    fn test_filter_passes_through_otherwise() {
        assert_eq!(
            filter_available_gateways(vec!["stripe", "cod"], Decision::Allowed),
            vec!["stripe", "cod"]
        );
        assert_eq!(
            filter_available_gateways(vec!["stripe"], Decision::NoRestriction),
            vec!["stripe"]
        );
    }
}
