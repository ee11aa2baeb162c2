//! Parameters injected into the checkout page.

use serde::{Deserialize, Serialize};

use super::gateway::CheckoutRenderer;
use crate::allow_list::AllowList;
use crate::types::PostalCode;

/// Message shown when payment is blocked for the shopper's postal code.
pub const DENIAL_MESSAGE: &str = "Delivery not available in your location.";

/// Allow-list snapshot handed to the browser at render time.
///
/// Serialized as:
///
/// ```json
/// { "allowed_zipcodes": ["80902"], "error_message": "...", "is_block_checkout": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatekeeperParams {
    /// Allowed postal codes, in configured order.
    pub allowed_zipcodes: Vec<String>,
    /// Denial notice text.
    pub error_message: String,
    /// Whether the block renderer is active.
    pub is_block_checkout: bool,
}

impl GatekeeperParams {
    /// Build the snapshot for one page render.
    #[must_use]
    pub fn new(allow_list: &AllowList, renderer: CheckoutRenderer) -> Self {
        Self {
            allowed_zipcodes: allow_list.to_strings(),
            error_message: DENIAL_MESSAGE.to_owned(),
            is_block_checkout: renderer.is_block(),
        }
    }

    /// Rebuild the allow-list from the snapshot. Malformed entries are dropped.
    #[must_use]
    pub fn allow_list(&self) -> AllowList {
        self.allowed_zipcodes
            .iter()
            .filter_map(|code| PostalCode::parse(code.trim()).ok())
            .collect()
    }

    /// The renderer mode recorded in the snapshot.
    #[must_use]
    pub const fn renderer(&self) -> CheckoutRenderer {
        if self.is_block_checkout {
            CheckoutRenderer::Block
        } else {
            CheckoutRenderer::Classic
        }
    }

    /// Serialize for embedding in a `<script type="application/json">` tag.
    ///
    /// `<`, `>` and `&` are escaped so the payload cannot close the tag.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(json
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_snapshot() {
        let params = GatekeeperParams::new(
            &AllowList::from_stored("80902,80903"),
            CheckoutRenderer::Block,
        );
        assert_eq!(params.allowed_zipcodes, vec!["80902", "80903"]);
        assert_eq!(params.error_message, DENIAL_MESSAGE);
        assert!(params.is_block_checkout);
        assert_eq!(params.renderer(), CheckoutRenderer::Block);
    }

    #[test]
    fn test_allow_list_round_trip() {
        let list = AllowList::from_stored("80902,80903");
        let params = GatekeeperParams::new(&list, CheckoutRenderer::Classic);
        assert_eq!(params.allow_list(), list);
        assert_eq!(params.renderer(), CheckoutRenderer::Classic);
    }

    #[test]
    fn test_script_json_shape() {
        let params = GatekeeperParams::new(&AllowList::empty(), CheckoutRenderer::Classic);
        let json: serde_json::Value =
            serde_json::from_str(&params.to_script_json().unwrap()).unwrap();
        assert_eq!(json["allowed_zipcodes"], serde_json::json!([]));
        assert_eq!(json["is_block_checkout"], serde_json::json!(false));
    }

    #[test]
    fn test_script_json_escapes_markup() {
        let params = GatekeeperParams {
            allowed_zipcodes: vec![],
            error_message: "</script><b>&".to_owned(),
            is_block_checkout: false,
        };
        let json = params.to_script_json().unwrap();
        assert!(!json.contains("</script>"));
        assert!(!json.contains('&'));
        let decoded: GatekeeperParams = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.error_message, "</script><b>&");
    }
}
