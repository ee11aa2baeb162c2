//! Checkout gating scenarios across the core rules and the storefront's
//! payment panel. No database or server needed.

#![allow(clippy::unwrap_used)]

use zipgate_core::AllowList;
use zipgate_core::checkout::{
    CheckoutRenderer, DENIAL_MESSAGE, Decision, GateOutcome, Gatekeeper, PaymentGateway,
    ValidationNotice, decide, delivery_zipcode_to_record, filter_available_gateways,
    validate_submission,
};
use zipgate_storefront::services::PaymentPanel;

fn gateways() -> Vec<PaymentGateway> {
    vec![
        PaymentGateway {
            id: "card".to_owned(),
            title: "Credit card".to_owned(),
            description: None,
        },
        PaymentGateway {
            id: "cod".to_owned(),
            title: "Cash on delivery".to_owned(),
            description: None,
        },
    ]
}

/// Run one postal-code input through a fresh panel, as the HTMX fragment does.
fn render_panel(
    stored: &str,
    postal: &str,
    renderer: CheckoutRenderer,
) -> (GateOutcome, zipgate_storefront::services::PaymentPanelView) {
    let mut gatekeeper = Gatekeeper::new(AllowList::from_stored(stored), renderer);
    let mut panel = PaymentPanel::new(Some(postal.to_owned()), None, Some(gateways()));
    let outcome = gatekeeper.on_postal_input(&mut panel);
    (outcome, panel.into_view(&gatekeeper))
}

#[test]
fn test_empty_allow_list_accepts_any_code() {
    let list = AllowList::from_stored("");

    assert_eq!(decide("12345", &list), Decision::Allowed);
    assert!(validate_submission(Some("12345"), &list).is_ok());
    assert_eq!(
        delivery_zipcode_to_record(Some("12345")).map(String::from),
        Some("12345".to_string())
    );

    let (_, view) = render_panel("", "12345", CheckoutRenderer::Block);
    assert!(view.payment_visible);
    assert!(view.place_order_enabled);
    assert!(view.notice.is_none());
    assert_eq!(view.gateways.len(), 2);
}

#[test]
fn test_unlisted_code_is_denied_everywhere() {
    let list = AllowList::from_stored("80902,80903");

    assert_eq!(decide("80904", &list), Decision::Denied);
    assert_eq!(
        validate_submission(Some("80904"), &list).unwrap_err().notices,
        vec![ValidationNotice::NotDeliverable]
    );
    assert!(filter_available_gateways(gateways(), Decision::Denied).is_empty());

    let (outcome, view) = render_panel("80902,80903", "80904", CheckoutRenderer::Block);
    assert_eq!(outcome, GateOutcome::Applied(Decision::Denied));
    assert!(!view.payment_visible);
    assert!(!view.place_order_enabled);
    assert_eq!(view.notice.as_deref(), Some(DENIAL_MESSAGE));
    assert!(view.gateways.is_empty());
}

#[test]
fn test_listed_code_is_allowed() {
    let list = AllowList::from_stored("80902,80903");

    assert_eq!(decide("80902", &list), Decision::Allowed);
    assert!(validate_submission(Some("80902"), &list).is_ok());

    let (outcome, view) = render_panel("80902,80903", "80902", CheckoutRenderer::Classic);
    assert_eq!(outcome, GateOutcome::Applied(Decision::Allowed));
    assert!(view.payment_visible);
    assert!(view.notice.is_none());
}

#[test]
fn test_blank_code_bypasses_every_check() {
    let list = AllowList::from_stored("80902");

    assert_eq!(decide("", &list), Decision::NoRestriction);
    assert!(validate_submission(Some(""), &list).is_ok());
    assert!(validate_submission(None, &list).is_ok());
    assert_eq!(delivery_zipcode_to_record(Some("")), None);
    assert_eq!(delivery_zipcode_to_record(Some("   ")), None);

    let (_, view) = render_panel("80902", "", CheckoutRenderer::Block);
    assert!(view.payment_visible);
    assert!(view.place_order_enabled);
    assert!(view.notice.is_none());
}

#[test]
fn test_four_digit_code_fails_format_regardless_of_list() {
    for stored in ["", "80902", "1234"] {
        let notices = validate_submission(Some("1234"), &AllowList::from_stored(stored))
            .unwrap_err()
            .notices;
        assert_eq!(notices.first(), Some(&ValidationNotice::InvalidFormat));
    }
}

#[test]
fn test_malformed_unlisted_code_raises_both_notices() {
    let notices = validate_submission(Some("8090"), &AllowList::from_stored("80902"))
        .unwrap_err()
        .notices;
    assert_eq!(
        notices,
        vec![ValidationNotice::InvalidFormat, ValidationNotice::NotDeliverable]
    );
}

#[test]
fn test_client_and_server_agree_on_well_formed_codes() {
    let lists = ["", "80902", "80902,80903", "00501,99950"];
    let codes = ["", "80902", "80903", "80904", "00501", "99950"];

    for stored in lists {
        let list = AllowList::from_stored(stored);
        for code in codes {
            let denied = decide(code, &list) == Decision::Denied;
            let expected = !code.is_empty() && !list.is_empty() && !list.contains(code);
            assert_eq!(denied, expected, "decide({code:?}, {stored:?})");
            assert_eq!(
                validate_submission(Some(code), &list).is_err(),
                denied,
                "validate_submission({code:?}, {stored:?})"
            );
        }
    }
}

#[test]
fn test_notice_stays_singleton_across_repeated_denials() {
    let mut gatekeeper = Gatekeeper::new(AllowList::from_stored("80902"), CheckoutRenderer::Block);
    let mut panel = PaymentPanel::new(Some("80904".to_owned()), None, Some(gateways()));

    gatekeeper.on_postal_input(&mut panel);
    assert_eq!(gatekeeper.on_postal_input(&mut panel), GateOutcome::Applied(Decision::Denied));

    let view = panel.into_view(&gatekeeper);
    assert_eq!(view.notice.as_deref(), Some(DENIAL_MESSAGE));
}
