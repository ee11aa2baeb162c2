//! Checkout route handlers.
//!
//! The checkout page is server-rendered. The payment section is a separate
//! HTMX fragment that is re-fetched whenever the shipping postal code or the
//! ship-to-different toggle changes, and polled for checkout state changes.
//! Each fragment request runs one gatekeeper trigger against a fresh
//! [`PaymentPanel`].
//!
//! Order submission always goes through the server validator; the payment
//! panel is a convenience for the shopper, not a gate.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;
use zipgate_core::AllowList;
use zipgate_core::checkout::{
    GateOutcome, Gatekeeper, GatekeeperParams, PaymentGateway, delivery_zipcode_to_record,
    validate_submission,
};

use crate::db::{GatewayRepository, OrderRepository, load_allow_list};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::CspNonce;
use crate::models::{CheckoutSession, NewOrder, Order, effective_postcode, session_keys};
use crate::services::{ImmediateScheduler, PaymentPanel, PaymentPanelView};
use crate::state::AppState;

/// Notice shown when no valid payment method was chosen.
pub const PAYMENT_METHOD_NOTICE: &str = "Please select a payment method.";

// =============================================================================
// Forms
// =============================================================================

/// Checkout form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub billing_postcode: String,
    /// Checkbox; present (usually `"on"`) when checked.
    pub ship_to_different_address: Option<String>,
    #[serde(default)]
    pub shipping_postcode: String,
    #[serde(default)]
    pub payment_method: String,
}

impl CheckoutForm {
    /// The postal code the order ships to.
    #[must_use]
    pub fn effective_postcode(&self) -> &str {
        effective_postcode(
            &self.billing_postcode,
            &self.shipping_postcode,
            self.ship_to_different_address.is_some(),
        )
    }
}

/// What caused a payment panel refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelTrigger {
    /// Postal code input, blur or change.
    #[default]
    Input,
    /// Ship-to-different toggle changed.
    Toggle,
}

/// Query for payment panel fragments. The checkout form is sent along via
/// `hx-include`; unrelated fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelQuery {
    #[serde(default)]
    pub billing_postcode: String,
    pub ship_to_different_address: Option<String>,
    #[serde(default)]
    pub shipping_postcode: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub trigger: PanelTrigger,
}

impl PanelQuery {
    /// The postal code the order would ship to.
    #[must_use]
    pub fn effective_postcode(&self) -> &str {
        effective_postcode(
            &self.billing_postcode,
            &self.shipping_postcode,
            self.ship_to_different_address.is_some(),
        )
    }
}

/// Notices for required contact and address fields.
fn required_field_notices(form: &CheckoutForm) -> Vec<String> {
    [
        ("Email address", &form.email),
        ("Name", &form.name),
        ("Street address", &form.address),
        ("Town / City", &form.city),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(label, _)| format!("{label} is a required field."))
    .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// Form values echoed back into the checkout page.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFormView {
    pub email: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub billing_postcode: String,
    pub ship_to_different_address: bool,
    pub shipping_postcode: String,
}

impl From<&CheckoutForm> for CheckoutFormView {
    fn from(form: &CheckoutForm) -> Self {
        Self {
            email: form.email.clone(),
            name: form.name.clone(),
            address: form.address.clone(),
            city: form.city.clone(),
            billing_postcode: form.billing_postcode.clone(),
            ship_to_different_address: form.ship_to_different_address.is_some(),
            shipping_postcode: form.shipping_postcode.clone(),
        }
    }
}

/// Postcode fields restored from the checkout state store on reload.
impl From<&CheckoutSession> for CheckoutFormView {
    fn from(checkout: &CheckoutSession) -> Self {
        Self {
            billing_postcode: checkout.billing_postcode.clone(),
            ship_to_different_address: checkout.ship_to_different_address,
            shipping_postcode: checkout.shipping_postcode.clone(),
            ..Self::default()
        }
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub form: CheckoutFormView,
    pub notices: Vec<String>,
    pub panel: PaymentPanelView,
    pub selected_payment: String,
    pub params_json: String,
    pub nonce: String,
}

/// Payment panel fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/payment_panel.html")]
pub struct PaymentPanelTemplate {
    pub panel: PaymentPanelView,
    pub selected_payment: String,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/complete.html")]
pub struct CheckoutCompleteTemplate {
    pub order: Order,
    pub nonce: String,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the checkout state store from the session.
async fn load_checkout(session: &Session) -> Result<CheckoutSession> {
    Ok(session
        .get::<CheckoutSession>(session_keys::CHECKOUT)
        .await?
        .unwrap_or_default())
}

/// Save the checkout state store to the session.
async fn save_checkout(session: &Session, checkout: &CheckoutSession) -> Result<()> {
    session.insert(session_keys::CHECKOUT, checkout).await?;
    Ok(())
}

/// Load enabled gateways for rendering. A failure leaves the payment section
/// out of the page.
async fn load_gateways(state: &AppState) -> Option<Vec<PaymentGateway>> {
    match GatewayRepository::new(state.pool()).list_enabled().await {
        Ok(gateways) => Some(gateways),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load payment gateways");
            None
        }
    }
}

fn params_json(allow_list: &AllowList, state: &AppState) -> Result<String> {
    GatekeeperParams::new(allow_list, state.renderer())
        .to_script_json()
        .map_err(|e| AppError::Internal(format!("failed to serialize checkout params: {e}")))
}

/// Render a fragment for an outcome. Anything other than an applied decision
/// leaves the page as it is (204, which HTMX does not swap).
fn panel_response(
    outcome: GateOutcome,
    panel: PaymentPanel,
    gatekeeper: &Gatekeeper,
    selected_payment: String,
) -> Response {
    match outcome {
        GateOutcome::Applied(decision) => {
            tracing::debug!(?decision, "Payment panel updated");
            PaymentPanelTemplate {
                panel: panel.into_view(gatekeeper),
                selected_payment,
            }
            .into_response()
        }
        GateOutcome::Skipped(e) => {
            tracing::debug!(error = %e, "Payment panel left unchanged");
            StatusCode::NO_CONTENT.into_response()
        }
        _ => StatusCode::NO_CONTENT.into_response(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
///
/// Runs gatekeeper initialization against the effective postal code held in
/// the session.
#[instrument(skip(state, session, nonce))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
) -> Result<CheckoutShowTemplate> {
    let checkout = load_checkout(&session).await?;
    let allow_list = load_allow_list(state.pool()).await?;
    let gateways = load_gateways(&state).await;
    let params_json = params_json(&allow_list, &state)?;

    let mut gatekeeper = Gatekeeper::new(allow_list, state.renderer());
    let mut panel = PaymentPanel::new(
        None,
        Some(checkout.effective_postcode().to_owned()),
        gateways,
    );
    let mut scheduler = ImmediateScheduler::default();

    let started = gatekeeper.initialize(&mut panel, &mut scheduler);
    let outcome = scheduler.drain(&mut gatekeeper, &mut panel).unwrap_or(started);
    tracing::debug!(?outcome, "Checkout gatekeeper initialized");

    Ok(CheckoutShowTemplate {
        form: CheckoutFormView::from(&checkout),
        notices: Vec::new(),
        panel: panel.into_view(&gatekeeper),
        selected_payment: String::new(),
        params_json,
        nonce,
    })
}

/// Payment panel fragment for postal code and toggle changes (HTMX).
///
/// The postcode fields are written to the session so later store syncs and
/// page reloads see them.
#[instrument(skip(state, session, query))]
pub async fn payment_fragment(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PanelQuery>,
) -> Result<Response> {
    let postcode = query.effective_postcode().trim().to_owned();

    let mut checkout = load_checkout(&session).await?;
    if checkout.remember_postcodes(
        &query.billing_postcode,
        query.ship_to_different_address.is_some(),
        &query.shipping_postcode,
    ) {
        save_checkout(&session, &checkout).await?;
    }

    let allow_list = load_allow_list(state.pool()).await?;
    let gateways = load_gateways(&state).await;

    let mut gatekeeper = Gatekeeper::new(allow_list, state.renderer());
    let mut panel = PaymentPanel::new(
        Some(postcode),
        Some(checkout.effective_postcode().to_owned()),
        gateways,
    );

    let outcome = match query.trigger {
        PanelTrigger::Input => gatekeeper.on_postal_input(&mut panel),
        PanelTrigger::Toggle => {
            let mut scheduler = ImmediateScheduler::default();
            let deferred = gatekeeper.on_address_toggle(&mut scheduler);
            scheduler
                .drain(&mut gatekeeper, &mut panel)
                .unwrap_or(deferred)
        }
    };

    Ok(panel_response(outcome, panel, &gatekeeper, query.payment_method))
}

/// Payment panel fragment for checkout state changes (HTMX polling).
///
/// Returns 204 when the postal code in the session has not changed since
/// the last sync.
#[instrument(skip(state, session, query))]
pub async fn payment_sync(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PanelQuery>,
) -> Result<Response> {
    let mut checkout = load_checkout(&session).await?;
    let allow_list = load_allow_list(state.pool()).await?;
    let gateways = load_gateways(&state).await;

    let mut gatekeeper = Gatekeeper::new(allow_list, state.renderer())
        .with_last_zipcode(checkout.last_synced_zipcode.clone());
    let mut panel = PaymentPanel::new(
        None,
        Some(checkout.effective_postcode().to_owned()),
        gateways,
    );

    let outcome = gatekeeper.on_store_update(&mut panel);

    if gatekeeper.last_zipcode() != checkout.last_synced_zipcode {
        checkout.last_synced_zipcode = gatekeeper.last_zipcode().to_owned();
        save_checkout(&session, &checkout).await?;
    }

    Ok(panel_response(outcome, panel, &gatekeeper, query.payment_method))
}

/// Submit the checkout form.
///
/// Validation failures re-render the page with notices (422). On success the
/// order is created, the accepted postal code is recorded on it, and the
/// shopper is redirected to the confirmation page.
#[instrument(skip(state, session, nonce, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let postcode = form.effective_postcode();

    let mut checkout = load_checkout(&session).await?;
    checkout.remember_postcodes(
        &form.billing_postcode,
        form.ship_to_different_address.is_some(),
        &form.shipping_postcode,
    );
    save_checkout(&session, &checkout).await?;

    let allow_list = load_allow_list(state.pool()).await?;
    let gateways = GatewayRepository::new(state.pool()).list_enabled().await?;

    let mut notices = required_field_notices(&form);
    match validate_submission(Some(postcode), &allow_list) {
        Ok(()) => {
            if !gateways.iter().any(|g| g.id == form.payment_method) {
                notices.push(PAYMENT_METHOD_NOTICE.to_owned());
            }
        }
        Err(rejection) => {
            tracing::debug!(postal_code = %postcode.trim(), %rejection, "Checkout rejected");
            notices.extend(
                rejection
                    .notices
                    .iter()
                    .map(|notice| notice.message().to_owned()),
            );
        }
    }

    if !notices.is_empty() {
        let params_json = params_json(&allow_list, &state)?;
        let mut gatekeeper = Gatekeeper::new(allow_list, state.renderer());
        let mut panel = PaymentPanel::new(
            Some(postcode.to_owned()),
            Some(checkout.effective_postcode().to_owned()),
            Some(gateways),
        );
        gatekeeper.on_postal_input(&mut panel);

        let page = CheckoutShowTemplate {
            form: CheckoutFormView::from(&form),
            notices,
            panel: panel.into_view(&gatekeeper),
            selected_payment: form.payment_method.clone(),
            params_json,
            nonce,
        };
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let orders = OrderRepository::new(state.pool());
    let order = orders
        .create(&NewOrder {
            email: form.email.trim(),
            shipping_name: form.name.trim(),
            shipping_address: form.address.trim(),
            shipping_city: form.city.trim(),
            shipping_postcode: postcode,
            payment_method: &form.payment_method,
        })
        .await?;

    if let Some(zipcode) = delivery_zipcode_to_record(Some(postcode)) {
        // The order exists at this point; a failed write must not fail checkout.
        if let Err(e) = orders.record_delivery_zipcode(order.id, &zipcode).await {
            tracing::error!(order_id = %order.id, error = %e, "Failed to record delivery ZIP code");
        }
    }

    checkout.last_order_id = Some(order.id);
    save_checkout(&session, &checkout).await?;

    let order_id = order.id.to_string();
    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", &order_id)]));
    tracing::info!(order_id = %order_id, "Order placed");

    Ok(Redirect::to(&format!("/checkout/complete/{order_id}")).into_response())
}

/// Order confirmation page. Only the session that placed the order can see it.
#[instrument(skip(state, session, nonce))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    CspNonce(nonce): CspNonce,
    Path(order_id): Path<Uuid>,
) -> Result<CheckoutCompleteTemplate> {
    let checkout = load_checkout(&session).await?;
    if checkout.last_order_id != Some(order_id) {
        return Err(AppError::NotFound(format!("order {order_id}")));
    }

    let order = OrderRepository::new(state.pool())
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    Ok(CheckoutCompleteTemplate { order, nonce })
}
