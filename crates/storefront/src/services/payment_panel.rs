//! Server-rendered payment section.
//!
//! The checkout page swaps the payment section in over HTMX whenever the
//! shipping postal code changes. Each request builds a [`PaymentPanel`], runs
//! one gatekeeper trigger against it, and renders the resulting
//! [`PaymentPanelView`].
//!
//! Timer delays (toggle debounce, probe interval) are realised by HTMX
//! `delay:` modifiers in the browser, so [`ImmediateScheduler`] runs deferred
//! tasks inline.

use std::collections::VecDeque;
use std::time::Duration;

use zipgate_core::checkout::{
    CheckoutUi, GateOutcome, GateTask, Gatekeeper, PaymentGateway, Scheduler, UiError,
};

const PAYMENT_SECTION: &str = "#payment-method";

/// Payment section state for one render.
#[derive(Debug, Clone)]
pub struct PaymentPanel {
    postal_input: Option<String>,
    store_postcode: Option<String>,
    gateways: Option<Vec<PaymentGateway>>,
    payment_visible: bool,
    place_order_enabled: bool,
    notice: Option<String>,
    alert: Option<String>,
}

impl PaymentPanel {
    /// Create a panel.
    ///
    /// * `postal_input` - value of the postal code field in this request
    /// * `store_postcode` - postal code held in the checkout session
    /// * `gateways` - enabled gateways, or `None` if they could not be loaded
    ///   (the payment section is then not rendered)
    #[must_use]
    pub const fn new(
        postal_input: Option<String>,
        store_postcode: Option<String>,
        gateways: Option<Vec<PaymentGateway>>,
    ) -> Self {
        Self {
            postal_input,
            store_postcode,
            gateways,
            payment_visible: true,
            place_order_enabled: true,
            notice: None,
            alert: None,
        }
    }

    /// Finish the render. In block mode the gateway list goes through the
    /// gatekeeper's filter.
    #[must_use]
    pub fn into_view(self, gatekeeper: &Gatekeeper) -> PaymentPanelView {
        let section_present = self.gateways.is_some();
        let gateways = self
            .gateways
            .clone()
            .map(|g| gatekeeper.filter_gateways(&self, g))
            .unwrap_or_default();

        PaymentPanelView {
            section_present,
            payment_visible: self.payment_visible,
            place_order_enabled: self.place_order_enabled,
            notice: self.notice,
            alert: self.alert,
            gateways,
        }
    }

    fn require_section(&self) -> Result<(), UiError> {
        if self.gateways.is_some() {
            Ok(())
        } else {
            Err(UiError::MissingElement(PAYMENT_SECTION))
        }
    }
}

impl CheckoutUi for PaymentPanel {
    fn postal_code_input(&self) -> Result<Option<String>, UiError> {
        Ok(self.postal_input.clone())
    }

    fn store_postal_code(&self) -> Result<Option<String>, UiError> {
        Ok(self.store_postcode.clone())
    }

    fn payment_section_present(&self) -> bool {
        self.gateways.is_some()
    }

    fn show_payment_section(&mut self) -> Result<(), UiError> {
        self.require_section()?;
        self.payment_visible = true;
        Ok(())
    }

    fn hide_payment_section(&mut self) -> Result<(), UiError> {
        self.require_section()?;
        self.payment_visible = false;
        Ok(())
    }

    fn set_place_order_enabled(&mut self, enabled: bool) -> Result<(), UiError> {
        self.place_order_enabled = enabled;
        Ok(())
    }

    fn remove_notice(&mut self) -> Result<(), UiError> {
        self.notice = None;
        Ok(())
    }

    fn insert_notice(&mut self, message: &str) -> Result<(), UiError> {
        self.require_section()?;
        self.notice = Some(message.to_owned());
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.alert = Some(message.to_owned());
    }
}

/// Rendered payment section.
#[derive(Debug, Clone)]
pub struct PaymentPanelView {
    /// Whether the payment section exists at all.
    pub section_present: bool,
    /// Whether the payment section is shown.
    pub payment_visible: bool,
    /// Whether the place-order button is enabled.
    pub place_order_enabled: bool,
    /// Notice rendered before the payment section.
    pub notice: Option<String>,
    /// Blocking alert.
    pub alert: Option<String>,
    /// Gateways to list.
    pub gateways: Vec<PaymentGateway>,
}

/// Scheduler that queues tasks and runs them inline on [`Self::drain`].
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    queue: VecDeque<GateTask>,
}

impl Scheduler for ImmediateScheduler {
    fn schedule(&mut self, delay: Duration, task: GateTask) {
        tracing::trace!(?task, delay_ms = delay.as_millis(), "running deferred task inline");
        self.queue.push_back(task);
    }
}

impl ImmediateScheduler {
    /// Run queued tasks (and anything they queue) until the queue is empty.
    ///
    /// Returns the outcome of the last task run.
    pub fn drain(
        &mut self,
        gatekeeper: &mut Gatekeeper,
        ui: &mut impl CheckoutUi,
    ) -> Option<GateOutcome> {
        let mut last = None;
        while let Some(task) = self.queue.pop_front() {
            last = Some(gatekeeper.run_task(task, ui, self));
        }
        last
    }
}
