//! Checkout gatekeeper.
//!
//! Keeps the payment section of a checkout page in line with the shipping
//! postal code. The page is reached through the [`CheckoutUi`] trait and timers
//! through [`Scheduler`], so the state machine runs the same way against a
//! server-rendered view model, a browser binding, or a test double.
//!
//! # Triggers
//!
//! | Trigger                         | Method                              |
//! |---------------------------------|-------------------------------------|
//! | postal code input/blur/change   | [`Gatekeeper::on_postal_input`]     |
//! | ship-to-different toggle        | [`Gatekeeper::on_address_toggle`]   |
//! | checkout state store update     | [`Gatekeeper::on_store_update`]     |
//! | page initialization             | [`Gatekeeper::initialize`]          |
//!
//! Every trigger re-runs the full decision against the current postal code.
//! Nothing is applied incrementally, so interleaved triggers always settle on
//! the decision for the latest postal code.
//!
//! # Failure policy
//!
//! A [`UiError`] abandons the current invocation and is returned as
//! [`GateOutcome::Skipped`]. The UI is left as it was; the server validator
//! still rejects bad submissions.

use std::time::Duration;

use super::decision::{Decision, GateState, decide};
use super::gateway::{CheckoutRenderer, filter_available_gateways};
use super::params::{DENIAL_MESSAGE, GatekeeperParams};
use super::probe::{ContainerProbe, ProbeStep};
use crate::allow_list::AllowList;

/// Delay after the ship-to-different toggle changes, so the address fields
/// re-render before the postal code is read.
pub const TOGGLE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Blocking alert shown when the payment section never appears.
pub const MISSING_PAYMENT_SECTION_ALERT: &str = "ZIP Code Validation Error: Payment section not found after multiple attempts. Please contact support.";

/// Failure talking to the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    /// A required element is not on the page.
    #[error("element not found: {0}")]
    MissingElement(&'static str),
    /// The checkout state store could not be read.
    #[error("checkout state store unavailable: {0}")]
    Store(String),
}

/// The checkout page as seen by the gatekeeper.
pub trait CheckoutUi {
    /// Current value of the shipping postal code field.
    ///
    /// `Ok(None)` if the field is not rendered.
    ///
    /// # Errors
    ///
    /// Returns an error if the field exists but cannot be read.
    fn postal_code_input(&self) -> Result<Option<String>, UiError>;

    /// Shipping postal code held by the checkout state store.
    ///
    /// `Ok(None)` if there is no store on this page.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn store_postal_code(&self) -> Result<Option<String>, UiError>;

    /// Whether the payment section exists yet.
    fn payment_section_present(&self) -> bool;

    /// Show the payment section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section cannot be updated.
    fn show_payment_section(&mut self) -> Result<(), UiError>;

    /// Hide the payment section.
    ///
    /// # Errors
    ///
    /// Returns an error if the section cannot be updated.
    fn hide_payment_section(&mut self) -> Result<(), UiError>;

    /// Enable or disable the place-order control.
    ///
    /// # Errors
    ///
    /// Returns an error if the control cannot be updated.
    fn set_place_order_enabled(&mut self, enabled: bool) -> Result<(), UiError>;

    /// Remove the gatekeeper's notice, if one is shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice cannot be removed.
    fn remove_notice(&mut self) -> Result<(), UiError>;

    /// Insert a notice immediately before the payment section.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice cannot be inserted.
    fn insert_notice(&mut self, message: &str) -> Result<(), UiError>;

    /// Show a blocking alert.
    fn alert(&mut self, message: &str);
}

/// Deferred work handed to a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateTask {
    /// Re-run the decision.
    Evaluate,
    /// Poll for the payment section.
    Probe,
}

/// Runs [`GateTask`]s after a delay by calling [`Gatekeeper::run_task`].
pub trait Scheduler {
    /// Queue `task` to run after `delay`.
    fn schedule(&mut self, delay: Duration, task: GateTask);
}

/// What a trigger did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The decision was applied to the page.
    Applied(Decision),
    /// Work was handed to the scheduler.
    Deferred(GateTask),
    /// The postal code has not changed since the last store update.
    Unchanged,
    /// Initialization found no postal code; polling was not started.
    NotStarted,
    /// The payment section never appeared; the shopper was alerted.
    GaveUp,
    /// The page could not be read or updated; nothing was changed.
    Skipped(UiError),
}

/// Per-page gatekeeper state.
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    allow_list: AllowList,
    renderer: CheckoutRenderer,
    message: String,
    last_zipcode: String,
    state: GateState,
    probe: Option<ContainerProbe>,
}

impl Gatekeeper {
    /// Create a gatekeeper for one checkout page.
    #[must_use]
    pub fn new(allow_list: AllowList, renderer: CheckoutRenderer) -> Self {
        Self {
            allow_list,
            renderer,
            message: DENIAL_MESSAGE.to_owned(),
            last_zipcode: String::new(),
            state: GateState::Unknown,
            probe: None,
        }
    }

    /// Create a gatekeeper from the page-injected snapshot.
    #[must_use]
    pub fn from_params(params: &GatekeeperParams) -> Self {
        let mut gatekeeper = Self::new(params.allow_list(), params.renderer());
        gatekeeper.message.clone_from(&params.error_message);
        gatekeeper
    }

    /// Seed the last postal code seen by the store subscription.
    #[must_use]
    pub fn with_last_zipcode(mut self, postal_code: impl Into<String>) -> Self {
        self.last_zipcode = postal_code.into();
        self
    }

    /// Current gate state.
    #[must_use]
    pub const fn state(&self) -> GateState {
        self.state
    }

    /// Last postal code seen by [`Self::on_store_update`].
    #[must_use]
    pub fn last_zipcode(&self) -> &str {
        &self.last_zipcode
    }

    /// Whether the initialization probe is still polling.
    #[must_use]
    pub fn is_probing(&self) -> bool {
        self.probe.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Postal code field changed (input, blur, or change).
    pub fn on_postal_input(&mut self, ui: &mut impl CheckoutUi) -> GateOutcome {
        self.evaluate(ui)
    }

    /// Ship-to-different toggle changed. Evaluation is deferred by
    /// [`TOGGLE_DEBOUNCE`].
    pub fn on_address_toggle(&mut self, scheduler: &mut impl Scheduler) -> GateOutcome {
        scheduler.schedule(TOGGLE_DEBOUNCE, GateTask::Evaluate);
        GateOutcome::Deferred(GateTask::Evaluate)
    }

    /// Checkout state store changed. Only re-evaluates when the postal code
    /// differs from the last one seen here.
    pub fn on_store_update(&mut self, ui: &mut impl CheckoutUi) -> GateOutcome {
        let postal_code = match current_postal_code(ui) {
            Ok(code) => code,
            Err(e) => return GateOutcome::Skipped(e),
        };

        if postal_code == self.last_zipcode {
            return GateOutcome::Unchanged;
        }

        self.last_zipcode = postal_code;
        self.evaluate(ui)
    }

    /// Page loaded. Starts polling for the payment section unless the postal
    /// code is empty.
    pub fn initialize(
        &mut self,
        ui: &mut impl CheckoutUi,
        scheduler: &mut impl Scheduler,
    ) -> GateOutcome {
        match current_postal_code(ui) {
            Ok(code) if code.is_empty() => GateOutcome::NotStarted,
            Ok(_) => {
                let probe = ContainerProbe::new();
                scheduler.schedule(probe.interval(), GateTask::Probe);
                self.probe = Some(probe);
                GateOutcome::Deferred(GateTask::Probe)
            }
            Err(e) => GateOutcome::Skipped(e),
        }
    }

    /// Run a task previously handed to the scheduler.
    pub fn run_task(
        &mut self,
        task: GateTask,
        ui: &mut impl CheckoutUi,
        scheduler: &mut impl Scheduler,
    ) -> GateOutcome {
        match task {
            GateTask::Evaluate => self.evaluate(ui),
            GateTask::Probe => self.poll_probe(ui, scheduler),
        }
    }

    /// Filter the available payment gateways.
    ///
    /// Only active with the block renderer. Re-derives the decision from the
    /// allow-list and the current postal code without touching gatekeeper
    /// state. If the postal code cannot be read, the list passes through.
    #[must_use]
    pub fn filter_gateways<T>(&self, ui: &impl CheckoutUi, gateways: Vec<T>) -> Vec<T> {
        if !self.renderer.is_block() {
            return gateways;
        }

        match current_postal_code(ui) {
            Ok(code) => filter_available_gateways(gateways, decide(&code, &self.allow_list)),
            Err(_) => gateways,
        }
    }

    fn poll_probe(
        &mut self,
        ui: &mut impl CheckoutUi,
        scheduler: &mut impl Scheduler,
    ) -> GateOutcome {
        let Some(probe) = self.probe.as_mut() else {
            return GateOutcome::Unchanged;
        };

        match probe.poll(ui.payment_section_present()) {
            ProbeStep::Retry => {
                scheduler.schedule(probe.interval(), GateTask::Probe);
                GateOutcome::Deferred(GateTask::Probe)
            }
            ProbeStep::Found => {
                self.probe = None;
                self.evaluate(ui)
            }
            ProbeStep::Exhausted => {
                self.probe = None;
                ui.alert(MISSING_PAYMENT_SECTION_ALERT);
                GateOutcome::GaveUp
            }
        }
    }

    fn evaluate(&mut self, ui: &mut impl CheckoutUi) -> GateOutcome {
        let result = current_postal_code(ui).and_then(|code| {
            let decision = decide(&code, &self.allow_list);
            apply(ui, decision, &self.message)?;
            Ok(decision)
        });

        match result {
            Ok(decision) => {
                self.state = decision.state();
                GateOutcome::Applied(decision)
            }
            Err(e) => GateOutcome::Skipped(e),
        }
    }
}

/// The shipping postal code: the input field first, then the state store.
fn current_postal_code(ui: &impl CheckoutUi) -> Result<String, UiError> {
    let input = ui.postal_code_input()?.unwrap_or_default();
    let code = if input.trim().is_empty() {
        ui.store_postal_code()?.unwrap_or_default()
    } else {
        input
    };
    Ok(code.trim().to_owned())
}

/// Bring the page in line with `decision`. The notice is always removed
/// first so at most one is ever shown.
fn apply(ui: &mut impl CheckoutUi, decision: Decision, message: &str) -> Result<(), UiError> {
    ui.remove_notice()?;

    if decision.payment_allowed() {
        ui.show_payment_section()?;
        ui.set_place_order_enabled(true)?;
    } else {
        ui.hide_payment_section()?;
        ui.set_place_order_enabled(false)?;
        ui.insert_notice(message)?;
    }

    Ok(())
}
