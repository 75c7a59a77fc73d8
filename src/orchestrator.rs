//! The checkout submission orchestrator.
//!
//! [`Orchestrator`] owns the session secret and the submission state, and talks
//! to the outside world only through two seams:
//!
//! * [`CheckoutSurface`] – the page: inputs, overlay, error region, native submit.
//! * [`PaymentGateway`] – the network: the staging POST and `confirmCardPayment`.
//!
//! `DomSurface` and `StripeGateway` are the browser implementations.

use std::cell::Cell;
use std::fmt;

use async_trait::async_trait;

use crate::client::{CardChange, PaymentIntentInfo, PaymentResult, StripeError};
use crate::config::{CheckoutConfig, UnexpectedStatusPolicy};
use crate::details::{CheckoutFields, ConfirmCardPaymentData, StagingPayload};
use crate::error::CheckoutError;
use crate::page::ClientSecret;
use crate::state::SubmissionState;

/// The parts of the page the orchestrator reads and drives.
pub trait CheckoutSurface {
    /// Enable or disable both the card input and the submit control.
    fn set_inputs_enabled(&self, enabled: bool);
    /// Swap the form and the loading overlay.
    fn toggle_overlay(&self);
    /// Replace the error region's content with a single message.
    fn show_error(&self, message: &str);
    fn clear_error(&self);
    fn save_info(&self) -> bool;
    fn csrf_token(&self) -> Option<String>;
    fn fields(&self) -> CheckoutFields;
    /// Submit the form natively, bypassing our own submit listener.
    fn submit_form(&self) -> Result<(), CheckoutError>;
    fn reload(&self);
}

#[async_trait(?Send)]
pub trait PaymentGateway {
    /// Attach out-of-band metadata to the pending PaymentIntent.
    async fn stage(&self, payload: &StagingPayload) -> Result<(), CheckoutError>;

    async fn confirm(
        &self,
        client_secret: &ClientSecret,
        data: &ConfirmCardPaymentData,
    ) -> PaymentResult;
}

/// Behaviour switches taken from [`CheckoutConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOptions {
    pub loading_overlay: bool,
    pub send_billing_details: bool,
    pub unexpected_status: UnexpectedStatusPolicy,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        SubmitOptions::from(&CheckoutConfig::default())
    }
}

impl From<&CheckoutConfig> for SubmitOptions {
    fn from(config: &CheckoutConfig) -> Self {
        SubmitOptions {
            loading_overlay: config.loading_overlay,
            send_billing_details: config.send_billing_details,
            unexpected_status: config.unexpected_status,
        }
    }
}

/// How a submit attempt ended.
#[derive(Debug)]
pub enum Outcome {
    /// Another attempt was already in flight; nothing happened.
    Busy,
    /// Staging was rejected; the page is reloading.
    StagingFailed(CheckoutError),
    /// Stripe returned an error; the form is re-armed.
    ConfirmationError(StripeError),
    /// Payment succeeded and the form was submitted.
    Succeeded(PaymentIntentInfo),
    /// Confirmation resolved with a status other than `succeeded`.
    UnexpectedStatus(PaymentIntentInfo),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Busy => f.write_str("busy"),
            Outcome::StagingFailed(err) => write!(f, "staging failed ({})", err),
            Outcome::ConfirmationError(err) => write!(f, "confirmation error ({})", err.message),
            Outcome::Succeeded(intent) => write!(f, "succeeded ({})", intent.id),
            Outcome::UnexpectedStatus(intent) => {
                write!(f, "unexpected status `{}` ({})", intent.status, intent.id)
            }
        }
    }
}

pub fn unexpected_status_message(status: &str) -> String {
    format!(
        "Payment was not completed (status: {}). Please try again.",
        status
    )
}

pub struct Orchestrator<S, G> {
    surface: S,
    gateway: G,
    client_secret: ClientSecret,
    options: SubmitOptions,
    state: Cell<SubmissionState>,
}

impl<S, G> Orchestrator<S, G>
where
    S: CheckoutSurface,
    G: PaymentGateway,
{
    pub fn new(surface: S, gateway: G, client_secret: ClientSecret, options: SubmitOptions) -> Self {
        Orchestrator {
            surface,
            gateway,
            client_secret,
            options,
            state: Cell::new(SubmissionState::Idle),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn state(&self) -> SubmissionState {
        self.state.get()
    }

    /// Live validation: mirror the card's error (or its absence) into the error region.
    pub fn on_card_change(&self, change: &CardChange) {
        match &change.error {
            Some(err) => self.surface.show_error(&err.message),
            None => self.surface.clear_error(),
        }
    }

    /// Run one submit attempt to completion.
    ///
    /// The caller must already have cancelled the browser's native submission.
    pub async fn submit(&self) -> Outcome {
        let outcome = self.run_attempt().await;
        log::info!("checkout attempt finished: {}", outcome);
        outcome
    }

    async fn run_attempt(&self) -> Outcome {
        if let Err(err) = self.advance(SubmissionState::begin_submit) {
            if self.state().is_in_flight() {
                log::debug!("submit ignored, an attempt is already {:?}", self.state());
            } else {
                log::debug!("{}", err);
            }
            return Outcome::Busy;
        }

        self.surface.set_inputs_enabled(false);
        if self.options.loading_overlay {
            self.surface.toggle_overlay();
        }

        let payload = StagingPayload {
            csrfmiddlewaretoken: self.surface.csrf_token().unwrap_or_else(|| {
                log::warn!("no CSRF token on the page; staging will likely be rejected");
                String::new()
            }),
            client_secret: self.client_secret.clone(),
            save_info: self.surface.save_info(),
        };

        if let Err(err) = self.gateway.stage(&payload).await {
            log::warn!("staging failed, reloading the page: {}", err);
            self.advance_or_log(SubmissionState::abandon);
            self.surface.reload();
            return Outcome::StagingFailed(err);
        }
        self.advance_or_log(SubmissionState::staged);

        let data = if self.options.send_billing_details {
            ConfirmCardPaymentData::with_details(&self.surface.fields())
        } else {
            ConfirmCardPaymentData::card_only()
        };

        self.advance_or_log(SubmissionState::confirming);
        match self.gateway.confirm(&self.client_secret, &data).await {
            PaymentResult::Error(err) => {
                self.rearm(&err.message);
                Outcome::ConfirmationError(err)
            }
            PaymentResult::Success(intent) if intent.succeeded() => {
                self.advance_or_log(SubmissionState::succeed);
                if let Err(err) = self.surface.submit_form() {
                    log::error!("payment {} succeeded but the form did not submit: {}", intent.id, err);
                }
                Outcome::Succeeded(intent)
            }
            PaymentResult::Success(intent) => {
                match self.options.unexpected_status {
                    UnexpectedStatusPolicy::TreatAsError => {
                        self.rearm(&unexpected_status_message(&intent.status));
                    }
                    UnexpectedStatusPolicy::Ignore => {
                        log::warn!("ignoring payment status `{}`", intent.status);
                        self.advance_or_log(SubmissionState::stall);
                    }
                }
                Outcome::UnexpectedStatus(intent)
            }
        }
    }

    /// Undo everything the attempt did to the page and show `message`.
    fn rearm(&self, message: &str) {
        self.advance_or_log(SubmissionState::fail_recoverably);
        self.surface.show_error(message);
        if self.options.loading_overlay {
            self.surface.toggle_overlay();
        }
        self.surface.set_inputs_enabled(true);
    }

    fn advance(
        &self,
        transition: fn(SubmissionState) -> Result<SubmissionState, CheckoutError>,
    ) -> Result<SubmissionState, CheckoutError> {
        let next = transition(self.state.get())?;
        log::debug!("checkout state {:?} -> {:?}", self.state.get(), next);
        self.state.set(next);
        Ok(next)
    }

    fn advance_or_log(&self, transition: fn(SubmissionState) -> Result<SubmissionState, CheckoutError>) {
        if let Err(err) = self.advance(transition) {
            log::error!("{}", err);
        }
    }
}
