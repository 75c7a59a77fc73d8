//! Lifecycle of a single checkout submission.
//!
//! ```text
//! Idle ──begin_submit──▶ Submitting ──staged──▶ Staged ──confirming──▶ Confirming
//!   ▲                        │                                           │
//!   │                     abandon                    succeed / fail_recoverably / stall
//!   │                        ▼                                           ▼
//!   │                    Abandoned                  Succeeded | RecoverableError | Stalled
//!   └──────────────── begin_submit (from RecoverableError) ◀─────────────┘
//! ```

use crate::error::CheckoutError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// Inputs locked, staging request in flight.
    Submitting,
    /// Server accepted the metadata.
    Staged,
    /// `confirmCardPayment` in flight.
    Confirming,
    /// Payment confirmed, form handed back to the browser.
    Succeeded,
    /// Confirmation failed; the form is re-armed for another attempt.
    RecoverableError,
    /// Staging failed and the page is being reloaded.
    Abandoned,
    /// Confirmation came back with a status we were told to ignore.
    Stalled,
}

impl SubmissionState {
    /// Whether a new submit attempt may start from here.
    pub fn accepts_submit(self) -> bool {
        matches!(self, SubmissionState::Idle | SubmissionState::RecoverableError)
    }

    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            SubmissionState::Submitting | SubmissionState::Staged | SubmissionState::Confirming
        )
    }

    pub fn begin_submit(self) -> Result<Self, CheckoutError> {
        if self.accepts_submit() {
            Ok(SubmissionState::Submitting)
        } else {
            Err(self.refuse("begin_submit"))
        }
    }

    pub fn staged(self) -> Result<Self, CheckoutError> {
        self.step(SubmissionState::Submitting, SubmissionState::Staged, "staged")
    }

    pub fn abandon(self) -> Result<Self, CheckoutError> {
        self.step(SubmissionState::Submitting, SubmissionState::Abandoned, "abandon")
    }

    pub fn confirming(self) -> Result<Self, CheckoutError> {
        self.step(SubmissionState::Staged, SubmissionState::Confirming, "confirming")
    }

    pub fn succeed(self) -> Result<Self, CheckoutError> {
        self.step(SubmissionState::Confirming, SubmissionState::Succeeded, "succeed")
    }

    pub fn fail_recoverably(self) -> Result<Self, CheckoutError> {
        self.step(
            SubmissionState::Confirming,
            SubmissionState::RecoverableError,
            "fail_recoverably",
        )
    }

    pub fn stall(self) -> Result<Self, CheckoutError> {
        self.step(SubmissionState::Confirming, SubmissionState::Stalled, "stall")
    }

    fn step(
        self,
        from: SubmissionState,
        to: SubmissionState,
        event: &'static str,
    ) -> Result<Self, CheckoutError> {
        if self == from {
            Ok(to)
        } else {
            Err(self.refuse(event))
        }
    }

    fn refuse(self, event: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition { from: self, event }
    }
}
