//! Stripe Card Element checkout for Rust/WASM front ends.
//!
//! Mounts the hosted card input into a checkout form, stages the save-info
//! flag with the server, confirms the card payment with Stripe and hands the
//! form back to the browser once the PaymentIntent has succeeded.
//!
//! Server-rendered pages call [`attach_page_checkout`] from their wasm entry
//! point; Yew apps render [`CardCheckout`].

pub mod attach;
pub mod bindings;
pub mod checkout_component;
pub mod client;
pub mod components;
pub mod config;
pub mod details;
pub mod dom;
pub mod error;
pub mod gateway;
pub mod interop;
pub mod logging;
pub mod orchestrator;
pub mod page;
pub mod state;

pub use attach::{attach_checkout, attach_page_checkout, CheckoutHandle};
pub use bindings::{JsCardElement, JsElements, JsStripe};
pub use checkout_component::{CardCheckout, CardCheckoutProps};
pub use client::{CardChange, CardStyle, PaymentIntentInfo, PaymentResult, StripeError};
pub use config::{CheckoutConfig, UnexpectedStatusPolicy};
pub use details::{CheckoutFields, ConfirmCardPaymentData, StagingPayload};
pub use error::CheckoutError;
pub use interop::use_stripejs;
pub use orchestrator::{CheckoutSurface, Orchestrator, Outcome, PaymentGateway, SubmitOptions};
pub use page::{ClientSecret, PageValues};
pub use state::SubmissionState;
