//! Error type shared by the checkout modules.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::client::StripeError;
use crate::state::SubmissionState;

/// Everything that can go wrong while wiring or driving a checkout.
///
/// Stripe.js failures keep their structured [`StripeError`]; everything the
/// browser throws at us is flattened into [`CheckoutError::Js`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("no element with id `{0}` on the page")]
    MissingElement(String),

    #[error("element `{id}` is not a {expected}")]
    UnexpectedElement { id: String, expected: &'static str },

    #[error("page value `{0}` is empty")]
    EmptyPageValue(String),

    #[error("invalid checkout configuration: {0}")]
    Config(String),

    #[error("stripe: {0}")]
    Stripe(#[from] StripeError),

    #[error("staging request rejected with HTTP {status}")]
    Staging { status: u16 },

    #[error("network error: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("cannot {event} while {from:?}")]
    InvalidTransition {
        from: SubmissionState,
        event: &'static str,
    },
}

impl From<JsValue> for CheckoutError {
    fn from(value: JsValue) -> Self {
        CheckoutError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}

impl From<serde_urlencoded::ser::Error> for CheckoutError {
    fn from(err: serde_urlencoded::ser::Error) -> Self {
        CheckoutError::Serialization(err.to_string())
    }
}
