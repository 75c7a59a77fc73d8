//! yew_stripe_checkout/src/client.rs
//!
//! High-level Rust API over the Stripe.js v3 Card Element.
//!
//! This module provides:
//! - `CardStyle` for the fixed visual configuration of the hosted card input.
//! - `mount_card_element()` to initialize Stripe, create Elements, and mount the Card Element.
//! - `on_card_change()` to subscribe to the card's live validation events as typed `CardChange`s.
//! - `set_card_disabled()` to lock/unlock the card input during a submission.
//! - `confirm_card_payment()` to run `stripe.confirmCardPayment` and get a typed `PaymentResult`.
//!
//! # Example Usage
//! ```rust,ignore
//! use yew_stripe_checkout::client::{mount_card_element, on_card_change, CardStyle};
//!
//! let (stripe, card) = mount_card_element("pk_test_…", &CardStyle::default(), "#card-element")?;
//! let listener = on_card_change(&card, |change| {
//!     if let Some(err) = change.error {
//!         log::warn!("card invalid: {}", err.message);
//!     }
//! });
//! listener.forget();
//! ```

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::from_value;
use thiserror::Error;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::js_sys::{Object, Reflect};

use crate::bindings::{new_stripe, JsCardElement, JsStripe};
use crate::details::ConfirmCardPaymentData;

/// PaymentIntent status that lets the checkout form proceed to the server.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Style passed to `elements.create("card", { style })`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CardStyle {
    pub base: BaseStyle,
    pub invalid: InvalidStyle,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BaseStyle {
    pub color: String,
    pub font_family: String,
    pub font_smoothing: String,
    pub font_size: String,
    #[serde(rename = "::placeholder")]
    pub placeholder: PlaceholderStyle,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlaceholderStyle {
    pub color: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InvalidStyle {
    pub color: String,
    pub icon_color: String,
}

impl Default for CardStyle {
    fn default() -> Self {
        CardStyle {
            base: BaseStyle {
                color: "#000".into(),
                font_family: "\"Helvetica Neue\", Helvetica, sans-serif".into(),
                font_smoothing: "antialiased".into(),
                font_size: "16px".into(),
                placeholder: PlaceholderStyle {
                    color: "#aab7c4".into(),
                },
            },
            invalid: InvalidStyle {
                color: "#dc3545".into(),
                icon_color: "#dc3545".into(),
            },
        }
    }
}

#[derive(Serialize)]
struct CardOptions<'a> {
    style: &'a CardStyle,
}

#[derive(Serialize)]
struct CardUpdate {
    disabled: bool,
}

/// Representation of a Stripe.js error object.
#[derive(Clone, Debug, Deserialize, PartialEq, Error)]
#[error("{message}")]
pub struct StripeError {
    /// Human-readable message.
    pub message: String,
    /// Stripe's error type, e.g. `"card_error"`.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
    /// Optional Stripe error code, e.g. `"card_declined"`.
    #[serde(default)]
    pub code: Option<String>,
}

impl StripeError {
    pub fn new(message: impl Into<String>) -> Self {
        StripeError {
            message: message.into(),
            error_type: None,
            code: None,
        }
    }
}

/// Payload of the Card Element's `change` event.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardChange {
    #[serde(default)]
    pub empty: bool,
    #[serde(default)]
    pub complete: bool,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub error: Option<StripeError>,
}

/// Minimal representation of the PaymentIntent returned by a confirmation.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct PaymentIntentInfo {
    /// Stripe's internal identifier, e.g. `pi_1Fxxxxxx`.
    #[serde(default)]
    pub id: String,
    /// Status after confirmation, e.g. `"succeeded"`.
    #[serde(default)]
    pub status: String,
}

impl PaymentIntentInfo {
    pub fn succeeded(&self) -> bool {
        self.status == STATUS_SUCCEEDED
    }
}

/// Strongly-typed outcome of `stripe.confirmCardPayment`.
///
/// `Success` only means Stripe answered with a PaymentIntent; callers still
/// have to look at its status.
#[derive(Clone, Debug, PartialEq)]
pub enum PaymentResult {
    Success(PaymentIntentInfo),
    Error(StripeError),
}

#[derive(Deserialize)]
struct RawConfirmResult {
    #[serde(default)]
    error: Option<StripeError>,
    #[serde(default, rename = "paymentIntent")]
    payment_intent: Option<PaymentIntentInfo>,
}

impl From<RawConfirmResult> for PaymentResult {
    fn from(raw: RawConfirmResult) -> Self {
        match (raw.error, raw.payment_intent) {
            (Some(err), _) => PaymentResult::Error(err),
            (None, Some(intent)) => PaymentResult::Success(intent),
            (None, None) => PaymentResult::Error(StripeError::new(
                "Stripe returned neither an error nor a payment intent",
            )),
        }
    }
}

/// Initialize Stripe.js, create an Elements instance, and mount a styled Card Element.
///
/// # Arguments
///
/// * `publishable_key` – Your Stripe publishable key (starts with `pk_`).
/// * `style` – Visual configuration of the card input.
/// * `selector` – CSS selector of the mount point, e.g. `"#card-element"`.
///
/// # Errors
///
/// Returns a `StripeError` if Stripe.js is missing or any step throws.
pub fn mount_card_element(
    publishable_key: &str,
    style: &CardStyle,
    selector: &str,
) -> Result<(JsStripe, JsCardElement), StripeError> {
    let stripe = new_stripe(publishable_key).map_err(js_to_stripe_error)?;
    let elements = stripe.elements().map_err(js_to_stripe_error)?;

    let options = to_js(&CardOptions { style })?;
    let card = elements
        .create_element("card", options)
        .map_err(js_to_stripe_error)?;

    card.mount(selector).map_err(js_to_stripe_error)?;
    log::debug!("card element mounted at {}", selector);

    Ok((stripe, card))
}

/// Subscribe to the card's `change` events.
///
/// The returned closure must stay alive for as long as the subscription should;
/// pass it to [`off_card_change`] to unsubscribe.
pub fn on_card_change<F>(card: &JsCardElement, mut handler: F) -> Closure<dyn FnMut(JsValue)>
where
    F: FnMut(CardChange) + 'static,
{
    let closure = Closure::wrap(Box::new(move |event: JsValue| {
        match from_value::<CardChange>(event) {
            Ok(change) => handler(change),
            Err(err) => log::warn!("unreadable card change event: {}", err),
        }
    }) as Box<dyn FnMut(JsValue)>);
    card.on("change", closure.as_ref().unchecked_ref());
    closure
}

/// Remove a subscription made with [`on_card_change`].
pub fn off_card_change(card: &JsCardElement, closure: &Closure<dyn FnMut(JsValue)>) {
    card.off("change", closure.as_ref().unchecked_ref());
}

/// Tear down a mounted Card Element so its container can be reused.
pub fn unmount_card_element(card: &JsCardElement) -> Result<(), StripeError> {
    card.unmount().map_err(js_to_stripe_error)
}

/// `card.update({ disabled })`.
pub fn set_card_disabled(card: &JsCardElement, disabled: bool) -> Result<(), StripeError> {
    let options = to_js(&CardUpdate { disabled })?;
    card.update(options).map_err(js_to_stripe_error)
}

/// Confirm the PaymentIntent behind `client_secret` with the mounted card.
///
/// The card handle is attached as `payment_method.card`; billing and shipping
/// details come from `data` when present.
pub async fn confirm_card_payment(
    stripe: &JsStripe,
    card: &JsCardElement,
    client_secret: &str,
    data: &ConfirmCardPaymentData,
) -> PaymentResult {
    let payload = match build_confirm_payload(card, data) {
        Ok(payload) => payload,
        Err(err) => return PaymentResult::Error(err),
    };

    let promise = match stripe.confirm_card_payment(client_secret, payload) {
        Ok(p) => p,
        Err(e) => return PaymentResult::Error(js_to_stripe_error(e)),
    };

    match JsFuture::from(promise).await {
        Ok(js_val) => match from_value::<RawConfirmResult>(js_val) {
            Ok(raw) => raw.into(),
            Err(err) => PaymentResult::Error(StripeError::new(format!(
                "unreadable confirmation result: {}",
                err
            ))),
        },
        Err(js_err) => PaymentResult::Error(js_to_stripe_error(js_err)),
    }
}

fn build_confirm_payload(
    card: &JsCardElement,
    data: &ConfirmCardPaymentData,
) -> Result<JsValue, StripeError> {
    let payload = to_js(data)?;
    let payment_method = match Reflect::get(&payload, &JsValue::from_str("payment_method")) {
        Ok(pm) if pm.is_object() => pm,
        _ => {
            let pm: JsValue = Object::new().into();
            Reflect::set(&payload, &JsValue::from_str("payment_method"), &pm)
                .map_err(js_to_stripe_error)?;
            pm
        }
    };
    Reflect::set(&payment_method, &JsValue::from_str("card"), card.as_ref())
        .map_err(js_to_stripe_error)?;
    Ok(payload)
}

/// Serialize into plain JS objects (never `Map`s), which is what Stripe.js reads.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, StripeError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| StripeError::new(err.to_string()))
}

/// Convert any caught `JsValue` into a `StripeError` with best effort.
pub(crate) fn js_to_stripe_error(value: JsValue) -> StripeError {
    from_value::<StripeError>(value.clone())
        .unwrap_or_else(|_| StripeError::new(value.as_string().unwrap_or_else(|| format!("{:?}", value))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_style_serializes_with_stripe_keys() {
        let json = serde_json::to_value(CardStyle::default()).unwrap();
        assert_eq!(json["base"]["color"], "#000");
        assert_eq!(json["base"]["fontFamily"], "\"Helvetica Neue\", Helvetica, sans-serif");
        assert_eq!(json["base"]["fontSmoothing"], "antialiased");
        assert_eq!(json["base"]["fontSize"], "16px");
        assert_eq!(json["base"]["::placeholder"]["color"], "#aab7c4");
        assert_eq!(json["invalid"]["color"], "#dc3545");
        assert_eq!(json["invalid"]["iconColor"], "#dc3545");
    }

    #[rstest]
    fn card_change_reads_error_object() {
        let change: CardChange = serde_json::from_str(
            r#"{"elementType":"card","empty":false,"complete":false,"brand":"visa",
                "error":{"type":"validation_error","code":"incomplete_number","message":"Your card number is incomplete."}}"#,
        )
        .unwrap();
        let err = change.error.unwrap();
        assert_eq!(err.message, "Your card number is incomplete.");
        assert_eq!(err.code.as_deref(), Some("incomplete_number"));
        assert_eq!(err.error_type.as_deref(), Some("validation_error"));
    }

    #[rstest]
    fn card_change_without_error() {
        let change: CardChange =
            serde_json::from_str(r#"{"elementType":"card","empty":false,"complete":true}"#).unwrap();
        assert!(change.error.is_none());
        assert!(change.complete);
    }

    #[rstest]
    #[case(r#"{"error":{"message":"Your card was declined.","type":"card_error","code":"card_declined"}}"#,
           PaymentResult::Error(StripeError {
               message: "Your card was declined.".into(),
               error_type: Some("card_error".into()),
               code: Some("card_declined".into()),
           }))]
    #[case(r#"{"paymentIntent":{"id":"pi_1","status":"succeeded","amount":1000}}"#,
           PaymentResult::Success(PaymentIntentInfo { id: "pi_1".into(), status: "succeeded".into() }))]
    #[case(r#"{"paymentIntent":{"id":"pi_2","status":"requires_action"}}"#,
           PaymentResult::Success(PaymentIntentInfo { id: "pi_2".into(), status: "requires_action".into() }))]
    fn confirm_result_branches(#[case] raw: &str, #[case] expected: PaymentResult) {
        let raw: RawConfirmResult = serde_json::from_str(raw).unwrap();
        assert_eq!(PaymentResult::from(raw), expected);
    }

    #[rstest]
    fn empty_confirm_result_is_an_error() {
        let raw: RawConfirmResult = serde_json::from_str("{}").unwrap();
        assert!(matches!(PaymentResult::from(raw), PaymentResult::Error(_)));
    }

    #[rstest]
    fn only_exact_succeeded_counts() {
        let mut intent = PaymentIntentInfo { id: "pi".into(), status: "succeeded".into() };
        assert!(intent.succeeded());
        intent.status = "Succeeded".into();
        assert!(!intent.succeeded());
        intent.status = "processing".into();
        assert!(!intent.succeeded());
    }
}
