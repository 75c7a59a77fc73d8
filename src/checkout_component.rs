//! A Yew card checkout form for your app to drop in.
//!
//! The component renders the same DOM contract a server-rendered checkout page
//! provides (form, named inputs, card mount point, error region, submit button,
//! loading overlay), loads Stripe.js, and then wires the submission
//! orchestrator into it exactly as [`attach_checkout`] does for plain pages.

use yew::prelude::*;

use crate::attach::{attach_checkout, CheckoutHandle};
use crate::components::{ErrorRegion, SubmitButton, TextField};
use crate::config::CheckoutConfig;
use crate::dom::CSRF_FORM_FIELD;
use crate::error::CheckoutError;
use crate::interop::use_stripejs;
use crate::logging;
use crate::page::PageValues;

/// Properties for the [`CardCheckout`] component.
///
/// # Fields
///
/// * `publishable_key` – Your Stripe Publishable Key (`pk_…`).
/// * `client_secret` – The PaymentIntent client secret from your backend.
/// * `csrf_token` – Token rendered into the hidden `csrfmiddlewaretoken` input.
/// * `action` – Where the form posts once the payment has succeeded.
/// * `config` – Element ids, staging path and behaviour switches.
/// * `button_label` – Override the submit button text (default: `"Complete Order"`).
/// * `children` – Extra Yew nodes (e.g. order summary) rendered above the form.
#[derive(Properties, PartialEq, Clone)]
pub struct CardCheckoutProps {
    pub publishable_key: String,
    pub client_secret: String,
    pub csrf_token: String,
    pub action: AttrValue,
    #[prop_or_default]
    pub config: CheckoutConfig,
    #[prop_or_default]
    pub button_label: Option<String>,
    #[prop_or_default]
    pub children: Children,
}

/// Everything an attached checkout is built from.
#[derive(Clone, Debug, PartialEq)]
struct AttachKey {
    ready: bool,
    values: PageValues,
    config: CheckoutConfig,
}

impl AttachKey {
    fn new(props: &CardCheckoutProps, ready: bool) -> Self {
        AttachKey {
            ready,
            values: PageValues::new(props.publishable_key.clone(), props.client_secret.clone()),
            config: props.config.clone(),
        }
    }
}

/// Yew function component rendering a complete card checkout form.
///
/// # Example
///
/// ```rust,ignore
/// use yew::prelude::*;
/// use yew_stripe_checkout::checkout_component::CardCheckout;
///
/// #[function_component(App)]
/// fn app() -> Html {
///     html! {
///         <CardCheckout
///             publishable_key="pk_test_123".to_string()
///             client_secret="pi_ABC_secret_XYZ".to_string()
///             csrf_token="token".to_string()
///             action="/checkout/"
///         >
///             <p>{ "Your order: Awesome T-shirt – $25.00" }</p>
///         </CardCheckout>
///     }
/// }
/// ```
#[function_component(CardCheckout)]
pub fn card_checkout(props: &CardCheckoutProps) -> Html {
    let stripe_ready = use_stripejs();
    let handle = use_mut_ref(|| None::<CheckoutHandle>);
    let error = use_state(|| None::<String>);

    // Attach once Stripe.js is available; re-attach when the keys or config
    // change and detach on unmount.
    {
        let handle = handle.clone();
        let error = error.clone();
        use_effect_with(AttachKey::new(props, stripe_ready), move |key| {
            if key.ready {
                // Release the previous PaymentIntent's listeners before mounting again.
                handle.borrow_mut().take();
                logging::init(key.config.log_level);
                let attached = web_sys::window()
                    .and_then(|window| window.document())
                    .ok_or_else(|| CheckoutError::Js("no document".into()))
                    .and_then(|document| attach_checkout(&document, &key.config, key.values.clone()));
                match attached {
                    Ok(h) => {
                        *handle.borrow_mut() = Some(h);
                        error.set(None);
                    }
                    Err(err) => {
                        log::error!("checkout could not be attached: {}", err);
                        error.set(Some(err.to_string()));
                    }
                }
            }
            move || {
                handle.borrow_mut().take();
            }
        });
    }

    let config = &props.config;
    let label = props
        .button_label
        .clone()
        .unwrap_or_else(|| "Complete Order".to_string());

    html! {
        <div class="card-checkout">
            { for props.children.iter() }
            {
                if let Some(msg) = &*error {
                    html! { <div class="alert alert-danger">{ msg.clone() }</div> }
                } else {
                    Html::default()
                }
            }
            <form id={config.form_id.clone()} action={props.action.clone()} method="POST">
                <input type="hidden" name={CSRF_FORM_FIELD} value={props.csrf_token.clone()} />
                <fieldset class="rounded px-3 mb-5">
                    <legend class="fieldset-label small text-black px-2 w-auto">{ "Details" }</legend>
                    <TextField name="full_name" placeholder="Full Name" required={true} autofocus={true} />
                    <TextField name="email" placeholder="Email Address" required={true} input_type="email" />
                </fieldset>
                <fieldset class="rounded px-3 mb-5">
                    <legend class="fieldset-label small text-black px-2 w-auto">{ "Delivery" }</legend>
                    <TextField name="phone_number" placeholder="Phone Number" required={true} />
                    <TextField name="street_address1" placeholder="Street Address 1" required={true} />
                    <TextField name="street_address2" placeholder="Street Address 2" />
                    <TextField name="town_or_city" placeholder="Town or City" required={true} />
                    <TextField name="county" placeholder="County" />
                    <TextField name="postcode" placeholder="Postal Code" />
                    <TextField name="country" placeholder="Country" required={true} />
                    <div class="form-check form-check-inline float-right mr-0">
                        <label class="form-check-label" for={config.save_info_id.clone()}>
                            { "Save this delivery information to my profile" }
                        </label>
                        <input class="form-check-input ml-2 mr-0" type="checkbox"
                            id={config.save_info_id.clone()} name="save-info" checked={true} />
                    </div>
                </fieldset>
                <fieldset class="px-3">
                    <legend class="fieldset-label small text-black px-2 w-auto">{ "Payment" }</legend>
                    <div class="mb-3" id={config.card_mount_id.clone()}></div>
                    <ErrorRegion id={config.error_region_id.clone()} />
                    <input type="hidden" name="client_secret" value={props.client_secret.clone()} />
                </fieldset>
                <div class="submit-button text-right mt-5 mb-2">
                    <SubmitButton id={config.submit_button_id.clone()} label={label} />
                </div>
            </form>
            {
                if config.loading_overlay {
                    html! {
                        <div id={config.overlay_id.clone()} class="loading-overlay" style="display: none;">
                            <h1 class="text-light logo-font loading-spinner">
                                <span class="icon"><i class="fas fa-3x fa-sync-alt fa-spin"></i></span>
                            </h1>
                        </div>
                    }
                } else {
                    Html::default()
                }
            }
        </div>
    }
}
