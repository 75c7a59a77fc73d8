//! yew_stripe_checkout/src/interop.rs
//!
//! Loading Stripe.js v3 at runtime (no inline JS).
//!
//! # Overview
//! `use_stripejs()` injects a single
//! `<script id="stripejs-sdk" src="https://js.stripe.com/v3/" defer>`
//! into `<head>` on first use, returns `false` until the
//! script's `load` event fires, then returns `true`
//! on every subsequent call. Server-rendered pages that already include the
//! script are detected through `stripe_js_present()`.
//!
//! # Usage
//! ```rust,ignore
//! use yew::prelude::*;
//! use yew_stripe_checkout::interop::use_stripejs;
//!
//! #[function_component(App)]
//! fn app() -> Html {
//!     let stripe_ready = use_stripejs();
//!     html! {
//!         if stripe_ready {
//!             <p>{"Stripe.js loaded"}</p>
//!         } else {
//!             <p>{"Loading Stripe.js..."}</p>
//!         }
//!     }
//! }
//! ```

use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::js_sys::Reflect;
use web_sys::{Document, HtmlScriptElement};
use yew::functional::hook;
use yew::prelude::*;

use crate::error::CheckoutError;

pub const STRIPE_JS_URL: &str = "https://js.stripe.com/v3/";
pub const STRIPE_SCRIPT_ID: &str = "stripejs-sdk";

/// Whether `window.Stripe` exists.
pub fn stripe_js_present() -> bool {
    web_sys::window()
        .and_then(|win| Reflect::has(&win, &JsValue::from_str("Stripe")).ok())
        .unwrap_or(false)
}

/// Append the Stripe.js `<script>` to `<head>` unless it is already there.
///
/// Returns the new element, or `None` when a script with [`STRIPE_SCRIPT_ID`]
/// was already on the page.
pub fn inject_stripe_script(
    document: &Document,
    on_load: &Closure<dyn Fn()>,
) -> Result<Option<HtmlScriptElement>, CheckoutError> {
    if document.get_element_by_id(STRIPE_SCRIPT_ID).is_some() {
        return Ok(None);
    }

    let script: HtmlScriptElement = document
        .create_element("script")?
        .dyn_into()
        .map_err(|_| CheckoutError::UnexpectedElement {
            id: STRIPE_SCRIPT_ID.to_owned(),
            expected: "HtmlScriptElement",
        })?;
    script.set_id(STRIPE_SCRIPT_ID);
    script.set_src(STRIPE_JS_URL);
    script.set_defer(true);
    script.set_onload(Some(on_load.as_ref().unchecked_ref()));

    document
        .head()
        .ok_or_else(|| CheckoutError::MissingElement("head".into()))?
        .append_child(&script)?;
    Ok(Some(script))
}

/// Custom hook: load Stripe.js v3 exactly once and track readiness.
///
/// # Returns
/// - `false` while the `<script>` is being fetched & parsed.
/// - `true` once `window.Stripe` exists.
#[hook]
pub fn use_stripejs() -> bool {
    let loaded = use_state(stripe_js_present);

    {
        let loaded = loaded.clone();
        use_effect_with((), move |_| {
            if stripe_js_present() {
                loaded.set(true);
            } else if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                let ready = loaded.clone();
                let onload = Closure::wrap(Box::new(move || {
                    ready.set(true);
                }) as Box<dyn Fn()>);

                match inject_stripe_script(&document, &onload) {
                    // Leak so it lives until the load event.
                    Ok(Some(_)) => onload.forget(),
                    Ok(None) => {
                        // Another component already asked for the script; wait on its load event.
                        let waiting = document
                            .get_element_by_id(STRIPE_SCRIPT_ID)
                            .map(|script| {
                                script.add_event_listener_with_callback(
                                    "load",
                                    onload.as_ref().unchecked_ref(),
                                )
                            });
                        match waiting {
                            Some(Ok(())) => onload.forget(),
                            _ => log::warn!("could not wait on the existing Stripe.js script"),
                        }
                    }
                    Err(err) => log::error!("could not load Stripe.js: {}", err),
                }
            }
            || ()
        });
    }

    *loaded
}
