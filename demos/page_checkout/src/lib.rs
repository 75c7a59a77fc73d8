// src/lib.rs
//
// Entry point for a server-rendered checkout page. The page provides the form,
// the embedded `id_stripe_public_key` / `id_client_secret` values and loads
// Stripe.js itself; this module only wires the submission flow into it.
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    match yew_stripe_checkout::attach_page_checkout() {
        // The page lives as long as the checkout does.
        Ok(handle) => handle.forget(),
        Err(err) => log::error!("checkout not attached: {}", err),
    }
}
