// src/lib.rs
use gloo_net::http::Request;
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_stripe_checkout::{CardCheckout, CheckoutConfig};

const BACKEND: &str = "http://127.0.0.1:2718";

#[derive(Deserialize)]
struct CreatePIResponse {
    client_secret: String,
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    yew::Renderer::<YewCheckout>::new().render();
}

#[function_component(YewCheckout)]
fn yew_checkout() -> Html {
    let client_secret = use_state(|| None::<String>);
    let error = use_state(|| None::<String>);

    // Ask the mock server for a fresh PaymentIntent once.
    {
        let client_secret = client_secret.clone();
        let error = error.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                let url = format!("{}/create-payment-intent", BACKEND);
                match Request::post(&url).send().await {
                    Ok(r) if r.ok() => match r.json::<CreatePIResponse>().await {
                        Ok(d) => client_secret.set(Some(d.client_secret)),
                        Err(e) => error.set(Some(format!("Bad JSON: {}", e))),
                    },
                    Ok(r) => error.set(Some(format!("Server error: {}", r.status()))),
                    Err(e) => error.set(Some(format!("Network error: {}", e))),
                }
            });
            || ()
        });
    }

    let config = CheckoutConfig {
        staging_path: format!("{}/checkout/cache_checkout_data/", BACKEND),
        ..CheckoutConfig::default()
    };

    match (&*client_secret, &*error) {
        (_, Some(msg)) => html! { <p style="color:red;">{ msg.clone() }</p> },
        (None, None) => html! { <p>{ "Creating payment…" }</p> },
        (Some(secret), None) => html! {
            <CardCheckout
                publishable_key="pk_test_replace_me".to_string()
                client_secret={secret.clone()}
                csrf_token={String::new()}
                action="/checkout/success/"
                config={config}
            >
                <p>{ "Your order: Awesome T-shirt – $10.00" }</p>
            </CardCheckout>
        },
    }
}
