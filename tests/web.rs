//! Browser tests for the DOM side of the checkout.
//!
//! Run with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::js_sys::{Array, Function, Promise, Reflect};
use web_sys::{
    Document, Element, Event, EventInit, HtmlButtonElement, HtmlDocument, HtmlElement,
    HtmlInputElement,
};

use yew_stripe_checkout::attach::attach_checkout;
use yew_stripe_checkout::bindings::{new_stripe, JsCardElement};
use yew_stripe_checkout::config::CheckoutConfig;
use yew_stripe_checkout::dom::{
    clear_error_region, control_value, element_by_id, render_error, toggle_display, DomSurface,
};
use yew_stripe_checkout::orchestrator::CheckoutSurface;
use yew_stripe_checkout::page::{read_config, read_embedded, PageValues};
use yew_stripe_checkout::CheckoutError;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Append `html` inside a fresh container and return the container.
fn fixture(html: &str) -> Element {
    let document = document();
    let container = document.create_element("div").unwrap();
    container.set_inner_html(html);
    document.body().unwrap().append_child(&container).unwrap();
    container
}

#[wasm_bindgen_test]
fn reads_quoted_page_values() {
    let container = fixture(
        r#"<script id="id_stripe_public_key" type="application/json">"pk_test_abc"</script>
           <script id="id_client_secret" type="application/json">"pi_1_secret_2"</script>"#,
    );
    let values = PageValues::read(&document(), &CheckoutConfig::default()).unwrap();
    assert_eq!(values.public_key, "pk_test_abc");
    assert_eq!(values.client_secret.expose(), "pi_1_secret_2");
    container.remove();
}

#[wasm_bindgen_test]
fn missing_and_empty_page_values_are_errors() {
    assert!(matches!(
        read_embedded(&document(), "no-such-value"),
        Err(CheckoutError::MissingElement(id)) if id == "no-such-value"
    ));

    let container = fixture(r#"<script id="empty-value" type="application/json">""</script>"#);
    assert!(matches!(
        read_embedded(&document(), "empty-value"),
        Err(CheckoutError::EmptyPageValue(_))
    ));
    container.remove();
}

#[wasm_bindgen_test]
fn config_script_overrides_defaults() {
    let container = fixture(
        r#"<script id="id_checkout_config" type="application/json">{"loading_overlay": false}</script>"#,
    );
    let config = read_config(&document()).unwrap();
    assert!(!config.loading_overlay);
    assert_eq!(config.form_id, "payment-form");
    container.remove();
}

#[wasm_bindgen_test]
fn error_region_holds_exactly_one_message() {
    let container = fixture(r#"<div id="card-errors-test"></div>"#);
    let region: Element = element_by_id(&document(), "card-errors-test").unwrap();

    render_error(&document(), &region, "Your card number is incomplete.").unwrap();
    render_error(&document(), &region, "Your card's expiration date is in the past.").unwrap();

    assert_eq!(region.child_element_count(), 2);
    let alert = region.query_selector("[role=alert]").unwrap().unwrap();
    assert!(alert.query_selector("i.fas.fa-times").unwrap().is_some());
    assert_eq!(
        region.last_element_child().unwrap().text_content().unwrap(),
        "Your card's expiration date is in the past."
    );

    clear_error_region(&region);
    assert_eq!(region.child_element_count(), 0);
    assert_eq!(region.text_content().unwrap(), "");
    container.remove();
}

#[wasm_bindgen_test]
fn error_message_is_not_parsed_as_markup() {
    let container = fixture(r#"<div id="card-errors-markup"></div>"#);
    let region: Element = element_by_id(&document(), "card-errors-markup").unwrap();

    render_error(&document(), &region, "<b>bold</b>").unwrap();
    assert!(region.query_selector("b").unwrap().is_none());
    assert_eq!(region.last_element_child().unwrap().text_content().unwrap(), "<b>bold</b>");
    container.remove();
}

#[wasm_bindgen_test]
fn element_by_id_checks_the_type() {
    let container = fixture(r#"<div id="not-a-form"></div>"#);
    let result = element_by_id::<web_sys::HtmlFormElement>(&document(), "not-a-form");
    assert!(matches!(result, Err(CheckoutError::UnexpectedElement { .. })));
    container.remove();
}

#[wasm_bindgen_test]
fn toggle_display_flips_visibility() {
    let container = fixture(r#"<div id="overlay-test" style="display: none;"></div>"#);
    let overlay: HtmlElement = element_by_id(&document(), "overlay-test").unwrap();

    toggle_display(&overlay).unwrap();
    assert_eq!(overlay.style().get_property_value("display").unwrap(), "block");
    toggle_display(&overlay).unwrap();
    assert_eq!(overlay.style().get_property_value("display").unwrap(), "none");
    container.remove();
}

#[wasm_bindgen_test]
fn control_values_cover_inputs_selects_and_textareas() {
    let container = fixture(
        r#"<input name="full_name" value="  Ada ">
           <select name="country"><option value="GB" selected>United Kingdom</option></select>
           <textarea name="notes">ring twice</textarea>
           <div name="other"></div>"#,
    );
    let value = |name: &str| {
        let element = container
            .query_selector(&format!("[name=\"{}\"]", name))
            .unwrap()
            .unwrap();
        control_value(&element)
    };
    assert_eq!(value("full_name").as_deref(), Some("  Ada "));
    assert_eq!(value("country").as_deref(), Some("GB"));
    assert_eq!(value("notes").as_deref(), Some("ring twice"));
    assert_eq!(value("other"), None);
    container.remove();
}

/// A stand-in for Stripe.js that records card calls in `window.__stripeCalls`.
/// `fetch` never settles, so a submit attempt stays parked at staging.
const STRIPE_STUB: &str = r#"
    window.__stripeCalls = [];
    var record = function (name) {
        return function (arg) {
            window.__stripeCalls.push(arg === undefined ? name : name + ':' + JSON.stringify(arg));
        };
    };
    window.Stripe = function () {
        return {
            elements: function () {
                return {
                    create: function () {
                        return {
                            mount: record('mount'),
                            unmount: record('unmount'),
                            update: record('update'),
                            on: function () {},
                            off: function () {}
                        };
                    }
                };
            },
            confirmCardPayment: function () { return new Promise(function () {}); }
        };
    };
    window.fetch = function () { return new Promise(function () {}); };
"#;

const CHECKOUT_FORM: &str = r#"
    <form id="payment-form" action="/checkout/" method="POST">
        <input type="hidden" name="csrfmiddlewaretoken" value="input-token">
        <input name="full_name" value=" Ada Lovelace ">
        <select name="country">
            <option value="US">United States</option>
            <option value="GB" selected>United Kingdom</option>
        </select>
        <input type="checkbox" id="id-save-info" checked>
        <div id="card-element"></div>
        <div id="card-errors"></div>
        <button id="submit-button" type="submit">Complete Order</button>
    </form>
    <div id="loading-overlay" style="display: none;"></div>
"#;

fn install_stripe_stub() {
    Function::new_no_args(STRIPE_STUB).call0(&JsValue::NULL).unwrap();
}

fn stripe_calls() -> Vec<String> {
    let window = web_sys::window().unwrap();
    let calls = Reflect::get(&window, &JsValue::from_str("__stripeCalls")).unwrap();
    Array::from(&calls).iter().filter_map(|call| call.as_string()).collect()
}

fn stub_card() -> JsCardElement {
    new_stripe("pk_test_stub")
        .unwrap()
        .elements()
        .unwrap()
        .create_element("card", JsValue::UNDEFINED)
        .unwrap()
}

/// Let spawned futures and queued callbacks run.
async fn next_tick() {
    let promise = Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 0)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn page_values() -> PageValues {
    PageValues::new("pk_test_stub", "pi_1_secret_2")
}

#[wasm_bindgen_test]
async fn submit_is_cancelled_at_once_and_locks_the_form() {
    install_stripe_stub();
    let container = fixture(CHECKOUT_FORM);
    let handle = attach_checkout(&document(), &CheckoutConfig::default(), page_values()).unwrap();
    assert!(stripe_calls().contains(&r##"mount:"#card-element""##.to_string()));

    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let event = Event::new_with_event_init_dict("submit", &init).unwrap();
    let form: HtmlElement = element_by_id(&document(), "payment-form").unwrap();
    let dispatched = form.dispatch_event(&event).unwrap();

    assert!(event.default_prevented());
    assert!(!dispatched);

    next_tick().await;
    let button: HtmlButtonElement = element_by_id(&document(), "submit-button").unwrap();
    assert!(button.disabled());
    assert!(stripe_calls().contains(&r#"update:{"disabled":true}"#.to_string()));
    assert_eq!(form.style().get_property_value("display").unwrap(), "none");

    drop(handle);
    container.remove();
}

#[wasm_bindgen_test]
fn incomplete_form_leaves_no_card_mounted() {
    install_stripe_stub();
    let container = fixture(
        r#"<form id="payment-form"><div id="card-element"></div><div id="card-errors"></div></form>
           <div id="loading-overlay"></div>"#,
    );

    let result = attach_checkout(&document(), &CheckoutConfig::default(), page_values());
    assert!(matches!(result, Err(CheckoutError::MissingElement(ref id)) if id == "submit-button"));
    assert_eq!(stripe_calls().last().map(String::as_str), Some("unmount"));
    container.remove();
}

#[wasm_bindgen_test]
fn csrf_token_prefers_the_form_input_then_the_cookie() {
    install_stripe_stub();
    let container = fixture(CHECKOUT_FORM);
    let surface = DomSurface::bind(&document(), &CheckoutConfig::default(), stub_card()).unwrap();
    assert_eq!(surface.csrf_token().as_deref(), Some("input-token"));

    let html_document: HtmlDocument = document().dyn_into().unwrap();
    html_document.set_cookie("csrftoken=cookie-token; path=/").unwrap();
    let input: HtmlInputElement = container
        .query_selector("[name=csrfmiddlewaretoken]")
        .unwrap()
        .unwrap()
        .dyn_into()
        .unwrap();
    input.set_value("");
    assert_eq!(surface.csrf_token().as_deref(), Some("cookie-token"));

    html_document
        .set_cookie("csrftoken=; expires=Thu, 01 Jan 1970 00:00:00 GMT; path=/")
        .unwrap();
    container.remove();
}

#[wasm_bindgen_test]
fn surface_reads_live_checkbox_and_select_values() {
    install_stripe_stub();
    let container = fixture(CHECKOUT_FORM);
    let surface = DomSurface::bind(&document(), &CheckoutConfig::default(), stub_card()).unwrap();
    let checkbox: HtmlInputElement = element_by_id(&document(), "id-save-info").unwrap();

    assert!(surface.save_info());
    checkbox.set_checked(false);
    assert!(!surface.save_info());
    checkbox.set_checked(true);
    assert!(surface.save_info());

    let fields = surface.fields();
    assert_eq!(fields.country, "GB");
    assert_eq!(fields.full_name, "Ada Lovelace");
    assert_eq!(fields.email, "");

    surface.set_inputs_enabled(false);
    let button: HtmlButtonElement = element_by_id(&document(), "submit-button").unwrap();
    assert!(button.disabled());
    surface.set_inputs_enabled(true);
    assert!(!button.disabled());
    container.remove();
}

