//! Page-load initialization: mount the card, bind the page and wire the listeners.

use std::rc::Rc;

use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Event};

use crate::bindings::JsCardElement;
use crate::client::{mount_card_element, off_card_change, on_card_change, unmount_card_element};
use crate::config::CheckoutConfig;
use crate::dom::DomSurface;
use crate::error::CheckoutError;
use crate::gateway::StripeGateway;
use crate::logging;
use crate::orchestrator::{Orchestrator, SubmitOptions};
use crate::page::{read_config, PageValues};

pub type PageOrchestrator = Orchestrator<DomSurface, StripeGateway>;

/// A wired checkout. Dropping it removes both listeners and unmounts the card; call
/// [`CheckoutHandle::forget`] to keep them for the life of the page.
pub struct CheckoutHandle {
    orchestrator: Rc<PageOrchestrator>,
    card: JsCardElement,
    on_change: Option<Closure<dyn FnMut(JsValue)>>,
    on_submit: Option<Closure<dyn FnMut(Event)>>,
}

impl CheckoutHandle {
    /// Leak the listeners so they outlive this handle.
    pub fn forget(mut self) {
        if let Some(closure) = self.on_change.take() {
            closure.forget();
        }
        if let Some(closure) = self.on_submit.take() {
            closure.forget();
        }
    }
}

impl Drop for CheckoutHandle {
    fn drop(&mut self) {
        let state = self.orchestrator.state();
        if state.is_in_flight() {
            log::warn!("checkout detached while a payment attempt is {:?}", state);
        }
        if let Some(closure) = self.on_change.take() {
            off_card_change(&self.card, &closure);
        }
        // A forgotten handle has no listeners left and keeps the card mounted.
        if let Some(closure) = self.on_submit.take() {
            let form = self.orchestrator.surface().form();
            if let Err(err) =
                form.remove_event_listener_with_callback("submit", closure.as_ref().unchecked_ref())
            {
                log::warn!("could not detach the submit listener: {:?}", err);
            }
            if let Err(err) = unmount_card_element(&self.card) {
                log::warn!("could not unmount the card element: {}", err);
            }
        }
    }
}

/// Wire a checkout into `document` with already-known page values.
pub fn attach_checkout(
    document: &Document,
    config: &CheckoutConfig,
    values: PageValues,
) -> Result<CheckoutHandle, CheckoutError> {
    config.validate()?;

    let (stripe, card) =
        mount_card_element(&values.public_key, &config.card_style, &config.card_selector())?;
    let surface = match DomSurface::bind(document, config, card.clone()) {
        Ok(surface) => surface,
        Err(err) => {
            // Without the rest of the form nothing would intercept submit.
            if let Err(unmount_err) = unmount_card_element(&card) {
                log::warn!("could not unmount the card element: {}", unmount_err);
            }
            return Err(err);
        }
    };
    let gateway = StripeGateway::new(stripe, card.clone(), config.staging_path.clone());
    let orchestrator = Rc::new(Orchestrator::new(
        surface,
        gateway,
        values.client_secret,
        SubmitOptions::from(config),
    ));

    let on_change = {
        let orchestrator = orchestrator.clone();
        on_card_change(&card, move |change| orchestrator.on_card_change(&change))
    };

    let on_submit = {
        let orchestrator = orchestrator.clone();
        Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            let orchestrator = orchestrator.clone();
            spawn_local(async move {
                orchestrator.submit().await;
            });
        }) as Box<dyn FnMut(Event)>)
    };
    orchestrator
        .surface()
        .form()
        .add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;

    log::info!("checkout attached to #{}", config.form_id);
    Ok(CheckoutHandle {
        orchestrator,
        card,
        on_change: Some(on_change),
        on_submit: Some(on_submit),
    })
}

/// Entry point for server-rendered pages: read config and page values from
/// the document, install logging and wire everything up.
pub fn attach_page_checkout() -> Result<CheckoutHandle, CheckoutError> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| CheckoutError::Js("no document".into()))?;
    let config = read_config(&document)?;
    logging::init(config.log_level);
    let values = PageValues::read(&document, &config)?;
    attach_checkout(&document, &config, values)
}
