//! Browser implementation of [`CheckoutSurface`].

use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlButtonElement, HtmlDocument, HtmlElement, HtmlFormElement,
    HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement,
};

use crate::bindings::JsCardElement;
use crate::client::set_card_disabled;
use crate::config::CheckoutConfig;
use crate::details::CheckoutFields;
use crate::error::CheckoutError;
use crate::orchestrator::CheckoutSurface;

/// Name of the hidden input Django's `{% csrf_token %}` renders.
pub const CSRF_FORM_FIELD: &str = "csrfmiddlewaretoken";

/// Cookie Django stores the CSRF token in.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// Look up `id` and cast it to `T`.
pub fn element_by_id<T: JsCast>(document: &Document, id: &str) -> Result<T, CheckoutError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| CheckoutError::MissingElement(id.to_owned()))?
        .dyn_into::<T>()
        .map_err(|_| CheckoutError::UnexpectedElement {
            id: id.to_owned(),
            expected: std::any::type_name::<T>().rsplit("::").next().unwrap_or("element"),
        })
}

/// Replace the contents of `region` with an alert icon and `message`.
///
/// The message goes in as text, never as markup.
pub fn render_error(document: &Document, region: &Element, message: &str) -> Result<(), CheckoutError> {
    region.set_text_content(None);

    let icon = document.create_element("span")?;
    icon.set_class_name("icon");
    icon.set_attribute("role", "alert")?;
    let glyph = document.create_element("i")?;
    glyph.set_class_name("fas fa-times");
    icon.append_child(&glyph)?;

    let text = document.create_element("span")?;
    text.set_text_content(Some(message));

    region.append_child(&icon)?;
    region.append_child(&text)?;
    Ok(())
}

pub fn clear_error_region(region: &Element) {
    region.set_text_content(Some(""));
}

/// Show a hidden element or hide a shown one, like jQuery's `fadeToggle` minus the fade.
pub fn toggle_display(element: &HtmlElement) -> Result<(), CheckoutError> {
    let hidden = match web_sys::window().and_then(|w| w.get_computed_style(element).ok().flatten()) {
        Some(style) => style.get_property_value("display")? == "none",
        None => element.style().get_property_value("display")? == "none",
    };
    element
        .style()
        .set_property("display", if hidden { "block" } else { "none" })?;
    Ok(())
}

/// Value of an input, select or textarea.
pub fn control_value(element: &Element) -> Option<String> {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        Some(input.value())
    } else if let Some(select) = element.dyn_ref::<HtmlSelectElement>() {
        Some(select.value())
    } else {
        element.dyn_ref::<HtmlTextAreaElement>().map(HtmlTextAreaElement::value)
    }
}

/// Parse `name` out of a `document.cookie` string.
pub fn parse_cookie_value(cookie_str: &str, name: &str) -> Option<String> {
    cookie_str.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim().to_owned())
    })
}

/// The checkout page as the orchestrator sees it.
pub struct DomSurface {
    document: Document,
    form: HtmlFormElement,
    card: JsCardElement,
    submit_button: HtmlButtonElement,
    error_region: Element,
    save_info: Option<HtmlInputElement>,
    overlay: Option<HtmlElement>,
}

impl DomSurface {
    /// Resolve every element of the DOM contract.
    ///
    /// The save-info checkbox is optional (reads as unchecked when absent); the
    /// overlay is only required when `loading_overlay` is on.
    pub fn bind(
        document: &Document,
        config: &CheckoutConfig,
        card: JsCardElement,
    ) -> Result<Self, CheckoutError> {
        let save_info = match element_by_id::<HtmlInputElement>(document, &config.save_info_id) {
            Ok(input) => Some(input),
            Err(CheckoutError::MissingElement(id)) => {
                log::debug!("no save-info checkbox `{}`; sending save_info=false", id);
                None
            }
            Err(err) => return Err(err),
        };
        let overlay = if config.loading_overlay {
            Some(element_by_id::<HtmlElement>(document, &config.overlay_id)?)
        } else {
            None
        };

        Ok(DomSurface {
            document: document.clone(),
            form: element_by_id(document, &config.form_id)?,
            card,
            submit_button: element_by_id(document, &config.submit_button_id)?,
            error_region: element_by_id(document, &config.error_region_id)?,
            save_info,
            overlay,
        })
    }

    pub fn form(&self) -> &HtmlFormElement {
        &self.form
    }

    fn named_value(&self, name: &str) -> Option<String> {
        let selector = format!("[name=\"{}\"]", name);
        let element = self.form.query_selector(&selector).ok()??;
        control_value(&element)
    }

    fn csrf_from_cookie(&self) -> Option<String> {
        let cookie = self.document.dyn_ref::<HtmlDocument>()?.cookie().ok()?;
        parse_cookie_value(&cookie, CSRF_COOKIE_NAME)
    }
}

impl CheckoutSurface for DomSurface {
    fn set_inputs_enabled(&self, enabled: bool) {
        if let Err(err) = set_card_disabled(&self.card, !enabled) {
            log::error!("could not update the card element: {}", err);
        }
        self.submit_button.set_disabled(!enabled);
    }

    fn toggle_overlay(&self) {
        let Some(overlay) = &self.overlay else {
            return;
        };
        let form: &HtmlElement = &self.form;
        for element in [form, overlay] {
            if let Err(err) = toggle_display(element) {
                log::error!("could not toggle the loading overlay: {}", err);
            }
        }
    }

    fn show_error(&self, message: &str) {
        if let Err(err) = render_error(&self.document, &self.error_region, message) {
            log::error!("could not render card error {:?}: {}", message, err);
        }
    }

    fn clear_error(&self) {
        clear_error_region(&self.error_region);
    }

    fn save_info(&self) -> bool {
        self.save_info.as_ref().is_some_and(HtmlInputElement::checked)
    }

    fn csrf_token(&self) -> Option<String> {
        self.named_value(CSRF_FORM_FIELD)
            .filter(|token| !token.is_empty())
            .or_else(|| self.csrf_from_cookie())
    }

    fn fields(&self) -> CheckoutFields {
        CheckoutFields::from_lookup(|name| self.named_value(name))
    }

    fn submit_form(&self) -> Result<(), CheckoutError> {
        // `submit()` skips the submit event, so our interceptor does not run again.
        self.form.submit()?;
        Ok(())
    }

    fn reload(&self) {
        let reloaded = web_sys::window()
            .ok_or_else(|| CheckoutError::Js("no window".into()))
            .and_then(|window| window.location().reload().map_err(CheckoutError::from));
        if let Err(err) = reloaded {
            log::error!("could not reload the page: {}", err);
        }
    }
}
