//! Values the server embeds in the checkout page.
//!
//! Django renders them with `json_script`, e.g.
//! `<script id="id_client_secret" type="application/json">"pi_…_secret_…"</script>`,
//! so the text of each element is a quoted JSON string.

use std::fmt;

use serde::Serialize;
use web_sys::Document;

use crate::config::{CheckoutConfig, CONFIG_SCRIPT_ID};
use crate::error::CheckoutError;

/// Opaque token tying this page to a pending PaymentIntent.
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        ClientSecret(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(..)")
    }
}

/// Publishable key and session secret read at page load.
#[derive(Clone, Debug, PartialEq)]
pub struct PageValues {
    pub public_key: String,
    pub client_secret: ClientSecret,
}

impl PageValues {
    pub fn new(public_key: impl Into<String>, client_secret: impl Into<String>) -> Self {
        PageValues {
            public_key: public_key.into(),
            client_secret: ClientSecret::new(client_secret),
        }
    }

    pub fn read(document: &Document, config: &CheckoutConfig) -> Result<Self, CheckoutError> {
        Ok(PageValues {
            public_key: read_embedded(document, &config.public_key_id)?,
            client_secret: ClientSecret::new(read_embedded(document, &config.client_secret_id)?),
        })
    }
}

/// Strip one leading and one trailing `"` when present.
pub fn unwrap_quoted(raw: &str) -> &str {
    let rest = raw.strip_prefix('"').unwrap_or(raw);
    rest.strip_suffix('"').unwrap_or(rest)
}

/// Decode an embedded value: a JSON string literal if it parses as one,
/// otherwise the quote-stripped text.
pub fn decode_embedded(raw: &str) -> String {
    let trimmed = raw.trim();
    serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| unwrap_quoted(trimmed).to_owned())
}

/// Read and decode the text of the element with `id`.
pub fn read_embedded(document: &Document, id: &str) -> Result<String, CheckoutError> {
    let element = document
        .get_element_by_id(id)
        .ok_or_else(|| CheckoutError::MissingElement(id.to_owned()))?;
    let value = decode_embedded(&element.text_content().unwrap_or_default());
    if value.is_empty() {
        return Err(CheckoutError::EmptyPageValue(id.to_owned()));
    }
    Ok(value)
}

/// Configuration from the optional `id_checkout_config` script, else defaults.
pub fn read_config(document: &Document) -> Result<CheckoutConfig, CheckoutError> {
    let config = match document.get_element_by_id(CONFIG_SCRIPT_ID) {
        Some(script) => CheckoutConfig::from_json(&script.text_content().unwrap_or_default())?,
        None => CheckoutConfig::default(),
    };
    config.validate()?;
    Ok(config)
}
