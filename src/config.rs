//! Checkout configuration.
//!
//! Every field has a default matching the stock Django checkout template, so
//! an empty JSON object (or no config script at all) reproduces it.

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::client::CardStyle;
use crate::error::CheckoutError;

/// Id of the optional `<script type="application/json">` holding overrides.
pub const CONFIG_SCRIPT_ID: &str = "id_checkout_config";

pub const DEFAULT_STAGING_PATH: &str = "/checkout/cache_checkout_data/";

/// What to do when confirmation resolves with a status other than `succeeded`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnexpectedStatusPolicy {
    /// Show the status as an error and re-arm the form.
    #[default]
    TreatAsError,
    /// Leave the form locked and do nothing.
    Ignore,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckoutConfig {
    pub public_key_id: String,
    pub client_secret_id: String,
    pub card_mount_id: String,
    pub error_region_id: String,
    pub form_id: String,
    pub save_info_id: String,
    pub submit_button_id: String,
    pub overlay_id: String,
    /// Endpoint that attaches metadata to the PaymentIntent before confirmation.
    pub staging_path: String,
    /// Fade the form out behind a loading overlay while a payment is in flight.
    pub loading_overlay: bool,
    /// Send trimmed billing and shipping details with the confirmation.
    pub send_billing_details: bool,
    pub unexpected_status: UnexpectedStatusPolicy,
    pub card_style: CardStyle,
    pub log_level: LevelFilter,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            public_key_id: "id_stripe_public_key".into(),
            client_secret_id: "id_client_secret".into(),
            card_mount_id: "card-element".into(),
            error_region_id: "card-errors".into(),
            form_id: "payment-form".into(),
            save_info_id: "id-save-info".into(),
            submit_button_id: "submit-button".into(),
            overlay_id: "loading-overlay".into(),
            staging_path: DEFAULT_STAGING_PATH.into(),
            loading_overlay: true,
            send_billing_details: true,
            unexpected_status: UnexpectedStatusPolicy::default(),
            card_style: CardStyle::default(),
            log_level: LevelFilter::Info,
        }
    }
}

impl CheckoutConfig {
    pub fn from_json(raw: &str) -> Result<Self, CheckoutError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw).map_err(|err| CheckoutError::Config(err.to_string()))
    }

    /// Selector for mounting the card element.
    pub fn card_selector(&self) -> String {
        format!("#{}", self.card_mount_id)
    }

    pub fn validate(&self) -> Result<(), CheckoutError> {
        let ids = [
            ("public_key_id", &self.public_key_id),
            ("client_secret_id", &self.client_secret_id),
            ("card_mount_id", &self.card_mount_id),
            ("error_region_id", &self.error_region_id),
            ("form_id", &self.form_id),
            ("save_info_id", &self.save_info_id),
            ("submit_button_id", &self.submit_button_id),
            ("overlay_id", &self.overlay_id),
        ];
        for (name, value) in ids {
            if value.trim().is_empty() {
                return Err(CheckoutError::Config(format!("`{}` must not be empty", name)));
            }
            if value.chars().any(char::is_whitespace) {
                return Err(CheckoutError::Config(format!(
                    "`{}` must be a single element id, got {:?}",
                    name, value
                )));
            }
        }

        let path = &self.staging_path;
        if !(path.starts_with('/') || path.starts_with("https://") || path.starts_with("http://")) {
            return Err(CheckoutError::Config(format!(
                "`staging_path` must be absolute, got {:?}",
                path
            )));
        }
        Ok(())
    }
}
