//! Per-attempt snapshots of the checkout form and the payloads built from them.

use serde::Serialize;

use crate::error::CheckoutError;
use crate::page::ClientSecret;

/// Trimmed copies of the billing/shipping inputs, taken once per submit attempt.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckoutFields {
    pub full_name: String,
    pub phone_number: String,
    pub email: String,
    pub street_address1: String,
    pub street_address2: String,
    pub town_or_city: String,
    pub country: String,
    pub county: String,
    pub postcode: String,
}

impl CheckoutFields {
    /// Names of the form inputs the snapshot reads.
    pub const NAMES: [&'static str; 9] = [
        "full_name",
        "phone_number",
        "email",
        "street_address1",
        "street_address2",
        "town_or_city",
        "country",
        "county",
        "postcode",
    ];

    /// Build a snapshot from a name → value lookup. Missing inputs read as empty.
    pub fn from_lookup(mut lookup: impl FnMut(&str) -> Option<String>) -> Self {
        let mut read = |name: &str| lookup(name).map(|v| v.trim().to_owned()).unwrap_or_default();
        CheckoutFields {
            full_name: read("full_name"),
            phone_number: read("phone_number"),
            email: read("email"),
            street_address1: read("street_address1"),
            street_address2: read("street_address2"),
            town_or_city: read("town_or_city"),
            country: read("country"),
            county: read("county"),
            postcode: read("postcode"),
        }
    }

    /// Billing details for `payment_method.billing_details`.
    ///
    /// The postal code is left out: the card element collects it and Stripe
    /// would override ours anyway.
    pub fn billing_details(&self) -> BillingDetails {
        BillingDetails {
            name: self.full_name.clone(),
            phone: self.phone_number.clone(),
            email: self.email.clone(),
            address: self.address(None),
        }
    }

    pub fn shipping_details(&self) -> ShippingDetails {
        ShippingDetails {
            name: self.full_name.clone(),
            phone: self.phone_number.clone(),
            address: self.address(Some(self.postcode.clone())),
        }
    }

    fn address(&self, postal_code: Option<String>) -> Address {
        Address {
            line1: self.street_address1.clone(),
            line2: self.street_address2.clone(),
            city: self.town_or_city.clone(),
            country: self.country.clone(),
            postal_code,
            state: self.county.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Address {
    pub line1: String,
    pub line2: String,
    pub city: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub state: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BillingDetails {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShippingDetails {
    pub name: String,
    pub phone: String,
    pub address: Address,
}

/// `payment_method` of `confirmCardPayment`; the card handle is attached in JS.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PaymentMethodData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_details: Option<BillingDetails>,
}

/// Second argument of `stripe.confirmCardPayment(clientSecret, data)`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConfirmCardPaymentData {
    pub payment_method: PaymentMethodData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping: Option<ShippingDetails>,
}

impl ConfirmCardPaymentData {
    /// Card only, as the earliest checkout page sent it.
    pub fn card_only() -> Self {
        Self::default()
    }

    pub fn with_details(fields: &CheckoutFields) -> Self {
        ConfirmCardPaymentData {
            payment_method: PaymentMethodData {
                billing_details: Some(fields.billing_details()),
            },
            shipping: Some(fields.shipping_details()),
        }
    }
}

/// Body of the staging POST.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StagingPayload {
    pub csrfmiddlewaretoken: String,
    pub client_secret: ClientSecret,
    pub save_info: bool,
}

impl StagingPayload {
    /// `application/x-www-form-urlencoded` encoding, field order preserved.
    pub fn to_form_body(&self) -> Result<String, CheckoutError> {
        Ok(serde_urlencoded::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    #[fixture]
    fn fields() -> CheckoutFields {
        let values: HashMap<&str, &str> = [
            ("full_name", "  Ada Lovelace "),
            ("phone_number", "\t0123 456\n"),
            ("email", "ada@example.com "),
            ("street_address1", " 12 Analytical Way"),
            ("street_address2", "   "),
            ("town_or_city", "London"),
            ("country", "GB"),
            ("county", " Greater London "),
            ("postcode", " N1 9GU "),
        ]
        .into_iter()
        .collect();
        CheckoutFields::from_lookup(|name| values.get(name).map(|v| v.to_string()))
    }

    #[rstest]
    fn snapshot_trims_every_value(fields: CheckoutFields) {
        assert_eq!(fields.full_name, "Ada Lovelace");
        assert_eq!(fields.phone_number, "0123 456");
        assert_eq!(fields.street_address2, "");
        assert_eq!(fields.county, "Greater London");
        assert_eq!(fields.postcode, "N1 9GU");
    }

    #[rstest]
    fn missing_inputs_read_as_empty() {
        let fields = CheckoutFields::from_lookup(|name| (name == "email").then(|| "x@y.z".to_string()));
        assert_eq!(fields.email, "x@y.z");
        assert_eq!(fields.full_name, "");
        assert_eq!(fields.postcode, "");
    }

    #[rstest]
    fn postal_code_is_shipping_only(fields: CheckoutFields) {
        let json = serde_json::to_value(ConfirmCardPaymentData::with_details(&fields)).unwrap();
        let billing = &json["payment_method"]["billing_details"];
        assert_eq!(billing["name"], "Ada Lovelace");
        assert_eq!(billing["email"], "ada@example.com");
        assert_eq!(billing["address"]["state"], "Greater London");
        assert!(billing["address"].get("postal_code").is_none());

        let shipping = &json["shipping"];
        assert_eq!(shipping["address"]["postal_code"], "N1 9GU");
        assert_eq!(shipping["address"]["city"], "London");
        assert!(shipping.get("email").is_none());
    }

    #[rstest]
    fn card_only_data_carries_no_details() {
        let json = serde_json::to_value(ConfirmCardPaymentData::card_only()).unwrap();
        assert_eq!(json, serde_json::json!({ "payment_method": {} }));
    }

    #[rstest]
    #[case(true, "csrfmiddlewaretoken=tok%2Ben&client_secret=pi_1_secret_2&save_info=true")]
    #[case(false, "csrfmiddlewaretoken=tok%2Ben&client_secret=pi_1_secret_2&save_info=false")]
    fn staging_body_is_form_encoded(#[case] save_info: bool, #[case] expected: &str) {
        let payload = StagingPayload {
            csrfmiddlewaretoken: "tok+en".into(),
            client_secret: ClientSecret::new("pi_1_secret_2"),
            save_info,
        };
        assert_eq!(payload.to_form_body().unwrap(), expected);
    }
}
