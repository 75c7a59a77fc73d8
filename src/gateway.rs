//! Browser implementation of [`PaymentGateway`]: a gloo-net staging POST and
//! Stripe's `confirmCardPayment`.

use async_trait::async_trait;
use gloo_net::http::Request;

use crate::bindings::{JsCardElement, JsStripe};
use crate::client::{confirm_card_payment, PaymentResult};
use crate::details::{ConfirmCardPaymentData, StagingPayload};
use crate::error::CheckoutError;
use crate::orchestrator::PaymentGateway;
use crate::page::ClientSecret;

/// Header Django reads the CSRF token from on AJAX requests.
pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";

pub struct StripeGateway {
    stripe: JsStripe,
    card: JsCardElement,
    staging_url: String,
}

impl StripeGateway {
    pub fn new(stripe: JsStripe, card: JsCardElement, staging_url: impl Into<String>) -> Self {
        StripeGateway {
            stripe,
            card,
            staging_url: staging_url.into(),
        }
    }
}

#[async_trait(?Send)]
impl PaymentGateway for StripeGateway {
    async fn stage(&self, payload: &StagingPayload) -> Result<(), CheckoutError> {
        let mut request = Request::post(&self.staging_url)
            .header("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
            .header("X-Requested-With", "XMLHttpRequest");
        if !payload.csrfmiddlewaretoken.is_empty() {
            request = request.header(CSRF_HEADER_NAME, &payload.csrfmiddlewaretoken);
        }

        let response = request.body(payload.to_form_body()?)?.send().await?;
        if response.ok() {
            log::debug!("staging accepted ({})", response.status());
            Ok(())
        } else {
            Err(CheckoutError::Staging {
                status: response.status(),
            })
        }
    }

    async fn confirm(
        &self,
        client_secret: &ClientSecret,
        data: &ConfirmCardPaymentData,
    ) -> PaymentResult {
        confirm_card_payment(&self.stripe, &self.card, client_secret.expose(), data).await
    }
}
