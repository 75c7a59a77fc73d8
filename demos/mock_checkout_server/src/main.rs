//! Local stand-in for the checkout backend.
//!
//! * `POST /create-payment-intent` creates a test PaymentIntent and returns its client secret.
//! * `POST /checkout/cache_checkout_data/` takes the staged form body and
//!   records `save_info` as PaymentIntent metadata, answering 200 or 400.
use std::{env, io::Read};

use serde::Deserialize;
use serde_json::json;
use tiny_http::{Header, Method, Request, Response, Server};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const STRIPE_API: &str = "https://api.stripe.com/v1/payment_intents";

#[derive(Deserialize)]
struct StripePI {
    client_secret: String,
}

/// Form body posted by the checkout before confirming the card.
#[derive(Deserialize)]
struct StagedCheckout {
    client_secret: String,
    #[serde(default)]
    save_info: String,
    #[serde(default)]
    csrfmiddlewaretoken: String,
}

/// The PaymentIntent id is the client secret up to `_secret`.
fn payment_intent_id(client_secret: &str) -> Option<&str> {
    client_secret
        .split_once("_secret")
        .map(|(pid, _)| pid)
        .filter(|pid| !pid.is_empty())
}

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name, value).expect("header names and values are ASCII literals")
}

fn cors_headers() -> Vec<Header> {
    vec![
        header("Access-Control-Allow-Origin", "*"),
        header("Access-Control-Allow-Methods", "POST, OPTIONS"),
        header(
            "Access-Control-Allow-Headers",
            "Content-Type, X-CSRFToken, X-Requested-With",
        ),
    ]
}

fn respond<R: Read>(request: Request, mut resp: Response<R>) -> Result<(), BoxError> {
    for h in cors_headers() {
        resp.add_header(h);
    }
    request.respond(resp)?;
    Ok(())
}

fn create_payment_intent(client: &reqwest::blocking::Client, secret_key: &str) -> Result<String, BoxError> {
    let pi = client
        .post(STRIPE_API)
        .basic_auth(secret_key, Some(""))
        .form(&[("amount", "1000"), ("currency", "usd")])
        .send()?
        .error_for_status()?
        .json::<StripePI>()?;
    Ok(json!({ "client_secret": pi.client_secret }).to_string())
}

fn cache_checkout_data(
    client: &reqwest::blocking::Client,
    secret_key: &str,
    body: &str,
) -> Result<(), BoxError> {
    let staged: StagedCheckout = serde_urlencoded::from_str(body)?;
    let pid = payment_intent_id(&staged.client_secret).ok_or("malformed client_secret")?;
    if staged.csrfmiddlewaretoken.is_empty() {
        println!("warning: staged without a CSRF token");
    }
    client
        .post(format!("{}/{}", STRIPE_API, pid))
        .basic_auth(secret_key, Some(""))
        .form(&[("metadata[save_info]", staged.save_info.as_str())])
        .send()?
        .error_for_status()?;
    println!("staged {} (save_info={})", pid, staged.save_info);
    Ok(())
}

fn main() -> Result<(), BoxError> {
    let secret_key =
        env::var("STRIPE_SECRET_KEY").map_err(|_| "Set STRIPE_SECRET_KEY in your environment")?;

    let port = env::var("MOCK_STRIPE_SERVER_PORT").unwrap_or_else(|_| "2718".to_string());
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr)?;
    let client = reqwest::blocking::Client::new();
    println!("Running on http://{}", addr);

    for mut request in server.incoming_requests() {
        if request.method() == &Method::Options {
            respond(request, Response::empty(204))?;
            continue;
        }

        match (request.method().clone(), request.url().to_string().as_str()) {
            (Method::Post, "/create-payment-intent") => {
                match create_payment_intent(&client, &secret_key) {
                    Ok(body) => respond(
                        request,
                        Response::from_string(body)
                            .with_header(header("Content-Type", "application/json")),
                    )?,
                    Err(err) => respond(
                        request,
                        Response::from_string(err.to_string()).with_status_code(502),
                    )?,
                }
            }

            (Method::Post, "/checkout/cache_checkout_data/") => {
                let mut body = String::new();
                request.as_reader().read_to_string(&mut body)?;
                match cache_checkout_data(&client, &secret_key, &body) {
                    Ok(()) => respond(request, Response::empty(200))?,
                    Err(err) => {
                        println!("staging failed: {}", err);
                        respond(
                            request,
                            Response::from_string(err.to_string()).with_status_code(400),
                        )?
                    }
                }
            }

            _ => respond(request, Response::from_string("Not Found").with_status_code(404))?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_intent_id_is_prefix_before_secret() {
        assert_eq!(payment_intent_id("pi_123_secret_abc"), Some("pi_123"));
        assert_eq!(payment_intent_id("no-marker"), None);
        assert_eq!(payment_intent_id("_secret_abc"), None);
    }

    #[test]
    fn staged_body_parses() {
        let staged: StagedCheckout = serde_urlencoded::from_str(
            "csrfmiddlewaretoken=tok%2Ben&client_secret=pi_1_secret_2&save_info=true",
        )
        .unwrap();
        assert_eq!(staged.csrfmiddlewaretoken, "tok+en");
        assert_eq!(staged.save_info, "true");
        assert_eq!(payment_intent_id(&staged.client_secret), Some("pi_1"));
    }
}
