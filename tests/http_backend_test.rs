use inline_checkout::domain::payload::{CreateIntentPayload, UpdateIntentPayload};
use inline_checkout::domain::ports::CheckoutBackend;
use inline_checkout::error::CheckoutError;
use inline_checkout::infrastructure::http::HttpBackend;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COOKIES: &str = "sessionid=s1; csrftoken=tok123";

fn backend(server: &MockServer) -> HttpBackend {
    let origin = Url::parse(&server.uri()).unwrap();
    HttpBackend::new(origin, Some(COOKIES.to_string()))
}

#[tokio::test]
async fn test_create_intent_sends_headers_and_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders/payments/create-intent/"))
        .and(header("X-CSRFToken", "tok123"))
        .and(header("Accept", "application/json"))
        .and(header("Cookie", COOKIES))
        .and(body_json(json!({
            "guest_email": "ada@example.com",
            "shipping_country": "GB"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "client_secret": "pi_1_secret_a",
            "payment_intent_id": "pi_1",
            "order_id": 12
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = CreateIntentPayload {
        guest_email: Some("ada@example.com".to_string()),
        shipping_country: Some("GB".to_string()),
        ..CreateIntentPayload::default()
    };
    let response = backend(&server)
        .create_intent("/orders/payments/create-intent/", &payload)
        .await
        .unwrap();

    assert_eq!(response.client_secret(), Some("pi_1_secret_a"));
    assert_eq!(response.payment_intent_id(), Some("pi_1"));
}

#[tokio::test]
async fn test_create_intent_error_keeps_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Cart empty"))
        .mount(&server)
        .await;

    let result = backend(&server)
        .create_intent("/create", &CreateIntentPayload::default())
        .await;

    match result {
        Err(CheckoutError::Backend { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "Cart empty");
        }
        other => panic!("expected backend error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_create_intent_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/create"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = backend(&server)
        .create_intent("/create", &CreateIntentPayload::default())
        .await;

    assert!(matches!(result, Err(CheckoutError::Json(_))));
}

#[tokio::test]
async fn test_update_intent_posts_pi_and_email() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders/payments/update-intent/"))
        .and(header("X-CSRFToken", "tok123"))
        .and(body_json(json!({ "pi_id": "pi_1", "guest_email": "ada@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server)
        .await;

    let update = UpdateIntentPayload {
        pi_id: "pi_1".to_string(),
        guest_email: "ada@example.com".to_string(),
    };
    backend(&server)
        .update_intent("/orders/payments/update-intent/", &update)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_intent_rejection_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update"))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("Missing pi_id or guest_email"),
        )
        .mount(&server)
        .await;

    let update = UpdateIntentPayload {
        pi_id: String::new(),
        guest_email: String::new(),
    };
    let result = backend(&server).update_intent("/update", &update).await;

    assert!(matches!(
        result,
        Err(CheckoutError::Backend { status: 400, .. })
    ));
}
