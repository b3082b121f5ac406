// HTTP contract of the payment API
//
// Success bodies are `{"success": true, "data": ...}`, failures
// `{"success": false, "error": "..."}`.

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use actix_web::{test, web, App};
use guestpay::middleware::{json_error_handler, not_found, RequestId};
use guestpay::payments::{CardLookupService, PaymentOrchestrator};
use guestpay::transactions::{InMemoryTransactionStore, TransactionStore};
use helpers::*;
use serde_json::{json, Value};

macro_rules! app {
    ($gateway:expr, $store:expr) => {{
        let gateway = $gateway;
        let store: Arc<dyn TransactionStore> = $store;
        let orchestrator = Arc::new(PaymentOrchestrator::new(
            gateway.clone(),
            store.clone(),
            test_credentials(),
            test_payment_config(),
        ));
        let lookup = Arc::new(CardLookupService::new(gateway, store.clone()));

        test::init_service(
            App::new()
                .wrap(RequestId)
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(orchestrator))
                .app_data(web::Data::new(lookup))
                .app_data(web::Data::new(store))
                .configure(guestpay::routes)
                .default_service(web::route().to(not_found)),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_post_payment_success() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/payment")
        .set_json(payment_payload("600"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 200);
    assert!(resp.headers().contains_key("x-request-id"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["transactionID"], TEST_TRANSACTION_ID);
    assert_eq!(body["data"]["responseCode"], "0");
    assert_eq!(body["data"]["authCode"], "731357");
    assert_eq!(body["data"]["paymentCardNumber"], "411111XXXXXX1111");
    assert_eq!(body["data"]["cardToken"], TEST_CARD_TOKEN);
}

#[actix_web::test]
async fn test_post_payment_declined() {
    let gateway = Arc::new(
        ScriptedGateway::approving().with_charge(Reply::Decline("1", "Transaction declined")),
    );
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/payment")
        .set_json(payment_payload("600"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Transaction declined");
}

#[actix_web::test]
async fn test_post_payment_validation_error() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway.clone(), Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/payment")
        .set_json(payment_payload("0"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Payment amount must be greater than 0");
    assert_eq!(gateway.total_calls(), 0);
}

#[actix_web::test]
async fn test_post_payment_malformed_body() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway.clone(), Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/payment")
        .set_json(json!({ "amount": "600" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(gateway.total_calls(), 0);
}

#[actix_web::test]
async fn test_post_payment_gateway_unreachable() {
    let gateway = Arc::new(ScriptedGateway::approving().with_charge(Reply::Unreachable));
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/payment")
        .set_json(payment_payload("600"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 503);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().contains("timeout"));
}

#[actix_web::test]
async fn test_post_payment_post_charge_failure_hides_details() {
    let gateway = Arc::new(ScriptedGateway::approving().with_tokenize(Reply::Protocol));
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/payment")
        .set_json(payment_payload("600"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(!body["error"].as_str().unwrap().contains(TEST_TRANSACTION_ID));
}

#[actix_web::test]
async fn test_get_payment_details() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let store = Arc::new(InMemoryTransactionStore::new());
    let app = app!(gateway, store.clone());

    let req = test::TestRequest::post()
        .uri("/api/payment")
        .set_json(payment_payload("600"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri(&format!("/api/payment/{}", TEST_TRANSACTION_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["transaction_id"], TEST_TRANSACTION_ID);
    assert_eq!(body["data"]["cardID"], TEST_CARD_TOKEN);
    assert_eq!(body["data"]["cardNumberLast"], "1111");

    let req = test::TestRequest::get()
        .uri(&format!("/api/cards/{}", TEST_CARD_TOKEN))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    store.mark_expired(TEST_TRANSACTION_ID).await.unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/payment/{}", TEST_TRANSACTION_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_get_unknown_payment_is_404() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::get()
        .uri("/api/payment/unknown-id")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_booking_quote() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({
            "bookingType": "direct",
            "securityDeposit": "800",
            "accommodationFee": "250.5",
            "addons": [{ "name": "Pet fee", "price": "130" }],
            "earlyCheckInHours": 1
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], "1240.50");
    assert_eq!(body["data"]["currency"], "AUD");
    assert_eq!(body["data"]["paymentRequired"], true);

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({ "bookingType": "airbnb", "securityDeposit": "800" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], "0.00");
    assert_eq!(body["data"]["paymentRequired"], false);
}

#[actix_web::test]
async fn test_booking_quote_overflow_is_bad_request() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::post()
        .uri("/api/bookings/quote")
        .set_json(json!({
            "bookingType": "direct",
            "securityDeposit": "79228162514264337593543950335",
            "accommodationFee": "1"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Booking total is too large");
}

#[actix_web::test]
async fn test_health_and_ready() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway, Arc::new(FailingStore));

    let req = test::TestRequest::get().uri("/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get().uri("/ready").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 503);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["ready"], false);
}

#[actix_web::test]
async fn test_unknown_route_uses_envelope() {
    let gateway = Arc::new(ScriptedGateway::approving());
    let app = app!(gateway, Arc::new(InMemoryTransactionStore::new()));

    let req = test::TestRequest::get().uri("/api/nope").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}
