//! Integration tests for checkout: WhatsApp hand-off and the email relay.

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use soltana_integration_tests::{
    TEST_WHATSAPP_NUMBER, TestServer, sample_content, unreachable_email_config,
};

const CUSTOMER: [(&str, &str); 3] = [
    ("name", "Amira Ben Salah"),
    ("phone", "+216 56 170 165"),
    ("address", "Rue Manzel Hor, Kelibia"),
];

fn checkout_form(channel: &str) -> Vec<(&'static str, &str)> {
    let mut form = CUSTOMER.to_vec();
    form.push(("channel", channel));
    form
}

#[tokio::test]
async fn test_checkout_with_empty_cart_redirects_to_cart() {
    let server = TestServer::spawn().await;

    let response = server.client.get(server.url("/order")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers().get("location").unwrap(), "/cart");

    let response = server.post_form("/order", &checkout_form("whatsapp")).await;
    assert_eq!(response.headers().get("location").unwrap(), "/cart");
}

#[tokio::test]
async fn test_whatsapp_checkout_redirects_and_clears_cart() {
    let server = TestServer::spawn().await;
    server.add_to_cart("baklawa", 2).await;
    server.add_to_cart("kaak-warka", 1).await;

    let (status, body) = server.get("/order").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("21.00dt"));

    let response = server.post_form("/order", &checkout_form("whatsapp")).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response
        .headers()
        .get("location")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let prefix = format!("https://wa.me/{TEST_WHATSAPP_NUMBER}?text=");
    assert!(location.starts_with(&prefix), "unexpected link {location}");
    assert!(location.contains("Nouvelle%20commande%20Soltana%0ANom%3A%20Amira%20Ben%20Salah"));
    assert!(location.contains("Baklawa%20x2%20-%209.00dt"));
    assert!(location.contains("Total%3A%2021.00dt"));
    assert!(location.ends_with("Paiement%3A%20Sur%20place"));
    assert!(!location.contains(' '));

    assert_eq!(server.cart_count().await, 0);
}

#[tokio::test]
async fn test_invalid_customer_keeps_cart() {
    let server = TestServer::spawn().await;
    server.add_to_cart("fondant", 1).await;

    let response = server
        .post_form(
            "/order",
            &[
                ("name", "Amira"),
                ("phone", "pas de numéro"),
                ("address", "Kelibia"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.unwrap();
    assert!(body.contains("numéro de téléphone valide"));
    assert!(body.contains("value=\"Amira\""));

    assert_eq!(server.cart_count().await, 1);
}

#[tokio::test]
async fn test_email_checkout_without_relay_keeps_cart() {
    let server = TestServer::spawn().await;
    server.add_to_cart("royal", 1).await;

    let (_, body) = server.get("/order").await;
    assert!(!body.contains("value=\"email\""));

    let response = server.post_form("/order", &checkout_form("email")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(server.cart_count().await, 1);
}

#[tokio::test]
async fn test_email_checkout_failure_keeps_cart() {
    let server =
        TestServer::spawn_with(sample_content(), Some(unreachable_email_config().await)).await;
    server.add_to_cart("tarte-fraises", 1).await;

    let (_, body) = server.get("/order").await;
    assert!(body.contains("value=\"email\""));

    let response = server.post_form("/order", &checkout_form("email")).await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = response.text().await.unwrap();
    assert!(body.contains("Erreur lors de l&#39;envoi") || body.contains("Erreur lors de l'envoi"));

    assert_eq!(server.cart_count().await, 1);
}

#[tokio::test]
async fn test_send_order_api_without_relay() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .post(server.url("/api/send-order"))
        .json(&json!({
            "name": "Amira",
            "phone": "56170165",
            "address": "Kelibia",
            "items": [{"name": "Baklawa", "quantity": 2, "price": "4.5"}],
            "total": "9"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_send_order_api_rejects_empty_order() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .post(server.url("/api/send-order"))
        .json(&json!({
            "name": "Amira",
            "phone": "56170165",
            "address": "Kelibia",
            "items": []
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "La commande est vide.");
}

#[tokio::test]
async fn test_send_order_api_malformed_body_answers_json() {
    let server = TestServer::spawn().await;

    let negative_price = json!({
        "name": "Amira",
        "phone": "56170165",
        "address": "Kelibia",
        "items": [{"name": "Zrir", "quantity": 1, "price": "-3"}]
    });
    let missing_items = json!({"name": "Amira", "phone": "56170165", "address": "Kelibia"});

    for payload in [negative_price, missing_items] {
        let response = server
            .client
            .post(server.url("/api/send-order"))
            .json(&payload)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], "Commande invalide.");
    }

    let response = server
        .client
        .post(server.url("/api/send-order"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
}

#[tokio::test]
async fn test_send_order_api_overflowing_amount() {
    let server = TestServer::spawn().await;

    let response = server
        .client
        .post(server.url("/api/send-order"))
        .json(&json!({
            "name": "Amira",
            "phone": "56170165",
            "address": "Kelibia",
            "items": [{"name": "Royal", "quantity": 2, "price": "79228162514264337593543950335"}]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Montant de commande invalide.");
}

#[tokio::test]
async fn test_send_order_api_relay_failure() {
    let server =
        TestServer::spawn_with(sample_content(), Some(unreachable_email_config().await)).await;

    let response = server
        .client
        .post(server.url("/api/send-order"))
        .json(&json!({
            "name": "Amira",
            "phone": "56170165",
            "address": "Kelibia",
            "items": [{"name": "Zrir", "quantity": 1, "price": 7}]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["ok"], false);
}
