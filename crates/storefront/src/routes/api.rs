//! JSON API route handlers.
//!
//! `POST /api/send-order` relays an order to the shop's inbox by email. It
//! takes the lines as sent by the client, so the total is recomputed here and
//! a mismatching client total is only logged.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use soltana_core::{Customer, OrderLine, OrderSummary, Price};

use crate::error::AppError;
use crate::routes::order::customer_error_message;
use crate::state::AppState;

/// One line of an order request.
#[derive(Debug, Deserialize)]
pub struct SendOrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

/// Order notification request body.
#[derive(Debug, Deserialize)]
pub struct SendOrderRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub items: Vec<SendOrderItem>,
    pub total: Option<Price>,
}

/// Order notification response body.
#[derive(Debug, Serialize)]
pub struct SendOrderResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOrderResponse {
    fn failure(status: StatusCode, error: &str) -> (StatusCode, Json<Self>) {
        (
            status,
            Json(Self {
                ok: false,
                error: Some(error.to_string()),
            }),
        )
    }
}

/// Validate the request into an order summary.
///
/// # Errors
///
/// Returns a visitor-facing message for invalid customer details, an empty
/// order, a zero quantity or an amount too large to total.
pub fn order_from_request(request: SendOrderRequest) -> Result<OrderSummary, &'static str> {
    let customer = Customer::new(&request.name, &request.phone, &request.address)
        .map_err(|e| customer_error_message(&e))?;

    if request.items.is_empty() {
        return Err("La commande est vide.");
    }
    if request.items.iter().any(|item| item.quantity == 0) {
        return Err("Quantité invalide.");
    }

    let lines = request
        .items
        .into_iter()
        .map(|item| OrderLine {
            name: item.name,
            quantity: item.quantity,
            unit_price: item.price,
        })
        .collect();
    let order =
        OrderSummary::new(customer, lines).map_err(|_| "Montant de commande invalide.")?;

    if let Some(claimed) = request.total.filter(|claimed| *claimed != order.total) {
        tracing::warn!(
            claimed = %claimed,
            computed = %order.total,
            "Order total mismatch, using computed total"
        );
    }
    Ok(order)
}

/// Send an order notification email.
///
/// POST /api/send-order
#[instrument(skip(state, request))]
pub async fn send_order(
    State(state): State<AppState>,
    request: Result<Json<SendOrderRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(request) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "Order request rejected");
            return SendOrderResponse::failure(StatusCode::BAD_REQUEST, "Commande invalide.");
        }
    };

    let order = match order_from_request(request) {
        Ok(order) => order,
        Err(message) => return SendOrderResponse::failure(StatusCode::BAD_REQUEST, message),
    };

    let Some(mailer) = state.mailer() else {
        tracing::warn!("Order received but SMTP is not configured");
        return SendOrderResponse::failure(
            StatusCode::SERVICE_UNAVAILABLE,
            "L'envoi des commandes par email est indisponible.",
        );
    };

    match mailer.send_order(&order).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SendOrderResponse {
                ok: true,
                error: None,
            }),
        ),
        Err(e) => {
            let err = AppError::Mail(e);
            err.report();
            SendOrderResponse::failure(err.status(), &err.public_message())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(json: &str) -> SendOrderRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_total_is_recomputed() {
        let order = order_from_request(request(
            r#"{
                "name": "Amira",
                "phone": "56170165",
                "address": "Kelibia",
                "items": [
                    {"name": "Baklawa", "quantity": 2, "price": "4.5"},
                    {"name": "Zrir", "quantity": 1, "price": 7}
                ],
                "total": "1.00"
            }"#,
        ))
        .unwrap();

        assert_eq!(order.total.to_string(), "16.00dt");
        assert_eq!(order.lines.len(), 2);
    }

    #[test]
    fn test_rejects_empty_or_invalid_orders() {
        let empty = request(
            r#"{"name": "Amira", "phone": "56170165", "address": "Kelibia", "items": []}"#,
        );
        assert_eq!(order_from_request(empty).unwrap_err(), "La commande est vide.");

        let zero = request(
            r#"{"name": "Amira", "phone": "56170165", "address": "Kelibia",
                "items": [{"name": "Zrir", "quantity": 0, "price": "7"}]}"#,
        );
        assert_eq!(order_from_request(zero).unwrap_err(), "Quantité invalide.");

        let no_name = request(
            r#"{"name": " ", "phone": "56170165", "address": "Kelibia",
                "items": [{"name": "Zrir", "quantity": 1, "price": "7"}]}"#,
        );
        assert_eq!(
            order_from_request(no_name).unwrap_err(),
            "Veuillez indiquer votre nom."
        );
    }

    #[test]
    fn test_rejects_overflowing_amount() {
        let huge = request(
            r#"{"name": "Amira", "phone": "56170165", "address": "Kelibia",
                "items": [{"name": "Royal", "quantity": 2,
                           "price": "79228162514264337593543950335"}]}"#,
        );
        assert_eq!(
            order_from_request(huge).unwrap_err(),
            "Montant de commande invalide."
        );
    }
}
