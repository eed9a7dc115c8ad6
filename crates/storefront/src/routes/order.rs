//! Checkout route handlers.
//!
//! There is no payment: the customer pays on collection. Submitting the
//! checkout either opens WhatsApp with the order pre-filled or emails it to
//! the shop. Either way the cart is emptied once the order has left.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use soltana_core::{Cart, Customer, CustomerError, OrderSummary};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::models::session::{load_cart, load_favorites, save_cart};
use crate::routes::views::{CartView, NavView};
use crate::services::whatsapp;
use crate::state::AppState;

/// How the order is handed to the shop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderChannel {
    #[default]
    Whatsapp,
    Email,
}

/// Checkout form data.
#[derive(Debug, Default, Deserialize)]
pub struct OrderForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub channel: OrderChannel,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "order/new.html")]
pub struct OrderTemplate {
    pub nav: NavView,
    pub cart: CartView,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub error: Option<String>,
    pub email_enabled: bool,
}

/// Order sent confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "order/confirmed.html")]
pub struct OrderConfirmedTemplate {
    pub nav: NavView,
    pub customer_name: String,
    pub total: String,
}

/// Message shown next to the form for a rejected field.
#[must_use]
pub const fn customer_error_message(error: &CustomerError) -> &'static str {
    match error {
        CustomerError::MissingName => "Veuillez indiquer votre nom.",
        CustomerError::MissingAddress => "Veuillez indiquer votre adresse.",
        CustomerError::Phone(_) => "Veuillez indiquer un numéro de téléphone valide.",
    }
}

async fn render_form(
    state: &AppState,
    session: &Session,
    cart: &Cart,
    form: OrderForm,
    error: Option<String>,
) -> Result<OrderTemplate> {
    let favorites = load_favorites(session).await?;
    Ok(OrderTemplate {
        nav: NavView::new(cart, &favorites),
        cart: CartView::from(cart),
        name: form.name,
        phone: form.phone,
        address: form.address,
        error,
        email_enabled: state.mailer().is_some(),
    })
}

/// Display the checkout form with the order summary.
///
/// An empty cart sends the visitor back to the cart page.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    Ok(render_form(&state, &session, &cart, OrderForm::default(), None)
        .await?
        .into_response())
}

/// Submit the checkout.
#[instrument(skip(state, session, form), fields(channel = ?form.channel))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<OrderForm>,
) -> Result<Response> {
    let mut cart = load_cart(&session).await?;
    if cart.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let customer = match Customer::new(&form.name, &form.phone, &form.address) {
        Ok(customer) => customer,
        Err(e) => {
            tracing::debug!(error = %e, "Checkout form rejected");
            let message = customer_error_message(&e).to_string();
            let page = render_form(&state, &session, &cart, form, Some(message)).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };
    let order = OrderSummary::from_cart(customer, &cart)
        .map_err(|_| AppError::BadRequest("Montant de commande invalide.".to_string()))?;

    match form.channel {
        OrderChannel::Whatsapp => {
            let link = whatsapp::wa_me_link(
                &state.config().whatsapp.number,
                &whatsapp::order_message(&order),
            );

            cart.clear();
            save_cart(&session, &cart).await?;

            add_breadcrumb("order", "Order handed off to WhatsApp", None);
            tracing::info!(lines = order.lines.len(), total = %order.total, "WhatsApp order");
            Ok(Redirect::to(&link).into_response())
        }
        OrderChannel::Email => {
            let Some(mailer) = state.mailer() else {
                let message = "La commande par email est indisponible pour le moment. \
                               Merci de commander via WhatsApp."
                    .to_string();
                let page = render_form(&state, &session, &cart, form, Some(message)).await?;
                return Ok((StatusCode::SERVICE_UNAVAILABLE, page).into_response());
            };

            if let Err(e) = mailer.send_order(&order).await {
                AppError::Mail(e).report();
                let message = "Erreur lors de l'envoi de la commande. Veuillez réessayer \
                               ou nous contacter sur WhatsApp."
                    .to_string();
                let page = render_form(&state, &session, &cart, form, Some(message)).await?;
                return Ok((StatusCode::BAD_GATEWAY, page).into_response());
            }

            cart.clear();
            save_cart(&session, &cart).await?;
            let favorites = load_favorites(&session).await?;

            add_breadcrumb("order", "Order emailed", None);
            Ok(OrderConfirmedTemplate {
                nav: NavView::new(&cart, &favorites),
                customer_name: order.customer.name.clone(),
                total: order.total.to_string(),
            }
            .into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_defaults_to_whatsapp() {
        let form: OrderForm = serde_json::from_str(r#"{"name":"Amira"}"#).unwrap_or_default();
        assert_eq!(form.channel, OrderChannel::Whatsapp);

        let form: OrderForm =
            serde_json::from_str(r#"{"channel":"email"}"#).unwrap_or_default();
        assert_eq!(form.channel, OrderChannel::Email);
    }

    #[test]
    fn test_customer_error_messages_are_french() {
        assert_eq!(
            customer_error_message(&CustomerError::MissingName),
            "Veuillez indiquer votre nom."
        );
    }
}
