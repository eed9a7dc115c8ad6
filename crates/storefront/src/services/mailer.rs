//! Order notification emails.
//!
//! Uses SMTP via lettre for delivery with Askama HTML and plain text
//! templates. One message per order, sent to the shop's order inbox.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use soltana_core::{Email, OrderSummary};

use crate::config::EmailConfig;

/// Subject line of every order notification.
pub const ORDER_SUBJECT: &str = "Nouvelle commande Soltana Pâtisserie";

/// HTML body of the order notification.
#[derive(Template)]
#[template(path = "email/order.html")]
struct OrderEmailHtml<'a> {
    order: &'a OrderSummary,
}

/// Plain text body of the order notification.
#[derive(Template)]
#[template(path = "email/order.txt")]
struct OrderEmailText<'a> {
    order: &'a OrderSummary,
}

/// Errors that can occur when sending an order notification.
#[derive(Debug, Error)]
pub enum MailerError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Sends order notifications through the configured SMTP relay.
#[derive(Clone)]
pub struct OrderMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl std::fmt::Debug for OrderMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderMailer")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish_non_exhaustive()
    }
}

fn mailbox(address: &Email, name: Option<&str>) -> Result<Mailbox, MailerError> {
    let email = address
        .as_str()
        .parse()
        .map_err(|_| MailerError::InvalidAddress(address.to_string()))?;
    Ok(Mailbox::new(name.map(str::to_owned), email))
}

impl OrderMailer {
    /// Create a mailer from configuration.
    ///
    /// No connection is made until the first order is sent.
    ///
    /// # Errors
    ///
    /// Returns error if the relay host is invalid or an address cannot be
    /// used as a mailbox.
    pub fn new(config: &EmailConfig) -> Result<Self, MailerError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from: mailbox(&config.from_address, Some("Soltana Pâtisserie"))?,
            to: mailbox(&config.order_recipient, None)?,
        })
    }

    /// Send the notification for one order.
    ///
    /// # Errors
    ///
    /// Returns error if a template fails to render or the relay rejects the
    /// message. Nothing is retried.
    pub async fn send_order(&self, order: &OrderSummary) -> Result<(), MailerError> {
        let message = self.build_message(order)?;
        self.mailer.send(message).await?;

        tracing::info!(
            to = %self.to,
            lines = order.lines.len(),
            total = %order.total,
            "Order notification sent"
        );
        Ok(())
    }

    fn build_message(&self, order: &OrderSummary) -> Result<Message, MailerError> {
        let html = OrderEmailHtml { order }.render()?;
        let text = OrderEmailText { order }.render()?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(ORDER_SUBJECT)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;
        Ok(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;
    use soltana_core::{Customer, OrderLine};

    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "commandes@example.com".to_string(),
            smtp_password: SecretString::from("app-password-1234"),
            from_address: Email::parse("commandes@example.com").unwrap(),
            order_recipient: Email::parse("contact.patisseriesoltana@gmail.com").unwrap(),
        }
    }

    fn order() -> OrderSummary {
        OrderSummary::new(
            Customer::new("Amira <b>", "56170165", "Kelibia").unwrap(),
            vec![OrderLine {
                name: "Makroudh".to_string(),
                quantity: 3,
                unit_price: "1.5".parse().unwrap(),
            }],
        )
        .unwrap()
    }

    #[test]
    fn test_text_body_lists_order() {
        let order = order();
        let text = OrderEmailText { order: &order }.render().unwrap();
        assert!(text.contains("Nom: Amira <b>"));
        assert!(text.contains("Makroudh x3 - 4.50dt"));
        assert!(text.contains("Total: 4.50dt"));
        assert!(text.contains("Paiement: Sur place"));
    }

    #[test]
    fn test_html_body_escapes_customer_input() {
        let order = order();
        let html = OrderEmailHtml { order: &order }.render().unwrap();
        assert!(html.contains("Amira &#60;b&#62;") || html.contains("Amira &lt;b&gt;"));
        assert!(!html.contains("Amira <b>"));
    }

    #[tokio::test]
    async fn test_message_has_subject_and_both_parts() {
        let mailer = OrderMailer::new(&config()).unwrap();
        let message = mailer.build_message(&order()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("To: contact.patisseriesoltana@gmail.com"));
        assert!(raw.contains("Content-Type: text/plain"));
        assert!(raw.contains("Content-Type: text/html"));
    }
}
