//! WhatsApp order hand-off.
//!
//! The storefront never talks to WhatsApp directly. It formats the order as a
//! chat message and sends the visitor to a `wa.me` deep link with the message
//! pre-filled; the visitor presses send. There is no delivery confirmation.

use std::fmt::Write as _;

use soltana_core::OrderSummary;

/// Base of the WhatsApp click-to-chat link.
const WA_ME_BASE: &str = "https://wa.me";

/// Format an order as the message pasted into the chat.
#[must_use]
pub fn order_message(order: &OrderSummary) -> String {
    let mut message = String::from("Nouvelle commande Soltana\n");
    // Writing to a String cannot fail.
    let _ = writeln!(message, "Nom: {}", order.customer.name);
    let _ = writeln!(message, "Téléphone: {}", order.customer.phone);
    let _ = writeln!(message, "Adresse: {}", order.customer.address);
    message.push_str("---\n");
    for line in &order.lines {
        let _ = writeln!(
            message,
            "• {} x{} - {}",
            line.name,
            line.quantity,
            line.line_total()
        );
    }
    let _ = writeln!(message, "Total: {}", order.total);
    message.push_str("Paiement: Sur place");
    message
}

/// Build the `wa.me` link that opens a chat with `number` and a pre-filled `message`.
///
/// `number` must already be digits only, in international format without `+`.
#[must_use]
pub fn wa_me_link(number: &str, message: &str) -> String {
    format!(
        "{WA_ME_BASE}/{number}?text={}",
        urlencoding::encode(message)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use soltana_core::{Customer, OrderLine};

    use super::*;

    fn order() -> OrderSummary {
        OrderSummary::new(
            Customer::new("Amira Ben Salah", "+216 56 170 165", "Rue Manzel Hor, Kelibia").unwrap(),
            vec![
                OrderLine {
                    name: "Baklawa".to_string(),
                    quantity: 2,
                    unit_price: "4.5".parse().unwrap(),
                },
                OrderLine {
                    name: "Kaak Warka".to_string(),
                    quantity: 1,
                    unit_price: "12".parse().unwrap(),
                },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_order_message_layout() {
        let message = order_message(&order());
        let expected = "Nouvelle commande Soltana\n\
                        Nom: Amira Ben Salah\n\
                        Téléphone: +216 56 170 165\n\
                        Adresse: Rue Manzel Hor, Kelibia\n\
                        ---\n\
                        • Baklawa x2 - 9.00dt\n\
                        • Kaak Warka x1 - 12.00dt\n\
                        Total: 21.00dt\n\
                        Paiement: Sur place";
        assert_eq!(message, expected);
    }

    #[test]
    fn test_wa_me_link_percent_encodes_message() {
        let link = wa_me_link("21656170165", "Nom: Amira & co\nTotal: 4.00dt");
        assert_eq!(
            link,
            "https://wa.me/21656170165?text=Nom%3A%20Amira%20%26%20co%0ATotal%3A%204.00dt"
        );
    }

    #[test]
    fn test_wa_me_link_encodes_non_ascii() {
        let link = wa_me_link("21656170165", "Téléphone •");
        assert!(link.ends_with("?text=T%C3%A9l%C3%A9phone%20%E2%80%A2"));
    }
}
