//! Order summaries handed off to WhatsApp or email.
//!
//! The shop takes payment on collection, so an order is only a summary of
//! who ordered what. The total is always recomputed from the lines.

use serde::Serialize;

use crate::cart::Cart;
use crate::types::{Phone, PhoneError, Price};

/// Errors that can occur when validating [`Customer`] details.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomerError {
    #[error("name is required")]
    MissingName,
    #[error("address is required")]
    MissingAddress,
    #[error("invalid phone number: {0}")]
    Phone(#[from] PhoneError),
}

/// Errors that can occur when building an [`OrderSummary`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderError {
    #[error("order amount is too large")]
    AmountOverflow,
}

/// Who placed the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub name: String,
    pub phone: Phone,
    pub address: String,
}

impl Customer {
    /// Validate and trim the checkout form fields.
    ///
    /// # Errors
    ///
    /// Returns a [`CustomerError`] for a blank name or address, or an invalid phone.
    pub fn new(name: &str, phone: &str, address: &str) -> Result<Self, CustomerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomerError::MissingName);
        }
        let phone = Phone::parse(phone)?;
        let address = address.trim();
        if address.is_empty() {
            return Err(CustomerError::MissingAddress);
        }

        Ok(Self {
            name: name.to_owned(),
            phone,
            address: address.to_owned(),
        })
    }
}

/// One ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Price,
}

impl OrderLine {
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A complete order ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub total: Price,
}

impl OrderSummary {
    /// Build a summary from explicit lines.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AmountOverflow`] if a line total or the order
    /// total cannot be represented.
    pub fn new(customer: Customer, lines: Vec<OrderLine>) -> Result<Self, OrderError> {
        let total = lines
            .iter()
            .try_fold(Price::ZERO, |total, line| {
                line.unit_price
                    .checked_times(line.quantity)
                    .and_then(|line_total| total.checked_add(line_total))
            })
            .ok_or(OrderError::AmountOverflow)?;

        Ok(Self {
            customer,
            lines,
            total,
        })
    }

    /// Build a summary from the current cart contents.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AmountOverflow`] if the total cannot be represented.
    pub fn from_cart(customer: Customer, cart: &Cart) -> Result<Self, OrderError> {
        let lines = cart
            .items()
            .iter()
            .map(|item| OrderLine {
                name: item.name.clone(),
                quantity: item.quantity,
                unit_price: item.price,
            })
            .collect();
        Self::new(customer, lines)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::NewCartItem;
    use crate::types::ProductId;

    fn customer() -> Customer {
        Customer::new(" Amira ", "56 170 165", " Rue Manzel Hor, Kelibia ").unwrap()
    }

    #[test]
    fn test_customer_is_trimmed_and_validated() {
        let c = customer();
        assert_eq!(c.name, "Amira");
        assert_eq!(c.address, "Rue Manzel Hor, Kelibia");

        assert_eq!(
            Customer::new("  ", "56170165", "Kelibia"),
            Err(CustomerError::MissingName)
        );
        assert_eq!(
            Customer::new("Amira", "56170165", ""),
            Err(CustomerError::MissingAddress)
        );
        assert!(matches!(
            Customer::new("Amira", "abc", "Kelibia"),
            Err(CustomerError::Phone(_))
        ));
    }

    #[test]
    fn test_from_cart_copies_lines_and_total() {
        let mut cart = Cart::new();
        for _ in 0..3 {
            cart.add(NewCartItem {
                id: ProductId::new("makroudh"),
                name: "Makroudh".to_string(),
                price: "1.5".parse().unwrap(),
                image: String::new(),
            });
        }

        let order = OrderSummary::from_cart(customer(), &cart).unwrap();
        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.lines.first().unwrap().quantity, 3);
        assert_eq!(order.total, cart.total());
        assert_eq!(order.total.to_string(), "4.50dt");
    }

    #[test]
    fn test_new_recomputes_total() {
        let order = OrderSummary::new(
            customer(),
            vec![
                OrderLine {
                    name: "Baklawa".to_string(),
                    quantity: 2,
                    unit_price: "4".parse().unwrap(),
                },
                OrderLine {
                    name: "Tarte".to_string(),
                    quantity: 1,
                    unit_price: "25".parse().unwrap(),
                },
            ],
        )
        .unwrap();
        assert_eq!(order.total, "33".parse().unwrap());
        assert!(!order.is_empty());
    }

    #[test]
    fn test_new_rejects_overflowing_amounts() {
        let line = |quantity| OrderLine {
            name: "Royal".to_string(),
            quantity,
            unit_price: "79228162514264337593543950335".parse().unwrap(),
        };

        assert_eq!(
            OrderSummary::new(customer(), vec![line(2)]),
            Err(OrderError::AmountOverflow)
        );
        assert_eq!(
            OrderSummary::new(customer(), vec![line(1), line(1)]),
            Err(OrderError::AmountOverflow)
        );
        assert!(OrderSummary::new(customer(), vec![line(1)]).is_ok());
    }
}
