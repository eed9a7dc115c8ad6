//! Business logic services for storefront.
//!
//! # Services
//!
//! - `mailer` - Order notifications over SMTP
//! - `whatsapp` - Order message and `wa.me` deep link

pub mod mailer;
pub mod whatsapp;

pub use mailer::{MailerError, OrderMailer};
