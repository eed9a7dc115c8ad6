//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::content::ContentStore;
use crate::services::{MailerError, OrderMailer};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything in it is read-only
/// once the server starts; per-visitor data lives in the session.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    content: ContentStore,
    mailer: Option<OrderMailer>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The order mailer is only built when the email relay is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the email configuration cannot produce a mailer.
    pub fn new(config: StorefrontConfig, content: ContentStore) -> Result<Self, MailerError> {
        let mailer = config.email.as_ref().map(OrderMailer::new).transpose()?;
        if mailer.is_none() {
            tracing::warn!("SMTP not configured, email orders are disabled");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                content,
                mailer,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the loaded catalog and pages.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }

    /// The order mailer, if the email relay is configured.
    #[must_use]
    pub fn mailer(&self) -> Option<&OrderMailer> {
        self.inner.mailer.as_ref()
    }
}
