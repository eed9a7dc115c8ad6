//! Integration tests for Soltana Pâtisserie.
//!
//! Each test spawns a real storefront on an ephemeral port and drives it over
//! HTTP with a cookie-keeping `reqwest` client, so the session-backed cart
//! behaves exactly as it does in a browser.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p soltana-integration-tests
//! ```
//!
//! No database, SMTP relay or network access is needed. Email-channel tests
//! point the mailer at a closed local port.

use std::net::SocketAddr;
use std::path::PathBuf;

use secrecy::SecretString;
use soltana_core::{Catalog, Email, Product, ProductId};
use soltana_storefront::config::{EmailConfig, StorefrontConfig, WhatsAppConfig};
use soltana_storefront::content::{ContentStore, Page, PageMeta};
use soltana_storefront::state::AppState;

/// WhatsApp number configured on test servers.
pub const TEST_WHATSAPP_NUMBER: &str = "21656170165";

fn product(id: &str, name: &str, price: &str, categories: &[&str], ingredients: &[&str]) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: format!("{name} maison"),
        price: price.parse().unwrap_or_default(),
        image: format!("/static/images/products/{id}.svg"),
        categories: categories.iter().map(ToString::to_string).collect(),
        ingredients: ingredients.iter().map(ToString::to_string).collect(),
        allergens: Vec::new(),
        gallery: Vec::new(),
    }
}

/// A small catalog covering single- and multi-category products.
///
/// | id            | categories                  | price |
/// |---------------|-----------------------------|-------|
/// | baklawa       | Traditionnelle              | 4.5   |
/// | kaak-warka    | Traditionnelle, Orientale   | 12    |
/// | tarte-fraises | Moderne, Fruits             | 25    |
/// | fondant       | Chocolat                    | 6     |
/// | royal         | Moderne, Chocolat           | 38    |
///
/// # Panics
///
/// Never: the ids are distinct.
#[must_use]
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        product("baklawa", "Baklawa", "4.5", &["Traditionnelle"], &["Amandes", "Miel"]),
        product(
            "kaak-warka",
            "Kaak Warka",
            "12",
            &["Traditionnelle", "Orientale"],
            &["Amandes", "Fleur d'oranger"],
        ),
        product("tarte-fraises", "Tarte aux fraises", "25", &["Moderne", "Fruits"], &[]),
        product("fondant", "Fondant", "6", &["Chocolat"], &["Chocolat"]),
        product(
            "royal",
            "Royal pistache",
            "38",
            &["Moderne", "Chocolat"],
            &["Chocolat", "Pistaches"],
        ),
    ])
    .expect("sample catalog ids are unique")
}

/// The sample catalog plus an About page.
#[must_use]
pub fn sample_content() -> ContentStore {
    ContentStore::from_catalog(sample_catalog()).with_page(Page {
        slug: "about".to_string(),
        meta: PageMeta {
            title: "À propos".to_string(),
            description: None,
        },
        content_html: "<p>Pâtisserie artisanale à Kelibia.</p>".to_string(),
    })
}

/// Configuration for a server bound to `addr`, without email relay.
#[must_use]
pub fn test_config(addr: SocketAddr) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        content_dir: PathBuf::from("content"),
        static_dir: PathBuf::from("static"),
        whatsapp: WhatsAppConfig {
            number: TEST_WHATSAPP_NUMBER.to_string(),
        },
        email: None,
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Email configuration pointing at a local port nothing listens on.
///
/// # Panics
///
/// Panics if no local port can be reserved.
pub async fn unreachable_email_config() -> EmailConfig {
    let port = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("reserve a local port");
        listener.local_addr().expect("local addr").port()
    };

    EmailConfig {
        smtp_host: "127.0.0.1".to_string(),
        smtp_port: port,
        smtp_username: "commandes@soltana.test".to_string(),
        smtp_password: SecretString::from("integration-test-password"),
        from_address: Email::parse("commandes@soltana.test").expect("valid address"),
        order_recipient: Email::parse("contact.patisseriesoltana@gmail.com")
            .expect("valid address"),
    }
}

/// A storefront running in the background of the current test runtime.
pub struct TestServer {
    pub base_url: String,
    /// Keeps cookies and never follows redirects.
    pub client: reqwest::Client,
}

impl TestServer {
    /// Spawn a server with the sample content and no email relay.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind or the client cannot be built.
    pub async fn spawn() -> Self {
        Self::spawn_with(sample_content(), None).await
    }

    /// Spawn a server with the given content and optional email relay.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind or the client cannot be built.
    pub async fn spawn_with(content: ContentStore, email: Option<EmailConfig>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let mut config = test_config(addr);
        config.email = email;
        let state = AppState::new(config, content).expect("build app state");
        let app = soltana_storefront::app(state);

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("server error");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Self::new_client(),
        }
    }

    /// A fresh client with its own cookie jar, i.e. a new visitor.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn new_client() -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("build http client")
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request");
        let status = response.status();
        (status, response.text().await.expect("response body"))
    }

    /// POST a form to `path`.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// Add `id` to the cart `times` times through the public form.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or is not redirected.
    pub async fn add_to_cart(&self, id: &str, times: usize) {
        for _ in 0..times {
            let response = self.post_form("/cart/add", &[("id", id)]).await;
            assert_eq!(response.status(), reqwest::StatusCode::SEE_OTHER);
        }
    }

    /// The cart badge count.
    ///
    /// # Panics
    ///
    /// Panics if the badge cannot be fetched or parsed.
    pub async fn cart_count(&self) -> u32 {
        let (_, body) = self.get("/cart/count").await;
        let start = body.find('>').expect("badge open tag") + 1;
        let end = body.rfind("</span>").expect("badge close tag");
        body.get(start..end)
            .expect("badge text")
            .trim()
            .parse()
            .expect("numeric badge")
    }
}
