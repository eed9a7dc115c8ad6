//! Content management for the product catalog and markdown pages.
//!
//! Loaded once from the content directory at startup:
//!
//! ```text
//! content/
//!   products/*.md   one product per file, YAML frontmatter + markdown details
//!   pages/*.md      about, contact, ... with title/description frontmatter
//! ```
//!
//! Products are ordered by their `position` frontmatter field (then by id),
//! which is the order the menu displays and filters them in.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use serde::Deserialize;
use soltana_core::{Catalog, CatalogError, Price, Product, ProductId};

/// Number of products shown on the home page when none is flagged `signature`.
const DEFAULT_SIGNATURE_COUNT: usize = 3;

/// Frontmatter of a product file.
#[derive(Debug, Clone, Deserialize)]
struct ProductMeta {
    id: String,
    name: String,
    description: String,
    price: Price,
    image: String,
    categories: Vec<String>,
    ingredients: Vec<String>,
    #[serde(default)]
    allergens: Vec<String>,
    #[serde(default)]
    gallery: Vec<String>,
    #[serde(default)]
    position: u32,
    /// Shown in the home page "signature creations" section
    #[serde(default)]
    signature: bool,
}

/// Metadata for static pages (about, contact, etc.)
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A rendered page with metadata and HTML content
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// A product as read from disk, before it joins the catalog.
struct LoadedProduct {
    position: u32,
    signature: bool,
    product: Product,
    details_html: String,
}

/// Content store that holds the catalog and pages in memory
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    catalog: Arc<Catalog>,
    details: Arc<HashMap<ProductId, String>>,
    signature: Arc<Vec<ProductId>>,
    pages: Arc<HashMap<String, Page>>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// Files that fail to parse are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be read or two products share an id.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let mut products = Self::load_products(&content_dir.join("products"))?;
        let pages = Self::load_pages(&content_dir.join("pages"))?;

        products.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then_with(|| a.product.id.cmp(&b.product.id))
        });

        let signature: Vec<ProductId> = products
            .iter()
            .filter(|p| p.signature)
            .map(|p| p.product.id.clone())
            .collect();
        let details = products
            .iter()
            .filter(|p| !p.details_html.trim().is_empty())
            .map(|p| (p.product.id.clone(), p.details_html.clone()))
            .collect();
        let catalog = Catalog::new(products.into_iter().map(|p| p.product).collect())?;

        tracing::info!(
            products = catalog.len(),
            pages = pages.len(),
            "Content loaded"
        );

        Ok(Self {
            catalog: Arc::new(catalog),
            details: Arc::new(details),
            signature: Arc::new(signature),
            pages: Arc::new(pages),
        })
    }

    /// Build a store around an in-memory catalog, with no pages or details.
    #[must_use]
    pub fn from_catalog(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
            ..Self::default()
        }
    }

    /// Add or replace a page.
    #[must_use]
    pub fn with_page(mut self, page: Page) -> Self {
        Arc::make_mut(&mut self.pages).insert(page.slug.clone(), page);
        self
    }

    /// Load all products from the products directory
    fn load_products(dir: &Path) -> Result<Vec<LoadedProduct>, ContentError> {
        let mut products = Vec::new();

        if !dir.exists() {
            tracing::warn!("Products directory does not exist: {:?}", dir);
            return Ok(products);
        }

        for path in markdown_files(dir)? {
            match Self::load_product(&path) {
                Ok(product) => {
                    tracing::debug!("Loaded product: {}", product.product.id);
                    products.push(product);
                }
                Err(e) => {
                    tracing::error!("Failed to load product {:?}: {}", path, e);
                }
            }
        }

        Ok(products)
    }

    /// Load a single product from a markdown file
    fn load_product(path: &Path) -> Result<LoadedProduct, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let matter = Matter::<YAML>::new();
        let parsed: ParsedEntity<ProductMeta> = matter
            .parse(&content)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

        if meta.id.trim().is_empty() {
            return Err(ContentError::Parse("Product id cannot be empty".to_string()));
        }

        Ok(LoadedProduct {
            position: meta.position,
            signature: meta.signature,
            details_html: render_markdown(&parsed.content),
            product: Product {
                id: ProductId::new(meta.id),
                name: meta.name,
                description: meta.description,
                price: meta.price,
                image: meta.image,
                categories: meta.categories,
                ingredients: meta.ingredients,
                allergens: meta.allergens,
                gallery: meta.gallery,
            },
        })
    }

    /// Load all pages from the pages directory
    fn load_pages(dir: &Path) -> Result<HashMap<String, Page>, ContentError> {
        let mut pages = HashMap::new();

        if !dir.exists() {
            tracing::warn!("Pages directory does not exist: {:?}", dir);
            return Ok(pages);
        }

        for path in markdown_files(dir)? {
            match Self::load_page(&path) {
                Ok(page) => {
                    tracing::debug!("Loaded page: {}", page.slug);
                    pages.insert(page.slug.clone(), page);
                }
                Err(e) => {
                    tracing::error!("Failed to load page {:?}: {}", path, e);
                }
            }
        }

        Ok(pages)
    }

    /// Load a single page from a markdown file
    fn load_page(path: &Path) -> Result<Page, ContentError> {
        let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
            .to_string();

        let matter = Matter::<YAML>::new();
        let parsed: ParsedEntity<PageMeta> = matter
            .parse(&content)
            .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
        let meta = parsed
            .data
            .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

        let content_html = render_markdown(&parsed.content);

        Ok(Page {
            slug,
            meta,
            content_html,
        })
    }

    /// The product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Rendered markdown details for a product, if its file had a body.
    #[must_use]
    pub fn product_details(&self, id: &str) -> Option<&str> {
        self.details.get(id).map(String::as_str)
    }

    /// Products for the home page "signature creations" section.
    ///
    /// Falls back to the first few catalog products when none is flagged.
    #[must_use]
    pub fn signature_products(&self) -> Vec<&Product> {
        if self.signature.is_empty() {
            return self
                .catalog
                .products()
                .iter()
                .take(DEFAULT_SIGNATURE_COUNT)
                .collect();
        }
        self.signature
            .iter()
            .filter_map(|id| self.catalog.get(id.as_str()))
            .collect()
    }

    /// Get a page by slug
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }
}

/// Markdown files of a directory, sorted by path.
fn markdown_files(dir: &Path) -> Result<Vec<std::path::PathBuf>, ContentError> {
    let entries = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;
    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
        .collect();
    paths.sort();
    Ok(paths)
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;

    // Content is authored by the shop, raw HTML is allowed
    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Content loading errors
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
