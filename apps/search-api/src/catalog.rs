//! Product catalog seam.
//!
//! The commerce backend's search is an opaque asynchronous collaborator.
//! Everything this app knows about it is the [`ProductCatalog`] trait; the
//! seeded [`DemoCatalog`] stands in for local development and tests.

use async_trait::async_trait;
use tracing::debug;

use vitrine_core::Product;

use crate::error::ApiError;

/// One page of upstream search results.
#[derive(Debug, Clone)]
pub struct CatalogPage {
    /// Products on this page, already truncated to the requested limit.
    pub products: Vec<Product>,

    /// Total number of matches upstream (may exceed `products.len()`).
    pub count: usize,
}

/// Opaque upstream product search.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Searches the catalog. `country_code` selects a market-specific
    /// storefront where the backend supports one.
    async fn search(
        &self,
        query: &str,
        limit: usize,
        country_code: Option<&str>,
    ) -> Result<CatalogPage, ApiError>;
}

// =============================================================================
// Demo Catalog
// =============================================================================

/// In-memory catalog seeded with a representative electronics assortment.
pub struct DemoCatalog {
    products: Vec<Product>,
}

impl DemoCatalog {
    /// Creates a catalog over an explicit product set.
    pub fn new(products: Vec<Product>) -> Self {
        DemoCatalog { products }
    }

    /// Creates a catalog with the stock demo assortment.
    pub fn with_seed_data() -> Self {
        Self::new(seed_products())
    }
}

#[async_trait]
impl ProductCatalog for DemoCatalog {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        country_code: Option<&str>,
    ) -> Result<CatalogPage, ApiError> {
        let needle = query.to_lowercase();
        debug!(query = %query, limit, country = ?country_code, "Demo catalog lookup");

        let matches: Vec<Product> = self
            .products
            .iter()
            .filter(|p| {
                p.title_contains(&needle)
                    || p.brand
                        .as_deref()
                        .is_some_and(|b| b.to_lowercase().contains(&needle))
                    || p.category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();

        let count = matches.len();
        let products = matches.into_iter().take(limit).collect();

        Ok(CatalogPage { products, count })
    }
}

fn seed_product(
    id: &str,
    title: &str,
    brand: &str,
    category: &str,
    price_cents: i64,
) -> Product {
    Product {
        id: id.to_string(),
        title: title.to_string(),
        description: None,
        brand: Some(brand.to_string()),
        category: Some(category.to_string()),
        price_cents,
        currency: "USD".to_string(),
        in_stock: true,
        image_url: None,
    }
}

/// The demo assortment. Titles deliberately overlap the suggestion
/// vocabularies so local search feels like the real storefront.
fn seed_products() -> Vec<Product> {
    vec![
        seed_product("d6a1", "iPhone 15 Pro", "apple", "smartphones", 99900),
        seed_product("d6a2", "iPhone 15", "apple", "smartphones", 79900),
        seed_product("d6a3", "Samsung Galaxy S24", "samsung", "smartphones", 85900),
        seed_product("d6a4", "Samsung Galaxy Watch 6", "samsung", "smartwatches", 29900),
        seed_product("d6a5", "Google Pixel 8", "google", "smartphones", 69900),
        seed_product("d6a6", "MacBook Air M3", "apple", "laptops", 109900),
        seed_product("d6a7", "Dell XPS 13", "dell", "laptops", 119900),
        seed_product("d6a8", "Sony WH-1000XM5", "sony", "headphones", 39900),
        seed_product("d6a9", "JBL Flip 6 Bluetooth Speaker", "jbl", "accessories", 12900),
        seed_product("d6aa", "Anker 20K Power Bank", "anker", "accessories", 4900),
        seed_product("d6ab", "OnePlus 12", "oneplus", "smartphones", 74900),
        seed_product("d6ac", "Apple Watch Series 9", "apple", "smartwatches", 42900),
    ]
}
