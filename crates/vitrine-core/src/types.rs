//! # Domain Types
//!
//! Core domain types shared between the storefront frontend and the Rust
//! layers.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Cart       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  title          │   │  lines[]        │   │  email          │       │
//! │  │  brand/category │   │  currency       │   │  first/last     │       │
//! │  │  price_cents    │   │  updated_at     │   │  name           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────┐       │
//! │  │                      SearchResponse                         │       │
//! │  │          { products, suggestions, count }: the JSON         │       │
//! │  │          payload of GET /api/search                         │       │
//! │  └─────────────────────────────────────────────────────────────┘       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization Convention
//! Every type here crosses the frontend boundary, so all of them use
//! `camelCase` field names and export TypeScript bindings via ts-rs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Product
// =============================================================================

/// A product returned by the upstream catalog lookup.
///
/// For the suggestion engine this is deliberately opaque: only `title`,
/// `brand`, and `category` participate in matching. Everything else rides
/// along for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display title shown in result lists and suggestions.
    pub title: String,

    /// Optional long-form description.
    pub description: Option<String>,

    /// Brand name, if known.
    pub brand: Option<String>,

    /// Category slug, if known.
    pub category: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// ISO 4217 currency code (e.g. "USD").
    pub currency: String,

    /// Whether the product is currently purchasable.
    pub in_stock: bool,

    /// Primary image URL, if any.
    pub image_url: Option<String>,
}

impl Product {
    /// Returns true if the product title contains `needle`
    /// case-insensitively.
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// One line in a cart.
///
/// ## Price Freezing
/// The unit price is captured when the line is created by the commerce
/// backend. A later catalog price change does not retroactively change an
/// open cart.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// Product title at time of adding (frozen).
    pub title: String,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in cart.
    pub quantity: i64,
}

impl CartLine {
    /// Calculates the line total (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

/// A snapshot of the customer's cart as fetched from the commerce backend.
///
/// ## Invariants
/// - Lines are unique by `product_id` (maintained by the backend)
/// - `None`-valued carts at the session layer mean "no cart yet", which is
///   distinct from an existing cart with zero lines
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    /// Cart ID (UUID).
    pub id: String,

    /// Lines in the cart.
    pub lines: Vec<CartLine>,

    /// ISO 4217 currency code for all line prices.
    pub currency: String,

    /// When the cart was last modified server-side.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Returns the number of distinct lines in the cart.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines (badge count).
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal across all lines.
    pub fn subtotal_cents(&self) -> i64 {
        self.lines.iter().map(|l| l.line_total_cents()).sum()
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Customer
// =============================================================================

/// The authenticated customer, as fetched from the commerce backend.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    /// Customer ID (UUID).
    pub id: String,

    /// Login email.
    pub email: String,

    /// Given name, if provided.
    pub first_name: Option<String>,

    /// Family name, if provided.
    pub last_name: Option<String>,
}

impl Customer {
    /// Returns a human-friendly display name, falling back to the email
    /// when no name is on file.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

// =============================================================================
// Search Response
// =============================================================================

/// JSON payload returned by `GET /api/search`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SearchResponse {
    /// Products matched by the upstream catalog.
    pub products: Vec<Product>,

    /// Ranked, deduplicated query completions.
    pub suggestions: Vec<String>,

    /// Total number of products matched upstream (may exceed
    /// `products.len()` when the limit truncated the page).
    pub count: usize,
}

impl SearchResponse {
    /// An empty response, used when the query short-circuits.
    pub fn empty() -> Self {
        SearchResponse {
            products: Vec::new(),
            suggestions: Vec::new(),
            count: 0,
        }
    }
}
