//! The search endpoint.
//!
//! `GET /api/search?q=<query>&limit=<n>&countryCode=<cc>` returns
//! `{ products, suggestions, count }`.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Search Request Flow                              │
//! │                                                                         │
//! │  q ──► validate (length) ──► empty? ──► { [], [], 0 }  (no catalog hit) │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  catalog.search(q, limit, countryCode)                                  │
//! │        │                  │                                             │
//! │        │ failure          ▼ success                                     │
//! │        │           build_suggestions(q, products)                       │
//! │        ▼                  │                                             │
//! │  error! log +             ▼                                             │
//! │  generic 502       { products, suggestions, count }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, error};

use vitrine_core::validation::{clamp_limit, validate_search_query};
use vitrine_core::{build_suggestions, SearchResponse, DEFAULT_SUGGESTION_LIMIT};

use crate::catalog::ProductCatalog;
use crate::config::ApiConfig;
use crate::error::ApiError;

// =============================================================================
// Application State
// =============================================================================

/// Shared state for the search routes.
#[derive(Clone)]
pub struct AppState {
    /// The opaque upstream catalog.
    pub catalog: Arc<dyn ProductCatalog>,

    /// API configuration.
    pub config: Arc<ApiConfig>,
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .with_state(state)
}

// =============================================================================
// Handler
// =============================================================================

/// Query-string parameters of `GET /api/search`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Raw free-text query.
    pub q: Option<String>,

    /// Requested product page size.
    pub limit: Option<usize>,

    /// Market selector forwarded to the catalog.
    pub country_code: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&state, params).await.map(Json)
}

/// Handler body, separated from the axum extractors for direct testing.
pub async fn run_search(state: &AppState, params: SearchParams) -> Result<SearchResponse, ApiError> {
    let query = validate_search_query(params.q.as_deref().unwrap_or(""))?;

    // Empty query short-circuits before any catalog lookup.
    if query.is_empty() {
        debug!("Empty search query, short-circuiting");
        return Ok(SearchResponse::empty());
    }

    let limit = clamp_limit(params.limit, state.config.default_limit);

    let page = state
        .catalog
        .search(&query, limit, params.country_code.as_deref())
        .await
        .map_err(|err| {
            error!(query = %query, %err, "Upstream search failed");
            err
        })?;

    let suggestions = build_suggestions(&query, &page.products, DEFAULT_SUGGESTION_LIMIT);
    debug!(
        query = %query,
        products = page.products.len(),
        suggestions = suggestions.len(),
        "Search completed"
    );

    Ok(SearchResponse {
        products: page.products,
        suggestions,
        count: page.count,
    })
}
