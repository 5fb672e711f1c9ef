//! # vitrine-core: Pure Client-State Logic for Vitrine
//!
//! This crate is the **heart** of the Vitrine storefront client. It contains
//! the state machines and ranking logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Vitrine Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Presentation (storefront UI)                   │   │
//! │  │    Hero carousel ──► Search bar ──► Cart badge ──► Account     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              vitrine-state (tokio runtime layer)                │   │
//! │  │    CarouselScheduler, SessionSlot, InvalidationBus             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ vitrine-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ carousel  │  │  suggest  │  │ validation│  │   │
//! │  │   │  Product  │  │ Carousel  │  │  ranking  │  │   rules   │  │   │
//! │  │   │ Cart/Cust │  │ Snapshot  │  │  vocab    │  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO TIMERS • NO NETWORK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Cart, Customer, SearchResponse)
//! - [`carousel`] - Carousel state machine (slide index, autoplay flags)
//! - [`suggest`] - Search suggestion ranking
//! - [`validation`] - Input validation for the API boundary
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every transition is deterministic - same input = same output
//! 2. **No I/O**: Timers, network, and storage access are FORBIDDEN here
//! 3. **Defensive UI Semantics**: Out-of-range requests are silently ignored,
//!    never surfaced as errors a component would have to handle mid-render
//! 4. **Explicit Errors**: Construction-time problems are typed, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrine_core::carousel::{Carousel, CarouselConfig};
//!
//! let config = CarouselConfig::new(4).unwrap();
//! let mut carousel = Carousel::new(config);
//!
//! carousel.advance();
//! assert_eq!(carousel.current_slide(), 1);
//!
//! // Out-of-range goto is a silent no-op, not an error
//! carousel.go_to(99);
//! assert_eq!(carousel.current_slide(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod carousel;
pub mod error;
pub mod suggest;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use vitrine_core::Carousel` instead of
// `use vitrine_core::carousel::Carousel`

pub use carousel::{Carousel, CarouselConfig, CarouselSnapshot};
pub use error::{CoreError, CoreResult};
pub use suggest::build_suggestions;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default autoplay interval for carousels, in milliseconds.
///
/// ## Why 5000?
/// Long enough to read a promotional slide, short enough that the hero
/// banner still feels alive. Overridable per carousel via
/// [`CarouselConfig`].
pub const DEFAULT_AUTOPLAY_INTERVAL_MS: u64 = 5000;

/// Default maximum number of search suggestions returned.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Maximum length of a raw search query, in characters.
///
/// Queries longer than this are rejected at the API boundary before any
/// catalog lookup happens.
pub const MAX_QUERY_LENGTH: usize = 100;

/// Maximum product limit a single search request may ask for.
pub const MAX_SEARCH_LIMIT: usize = 50;
