//! # vitrine-state: Async Client-State Layer
//!
//! The tokio runtime layer that drives the pure machines in `vitrine-core`.
//! Three independent, composable components, each consumed by presentation
//! code but self-contained in its contract:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      vitrine-state Components                           │
//! │                                                                         │
//! │  ┌──────────────────┐   leaf component, no dependencies                 │
//! │  │CarouselScheduler │   owns slide-index state + the autoplay timer     │
//! │  └──────────────────┘                                                   │
//! │                                                                         │
//! │  ┌──────────────────┐   wraps an async accessor (cart / customer)      │
//! │  │   SessionSlot    │   with cross-tab invalidation refresh            │
//! │  └────────┬─────────┘                                                   │
//! │           │ subscribes                                                  │
//! │  ┌────────▼─────────┐   explicit broadcast primitive standing in for   │
//! │  │ InvalidationBus  │   the browser's storage-change event             │
//! │  └──────────────────┘                                                   │
//! │                                                                         │
//! │  None of the three call each other; they are peers composed by UI      │
//! │  code. Coordination happens ONLY through the shared bus.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency Model
//!
//! Single-runtime, cooperative: timer callbacks and fetch completions
//! interleave as tasks. Each component follows the component + `Handle` +
//! spawned `run()` loop shape. Shutting a handle down (or dropping it)
//! synchronously stops the loop: the timer is cancelled and the bus
//! subscription dropped. An in-flight fetch may still settle afterwards; its
//! result lands in a closed channel and is discarded, never a crash.
//!
//! ## Modules
//!
//! - [`carousel`] - [`CarouselScheduler`]: timer-driven slide advancement
//! - [`session`] - [`SessionSlot`]: cached session state with silent refresh
//! - [`invalidation`] - [`InvalidationBus`]: cross-tab "changed" fan-out
//! - [`error`] - State-layer error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod carousel;
pub mod error;
pub mod invalidation;
pub mod session;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use carousel::{CarouselHandle, CarouselScheduler};
pub use error::{StateError, StateResult};
pub use invalidation::{InvalidationBus, InvalidationEvent, InvalidationReceiver, TabId};
pub use session::{
    CartSlot, CustomerSlot, SessionSlot, SessionSlotHandle, SessionSnapshot, SessionSource,
};
