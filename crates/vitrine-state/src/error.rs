//! # State-Layer Error Types
//!
//! Error types for the async client-state layer.
//!
//! ## Design Principles
//! - A failed session fetch is NOT an error at the component boundary: it
//!   degrades to "no session" inside the slot. [`StateError::Fetch`] exists
//!   for accessor implementations to return, and for logs
//! - Channel errors mean the peer task is gone; callers treat them as
//!   "component already shut down"
//! - All errors are `Send + Sync` for async compatibility

use thiserror::Error;

use vitrine_core::CoreError;

/// Result type alias for state-layer operations.
pub type StateResult<T> = Result<T, StateError>;

/// State-layer error type.
#[derive(Debug, Error)]
pub enum StateError {
    // =========================================================================
    // Accessor Errors
    // =========================================================================
    /// An async accessor (cart/customer/catalog fetch) rejected.
    #[error("Fetch failed: {0}")]
    Fetch(String),

    // =========================================================================
    // Component Lifecycle Errors
    // =========================================================================
    /// A command or event channel is closed (peer task has exited).
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// The component is shutting down and no longer accepts commands.
    #[error("Component is shutting down")]
    ShuttingDown,

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid component configuration (propagated from vitrine-core).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] CoreError),
}

impl StateError {
    /// Returns true if the operation may succeed on retry.
    ///
    /// ## Retryable
    /// - Fetch failures (network blips; the next invalidation re-fetches)
    ///
    /// ## Non-Retryable
    /// - Closed channels and shutdown (the component is gone)
    /// - Configuration errors (the caller must fix its input)
    pub fn is_retryable(&self) -> bool {
        matches!(self, StateError::Fetch(_))
    }
}
