//! # Domain Error Types
//!
//! Error types for vitrine-core.
//!
//! ## Design Principles
//! - Expected UI conditions (out-of-range slide, empty query) are NOT errors;
//!   they are silent no-ops handled inside the state machines
//! - Errors here are construction/validation problems a caller must fix
//! - All errors are `Send + Sync` for async compatibility

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Domain error type for vitrine-core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // =========================================================================
    // Carousel Configuration Errors
    // =========================================================================
    /// A carousel must have at least one slide.
    #[error("Carousel requires at least 1 slide, got {0}")]
    EmptyCarousel(usize),

    /// The autoplay interval must be strictly positive.
    #[error("Autoplay interval must be greater than zero")]
    ZeroInterval,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// A required field was empty.
    #[error("Validation failed: {field} is required")]
    Required { field: String },

    /// A field exceeded its maximum length.
    #[error("Validation failed: {field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

impl CoreError {
    /// Returns true if this error indicates a caller-side validation problem
    /// (as opposed to a misconfigured component).
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            CoreError::Required { .. } | CoreError::TooLong { .. }
        )
    }
}
