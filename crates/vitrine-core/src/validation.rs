//! # Validation Module
//!
//! Input validation for the search API boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend                                                      │
//! │  ├── Debounced input, basic length caps                                │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: search-api handler                                           │
//! │  ├── Type validation (query-string deserialization)                    │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Upstream catalog                                             │
//! │  └── Its own limits; we never forward unvalidated input                │
//! │                                                                         │
//! │  Defense in depth: an empty query never reaches the catalog at all.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult};
use crate::{MAX_QUERY_LENGTH, MAX_SEARCH_LIMIT};

/// Validates and normalizes a raw search query.
///
/// ## Rules
/// - Leading/trailing whitespace is stripped
/// - Empty is ALLOWED (the caller short-circuits to an empty response)
/// - Maximum length is [`MAX_QUERY_LENGTH`] characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> CoreResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_QUERY_LENGTH {
        return Err(CoreError::TooLong {
            field: "q".to_string(),
            max: MAX_QUERY_LENGTH,
        });
    }

    Ok(query.to_string())
}

/// Clamps a requested result limit into the supported range.
///
/// ## Rules
/// - `None` or 0 falls back to `default`
/// - Anything above [`MAX_SEARCH_LIMIT`] is clamped down, not rejected:
///   an over-eager limit is a tuning knob, not a client error
pub fn clamp_limit(requested: Option<usize>, default: usize) -> usize {
    match requested {
        None | Some(0) => default,
        Some(n) => n.min(MAX_SEARCH_LIMIT),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(validate_search_query("  iphone  ").unwrap(), "iphone");
    }

    #[test]
    fn test_empty_query_is_allowed() {
        assert_eq!(validate_search_query("").unwrap(), "");
        assert_eq!(validate_search_query("   ").unwrap(), "");
    }

    #[test]
    fn test_overlong_query_is_rejected() {
        let long = "a".repeat(MAX_QUERY_LENGTH + 1);
        assert_eq!(
            validate_search_query(&long).unwrap_err(),
            CoreError::TooLong {
                field: "q".into(),
                max: MAX_QUERY_LENGTH
            }
        );

        let exactly = "a".repeat(MAX_QUERY_LENGTH);
        assert!(validate_search_query(&exactly).is_ok());
    }

    #[test]
    fn test_limit_clamping() {
        assert_eq!(clamp_limit(None, 8), 8);
        assert_eq!(clamp_limit(Some(0), 8), 8);
        assert_eq!(clamp_limit(Some(12), 8), 12);
        assert_eq!(clamp_limit(Some(10_000), 8), MAX_SEARCH_LIMIT);
    }
}
