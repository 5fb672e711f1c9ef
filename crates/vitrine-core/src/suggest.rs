//! # Search Suggestion Ranking
//!
//! Turns a raw free-text query plus an upstream product page into a
//! deduplicated, ranked list of query completions.
//!
//! ## Ranking Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Suggestion Pipeline                                  │
//! │                                                                         │
//! │  rawQuery ──► trim ──► empty? ──► []                                    │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  1. Product titles containing query      (candidate order)             │
//! │  2. Category vocabulary contains-match   (vocabulary order)            │
//! │  3. Brand vocabulary contains-match                                    │
//! │  4. Keyword vocabulary contains-match                                  │
//! │  5. Curated expansions for trigger substrings in the query             │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  6. Prefix pass: entries NOT containing the query become               │
//! │     "{query} {entry}"; entries already containing it are left as-is    │
//! │  7. Dedupe (exact string equality, first-seen wins), truncate          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All matching is case-insensitive **substring containment**, not word
//! boundaries. A query of "op" matching "top deals" is intentional
//! fuzziness, not a bug: short queries are cheap to over-suggest and the
//! prefix pass anchors everything back to what the user typed.

use std::collections::HashSet;

use crate::types::Product;

// =============================================================================
// Fixed Vocabularies
// =============================================================================
// All entries are lowercase; the query is lowercased before matching.

/// Category names known to the storefront.
const CATEGORIES: &[&str] = &[
    "smartphones",
    "laptops",
    "tablets",
    "headphones",
    "smartwatches",
    "cameras",
    "gaming",
    "accessories",
];

/// Brand names carried by the storefront.
const BRANDS: &[&str] = &[
    "apple", "samsung", "google", "oneplus", "sony", "dell", "lenovo", "bose",
    "jbl", "anker",
];

/// Product-type keywords and campaign phrases.
const KEYWORDS: &[&str] = &[
    "phone case",
    "charger",
    "wireless charger",
    "bluetooth speaker",
    "earbuds",
    "screen protector",
    "power bank",
    "price drop",
    "top deals",
];

/// Curated model-level expansions, keyed by a trigger substring of the
/// query. Multiple triggers may fire; each appends its full list.
const CURATED: &[(&str, &[&str])] = &[
    (
        "samsung",
        &[
            "samsung galaxy s24",
            "samsung galaxy s24 ultra",
            "samsung galaxy a55",
            "samsung galaxy watch",
        ],
    ),
    (
        "galaxy",
        &[
            "samsung galaxy s24",
            "samsung galaxy z flip",
            "samsung galaxy buds",
        ],
    ),
    (
        "iphone",
        &["iphone 15", "iphone 15 pro", "iphone 15 pro max", "iphone 14"],
    ),
    (
        "apple",
        &["iphone 15", "apple watch series 9", "airpods pro", "macbook air m3"],
    ),
    (
        "pixel",
        &["google pixel 8", "google pixel 8 pro", "google pixel buds"],
    ),
    (
        "macbook",
        &["macbook air m3", "macbook pro 14", "macbook pro 16"],
    ),
];

// =============================================================================
// Public API
// =============================================================================

/// Builds a ranked, deduplicated suggestion list for `raw_query`.
///
/// `candidates` is the product page an upstream search already returned for
/// the same query; its titles are the highest-precedence source. The result
/// has length ≤ `max_results` and no duplicate strings.
///
/// An empty or whitespace-only query yields an empty list; callers should
/// short-circuit before even performing the product lookup in that case.
///
/// ## Precedence
/// Precedence governs *ordering*, not early termination: all sources are
/// gathered first, then deduplicated and truncated, so a category match can
/// still be pushed out by enough title matches.
pub fn build_suggestions(
    raw_query: &str,
    candidates: &[Product],
    max_results: usize,
) -> Vec<String> {
    let query = raw_query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut pool: Vec<String> = Vec::new();

    // 1. Exact product-title matches, in candidate order.
    for product in candidates {
        if product.title_contains(&needle) {
            pool.push(product.title.clone());
        }
    }

    // 2.-4. Vocabulary contains-matches, in vocabulary order.
    for vocabulary in [CATEGORIES, BRANDS, KEYWORDS] {
        for entry in vocabulary {
            if entry.contains(&needle) {
                pool.push((*entry).to_string());
            }
        }
    }

    // 5. Curated expansions: every trigger contained in the query fires.
    for (trigger, expansions) in CURATED {
        if needle.contains(trigger) {
            pool.extend(expansions.iter().map(|s| (*s).to_string()));
        }
    }

    // 6. Prefix pass: anchor entries that don't mention the query.
    // 7. Dedupe (first-seen wins) and truncate.
    let mut seen: HashSet<String> = HashSet::new();
    let mut suggestions: Vec<String> = Vec::new();

    for entry in pool {
        let anchored = if entry.to_lowercase().contains(&needle) {
            entry
        } else {
            format!("{} {}", query, entry)
        };

        if seen.insert(anchored.clone()) {
            suggestions.push(anchored);
            if suggestions.len() == max_results {
                break;
            }
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SUGGESTION_LIMIT;

    fn product(title: &str) -> Product {
        Product {
            id: format!("id-{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            description: None,
            brand: None,
            category: None,
            price_cents: 9900,
            currency: "USD".into(),
            in_stock: true,
            image_url: None,
        }
    }

    #[test]
    fn test_empty_query_yields_nothing() {
        let products = vec![product("iPhone 15 Pro")];
        assert!(build_suggestions("", &products, DEFAULT_SUGGESTION_LIMIT).is_empty());
        assert!(build_suggestions("   ", &products, DEFAULT_SUGGESTION_LIMIT).is_empty());
        assert!(build_suggestions("\t\n", &products, DEFAULT_SUGGESTION_LIMIT).is_empty());
    }

    #[test]
    fn test_title_match_kept_verbatim_and_first() {
        let products = vec![product("iPhone 15 Pro")];
        let suggestions = build_suggestions("iphone", &products, DEFAULT_SUGGESTION_LIMIT);

        // The literal title already contains the query, so it is neither
        // rewritten nor duplicated, and it ranks first.
        assert_eq!(suggestions[0], "iPhone 15 Pro");
        assert_eq!(
            suggestions.iter().filter(|s| *s == "iPhone 15 Pro").count(),
            1
        );
    }

    #[test]
    fn test_unmatched_query_yields_nothing() {
        let suggestions = build_suggestions("xyz123notfound", &[], DEFAULT_SUGGESTION_LIMIT);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_curated_expansion_for_samsung() {
        let suggestions = build_suggestions("samsung", &[], DEFAULT_SUGGESTION_LIMIT);

        assert!(suggestions.contains(&"samsung galaxy s24".to_string()));
        assert!(suggestions.len() <= DEFAULT_SUGGESTION_LIMIT);

        let unique: HashSet<&String> = suggestions.iter().collect();
        assert_eq!(unique.len(), suggestions.len(), "no duplicates allowed");
    }

    #[test]
    fn test_prefix_pass_anchors_foreign_entries() {
        // The "apple" curated list contains model names that do not mention
        // "apple"; those get query-anchored, while the brand entry and
        // entries like "apple watch series 9" pass through untouched.
        let suggestions = build_suggestions("apple", &[], DEFAULT_SUGGESTION_LIMIT);

        assert!(suggestions.contains(&"apple".to_string()));
        assert!(suggestions.contains(&"apple iphone 15".to_string()));
        assert!(suggestions.contains(&"apple watch series 9".to_string()));
        assert!(!suggestions.iter().any(|s| s == "iphone 15"));
    }

    #[test]
    fn test_duplicate_source_strings_collapse_to_first() {
        let products = vec![
            product("Pixel 8 Case"),
            product("Pixel 8 Case"),
            product("Pixel 8 Stand"),
        ];
        let suggestions = build_suggestions("pixel 8 case", &products, DEFAULT_SUGGESTION_LIMIT);

        assert_eq!(
            suggestions.iter().filter(|s| *s == "Pixel 8 Case").count(),
            1
        );
        assert_eq!(suggestions[0], "Pixel 8 Case");
    }

    #[test]
    fn test_substring_matching_is_intentionally_fuzzy() {
        // "drop" is contained in the "price drop" campaign keyword even
        // though it is not a word-boundary match.
        let suggestions = build_suggestions("drop", &[], DEFAULT_SUGGESTION_LIMIT);
        assert!(suggestions.contains(&"price drop".to_string()));
    }

    #[test]
    fn test_multiple_triggers_each_contribute() {
        // "samsung galaxy" contains both the "samsung" and "galaxy"
        // triggers; their lists overlap on "samsung galaxy s24" which must
        // appear exactly once.
        let suggestions = build_suggestions("samsung galaxy", &[], 20);

        assert!(suggestions.contains(&"samsung galaxy s24".to_string()));
        assert!(suggestions.contains(&"samsung galaxy z flip".to_string()));
        assert_eq!(
            suggestions
                .iter()
                .filter(|s| *s == "samsung galaxy s24")
                .count(),
            1
        );
    }

    #[test]
    fn test_truncation_to_max_results() {
        let products: Vec<Product> = (0..20)
            .map(|i| product(&format!("Samsung Screen {}", i)))
            .collect();
        let suggestions = build_suggestions("samsung", &products, 5);
        assert_eq!(suggestions.len(), 5);

        // Highest-precedence source (titles) fills the truncated list.
        assert!(suggestions.iter().all(|s| s.starts_with("Samsung Screen")));
    }

    #[test]
    fn test_candidate_order_is_preserved() {
        let products = vec![
            product("Sony WH-1000XM5"),
            product("Sony Bravia"),
            product("Sony Alpha 7"),
        ];
        let suggestions = build_suggestions("sony", &products, DEFAULT_SUGGESTION_LIMIT);

        let titles: Vec<&String> = suggestions
            .iter()
            .filter(|s| s.starts_with("Sony"))
            .collect();
        assert_eq!(titles, ["Sony WH-1000XM5", "Sony Bravia", "Sony Alpha 7"]);
    }

    #[test]
    fn test_query_casing_preserved_in_prefix() {
        // The anchor uses the query as typed, not its lowercased form.
        let suggestions = build_suggestions("Apple", &[], DEFAULT_SUGGESTION_LIMIT);
        assert!(suggestions.contains(&"Apple iphone 15".to_string()));
    }
}
