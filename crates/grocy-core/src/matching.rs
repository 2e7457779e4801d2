//! # Matching Module
//!
//! Product name matching for `match_product_by_name` and `search_products`.
//!
//! Scoring (case-insensitive):
//! - 100 when the names are equal
//! - 80 when either name contains the other
//! - up to 60 in fuzzy mode, proportional to the share of query words that
//!   overlap some product word
//!
//! Scores are integers; the fuzzy share is rounded half-up without floats.

use crate::{GrocyError, Product};
use serde::Serialize;
use serde_json::Value;

/// Score for a case-insensitive exact match.
pub const EXACT_SCORE: u8 = 100;

/// Score when one name contains the other.
pub const CONTAINS_SCORE: u8 = 80;

/// Ceiling of the word-overlap score.
pub const FUZZY_MAX_SCORE: u8 = 60;

/// Number of matches returned when the caller gives no limit.
pub const DEFAULT_MATCH_LIMIT: usize = 5;

/// How a product name matched the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Contains,
    Fuzzy,
    None,
}

/// Score of one candidate name against a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchScore {
    /// 0 to 100.
    pub score: u8,
    pub kind: MatchKind,
}

impl MatchScore {
    const NONE: Self = Self {
        score: 0,
        kind: MatchKind::None,
    };
}

/// A ranked product, as reported by `match_product_by_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductMatch {
    pub id: u64,
    pub name: String,
    pub match_score: u8,
    pub match_type: MatchKind,
}

/// Result payload of `match_product_by_name`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub query: String,
    pub matches_found: usize,
    pub results: Vec<ProductMatch>,
}

/// Score `candidate` against `query`.
///
/// An empty candidate never matches; otherwise every name would "contain"
/// it.
#[must_use]
pub fn score_name(query: &str, candidate: &str, fuzzy: bool) -> MatchScore {
    let query = query.to_lowercase();
    let candidate = candidate.to_lowercase();

    if query.is_empty() || candidate.is_empty() {
        return MatchScore::NONE;
    }
    if candidate == query {
        return MatchScore {
            score: EXACT_SCORE,
            kind: MatchKind::Exact,
        };
    }
    if candidate.contains(&query) || query.contains(&candidate) {
        return MatchScore {
            score: CONTAINS_SCORE,
            kind: MatchKind::Contains,
        };
    }
    if !fuzzy {
        return MatchScore::NONE;
    }

    let query_words: Vec<&str> = query.split_whitespace().collect();
    let candidate_words: Vec<&str> = candidate.split_whitespace().collect();
    if query_words.is_empty() {
        return MatchScore::NONE;
    }

    let matched = query_words
        .iter()
        .filter(|qw| {
            candidate_words
                .iter()
                .any(|cw| cw.contains(**qw) || qw.contains(*cw))
        })
        .count();

    // round(60 * matched / total), half-up
    let total = query_words.len();
    let max = usize::from(FUZZY_MAX_SCORE);
    let score = (2 * matched * max + total) / (2 * total);

    if score == 0 {
        MatchScore::NONE
    } else {
        MatchScore {
            score: score as u8,
            kind: MatchKind::Fuzzy,
        }
    }
}

/// Rank `products` against `query`, best first, keeping at most `limit`.
///
/// Zero-score products are dropped. Ties keep catalog order.
pub fn rank_products(
    query: &str,
    products: &[Product],
    fuzzy: bool,
    limit: usize,
) -> Result<MatchReport, GrocyError> {
    if query.trim().is_empty() {
        return Err(GrocyError::InvalidArgument(
            "name must not be empty".to_string(),
        ));
    }
    if limit == 0 {
        return Err(GrocyError::InvalidArgument(
            "limit must be at least 1".to_string(),
        ));
    }

    let mut results: Vec<ProductMatch> = products
        .iter()
        .filter_map(|p| {
            let s = score_name(query, &p.name, fuzzy);
            (s.score > 0).then(|| ProductMatch {
                id: p.id,
                name: p.name.clone(),
                match_score: s.score,
                match_type: s.kind,
            })
        })
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| b.match_score.cmp(&a.match_score));
    results.truncate(limit);

    Ok(MatchReport {
        query: query.to_string(),
        matches_found: results.len(),
        results,
    })
}

/// Keep the raw product objects whose `name` contains `query`
/// (case-insensitive). Objects without a string name are dropped.
#[must_use]
pub fn filter_by_name(products: Vec<Value>, query: &str) -> Vec<Value> {
    let query = query.to_lowercase();
    products
        .into_iter()
        .filter(|p| {
            p.get("name")
                .and_then(Value::as_str)
                .is_some_and(|name| name.to_lowercase().contains(&query))
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
