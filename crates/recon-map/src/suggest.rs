//! Advisory fuzzy ranking of survey rows.
//!
//! Scores are token-set ratios in `0..=100` computed on normalized text.
//! Nothing here touches a [`crate::PairingSession`]; callers pass the pool
//! of unclaimed rows and apply a pick through `propose`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use rapidfuzz::distance::indel;
use recon_model::SurveyRecord;
use serde::{Deserialize, Serialize};

use crate::utils::normalize_text;

/// Ranking parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionParams {
    /// Maximum number of suggestions returned.
    pub top_k: usize,
    /// Scores below this floor are dropped.
    pub min_score: Option<f64>,
}

impl Default for SuggestionParams {
    fn default() -> Self {
        Self {
            top_k: 5,
            min_score: None,
        }
    }
}

/// One ranked candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion<'a> {
    pub record: &'a SurveyRecord,
    pub score: f64,
}

fn ratio(a: &str, b: &str) -> f64 {
    indel::normalized_similarity(a.chars(), b.chars()) * 100.0
}

fn join(tokens: impl IntoIterator<Item = impl AsRef<str>>) -> String {
    tokens
        .into_iter()
        .map(|token| token.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Token-set similarity of two strings, `0..=100`.
///
/// Both sides are normalized and split into token sets. The score is the
/// best plain ratio among the shared tokens and each side's shared tokens
/// followed by its remaining tokens. A full subset scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let a_norm = normalize_text(a);
    let b_norm = normalize_text(b);
    let tokens_a: BTreeSet<&str> = a_norm.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b_norm.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared = join(tokens_a.intersection(&tokens_b));
    let only_a = join(tokens_a.difference(&tokens_b));
    let only_b = join(tokens_b.difference(&tokens_a));

    if !shared.is_empty() && (only_a.is_empty() || only_b.is_empty()) {
        return 100.0;
    }

    let combined_a = join([shared.as_str(), only_a.as_str()].into_iter().filter(|s| !s.is_empty()));
    let combined_b = join([shared.as_str(), only_b.as_str()].into_iter().filter(|s| !s.is_empty()));

    let mut best = ratio(&combined_a, &combined_b);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared, &combined_a))
            .max(ratio(&shared, &combined_b));
    }
    best
}

/// Rank `pool` against `query`.
///
/// Returns at most `params.top_k` candidates by descending score, ties in
/// table order. A blank query yields nothing.
pub fn suggest<'a, I>(query: &str, pool: I, params: &SuggestionParams) -> Vec<Suggestion<'a>>
where
    I: IntoIterator<Item = &'a SurveyRecord>,
{
    if query.trim().is_empty() || params.top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<Suggestion<'a>> = pool
        .into_iter()
        .map(|record| Suggestion {
            record,
            score: token_set_ratio(query, &record.match_text()),
        })
        .filter(|suggestion| params.min_score.is_none_or(|floor| suggestion.score >= floor))
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.record.row.cmp(&b.record.row))
    });
    scored.truncate(params.top_k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(row: usize, key: &str, name: &str, note: &str) -> SurveyRecord {
        SurveyRecord {
            row,
            unique_key: key.to_string(),
            raw_id: key.to_string(),
            display_name: name.to_string(),
            note: note.to_string(),
            location: String::new(),
        }
    }

    #[test]
    fn test_token_set_ratio_subset_is_full_score() {
        assert_eq!(token_set_ratio("Mesa", "X-01 | Mesa (madeira)"), 100.0);
        assert_eq!(token_set_ratio("cadeira giratória", "Cadeira Giratória"), 100.0);
    }

    #[test]
    fn test_token_set_ratio_bounds() {
        assert_eq!(token_set_ratio("", "Mesa"), 0.0);
        let score = token_set_ratio("armario aco", "armário de aço");
        assert!(score > 0.0 && score < 100.0);
        assert!(token_set_ratio("mesa", "xyz") < 50.0);
    }

    #[test]
    fn test_token_order_is_irrelevant() {
        assert_eq!(
            token_set_ratio("reuniao mesa", "mesa reuniao"),
            token_set_ratio("mesa reuniao", "reuniao mesa")
        );
    }

    #[test]
    fn test_suggest_orders_and_truncates() {
        let pool = vec![
            record(0, "A", "Cadeira", ""),
            record(1, "B", "Mesa redonda", ""),
            record(2, "C", "Mesa", "madeira"),
            record(3, "D", "Mesa", ""),
        ];
        let params = SuggestionParams {
            top_k: 2,
            min_score: None,
        };
        let ranked = suggest("Mesa", &pool, &params);
        let keys: Vec<&str> = ranked.iter().map(|s| s.record.unique_key.as_str()).collect();
        // B, C and D all contain every query token; ties keep table order.
        assert_eq!(keys, vec!["B", "C"]);
        assert!(ranked.iter().all(|s| s.score == 100.0));
    }

    #[test]
    fn test_suggest_respects_floor() {
        let pool = vec![record(0, "A", "Cadeira", ""), record(1, "B", "Mesa", "")];
        let params = SuggestionParams {
            top_k: 5,
            min_score: Some(90.0),
        };
        let ranked = suggest("mesa", &pool, &params);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].record.unique_key, "B");
    }

    #[test]
    fn test_blank_query_yields_nothing() {
        let pool = vec![record(0, "A", "Mesa", "")];
        assert!(suggest("  ", &pool, &SuggestionParams::default()).is_empty());
    }
}
