use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::aggregator::CandidateSet;

/// Ordering applied to the deduplicated terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RankingPolicy {
    /// Mention count descending, best native score as tiebreak, then
    /// first-seen order.
    #[default]
    FrequencyFirstSeen,
    /// Raw arrival order: oracles in registration order, each oracle's
    /// own ranking preserved.
    OracleOrder,
}

/// A unique ranked term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Term {
    /// First-seen surface form (original casing).
    pub text: String,
    /// Oracles that surfaced the term, in first-contribution order.
    pub sources: Vec<String>,
    /// Times the term was surfaced across the whole candidate set.
    pub mentions: usize,
    /// Best native score any oracle assigned.
    pub score: Option<f32>,
}

/// Merges a candidate set into a deduplicated, ordered term list.
///
/// Terms are equal when their lowercased trimmed forms match;
/// candidates normalizing to the empty string are rejected. Frequency
/// is the primary sort key: a term surfaced by three oracles, or three
/// times by one, counts three. Native scores only break ties at equal
/// mention count, so no single model's confidence can outvote consensus.
#[must_use]
pub fn rank(candidates: &CandidateSet, policy: RankingPolicy) -> Vec<Term> {
    let mut groups: IndexMap<String, Term> = IndexMap::new();
    for candidate in candidates {
        let key = candidate.text.trim().to_lowercase();
        if key.is_empty() {
            continue;
        }
        if let Some(term) = groups.get_mut(&key) {
            term.mentions += 1;
            if !term.sources.contains(&candidate.source) {
                term.sources.push(candidate.source.clone());
            }
            term.score = match (term.score, candidate.score) {
                (Some(existing), Some(new)) => Some(existing.max(new)),
                (existing, new) => existing.or(new),
            };
        } else {
            groups.insert(
                key,
                Term {
                    text: candidate.text.trim().to_string(),
                    sources: vec![candidate.source.clone()],
                    mentions: 1,
                    score: candidate.score,
                },
            );
        }
    }

    // IndexMap iteration order is first-seen order.
    let mut terms: Vec<Term> = groups.into_values().collect();
    match policy {
        RankingPolicy::OracleOrder => terms,
        RankingPolicy::FrequencyFirstSeen => {
            // Stable sort: equal keys keep first-seen order.
            terms.sort_by(|a, b| {
                b.mentions
                    .cmp(&a.mentions)
                    .then_with(|| score_ordering(a.score, b.score))
            });
            terms
        }
    }
}

/// Higher scores first; unscored terms after scored ones.
fn score_ordering(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
