use std::collections::HashSet;

use async_trait::async_trait;
use indexmap::IndexMap;
use regex::Regex;

use crate::oracle::{Candidate, OracleError, ScoringOracle};
use crate::stopwords::stopword_set;

/// Frequency-count extractor.
///
/// Counts stopword-filtered unigrams and adjacent bigrams across the
/// passage and emits the most frequent ones, highest count first, with
/// the raw count as the native score. Candidates are lowercase by
/// construction.
#[derive(Debug)]
pub struct FrequencyOracle {
    max_terms: usize,
    stopwords: HashSet<&'static str>,
    token_re: Regex,
}

impl FrequencyOracle {
    /// Creates an oracle emitting at most `max_terms` candidates.
    #[must_use]
    pub fn new(max_terms: usize) -> Self {
        Self {
            max_terms,
            stopwords: stopword_set(),
            token_re: Regex::new(r"[a-z0-9][a-z0-9'-]*").expect("static token pattern"),
        }
    }

    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.token_re
            .find_iter(&lowered)
            .map(|token| token.as_str().to_string())
            .collect()
    }

    fn is_content_word(&self, token: &str) -> bool {
        token.len() >= 2 && !self.stopwords.contains(token)
    }
}

impl Default for FrequencyOracle {
    fn default() -> Self {
        Self::new(10)
    }
}

#[async_trait]
impl ScoringOracle for FrequencyOracle {
    fn name(&self) -> &'static str {
        "frequency"
    }

    async fn candidates(&self, text: &str) -> Result<Vec<Candidate>, OracleError> {
        let tokens = self.tokenize(text);

        // Insertion order doubles as first-occurrence order for ties.
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for token in &tokens {
            if self.is_content_word(token) {
                *counts.entry(token.clone()).or_insert(0) += 1;
            }
        }
        for pair in tokens.windows(2) {
            if self.is_content_word(&pair[0]) && self.is_content_word(&pair[1]) {
                let bigram = format!("{} {}", pair[0], pair[1]);
                *counts.entry(bigram).or_insert(0) += 1;
            }
        }

        let mut entries: Vec<(String, usize)> = counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));

        #[allow(clippy::cast_precision_loss)]
        let candidates = entries
            .into_iter()
            .take(self.max_terms)
            .map(|(term, count)| Candidate::scored(term, count as f32))
            .collect();
        Ok(candidates)
    }
}
