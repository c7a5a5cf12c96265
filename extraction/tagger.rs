use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;

use crate::oracle::{Candidate, OracleError, ScoringOracle};
use crate::stopwords::stopword_set;

/// Linguistic-tagger oracle: surfaces proper-noun runs.
///
/// A lightweight stand-in for a part-of-speech/entity tagger. Runs of
/// capitalized words are emitted in document order, unscored. The first
/// word of a sentence only counts when it is not a capitalized stopword,
/// so ordinary sentence-start capitalization does not produce noise.
#[derive(Debug)]
pub struct ProperNounOracle {
    stopwords: HashSet<&'static str>,
    sentence_re: Regex,
}

impl ProperNounOracle {
    /// Creates the oracle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stopwords: stopword_set(),
            sentence_re: Regex::new(r"[^.!?]+[.!?]?").expect("static sentence pattern"),
        }
    }

    fn runs_in_sentence(&self, sentence: &str) -> Vec<String> {
        let words: Vec<&str> = sentence
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .collect();

        let mut runs = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for (index, word) in words.iter().copied().enumerate() {
            if self.qualifies(word, index == 0) {
                current.push(word);
            } else if !current.is_empty() {
                runs.push(current.join(" "));
                current.clear();
            }
        }
        if !current.is_empty() {
            runs.push(current.join(" "));
        }

        runs.retain(|run| {
            run.len() >= 2 && !self.stopwords.contains(run.to_lowercase().as_str())
        });
        runs
    }

    fn qualifies(&self, word: &str, sentence_initial: bool) -> bool {
        let mut chars = word.chars();
        let capitalized = chars.next().is_some_and(char::is_uppercase);
        if !capitalized {
            return false;
        }
        if sentence_initial && self.stopwords.contains(word.to_lowercase().as_str()) {
            return false;
        }
        true
    }
}

impl Default for ProperNounOracle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScoringOracle for ProperNounOracle {
    fn name(&self) -> &'static str {
        "proper-noun"
    }

    async fn candidates(&self, text: &str) -> Result<Vec<Candidate>, OracleError> {
        let mut candidates = Vec::new();
        for sentence in self.sentence_re.find_iter(text) {
            for run in self.runs_in_sentence(sentence.as_str()) {
                candidates.push(Candidate::unscored(run));
            }
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn detects_multiword_entities() {
        let oracle = ProperNounOracle::new();
        let candidates = oracle
            .candidates("Marie Curie studied radioactivity in Paris.")
            .await
            .unwrap();
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Marie Curie", "Paris"]);
    }

    #[tokio::test]
    async fn sentence_start_stopwords_are_discounted() {
        let oracle = ProperNounOracle::new();
        let candidates = oracle
            .candidates("The experiment ran overnight. It confirmed the Hubble constant.")
            .await
            .unwrap();
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert!(!texts.contains(&"The"));
        assert!(texts.contains(&"Hubble"));
    }

    #[tokio::test]
    async fn punctuation_is_stripped_from_runs() {
        let oracle = ProperNounOracle::new();
        let candidates = oracle
            .candidates("We visited Berlin, Munich, and Hamburg.")
            .await
            .unwrap();
        let texts: Vec<&str> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["Berlin", "Munich", "Hamburg"]);
    }

    #[tokio::test]
    async fn lowercase_text_yields_nothing() {
        let oracle = ProperNounOracle::new();
        let candidates = oracle
            .candidates("plain lowercase prose without names")
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }
}
