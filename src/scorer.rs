//! Plausibility scoring for word sequences.
//!
//! The path enumerator scores graph edges (one- and two-word sequences) and
//! then whole candidate splits. Higher is better. A scorer only has to be
//! consistent with itself; scores from different scorers are not comparable.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Scores batches of word sequences.
pub trait Scorer: Send + Sync {
    /// One score per input sequence, in order.
    fn score_sequences(&self, sequences: &[Vec<&str>]) -> Vec<f64>;
}

/// Prefers fewer words: the score of a sequence is minus its length.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthScorer;

impl Scorer for LengthScorer {
    fn score_sequences(&self, sequences: &[Vec<&str>]) -> Vec<f64> {
        sequences.iter().map(|s| -(s.len() as f64)).collect()
    }
}

// --- NgramScorer ------------------------------------------------------------

fn default_floor() -> f64 {
    -12.0
}

#[derive(Debug, Deserialize)]
struct NgramFile {
    #[serde(default = "default_floor")]
    floor: f64,
    #[serde(default)]
    backoff: f64,
    #[serde(default)]
    unigrams: BTreeMap<String, f64>,
    /// Keyed `"first second"`.
    #[serde(default)]
    bigrams: BTreeMap<String, f64>,
}

/// Backoff bigram model over log-probabilities.
///
/// ```toml
/// floor = -12.0
/// backoff = -1.0
///
/// [unigrams]
/// rAmas = -5.1
///
/// [bigrams]
/// "rAmas vanam" = -2.3
/// ```
///
/// A sequence scores the unigram of its first word plus, for every following
/// word, the bigram with its predecessor or (when absent) `backoff` plus the
/// word's unigram. Unknown words score `floor`.
#[derive(Debug, Clone)]
pub struct NgramScorer {
    floor: f64,
    backoff: f64,
    unigrams: BTreeMap<String, f64>,
    bigrams: BTreeMap<(String, String), f64>,
}

impl NgramScorer {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: NgramFile =
            toml::from_str(text).map_err(|e| Error::Config(format!("failed to parse scorer model: {e}")))?;

        let mut bigrams = BTreeMap::new();
        for (key, logp) in file.bigrams {
            let Some((first, second)) = key.split_once(' ') else {
                return Err(Error::Config(format!("bigram key '{key}' must be two words separated by a space")));
            };
            bigrams.insert((first.to_string(), second.trim().to_string()), logp);
        }
        log::debug!("[scorer] loaded unigrams={} bigrams={}", file.unigrams.len(), bigrams.len());
        Ok(Self { floor: file.floor, backoff: file.backoff, unigrams: file.unigrams, bigrams })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read scorer model {}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    fn unigram(&self, word: &str) -> f64 {
        self.unigrams.get(word).copied().unwrap_or(self.floor)
    }

    fn score(&self, seq: &[&str]) -> f64 {
        let Some(first) = seq.first() else {
            return 0.0;
        };
        let mut total = self.unigram(first);
        for pair in seq.windows(2) {
            let key = (pair[0].to_string(), pair[1].to_string());
            total += match self.bigrams.get(&key) {
                Some(logp) => *logp,
                None => self.backoff + self.unigram(pair[1]),
            };
        }
        total
    }
}

impl Scorer for NgramScorer {
    fn score_sequences(&self, sequences: &[Vec<&str>]) -> Vec<f64> {
        sequences.iter().map(|s| self.score(s)).collect()
    }
}
