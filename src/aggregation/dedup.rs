//! Session-scoped deduplication identifiers
//!
//! Two independent identifier spaces exist:
//!
//! - [`SentimentKey`]: derived from the canonical label and the raw feedback
//!   text. The same text classified differently counts again.
//! - [`FrequencyKey`]: derived from the raw feedback text alone.
//!
//! Raw text means byte-for-byte: no trimming or case folding, so `"Good"` and
//! `"good "` are distinct submissions.

use crate::types::SentimentLabel;
use std::collections::HashSet;

/// Identifier of a sentiment observation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SentimentKey {
    label: SentimentLabel,
    text: String,
}

impl SentimentKey {
    pub fn derive(label: SentimentLabel, text: &str) -> Self {
        Self {
            label,
            text: text.to_string(),
        }
    }
}

/// Identifier of a word-frequency batch
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequencyKey(String);

impl FrequencyKey {
    pub fn derive(text: &str) -> Self {
        Self(text.to_string())
    }
}

/// Identifiers already folded into the aggregates during this session
#[derive(Debug, Default)]
pub struct DedupSet {
    sentiment: HashSet<SentimentKey>,
    frequency: HashSet<FrequencyKey>,
}

impl DedupSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sentiment identifier; `false` if it was already present
    pub fn insert_sentiment(&mut self, key: SentimentKey) -> bool {
        self.sentiment.insert(key)
    }

    /// Record a frequency identifier; `false` if it was already present
    pub fn insert_frequency(&mut self, key: FrequencyKey) -> bool {
        self.frequency.insert(key)
    }

    pub fn contains_sentiment(&self, key: &SentimentKey) -> bool {
        self.sentiment.contains(key)
    }

    pub fn contains_frequency(&self, key: &FrequencyKey) -> bool {
        self.frequency.contains(key)
    }

    /// Number of distinct sentiment identifiers seen
    pub fn sentiment_len(&self) -> usize {
        self.sentiment.len()
    }

    /// Number of distinct frequency identifiers seen
    pub fn frequency_len(&self) -> usize {
        self.frequency.len()
    }

    pub fn clear(&mut self) {
        self.sentiment.clear();
        self.frequency.clear();
    }
}
