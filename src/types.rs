//! Core data types for sentiview
//!
//! This module defines the values that flow between the prediction client,
//! the aggregation store and the chart projections: feedback submissions,
//! sentiment labels, the sentiment tally and the word-frequency map.

use crate::error::{Result, SentiviewError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Maximum feedback length, in characters
pub const MAX_FEEDBACK_CHARS: usize = 200;

/// A validated piece of feedback text
///
/// The raw text is kept as typed; it is what the prediction service sees and
/// what deduplication keys are derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackSubmission {
    text: String,
}

impl FeedbackSubmission {
    /// Validate raw input: non-empty after trimming and at most
    /// [`MAX_FEEDBACK_CHARS`] characters long
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        validate_feedback(&text)?;
        Ok(Self { text })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Check feedback text without constructing a submission
pub fn validate_feedback(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(SentiviewError::Validation(
            "Feedback is required.".to_string(),
        ));
    }

    let chars = text.chars().count();
    if chars > MAX_FEEDBACK_CHARS {
        return Err(SentiviewError::Validation(format!(
            "Feedback must be at most {} characters (got {})",
            MAX_FEEDBACK_CHARS, chars
        )));
    }

    Ok(())
}

/// Sentiment category predicted for a piece of feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// All labels in tally order
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Neutral,
        SentimentLabel::Negative,
    ];

    /// Slot of this label in a [`SentimentTally`]
    pub fn index(self) -> usize {
        match self {
            SentimentLabel::Positive => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Negative => 2,
        }
    }

    /// Canonical display form
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = SentiviewError;

    /// Case-insensitive; surrounding whitespace is ignored
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            other => Err(SentiviewError::PredictionFailed(format!(
                "Unknown sentiment label: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for SentimentLabel {
    type Error = SentiviewError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<SentimentLabel> for String {
    fn from(label: SentimentLabel) -> Self {
        label.as_str().to_string()
    }
}

/// Result of a sentiment classification
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentResult {
    /// Text echoed back by the service
    pub text: String,
    pub label: SentimentLabel,
    /// Per-class scores, empty when the service omits them
    pub confidence: Vec<f64>,
}

/// One (word, count) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

impl WordCount {
    pub fn new(word: impl Into<String>, count: u64) -> Self {
        Self {
            word: word.into(),
            count,
        }
    }
}

/// Cumulative counts per sentiment label: `[positive, neutral, negative]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentTally(pub [u64; 3]);

impl SentimentTally {
    pub fn get(&self, label: SentimentLabel) -> u64 {
        self.0[label.index()]
    }

    pub fn increment(&mut self, label: SentimentLabel) {
        let slot = &mut self.0[label.index()];
        *slot = slot.saturating_add(1);
    }

    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> [u64; 3] {
        self.0
    }
}

/// Cumulative word counts, ordered by first appearance
///
/// Serializes as an array of `{ word, count }` objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<WordCount>", into = "Vec<WordCount>")]
pub struct WordFrequencyMap {
    entries: Vec<WordCount>,
    index: HashMap<String, usize>,
}

impl WordFrequencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to `word`, inserting it with `amount` when absent.
    ///
    /// Returns `true` when the word was newly inserted.
    pub fn add(&mut self, word: &str, amount: u64) -> bool {
        match self.index.get(word) {
            Some(&slot) => {
                let count = &mut self.entries[slot].count;
                *count = count.saturating_add(amount);
                false
            }
            None => {
                self.index.insert(word.to_string(), self.entries.len());
                self.entries.push(WordCount::new(word, amount));
                true
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<u64> {
        self.index.get(word).map(|&slot| self.entries[slot].count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &WordCount> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<WordCount> {
        self.entries.clone()
    }
}

impl PartialEq for WordFrequencyMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for WordFrequencyMap {}

/// Rebuilds the map from stored pairs. Empty words are dropped and repeated
/// words are folded into their first position.
impl From<Vec<WordCount>> for WordFrequencyMap {
    fn from(pairs: Vec<WordCount>) -> Self {
        let mut map = WordFrequencyMap::new();
        for pair in pairs {
            if pair.word.is_empty() {
                continue;
            }
            map.add(&pair.word, pair.count);
        }
        map
    }
}

impl From<WordFrequencyMap> for Vec<WordCount> {
    fn from(map: WordFrequencyMap) -> Self {
        map.entries
    }
}
