//! Aggregation of prediction results
//!
//! The [`AggregationStore`] is the single owner of the two running
//! aggregates (the sentiment tally and the word-frequency map) and of the
//! session-scoped deduplication identifiers. Every mutating call persists
//! the affected aggregate before it returns.
//!
//! # Durable records
//!
//! | key               | value                               |
//! |-------------------|-------------------------------------|
//! | `sentimentCounts` | `[positive, neutral, negative]`     |
//! | `frequencyData`   | `[{ "word": ..., "count": ... }]`   |
//! | `aggregateSchema` | schema marker, currently `1`        |
//!
//! Records that are missing or fail to decode are replaced by empty
//! aggregates on load; they never cause initialization to fail.

pub mod dedup;
pub mod store;

pub use dedup::{DedupSet, FrequencyKey, SentimentKey};
pub use store::{AggregateSnapshot, AggregationStore, FrequencyPolicy, IngestOutcome};

/// Storage key of the sentiment tally
pub const SENTIMENT_KEY: &str = "sentimentCounts";

/// Storage key of the word-frequency map
pub const FREQUENCY_KEY: &str = "frequencyData";

/// Storage key of the schema marker
pub const SCHEMA_KEY: &str = "aggregateSchema";

/// Schema version written alongside the aggregates
pub const SCHEMA_VERSION: u32 = 1;
