//! Sentiview - feedback sentiment client with persistent aggregates
//!
//! Submits free-text feedback to a sentiment-analysis service, reports the
//! predicted label, and keeps two running aggregates across sessions: a
//! tally of sentiment labels and a cumulative word-frequency map.
//!
//! # Architecture
//!
//! - **Types**: Core data structures (FeedbackSubmission, SentimentLabel, ...)
//! - **Prediction**: HTTP client for the sentiment and word-frequency endpoints
//! - **Storage**: Durable key-value store holding the aggregates
//! - **Aggregation**: Deduplicating owner of the aggregates
//! - **Controller**: Submit lifecycle tying prediction and aggregation together
//! - **Visualization**: Chart-ready projections of the aggregates
//!
//! # Example
//!
//! ```ignore
//! use sentiview_core::{
//!     AggregationStore, FeedbackController, FileStore, HttpPredictionClient, SentiviewConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> sentiview_core::Result<()> {
//!     let config = SentiviewConfig::load(None)?;
//!     let client = HttpPredictionClient::new(&config.api_base_url, config.request_timeout())?;
//!     let store = AggregationStore::initialize(FileStore::open(&config.store_path)?);
//!     let mut controller = FeedbackController::new(client, store);
//!
//!     let outcome = controller.submit("great service").await?;
//!     println!("{}", outcome.sentiment_message());
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod config;
pub mod controller;
pub mod error;
pub mod prediction;
pub mod storage;
pub mod types;
pub mod visualization;

// Re-export commonly used types
pub use aggregation::{AggregateSnapshot, AggregationStore, FrequencyPolicy, IngestOutcome};
pub use config::SentiviewConfig;
pub use controller::{FeedbackController, FormState, SubmitOutcome};
pub use error::{Result, SentiviewError};
pub use prediction::{HttpPredictionClient, PredictionService};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use types::{
    FeedbackSubmission, SentimentLabel, SentimentResult, SentimentTally, WordCount,
    WordFrequencyMap,
};
