//! Prediction service client
//!
//! Two independent calls per feedback text: sentiment classification and
//! word-frequency extraction. Every failure mode (transport error, non-2xx
//! status, undecodable body) surfaces as
//! [`SentiviewError::PredictionFailed`](crate::error::SentiviewError::PredictionFailed).

pub mod client;

use crate::error::Result;
use crate::types::{SentimentResult, WordCount};
use async_trait::async_trait;

pub use client::HttpPredictionClient;

/// Remote prediction operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Classify the sentiment of `text`
    async fn classify(&self, text: &str) -> Result<SentimentResult>;

    /// Per-text word counts for `text`, in the order the service returns them
    async fn word_frequency(&self, text: &str) -> Result<Vec<WordCount>>;
}
