//! HTTP implementation of the prediction service

use super::PredictionService;
use crate::error::{Result, SentiviewError};
use crate::types::{validate_feedback, SentimentLabel, SentimentResult, WordCount};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const PREDICT_PATH: &str = "api/predict";
const FREQUENCY_PATH: &str = "api/word-frequency";

const PREDICT_FAILED: &str = "Failed to analyze sentiment";
const FREQUENCY_FAILED: &str = "Failed to get Word Frequency";

/// Request body shared by both endpoints
#[derive(Debug, Serialize)]
struct TextRequest<'a> {
    text: &'a str,
}

/// `/api/predict` response
#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    text: Option<String>,
    sentiment: SentimentLabel,
    #[serde(default)]
    confidence: Vec<f64>,
}

/// `/api/word-frequency` response; other fields are ignored
#[derive(Debug, Deserialize)]
struct FrequencyResponse {
    #[serde(default)]
    frequency_data: Option<Vec<WordCount>>,
}

/// Error body sent with non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Prediction client speaking JSON over HTTP
pub struct HttpPredictionClient {
    client: Client,
    base_url: String,
}

impl HttpPredictionClient {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(SentiviewError::Validation(
                "Prediction service base URL cannot be empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SentiviewError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POST `{ text }` to `path` and decode the JSON response
    async fn post_text<T: DeserializeOwned>(
        &self,
        path: &str,
        text: &str,
        failure: &str,
    ) -> Result<T> {
        let url = self.endpoint(path);
        debug!("POST {} ({} chars)", url, text.chars().count());

        let response = self
            .client
            .post(&url)
            .json(&TextRequest { text })
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {} failed: {}", url, e);
                SentiviewError::PredictionFailed(format!("{}: {}", failure, e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SentiviewError::PredictionFailed(format!("{}: {}", failure, e))
        })?;

        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error)
                .filter(|msg| !msg.is_empty())
                .unwrap_or_else(|| format!("{} (status {})", failure, status));
            warn!("{} returned {}: {}", url, status, reason);
            return Err(SentiviewError::PredictionFailed(reason));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("Malformed response from {}: {}", url, e);
            SentiviewError::PredictionFailed(format!("{}: malformed response ({})", failure, e))
        })
    }
}

#[async_trait]
impl PredictionService for HttpPredictionClient {
    async fn classify(&self, text: &str) -> Result<SentimentResult> {
        validate_feedback(text)?;

        let response: PredictResponse = self.post_text(PREDICT_PATH, text, PREDICT_FAILED).await?;
        debug!("Classified as {}", response.sentiment);

        Ok(SentimentResult {
            text: response.text.unwrap_or_else(|| text.to_string()),
            label: response.sentiment,
            confidence: response.confidence,
        })
    }

    async fn word_frequency(&self, text: &str) -> Result<Vec<WordCount>> {
        validate_feedback(text)?;

        let response: FrequencyResponse =
            self.post_text(FREQUENCY_PATH, text, FREQUENCY_FAILED).await?;
        let counts = response.frequency_data.unwrap_or_default();
        debug!("Received {} word counts", counts.len());

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpPredictionClient {
        HttpPredictionClient::new(base, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).unwrap()
    }

    #[test]
    fn test_empty_base_url_error() {
        let result = HttpPredictionClient::new("  ", Duration::from_secs(1));
        assert!(matches!(result, Err(SentiviewError::Validation(_))));
    }

    #[test]
    fn test_endpoint_joining() {
        assert_eq!(client("http://localhost:5000//").base_url(), "http://localhost:5000");
        assert_eq!(
            client("http://localhost:5000/").endpoint(PREDICT_PATH),
            "http://localhost:5000/api/predict"
        );
        assert_eq!(
            client("http://localhost:5000").endpoint(FREQUENCY_PATH),
            "http://localhost:5000/api/word-frequency"
        );
    }

    #[test]
    fn test_predict_response_decoding() {
        let response: PredictResponse = serde_json::from_str(
            r#"{"text":"ok","sentiment":"neutral","confidence":[0.1,0.8,0.1]}"#,
        )
        .unwrap();
        assert_eq!(response.sentiment, SentimentLabel::Neutral);
        assert_eq!(response.confidence.len(), 3);

        let response: PredictResponse = serde_json::from_str(r#"{"sentiment":"Positive"}"#).unwrap();
        assert!(response.confidence.is_empty());

        assert!(serde_json::from_str::<PredictResponse>(r#"{"sentiment":"angry"}"#).is_err());
    }

    #[test]
    fn test_frequency_response_decoding() {
        let response: FrequencyResponse = serde_json::from_str(
            r#"{"text":"a b","frequency_data":[{"word":"a","count":1},{"word":"b","count":2}]}"#,
        )
        .unwrap();
        assert_eq!(response.frequency_data.unwrap().len(), 2);

        let response: FrequencyResponse = serde_json::from_str(r#"{"text":"a b"}"#).unwrap();
        assert!(response.frequency_data.is_none());

        let response: FrequencyResponse =
            serde_json::from_str(r#"{"frequency_data":null}"#).unwrap();
        assert!(response.frequency_data.is_none());
    }

    #[tokio::test]
    async fn test_invalid_text_never_hits_network() {
        // Port 9 is discard; validation must fail before any connection attempt
        let client = client("http://127.0.0.1:9");

        let err = client.classify("").await.unwrap_err();
        assert!(matches!(err, SentiviewError::Validation(_)));

        let err = client.word_frequency(&"x".repeat(201)).await.unwrap_err();
        assert!(matches!(err, SentiviewError::Validation(_)));
    }
}
