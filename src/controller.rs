//! Feedback form controller
//!
//! Drives one submission at a time through
//! `Idle -> Submitting -> Settled -> Idle`. Both predictions are requested
//! together and settle independently: whichever succeeds is folded into the
//! [`AggregationStore`], whichever fails is reported in the outcome.

use crate::aggregation::{AggregateSnapshot, AggregationStore, IngestOutcome};
use crate::error::{Result, SentiviewError};
use crate::prediction::PredictionService;
use crate::storage::KeyValueStore;
use crate::types::{FeedbackSubmission, SentimentLabel, SentimentResult, WordCount};
use crate::visualization::{label_color, IDLE_COLOR, SUBMITTING_COLOR};
use tracing::{debug, info, warn};

/// Lifecycle state of the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Submitting,
    Settled(SubmitOutcome),
}

/// Everything that happened during one submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// The submitted text, as typed
    pub text: String,
    /// Classification result, or the failure message
    pub sentiment: std::result::Result<SentimentResult, String>,
    /// Per-text word counts, or the failure message
    pub frequencies: std::result::Result<Vec<WordCount>, String>,
    /// What the store did with the sentiment, when it got one
    pub sentiment_ingest: Option<IngestOutcome>,
    /// What the store did with the word counts, when it got them
    pub frequency_ingest: Option<IngestOutcome>,
    /// Persist failures; the in-memory aggregates were still updated
    pub storage_errors: Vec<String>,
}

impl SubmitOutcome {
    pub fn label(&self) -> Option<SentimentLabel> {
        self.sentiment.as_ref().ok().map(|r| r.label)
    }

    /// Both predictions succeeded
    pub fn is_complete(&self) -> bool {
        self.sentiment.is_ok() && self.frequencies.is_ok()
    }

    /// Text shown in the sentiment field: the label, or the error message
    pub fn sentiment_message(&self) -> String {
        match &self.sentiment {
            Ok(result) => result.label.to_string(),
            Err(message) => message.clone(),
        }
    }
}

/// Form controller owning the aggregation store
pub struct FeedbackController<P: PredictionService, S: KeyValueStore> {
    predictor: P,
    store: AggregationStore<S>,
    state: FormState,
    draft: String,
    last_feedback: Option<String>,
    last_sentiment: Option<String>,
}

impl<P: PredictionService, S: KeyValueStore> FeedbackController<P, S> {
    pub fn new(predictor: P, store: AggregationStore<S>) -> Self {
        Self {
            predictor,
            store,
            state: FormState::Idle,
            draft: String::new(),
            last_feedback: None,
            last_sentiment: None,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Replace the input field contents
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Submit whatever is in the input field
    pub async fn submit_draft(&mut self) -> Result<SubmitOutcome> {
        let text = self.draft.clone();
        self.submit(&text).await
    }

    /// Validate and submit `text`
    ///
    /// Invalid text is rejected with a validation error before any request is
    /// made, leaving the form `Idle`. Otherwise the form settles with an
    /// outcome even when one or both predictions fail; only validation
    /// produces an `Err`. The mutable borrow keeps a second submission from
    /// starting while one is in flight.
    pub async fn submit(&mut self, text: &str) -> Result<SubmitOutcome> {
        let submission = match FeedbackSubmission::new(text) {
            Ok(submission) => submission,
            Err(e) => {
                debug!("Rejected submission: {}", e);
                self.state = FormState::Idle;
                return Err(e);
            }
        };

        self.state = FormState::Submitting;
        self.last_feedback = Some(submission.text().to_string());
        info!("Submitting feedback ({} chars)", submission.text().chars().count());

        let text = submission.text();
        let (sentiment, frequencies) = tokio::join!(
            self.predictor.classify(text),
            self.predictor.word_frequency(text)
        );

        let mut outcome = SubmitOutcome {
            text: text.to_string(),
            sentiment: sentiment.map_err(failure_message),
            frequencies: frequencies.map_err(failure_message),
            sentiment_ingest: None,
            frequency_ingest: None,
            storage_errors: Vec::new(),
        };

        match &outcome.sentiment {
            Ok(result) => match self.store.ingest_sentiment(result.label, text) {
                Ok(ingest) => outcome.sentiment_ingest = Some(ingest),
                Err(e) => {
                    warn!("Failed to persist sentiment tally: {}", e);
                    outcome.sentiment_ingest = Some(IngestOutcome::Applied);
                    outcome.storage_errors.push(e.to_string());
                }
            },
            Err(message) => warn!("Sentiment prediction failed: {}", message),
        }

        match &outcome.frequencies {
            Ok(counts) => match self.store.ingest_word_frequency(text, counts) {
                Ok(ingest) => outcome.frequency_ingest = Some(ingest),
                Err(e) => {
                    warn!("Failed to persist word frequencies: {}", e);
                    outcome.frequency_ingest = Some(IngestOutcome::Applied);
                    outcome.storage_errors.push(e.to_string());
                }
            },
            Err(message) => warn!("Word-frequency prediction failed: {}", message),
        }

        self.last_sentiment = Some(outcome.sentiment_message());
        self.draft.clear();
        self.state = FormState::Settled(outcome.clone());

        Ok(outcome)
    }

    /// Sentiment field text for the current state
    pub fn sentiment_status(&self) -> String {
        match &self.state {
            FormState::Submitting => "Predicting...".to_string(),
            FormState::Settled(outcome) => outcome.sentiment_message(),
            FormState::Idle => self.last_sentiment.clone().unwrap_or_default(),
        }
    }

    /// Feedback line for the current state
    pub fn feedback_status(&self) -> String {
        match &self.last_feedback {
            Some(text) => text.clone(),
            None => "No Feedback Yet..".to_string(),
        }
    }

    /// Accent colour for the form border
    pub fn accent_color(&self) -> &'static str {
        match &self.state {
            FormState::Submitting => SUBMITTING_COLOR,
            FormState::Settled(outcome) => outcome.label().map(label_color).unwrap_or(IDLE_COLOR),
            FormState::Idle => IDLE_COLOR,
        }
    }

    /// Latest aggregates
    pub fn snapshot(&self) -> AggregateSnapshot {
        self.store.snapshot()
    }

}

/// Message shown for a failed prediction: the service's own reason when it
/// gave one
fn failure_message(error: SentiviewError) -> String {
    match error {
        SentiviewError::PredictionFailed(reason) => reason,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::MockPredictionService;
    use crate::storage::MemoryStore;

    fn positive(text: &str) -> SentimentResult {
        SentimentResult {
            text: text.to_string(),
            label: SentimentLabel::Positive,
            confidence: vec![0.05, 0.05, 0.9],
        }
    }

    fn split_words(text: &str) -> Vec<WordCount> {
        text.split_whitespace().map(|w| WordCount::new(w, 1)).collect()
    }

    fn controller(
        mock: MockPredictionService,
    ) -> FeedbackController<MockPredictionService, MemoryStore> {
        FeedbackController::new(mock, AggregationStore::initialize(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_validation_rejects_before_network() {
        let mut mock = MockPredictionService::new();
        mock.expect_classify().times(0);
        mock.expect_word_frequency().times(0);
        let mut controller = controller(mock);

        for bad in ["".to_string(), "   ".to_string(), "x".repeat(201)] {
            let err = controller.submit(&bad).await.unwrap_err();
            assert!(matches!(err, SentiviewError::Validation(_)));
            assert_eq!(controller.state(), &FormState::Idle);
        }
        assert_eq!(controller.feedback_status(), "No Feedback Yet..");
    }

    #[tokio::test]
    async fn test_successful_submission_settles_and_ingests() {
        let mut mock = MockPredictionService::new();
        mock.expect_classify().returning(|t| Ok(positive(t)));
        mock.expect_word_frequency()
            .returning(|t| Ok(split_words(t)));
        let mut controller = controller(mock);

        controller.set_draft("great service");
        let outcome = controller.submit_draft().await.unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.label(), Some(SentimentLabel::Positive));
        assert_eq!(outcome.sentiment_ingest, Some(IngestOutcome::Applied));
        assert_eq!(outcome.frequency_ingest, Some(IngestOutcome::Applied));
        assert!(matches!(controller.state(), FormState::Settled(_)));
        assert_eq!(controller.draft(), "");
        assert_eq!(controller.sentiment_status(), "Positive");
        assert_eq!(controller.feedback_status(), "great service");
        assert_eq!(controller.accent_color(), "#80EF80");

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.tally.as_array(), [1, 0, 0]);
        assert_eq!(snapshot.frequencies.get("great"), Some(1));
        assert_eq!(snapshot.frequencies.get("service"), Some(1));
    }

    #[tokio::test]
    async fn test_resubmission_is_deduplicated() {
        let mut mock = MockPredictionService::new();
        mock.expect_classify().times(2).returning(|t| Ok(positive(t)));
        mock.expect_word_frequency()
            .times(2)
            .returning(|t| Ok(split_words(t)));
        let mut controller = controller(mock);

        controller.submit("great service").await.unwrap();
        let second = controller.submit("great service").await.unwrap();

        assert_eq!(second.sentiment_ingest, Some(IngestOutcome::Duplicate));
        assert_eq!(second.frequency_ingest, Some(IngestOutcome::Duplicate));
        assert_eq!(controller.snapshot().tally.as_array(), [1, 0, 0]);
        assert_eq!(controller.snapshot().frequencies.len(), 2);
    }

    #[tokio::test]
    async fn test_sentiment_failure_still_ingests_frequencies() {
        let mut mock = MockPredictionService::new();
        mock.expect_classify().returning(|_| {
            Err(SentiviewError::PredictionFailed("model not loaded".to_string()))
        });
        mock.expect_word_frequency()
            .returning(|t| Ok(split_words(t)));
        let mut controller = controller(mock);

        let outcome = controller.submit("slow delivery").await.unwrap();

        assert!(!outcome.is_complete());
        assert_eq!(outcome.sentiment_ingest, None);
        assert_eq!(outcome.frequency_ingest, Some(IngestOutcome::Applied));
        assert_eq!(controller.sentiment_status(), "model not loaded");
        assert_eq!(controller.accent_color(), IDLE_COLOR);

        let snapshot = controller.snapshot();
        assert_eq!(snapshot.tally.as_array(), [0, 0, 0]);
        assert_eq!(snapshot.frequencies.get("slow"), Some(1));
    }

    #[tokio::test]
    async fn test_frequency_failure_still_ingests_sentiment() {
        let mut mock = MockPredictionService::new();
        mock.expect_classify().returning(|t| {
            Ok(SentimentResult {
                text: t.to_string(),
                label: SentimentLabel::Negative,
                confidence: Vec::new(),
            })
        });
        mock.expect_word_frequency().returning(|_| {
            Err(SentiviewError::PredictionFailed("timeout".to_string()))
        });
        let mut controller = controller(mock);

        let outcome = controller.submit("cold food").await.unwrap();

        assert!(outcome.frequencies.is_err());
        assert_eq!(controller.snapshot().tally.as_array(), [0, 0, 1]);
        assert!(controller.snapshot().frequencies.is_empty());
        assert_eq!(controller.accent_color(), "#FF6961");
    }

    #[tokio::test]
    async fn test_storage_failure_is_reported_not_fatal() {
        let mut mock = MockPredictionService::new();
        mock.expect_classify().returning(|t| Ok(positive(t)));
        mock.expect_word_frequency()
            .returning(|t| Ok(split_words(t)));

        let mut storage = MemoryStore::new();
        storage.set_fail_writes(true);
        let mut controller =
            FeedbackController::new(mock, AggregationStore::initialize(storage));

        let outcome = controller.submit("fine").await.unwrap();
        assert_eq!(outcome.storage_errors.len(), 2);
        assert_eq!(controller.snapshot().tally.as_array(), [1, 0, 0]);
    }

    #[tokio::test]
    async fn test_rejected_submission_returns_to_idle() {
        let mut mock = MockPredictionService::new();
        mock.expect_classify().times(1).returning(|t| Ok(positive(t)));
        mock.expect_word_frequency()
            .times(1)
            .returning(|t| Ok(split_words(t)));
        let mut controller = controller(mock);

        controller.submit("good").await.unwrap();
        assert!(controller.submit("").await.is_err());

        assert_eq!(controller.state(), &FormState::Idle);
        // Last result is still displayed
        assert_eq!(controller.sentiment_status(), "Positive");
        assert_eq!(controller.feedback_status(), "good");
    }
}
