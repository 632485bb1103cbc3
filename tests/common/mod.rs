//! Common test utilities and helpers
//!
//! Provides a local stand-in for the prediction service built on axum.

#![allow(dead_code)]

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use sentiview_core::HttpPredictionClient;

#[derive(Debug, Deserialize)]
pub struct TextBody {
    pub text: String,
}

/// Request counters of the fake service
#[derive(Clone, Default)]
pub struct Hits {
    predict: Arc<AtomicUsize>,
    frequency: Arc<AtomicUsize>,
}

impl Hits {
    pub fn predict(&self) -> usize {
        self.predict.load(Ordering::SeqCst)
    }

    pub fn frequency(&self) -> usize {
        self.frequency.load(Ordering::SeqCst)
    }
}

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test service failed");
    });

    format!("http://{}", addr)
}

/// Keyword classifier answering like the real service (lowercase labels)
fn classify(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if ["great", "good", "excellent"].iter().any(|w| lower.contains(w)) {
        "positive"
    } else if ["bad", "slow", "cold"].iter().any(|w| lower.contains(w)) {
        "negative"
    } else {
        "neutral"
    }
}

/// Lowercased words with their per-text counts, first-seen order
fn word_counts(text: &str) -> Vec<Value> {
    let mut counts: Vec<(String, u64)> = Vec::new();
    for word in text.split_whitespace().map(|w| w.to_lowercase()) {
        match counts.iter_mut().find(|(w, _)| *w == word) {
            Some((_, count)) => *count += 1,
            None => counts.push((word, 1)),
        }
    }
    counts
        .into_iter()
        .map(|(word, count)| json!({ "word": word, "count": count }))
        .collect()
}

async fn predict_handler(State(hits): State<Hits>, Json(body): Json<TextBody>) -> Json<Value> {
    hits.predict.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "text": body.text,
        "sentiment": classify(&body.text),
        "confidence": [0.1, 0.2, 0.7],
    }))
}

async fn frequency_handler(State(hits): State<Hits>, Json(body): Json<TextBody>) -> Json<Value> {
    hits.frequency.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "text": body.text,
        "frequency_data": word_counts(&body.text),
    }))
}

/// Working fake service with request counters
pub async fn spawn_fake_service() -> (String, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/api/predict", post(predict_handler))
        .route("/api/word-frequency", post(frequency_handler))
        .with_state(hits.clone());
    (spawn_service(router).await, hits)
}

/// Fake service whose endpoints answer with fixed statuses and bodies
pub async fn spawn_fixed_service(
    predict: (StatusCode, &'static str),
    frequency: (StatusCode, &'static str),
) -> String {
    let router = Router::new()
        .route("/api/predict", post(move || async move { predict }))
        .route("/api/word-frequency", post(move || async move { frequency }));
    spawn_service(router).await
}

/// Base URL nothing is listening on
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn client(base_url: &str) -> HttpPredictionClient {
    HttpPredictionClient::new(base_url, Duration::from_secs(5))
        .expect("Failed to create prediction client")
}
