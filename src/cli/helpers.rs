//! Shared helper functions for CLI commands
//!
//! Configuration resolution, construction of the store and controller, and
//! the printing of outcomes and charts.

use sentiview_core::{
    error::Result,
    visualization::{frequency_chart, render_frequency, render_sentiment, sentiment_chart},
    AggregateSnapshot, AggregationStore, FeedbackController, FileStore, HttpPredictionClient,
    IngestOutcome, SentiviewConfig, SubmitOutcome,
};
use std::path::PathBuf;
use tracing::debug;

/// Flags shared by every subcommand
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub api_base_url: Option<String>,
}

/// Resolve configuration: file and environment, then command-line overrides
pub fn load_config(args: &GlobalArgs) -> Result<SentiviewConfig> {
    let mut config = SentiviewConfig::load(args.config.as_deref())?;

    if let Some(url) = &args.api_base_url {
        config.api_base_url = url.clone();
    }
    if let Some(path) = &args.store {
        config.store_path = path.clone();
    }
    config.validate()?;
    Ok(config)
}

/// Open the aggregate store named by `config`
pub fn open_store(config: &SentiviewConfig) -> Result<AggregationStore<FileStore>> {
    let file_store = FileStore::open(&config.store_path)?;
    debug!("Opened store at {}", file_store.path().display());

    let store = AggregationStore::with_policy(file_store, config.frequency_policy);
    debug!("Word-frequency policy: {}", store.policy());
    Ok(store)
}

/// Build a controller talking to the configured prediction service
pub fn build_controller(
    config: &SentiviewConfig,
) -> Result<FeedbackController<HttpPredictionClient, FileStore>> {
    let client = HttpPredictionClient::new(&config.api_base_url, config.request_timeout())?;
    let store = open_store(config)?;
    Ok(FeedbackController::new(client, store))
}

/// Print the result of one submission
pub fn print_outcome(outcome: &SubmitOutcome) {
    println!("Feedback:  {}", outcome.text);
    match &outcome.sentiment {
        Ok(result) => {
            let marker = match outcome.sentiment_ingest {
                Some(IngestOutcome::Duplicate) => "  (already counted)",
                _ => "",
            };
            println!("Sentiment: {}{}", result.label, marker);
        }
        Err(message) => println!("Sentiment: ✗ {}", message),
    }

    match &outcome.frequencies {
        Ok(counts) => {
            let words: Vec<&str> = counts.iter().map(|wc| wc.word.as_str()).collect();
            if words.is_empty() {
                println!("Words:     (none)");
            } else {
                println!("Words:     {}", words.join(", "));
            }
        }
        Err(message) => println!("Words:     ✗ {}", message),
    }

    for error in &outcome.storage_errors {
        eprintln!("⚠ Could not save aggregates: {}", error);
    }
}

/// Print both charts as text
pub fn print_charts(snapshot: &AggregateSnapshot) {
    println!();
    print!("{}", render_sentiment(&sentiment_chart(&snapshot.tally)));
    println!();
    print!("{}", render_frequency(&frequency_chart(&snapshot.frequencies)));
}
