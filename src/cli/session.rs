//! Interactive feedback session
//!
//! A REPL over one controller: every line that is not a `:`-prefixed command
//! is submitted as feedback, so plain words like `help` are valid feedback.
//! Deduplication spans the whole session.

use sentiview_core::{
    error::{Result, SentiviewError},
    FeedbackController, FileStore, HttpPredictionClient, SentimentLabel,
};
use std::io::{self, Write};
use tracing::info;

use super::helpers::{build_controller, load_config, print_charts, print_outcome, GlobalArgs};

/// Handle session command
pub async fn handle(args: &GlobalArgs) -> Result<()> {
    let config = load_config(args)?;
    let mut controller = build_controller(&config)?;

    println!();
    println!("Sentiview feedback session");
    println!("════════════════════════════════════════════════════════════");
    println!("Service:   {}", config.api_base_url);
    println!("Store:     {}", config.store_path.display());
    println!("Commands:  :help, :charts, :status, :quit");
    println!("Anything else is submitted as feedback.");
    println!("════════════════════════════════════════════════════════════");
    println!();

    loop {
        print!("feedback> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let line = input.trim_end_matches(['\n', '\r']);

        match parse_line(line) {
            SessionInput::Blank => continue,
            SessionInput::Help => show_help(),
            SessionInput::Quit => break,
            SessionInput::Charts => print_charts(&controller.snapshot()),
            SessionInput::Status => show_status(&controller),
            SessionInput::Feedback(text) => submit(&mut controller, text).await,
        }
    }

    info!("Session ended");
    Ok(())
}

/// One line of session input
#[derive(Debug, PartialEq)]
enum SessionInput<'a> {
    Blank,
    Help,
    Quit,
    Charts,
    Status,
    Feedback(&'a str),
}

fn parse_line(line: &str) -> SessionInput<'_> {
    match line.trim() {
        "" => SessionInput::Blank,
        ":help" => SessionInput::Help,
        ":quit" | ":exit" => SessionInput::Quit,
        ":charts" => SessionInput::Charts,
        ":status" => SessionInput::Status,
        _ => SessionInput::Feedback(line),
    }
}

async fn submit(controller: &mut FeedbackController<HttpPredictionClient, FileStore>, text: &str) {
    controller.set_draft(text);
    println!("Sentiment: Predicting...");
    match controller.submit_draft().await {
        Ok(outcome) => print_outcome(&outcome),
        Err(SentiviewError::Validation(message)) => println!("✗ {}", message),
        Err(e) => println!("✗ {}", e),
    }
    println!();
}

fn show_status(controller: &FeedbackController<HttpPredictionClient, FileStore>) {
    let snapshot = controller.snapshot();
    println!("Feedback:  {}", controller.feedback_status());
    println!("Sentiment: {}", controller.sentiment_status());
    println!(
        "Totals:    {} positive, {} neutral, {} negative, {} distinct words",
        snapshot.tally.get(SentimentLabel::Positive),
        snapshot.tally.get(SentimentLabel::Neutral),
        snapshot.tally.get(SentimentLabel::Negative),
        snapshot.frequencies.len()
    );
}

fn show_help() {
    println!();
    println!("Available Commands:");
    println!("─────────────────────────────────────────────────────");
    println!("  :help         Show this help message");
    println!("  :charts       Show sentiment and word-frequency charts");
    println!("  :status       Show the last result and running totals");
    println!("  :quit, :exit  End the session");
    println!("  <feedback>    Submit any other line (1-200 characters)");
    println!("─────────────────────────────────────────────────────");
    println!();
}
