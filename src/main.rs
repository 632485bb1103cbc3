//! Sentiview command-line entry point

mod cli;

use clap::{Parser, Subcommand};
use sentiview_core::error::Result;
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::{self, EnvFilter};

use cli::helpers::GlobalArgs;

#[derive(Parser)]
#[command(name = "sentiview")]
#[command(about = "Submit feedback for sentiment analysis and chart the running totals", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Set log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Aggregate store file (overrides SENTIVIEW_STORE_PATH and config file)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Prediction service base URL (overrides SENTIVIEW_API_BASE_URL and config file)
    #[arg(long, global = true)]
    api_base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit one piece of feedback
    Submit {
        /// Feedback text (1-200 characters)
        text: String,

        /// Skip printing the charts after the result
        #[arg(long)]
        no_charts: bool,
    },

    /// Interactive feedback session
    Session,

    /// Show the sentiment and word-frequency charts
    Charts {
        /// Output chart series as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the stored aggregates
    Reset {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Own crates at the requested level, HTTP plumbing only when it complains
    let filter = EnvFilter::new(format!(
        "sentiview={lvl},sentiview_core={lvl},reqwest=warn,hyper=warn",
        lvl = level.as_str().to_lowercase()
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr) // Write logs to stderr, not stdout
        .init();

    debug!("Sentiview v{} starting...", env!("CARGO_PKG_VERSION"));

    let global = GlobalArgs {
        config: cli.config,
        store: cli.store,
        api_base_url: cli.api_base_url,
    };

    match cli.command {
        Commands::Submit { text, no_charts } => cli::submit::handle(&global, text, !no_charts).await,
        Commands::Session => cli::session::handle(&global).await,
        Commands::Charts { json } => cli::charts::handle(&global, json),
        Commands::Reset { yes } => cli::reset::handle(&global, yes),
        Commands::Config => cli::config::handle(&global),
    }
}
