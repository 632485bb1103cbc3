//! One-shot feedback submission command

use sentiview_core::error::Result;
use tracing::debug;

use super::helpers::{build_controller, load_config, print_charts, print_outcome, GlobalArgs};

/// Handle submit command
pub async fn handle(args: &GlobalArgs, text: String, show_charts: bool) -> Result<()> {
    let config = load_config(args)?;
    let mut controller = build_controller(&config)?;

    debug!("Submitting to {}", config.api_base_url);
    let outcome = controller.submit(&text).await?;

    print_outcome(&outcome);
    if show_charts {
        print_charts(&controller.snapshot());
    }

    Ok(())
}
