//! Chart display command

use sentiview_core::{
    error::Result,
    visualization::{frequency_chart, sentiment_chart},
};

use super::helpers::{load_config, open_store, print_charts, GlobalArgs};

/// Handle charts command
pub fn handle(args: &GlobalArgs, json: bool) -> Result<()> {
    let config = load_config(args)?;
    let snapshot = open_store(&config)?.snapshot();

    if json {
        let charts = serde_json::json!({
            "sentiment": sentiment_chart(&snapshot.tally),
            "frequency": frequency_chart(&snapshot.frequencies),
        });
        println!("{}", serde_json::to_string_pretty(&charts)?);
    } else {
        print_charts(&snapshot);
    }

    Ok(())
}
