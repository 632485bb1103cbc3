//! Stored aggregate reset command

use sentiview_core::error::Result;
use std::io::{self, Write};

use super::helpers::{load_config, open_store, GlobalArgs};

/// Handle reset command
pub fn handle(args: &GlobalArgs, yes: bool) -> Result<()> {
    let config = load_config(args)?;

    if !yes {
        print!(
            "Delete all stored sentiment and word counts in {}? [y/N] ",
            config.store_path.display()
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if !matches!(input.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Aborted");
            return Ok(());
        }
    }

    open_store(&config)?.clear()?;
    println!("✓ Stored aggregates cleared");
    Ok(())
}
