//! Configuration display command

use sentiview_core::{config::default_config_path, error::Result};

use super::helpers::{load_config, GlobalArgs};

/// Handle config command
pub fn handle(args: &GlobalArgs) -> Result<()> {
    let config = load_config(args)?;

    let source = args
        .config
        .clone()
        .unwrap_or_else(default_config_path);
    println!("# config file: {}", source.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
