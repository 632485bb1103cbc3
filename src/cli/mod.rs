//! CLI command handlers
//!
//! Each subcommand is implemented in its own module.

pub mod charts;
pub mod config;
pub mod helpers;
pub mod reset;
pub mod session;
pub mod submit;
