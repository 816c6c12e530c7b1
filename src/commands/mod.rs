//! Handlers behind each CLI subcommand.

pub mod assess;
pub mod batches;
pub mod classify;
pub mod init;
pub mod report;
pub mod standards;
pub mod test;

use crate::config::{load_config, load_config_from, FoodOilConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// The explicitly named config file, or the discovered one.
pub fn resolve_config(path: Option<&Path>) -> Result<FoodOilConfig> {
    match path {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(load_config()),
    }
}
