//! Command implementations
//!
//! Each command module provides a clap-derived struct and execute method.

pub mod conflicts;
pub mod graph;
pub mod health;

use std::path::PathBuf;

use anyhow::Result;

use nugraph::facts::{self, ScanInput};

/// Expand input patterns and load every facts file they name
pub(crate) fn load_inputs(patterns: &[String]) -> Result<(Vec<PathBuf>, ScanInput)> {
    let paths = facts::expand_inputs(patterns)?;
    let input = facts::load_all(&paths)?;
    tracing::debug!(
        files = paths.len(),
        facts = input.facts.len(),
        "loaded inputs"
    );
    Ok((paths, input))
}
