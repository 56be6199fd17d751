//! Conflicts command - List packages referenced at more than one version
//!
//! Usage:
//!   nugraph conflicts scan.json                      # All conflicts
//!   nugraph conflicts scan.json --min-severity minor # Minor and major only
//!   nugraph conflicts 'scans/*.json' --per-file      # One graph per input
//!   nugraph conflicts scan.json --fail-on major      # Exit 2 on major conflicts

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;

use nugraph::dependency::{ConflictInfo, ConflictSeverity, DependencyGraph, GraphOptions};
use nugraph::{build_graph, JsonFactSource, NugraphConfig, NugraphError};

use super::graph::render_conflicts;
use crate::utils::terminal::{create_progress_bar, print_success};

/// Severity threshold accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SeverityLevel {
    Patch,
    Minor,
    Major,
}

impl From<SeverityLevel> for ConflictSeverity {
    fn from(level: SeverityLevel) -> Self {
        match level {
            SeverityLevel::Patch => ConflictSeverity::Patch,
            SeverityLevel::Minor => ConflictSeverity::Minor,
            SeverityLevel::Major => ConflictSeverity::Major,
        }
    }
}

/// List packages referenced at more than one version
#[derive(Args, Debug)]
pub struct ConflictsCommand {
    /// Facts files or glob patterns
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Only report conflicts at or above this severity
    #[arg(long, value_enum, default_value = "patch")]
    pub min_severity: SeverityLevel,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Analyze each input on its own instead of merging them
    #[arg(long)]
    pub per_file: bool,

    /// Exit with status 2 if any conflict reaches this severity
    #[arg(long, value_enum)]
    pub fail_on: Option<SeverityLevel>,
}

/// Conflicts found in one analyzed unit
#[derive(Serialize, Debug)]
struct FileConflicts {
    file: String,
    conflicts: Vec<ConflictInfo>,
}

impl ConflictsCommand {
    /// Execute the conflicts command
    pub fn execute(self, config: &NugraphConfig, _verbose: bool) -> Result<()> {
        // Conflict listing needs detection regardless of configuration
        let mut options = config.graph.clone();
        options.highlight_conflicts = true;

        let reports = if self.per_file {
            let paths = nugraph::facts::expand_inputs(&self.inputs)?;
            self.analyze_each(&paths, &options)?
        } else {
            let (_, input) = super::load_inputs(&self.inputs)?;
            let graph = build_graph(&input.facts, &options);
            vec![FileConflicts {
                file: self.inputs.join(", "),
                conflicts: self.select(&graph),
            }]
        };

        if self.json {
            let rendered = if self.per_file {
                serde_json::to_string_pretty(&reports)
            } else {
                serde_json::to_string_pretty(&reports.iter().flat_map(|r| &r.conflicts).collect::<Vec<_>>())
            }
            .context("Failed to serialize conflicts to JSON")?;
            println!("{}", rendered);
        } else {
            self.print_reports(&reports);
        }

        if let Some(level) = self.fail_on {
            let severity = ConflictSeverity::from(level);
            let count = reports
                .iter()
                .flat_map(|r| &r.conflicts)
                .filter(|c| c.severity >= severity)
                .count();
            if count > 0 {
                return Err(NugraphError::ConflictThreshold { count, severity }.into());
            }
        }

        Ok(())
    }

    /// Build one graph per input on the rayon pool
    ///
    /// All inputs are analyzed; the first failure in input order is returned.
    fn analyze_each(
        &self,
        paths: &[PathBuf],
        options: &GraphOptions,
    ) -> Result<Vec<FileConflicts>, NugraphError> {
        let pb = create_progress_bar(paths.len() as u64, "Analyzing");

        let results: Vec<_> = paths
            .par_iter()
            .map(|path| {
                let result = self.analyze_file(path, options);
                pb.inc(1);
                result
            })
            .collect();

        pb.finish_and_clear();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 1 {
            tracing::warn!(failed, "several inputs could not be analyzed");
        }

        results.into_iter().collect()
    }

    fn analyze_file(&self, path: &Path, options: &GraphOptions) -> Result<FileConflicts, NugraphError> {
        let input = JsonFactSource::new(path).load()?;
        let graph = build_graph(&input.facts, options);
        Ok(FileConflicts {
            file: path.display().to_string(),
            conflicts: self.select(&graph),
        })
    }

    fn select(&self, graph: &DependencyGraph) -> Vec<ConflictInfo> {
        graph
            .conflicts_at_least(self.min_severity.into())
            .into_iter()
            .cloned()
            .collect()
    }

    fn print_reports(&self, reports: &[FileConflicts]) {
        for report in reports {
            if self.per_file {
                println!("\n{}", report.file);
            }

            if report.conflicts.is_empty() {
                print_success("No version conflicts found");
                continue;
            }

            let conflicts: Vec<_> = report.conflicts.iter().collect();
            print!("{}", render_conflicts(&conflicts));
        }
    }
}
