//! CLI argument parsing using clap derive macros

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use nugraph::NugraphConfig;

use crate::commands::{
    conflicts::ConflictsCommand, graph::GraphCommand, health::HealthCommand,
};

/// nugraph - package dependency graph and version conflict analysis
///
/// Reads package references produced by a repository scanner and reports
/// which packages are in use at several versions across your projects.
#[derive(Parser, Debug)]
#[command(name = "nugraph")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to nugraph.toml
    #[arg(long, global = true, env = "NUGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the dependency graph and print or export it
    Graph(GraphCommand),

    /// List packages referenced at more than one version
    Conflicts(ConflictsCommand),

    /// Score package health from collected registry metrics
    Health(HealthCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let (config, source) = NugraphConfig::load(self.config.as_deref())?;
        if let Some(path) = &source {
            tracing::debug!(path = %path.display(), "using configuration");
        }

        // Set up terminal colors
        if self.no_color || !config.output.color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        // Execute the subcommand
        match self.command {
            Commands::Graph(cmd) => cmd.execute(&config, self.verbose),
            Commands::Conflicts(cmd) => cmd.execute(&config, self.verbose),
            Commands::Health(cmd) => cmd.execute(&config, self.verbose),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_graph_command() {
        let cli = Cli::try_parse_from(["nugraph", "graph", "scan.json", "--format", "dot"]).unwrap();
        assert!(matches!(cli.command, Commands::Graph(_)));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Cli::try_parse_from(["nugraph", "conflicts"]).is_err());
    }
}
