//! nugraph.toml configuration parsing
//!
//! ```toml
//! [graph]
//! highlight_conflicts = true
//!
//! [output]
//! format = "text"   # text | json | dot
//! color = true
//! ```
//!
//! Every key is optional. Lookup order:
//!
//! 1. an explicit `--config` path (or `NUGRAPH_CONFIG`), which must exist
//! 2. the nearest `nugraph.toml` in the current directory or any parent
//! 3. `nugraph.toml` in the per-user configuration directory
//! 4. built-in defaults

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use directories::ProjectDirs;
use serde::Deserialize;

use crate::dependency::GraphOptions;
use crate::error::{hints, NugraphError, ResultExt};

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "nugraph.toml";

/// Output format for graph reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Text format (default)
    #[default]
    Text,
    /// JSON format
    Json,
    /// Graphviz DOT format
    Dot,
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

/// Root configuration from nugraph.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NugraphConfig {
    /// Graph construction options
    pub graph: GraphOptions,

    /// Report rendering options
    pub output: OutputConfig,
}

impl NugraphConfig {
    /// Resolve and load configuration
    ///
    /// Returns the configuration together with the file it came from, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), NugraphError> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(NugraphError::config_error_with_hint(
                    format!("{} does not exist", path.display()),
                    None,
                    hints::config_not_found(),
                ));
            }
            return Ok((Self::load_from_path(path)?, Some(path.to_path_buf())));
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_config_from(&dir))
            .or_else(Self::user_config_path);

        match discovered {
            Some(path) => Ok((Self::load_from_path(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, NugraphError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NugraphError::config_error(format!(
                "Failed to read configuration from {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.display(), "loading configuration");
        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, NugraphError> {
        toml::from_str::<Self>(content)
            .context_with_hint(format!("Failed to parse {}", CONFIG_FILE_NAME), hints::invalid_config())
    }

    /// Find nugraph.toml by searching up from `start`
    pub fn find_config_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Location of the per-user configuration file, if it exists
    pub fn user_config_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("", "", "nugraph")?;
        let path = dirs.config_dir().join(CONFIG_FILE_NAME);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = NugraphConfig::parse("").unwrap();
        assert_eq!(config, NugraphConfig::default());
        assert!(config.graph.highlight_conflicts);
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.color);
    }

    #[test]
    fn test_parse_full_config() {
        let config = NugraphConfig::parse(
            r#"
            [graph]
            highlight_conflicts = false

            [output]
            format = "dot"
            color = false
            "#,
        )
        .unwrap();

        assert!(!config.graph.highlight_conflicts);
        assert_eq!(config.output.format, OutputFormat::Dot);
        assert!(!config.output.color);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = NugraphConfig::parse("[graph]\nhighlight = true\n").unwrap_err();
        assert!(matches!(err, NugraphError::Config { hint: Some(_), .. }));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        assert!(NugraphConfig::parse("[output]\nformat = \"svg\"\n").is_err());
    }

    #[test]
    fn test_find_config_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(CONFIG_FILE_NAME), "").unwrap();

        let found = NugraphConfig::find_config_from(&nested).unwrap();
        assert_eq!(found, temp.path().join(CONFIG_FILE_NAME));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.toml");
        assert!(NugraphConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[graph]\nhighlight_conflicts = false\n").unwrap();

        let (config, source) = NugraphConfig::load(Some(&path)).unwrap();
        assert!(!config.graph.highlight_conflicts);
        assert_eq!(source, Some(path));
    }
}
