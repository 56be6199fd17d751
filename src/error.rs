//! Error types and helpers for user-friendly error messages
//!
//! Graph construction itself cannot fail. Everything around it (reading scanner
//! output, loading configuration, writing reports) reports through [`NugraphError`],
//! which carries an optional hint telling the user how to fix the problem.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::dependency::ConflictSeverity;

/// Custom error types with helpful context and suggestions
#[derive(Error, Debug)]
pub enum NugraphError {
    /// A facts file could not be read or parsed
    #[error("Facts file {}: {message}", .path.display())]
    FactsFile {
        path: PathBuf,
        message: String,
        hint: Option<String>,
    },

    /// Configuration file errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        hint: Option<String>,
    },

    /// An input pattern matched nothing
    #[error("No facts files match '{pattern}'")]
    NoInputs {
        pattern: String,
        hint: Option<String>,
    },

    /// A report could not be written
    #[error("Failed to write {}: {message}", .path.display())]
    Output { path: PathBuf, message: String },

    /// Conflicts at or above the requested severity were found
    #[error("{count} conflict(s) at {severity} severity or above")]
    ConflictThreshold {
        count: usize,
        severity: ConflictSeverity,
    },
}

impl NugraphError {
    /// Create a facts file error
    pub fn facts_file(path: &Path, message: impl Into<String>) -> Self {
        Self::FactsFile {
            path: path.to_path_buf(),
            message: message.into(),
            hint: None,
        }
    }

    /// Create a facts file error with hint
    pub fn facts_file_with_hint(
        path: &Path,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::FactsFile {
            path: path.to_path_buf(),
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: None,
        }
    }

    /// Create a configuration error with source and hint
    pub fn config_error_with_hint(
        message: impl Into<String>,
        source: Option<anyhow::Error>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source,
            hint: Some(hint.into()),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NugraphError::ConflictThreshold { .. } => 2,
            _ => 1,
        }
    }

    fn hint(&self) -> Option<&str> {
        match self {
            NugraphError::FactsFile { hint, .. }
            | NugraphError::Config { hint, .. }
            | NugraphError::NoInputs { hint, .. } => hint.as_deref(),
            NugraphError::Output { .. } | NugraphError::ConflictThreshold { .. } => None,
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        if let Some(hint) = self.hint() {
            eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
        }

        eprintln!();
    }
}

/// Helper trait for adding hints to Result types
pub trait ResultExt<T> {
    /// Add context with a hint
    fn context_with_hint(
        self,
        context: impl Into<String>,
        hint: impl Into<String>,
    ) -> Result<T, NugraphError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context_with_hint(
        self,
        context: impl Into<String>,
        hint: impl Into<String>,
    ) -> Result<T, NugraphError> {
        self.map_err(|e| {
            NugraphError::config_error_with_hint(
                format!("{}: {}", context.into(), e),
                Some(e.into()),
                hint,
            )
        })
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for malformed facts files
    pub fn facts_format() -> &'static str {
        "A facts file is either a JSON array of package facts or an object:\n\
         {\n  \
           \"packages\": [\n    \
             { \"name\": \"Serilog\", \"version\": \"3.0.0\", \"declaringFile\": \"src/App/App.csproj\" }\n  \
           ],\n  \
           \"metrics\": { \"Serilog\": { \"totalDownloads\": 1000000 } }\n\
         }"
    }

    /// Get hint for an invalid nugraph.toml
    pub fn invalid_config() -> &'static str {
        "nugraph.toml is invalid. Supported keys:\n\
         [graph]\n\
         highlight_conflicts = true\n\
         \n\
         [output]\n\
         format = \"text\"   # text, json or dot\n\
         color = true"
    }

    /// Get hint for a missing explicit config
    pub fn config_not_found() -> &'static str {
        "The file given with --config (or NUGRAPH_CONFIG) does not exist.\n\
         Omit the flag to search for nugraph.toml from the current directory upwards."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facts_file_message_includes_path() {
        let err = NugraphError::facts_file(Path::new("scan/app.json"), "cannot read file");
        let message = err.to_string();
        assert!(message.contains("scan/app.json"));
        assert!(message.contains("cannot read file"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_threshold_exit_code() {
        let err = NugraphError::ConflictThreshold {
            count: 2,
            severity: ConflictSeverity::Major,
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "2 conflict(s) at major severity or above");
    }

    #[test]
    fn test_context_with_hint_keeps_source() {
        let parsed: Result<u32, _> = "abc".parse::<u32>();
        let err = parsed.context_with_hint("bad number", "use digits").unwrap_err();
        assert!(err.to_string().contains("bad number"));
        assert_eq!(err.hint(), Some("use digits"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
