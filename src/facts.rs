//! Package-reference facts and the sources that produce them
//!
//! A fact is a single `(package, version, declaring file)` observation made by an
//! external scanner. The graph builder only ever consumes already-extracted facts;
//! this module defines that boundary and a loader for scanner output stored as JSON.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NugraphError;

/// How a package reference was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PackageType {
    #[default]
    PackageReference,
    PackagesConfig,
    ProjectReference,
}

/// Kind of file a package reference was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PackageSourceType {
    #[default]
    ProjectFile,
    PackagesConfig,
    DirectoryPackagesProps,
    DirectoryBuildProps,
    DirectoryBuildTargets,
}

/// A package reference found in a project file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFact {
    /// Package name, compared case-insensitively
    #[serde(alias = "packageName")]
    pub name: String,

    /// Version string as written in the declaring file
    #[serde(default)]
    pub version: String,

    /// Path of the file that declared the reference
    #[serde(alias = "projectFile")]
    pub declaring_file: String,

    /// Whether the version comes from central package management
    #[serde(default)]
    pub is_centrally_managed: bool,

    #[serde(default, rename = "type")]
    pub package_type: PackageType,

    #[serde(default)]
    pub source_type: PackageSourceType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_override: Option<String>,
}

impl PackageFact {
    /// Create a plain `PackageReference` fact
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        declaring_file: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            declaring_file: declaring_file.into(),
            is_centrally_managed: false,
            package_type: PackageType::PackageReference,
            source_type: PackageSourceType::ProjectFile,
            version_override: None,
        }
    }
}

/// Case-folded form of a package name or path
///
/// Every case-insensitive comparison in the crate goes through this.
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Registry signals for a package, gathered outside this crate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetrics {
    #[serde(default)]
    pub total_downloads: u64,

    #[serde(default)]
    pub last_published: Option<DateTime<Utc>>,

    #[serde(default)]
    pub vulnerability_count: u32,

    #[serde(default)]
    pub is_deprecated: bool,
}

/// On-disk layout of a facts file
///
/// Either a bare array of facts or an object that also carries metrics.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FactsDocument {
    List(Vec<PackageFact>),
    Full {
        #[serde(alias = "facts")]
        packages: Vec<PackageFact>,
        #[serde(default)]
        metrics: HashMap<String, PackageMetrics>,
    },
}

/// Everything read from one or more facts files
#[derive(Debug, Clone, Default)]
pub struct ScanInput {
    pub facts: Vec<PackageFact>,
    pub metrics: HashMap<String, PackageMetrics>,
}

impl ScanInput {
    /// Look up metrics for a package, ignoring case
    pub fn metrics_for(&self, name: &str) -> Option<&PackageMetrics> {
        self.metrics.get(name).or_else(|| {
            let folded = fold_case(name);
            self.metrics
                .iter()
                .find(|(key, _)| fold_case(key) == folded)
                .map(|(_, metrics)| metrics)
        })
    }

    fn extend(&mut self, other: ScanInput) {
        self.facts.extend(other.facts);
        for (name, metrics) in other.metrics {
            self.metrics.entry(name).or_insert(metrics);
        }
    }
}

/// Producer of package facts
///
/// Implemented by whatever extracts references from a repository. The graph
/// builder never sees a source, only the facts it returned.
pub trait FactSource {
    /// Return every fact this source knows about, in a stable order
    fn facts(&self) -> Result<Vec<PackageFact>, NugraphError>;
}

/// Facts stored as JSON by an external scanner
#[derive(Debug, Clone)]
pub struct JsonFactSource {
    path: PathBuf,
}

impl JsonFactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read facts together with any metrics the file carries
    pub fn load(&self) -> Result<ScanInput, NugraphError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            NugraphError::facts_file(&self.path, format!("cannot read file: {}", e))
        })?;

        let input = Self::parse(&content).map_err(|e| {
            NugraphError::facts_file_with_hint(
                &self.path,
                format!("invalid facts document: {}", e),
                crate::error::hints::facts_format(),
            )
        })?;

        tracing::info!(
            path = %self.path.display(),
            facts = input.facts.len(),
            metrics = input.metrics.len(),
            "loaded facts"
        );

        Ok(input)
    }

    fn parse(content: &str) -> serde_json::Result<ScanInput> {
        let document: FactsDocument = serde_json::from_str(content)?;
        Ok(match document {
            FactsDocument::List(facts) => ScanInput {
                facts,
                metrics: HashMap::new(),
            },
            FactsDocument::Full { packages, metrics } => ScanInput {
                facts: packages,
                metrics,
            },
        })
    }
}

impl FactSource for JsonFactSource {
    fn facts(&self) -> Result<Vec<PackageFact>, NugraphError> {
        self.load().map(|input| input.facts)
    }
}

/// Expand input arguments into concrete file paths
///
/// Arguments containing glob metacharacters are expanded, with each pattern's
/// matches sorted; anything else is taken literally. Arguments keep their order
/// and a path named twice is kept at its first position.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>, NugraphError> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        if !pattern.contains(&['*', '?', '['][..]) {
            let path = PathBuf::from(pattern);
            if seen.insert(path.clone()) {
                paths.push(path);
            }
            continue;
        }

        let entries = glob::glob(pattern).map_err(|e| NugraphError::NoInputs {
            pattern: pattern.clone(),
            hint: Some(format!("invalid glob pattern: {}", e)),
        })?;

        let matches: BTreeSet<PathBuf> = entries.flatten().filter(|entry| entry.is_file()).collect();
        if matches.is_empty() {
            return Err(NugraphError::NoInputs {
                pattern: pattern.clone(),
                hint: None,
            });
        }

        for path in matches {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    Ok(paths)
}

/// Load and concatenate every input, in order
pub fn load_all(paths: &[PathBuf]) -> Result<ScanInput, NugraphError> {
    let mut combined = ScanInput::default();
    for path in paths {
        combined.extend(JsonFactSource::new(path).load()?);
    }
    Ok(combined)
}
