//! Version conflict classification and resolution heuristics
//!
//! Versions are treated as opaque strings everywhere except here. Two deliberately
//! simple heuristics live in this module:
//!
//! - **Severity** compares only the numeric `major.minor.patch` prefix of each
//!   version. Anything after the first `-` is discarded and unparsable components
//!   count as `0`, so `"1.0.0-beta"` and `"1.0.0"` look identical to it.
//! - **Suggested version** is the highest version under plain ordinal string
//!   ordering. `"1.2.0"` beats `"1.10.0"` because `'2' > '1'`.
//!
//! Neither is semver-aware. Callers that need true semantic ordering must
//! post-process the result rather than expect it from here.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// How risky a version conflict is
///
/// Ordered so that `Major > Minor > Patch > None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(into = "u8")]
pub enum ConflictSeverity {
    /// Not a conflict
    #[default]
    None = 0,
    /// Versions share major and minor
    Patch = 1,
    /// Versions share major only
    Minor = 2,
    /// Versions differ in major
    Major = 3,
}

impl ConflictSeverity {
    /// Numeric level, 0 through 3
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Human readable risk label
    pub fn label(self) -> &'static str {
        match self {
            ConflictSeverity::Major => "High",
            ConflictSeverity::Minor => "Medium",
            ConflictSeverity::Patch => "Low",
            ConflictSeverity::None => "Unknown",
        }
    }

    /// Name of the version component the severity refers to
    pub fn component(self) -> &'static str {
        match self {
            ConflictSeverity::Major => "major",
            ConflictSeverity::Minor => "minor",
            ConflictSeverity::Patch => "patch",
            ConflictSeverity::None => "none",
        }
    }
}

impl From<ConflictSeverity> for u8 {
    fn from(severity: ConflictSeverity) -> Self {
        severity.level()
    }
}

impl fmt::Display for ConflictSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.component())
    }
}

/// Numeric prefix of a version string, at most three components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPrefix {
    components: Vec<u64>,
}

impl VersionPrefix {
    /// Parse the dotted numeric prefix of `version`
    ///
    /// Never fails: an empty or non-numeric component becomes `0`.
    pub fn parse(version: &str) -> Self {
        let release = version.split('-').next().unwrap_or_default();
        let components = release
            .split('.')
            .take(3)
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect();

        Self { components }
    }

    pub fn components(&self) -> &[u64] {
        &self.components
    }

    fn component(&self, index: usize) -> Option<u64> {
        self.components.get(index).copied()
    }

    /// Severity of the difference between two prefixes
    ///
    /// A component is only compared when both versions carry it, so `"1"` against
    /// `"1.5"` differs in nothing this function can see and reports `Patch`.
    pub fn difference(&self, other: &Self) -> ConflictSeverity {
        let differs = |index: usize| match (self.component(index), other.component(index)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        };

        if differs(0) {
            ConflictSeverity::Major
        } else if differs(1) {
            ConflictSeverity::Minor
        } else {
            ConflictSeverity::Patch
        }
    }
}

/// Classify a set of distinct versions of one package
///
/// Returns the highest severity over every unordered pair, or `None` when fewer
/// than two versions are given.
pub fn classify_severity<'a, I>(versions: I) -> ConflictSeverity
where
    I: IntoIterator<Item = &'a str>,
{
    let parsed: Vec<VersionPrefix> = versions.into_iter().map(VersionPrefix::parse).collect();
    if parsed.len() <= 1 {
        return ConflictSeverity::None;
    }

    let mut severity = ConflictSeverity::Patch;
    for (i, a) in parsed.iter().enumerate() {
        for b in &parsed[i + 1..] {
            severity = severity.max(a.difference(b));
            if severity == ConflictSeverity::Major {
                return severity;
            }
        }
    }

    severity
}

/// Pick the version to recommend when resolving a conflict
///
/// This is the maximum under ordinal string ordering, not a semantic maximum.
pub fn suggest_version(versions: &BTreeSet<String>) -> Option<String> {
    versions.iter().next_back().cloned()
}
