//! Dependency graph data structures
//!
//! The graph is a value object: the builder creates it, the caller owns it and
//! renders or exports it by projecting fields. Nothing here knows how it is drawn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::version_resolver::ConflictSeverity;
use crate::facts::fold_case;

/// Role of a node in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeType {
    /// A concrete `(package, version)` referenced by some project
    RootPackage,
    DirectDependency,
    TransitiveDependency,
    ConflictNode,
    /// A project file that declares packages
    Project,
}

/// Kind of relationship an edge represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EdgeType {
    /// Project declares package
    Direct,
    Transitive,
    /// Two versions of the same package are both in use
    Conflict,
}

/// A node in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyNode {
    /// Stable identifier
    ///
    /// Package ids are `{name}_{version}`, so a name containing `_` can produce
    /// the same id as a different `(name, version)` pair, e.g. `A_1` `0` and `A`
    /// `1_0`. Project ids carry a hash of the declaring path.
    pub id: String,

    /// Package name, or the file name for project nodes
    pub package_id: String,

    /// Version, empty for project nodes
    pub version: String,

    pub label: String,

    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// File the node was first seen in
    pub declaring_file: Option<String>,

    pub has_conflict: bool,

    pub conflict_severity: ConflictSeverity,
}

impl DependencyNode {
    /// Create a node for one concrete package version
    pub fn package(name: &str, version: &str, declaring_file: &str) -> Self {
        Self {
            id: format!("{}_{}", name, version),
            package_id: name.to_string(),
            version: version.to_string(),
            label: format!("{} {}", name, version),
            node_type: NodeType::RootPackage,
            declaring_file: Some(declaring_file.to_string()),
            has_conflict: false,
            conflict_severity: ConflictSeverity::None,
        }
    }

    /// Create a node for a project file
    pub fn project(id: String, file_name: &str, path: &str) -> Self {
        Self {
            id,
            package_id: file_name.to_string(),
            version: String::new(),
            label: file_name.to_string(),
            node_type: NodeType::Project,
            declaring_file: Some(path.to_string()),
            has_conflict: false,
            conflict_severity: ConflictSeverity::None,
        }
    }

    pub fn is_package(&self) -> bool {
        self.node_type == NodeType::RootPackage
    }

    pub fn is_project(&self) -> bool {
        self.node_type == NodeType::Project
    }
}

/// An edge in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    /// Stable identifier derived from the endpoints
    pub id: String,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    #[serde(rename = "type")]
    pub edge_type: EdgeType,

    pub is_conflict: bool,
}

impl DependencyEdge {
    /// Create a project-to-package edge
    pub fn direct(source: &str, target: &str) -> Self {
        Self {
            id: format!("{}_to_{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            edge_type: EdgeType::Direct,
            is_conflict: false,
        }
    }

    /// Create an edge between two versions of the same package
    pub fn conflict(source: &str, target: &str) -> Self {
        Self {
            id: format!("conflict_{}_to_{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            edge_type: EdgeType::Conflict,
            is_conflict: true,
        }
    }
}

/// A package referenced at more than one version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictInfo {
    pub package_id: String,

    /// Distinct versions in ascending ordinal order
    pub versions: Vec<String>,

    /// Ids of the package nodes involved
    pub node_ids: Vec<String>,

    pub severity: ConflictSeverity,

    /// Ordinally highest observed version
    pub suggested_version: Option<String>,
}

impl ConflictInfo {
    pub fn severity_label(&self) -> &'static str {
        self.severity.label()
    }
}

/// Options for building a dependency graph
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphOptions {
    /// Run conflict detection and emit conflict edges
    pub highlight_conflicts: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            highlight_conflicts: true,
        }
    }
}

/// Package dependency graph with detected conflicts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DependencyGraph {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,

    /// Package name to conflict, for packages in use at several versions
    pub conflicts: BTreeMap<String, ConflictInfo>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn conflict_count(&self) -> usize {
        self.conflicts.len()
    }

    /// Number of package version nodes
    pub fn root_package_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_package()).count()
    }

    pub fn project_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_project()).count()
    }

    /// Get a node by id
    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Get the conflict for a package, ignoring case
    pub fn conflict(&self, package: &str) -> Option<&ConflictInfo> {
        self.conflicts.get(package).or_else(|| {
            let folded = fold_case(package);
            self.conflicts
                .values()
                .find(|c| fold_case(&c.package_id) == folded)
        })
    }

    /// Conflicts at or above `severity`, most severe first, then by name
    pub fn conflicts_at_least(&self, severity: ConflictSeverity) -> Vec<&ConflictInfo> {
        let mut conflicts: Vec<_> = self
            .conflicts
            .values()
            .filter(|c| c.severity >= severity)
            .collect();
        conflicts.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.package_id.cmp(&b.package_id))
        });
        conflicts
    }

    /// Edges of the given type
    pub fn edges_of(&self, edge_type: EdgeType) -> impl Iterator<Item = &DependencyEdge> {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }

    /// Package nodes a project points at through direct edges
    pub fn packages_of<'a>(&'a self, project_id: &'a str) -> impl Iterator<Item = &'a DependencyNode> {
        self.edges_of(EdgeType::Direct)
            .filter(move |e| e.source == project_id)
            .filter_map(move |e| self.node(&e.target))
    }

    /// Get statistics about the dependency graph
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            conflict_count: self.conflict_count(),
            root_package_count: self.root_package_count(),
            project_count: self.project_count(),
        }
    }
}

/// Summary counts for a dependency graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub conflict_count: usize,
    pub root_package_count: usize,
    pub project_count: usize,
}
