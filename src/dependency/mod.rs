//! Dependency graph construction and version conflict classification
//!
//! This module turns a flat list of package facts into a graph of project and
//! package nodes, detects packages referenced at several versions, and classifies
//! how severe each of those conflicts is.

pub mod builder;
pub mod graph;
pub mod version_resolver;

pub use builder::{build_graph, DependencyGraphBuilder, GraphBuilder};
pub use graph::{
    ConflictInfo, DependencyEdge, DependencyGraph, DependencyNode, EdgeType, GraphOptions,
    GraphStats, NodeType,
};
pub use version_resolver::{classify_severity, suggest_version, ConflictSeverity, VersionPrefix};
