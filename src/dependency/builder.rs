//! Graph construction from package facts
//!
//! Building runs in two phases over a fresh arena of nodes:
//!
//! 1. **Synthesis.** One package node per distinct `(name, version)`, one project
//!    node per distinct declaring file, and one direct edge per distinct
//!    `(project, package node)` pair.
//! 2. **Conflict detection** (optional). Every package name seen at more than one
//!    version gets a [`ConflictInfo`], its nodes are flagged in place by index, and
//!    its version nodes are connected pairwise by conflict edges.
//!
//! The builder holds no state between calls, so independent builds may run
//! concurrently.

use std::collections::{BTreeSet, HashMap, HashSet};

use sha2::{Digest, Sha256};

use super::graph::{ConflictInfo, DependencyEdge, DependencyGraph, DependencyNode, GraphOptions};
use super::version_resolver::{classify_severity, suggest_version, ConflictSeverity};
use crate::facts::{fold_case, PackageFact};

/// Number of hex digits of the path hash kept in project node ids
const PROJECT_HASH_LEN: usize = 16;

/// Builds a [`DependencyGraph`] from a flat list of package facts
pub trait DependencyGraphBuilder {
    /// Build a graph; never fails, an empty list yields an empty graph
    fn build(&self, facts: &[PackageFact], options: &GraphOptions) -> DependencyGraph;
}

/// The default graph builder
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl DependencyGraphBuilder for GraphBuilder {
    fn build(&self, facts: &[PackageFact], options: &GraphOptions) -> DependencyGraph {
        build_graph(facts, options)
    }
}

/// Versions observed for one package name, in first-seen order of the name
struct PackageVersions {
    name: String,
    versions: BTreeSet<String>,
}

/// Build a dependency graph from `facts`
pub fn build_graph(facts: &[PackageFact], options: &GraphOptions) -> DependencyGraph {
    let mut graph = DependencyGraph::new();

    // (lowercase name, version) -> node index
    let mut package_index: HashMap<(String, String), usize> = HashMap::new();
    // lowercase name -> slot in `package_versions`
    let mut name_slots: HashMap<String, usize> = HashMap::new();
    let mut package_versions: Vec<PackageVersions> = Vec::new();
    // node index of the package node each fact resolves to
    let mut fact_targets: Vec<usize> = Vec::with_capacity(facts.len());

    for fact in facts {
        let folded = fold_case(&fact.name);
        let key = (folded.clone(), fact.version.clone());

        let index = *package_index.entry(key).or_insert_with(|| {
            graph
                .nodes
                .push(DependencyNode::package(&fact.name, &fact.version, &fact.declaring_file));
            graph.nodes.len() - 1
        });
        fact_targets.push(index);

        let slot = *name_slots.entry(folded).or_insert_with(|| {
            package_versions.push(PackageVersions {
                name: fact.name.clone(),
                versions: BTreeSet::new(),
            });
            package_versions.len() - 1
        });
        package_versions[slot].versions.insert(fact.version.clone());
    }

    // lowercase path -> (project node index, package node indices in fact order)
    let mut project_index: HashMap<String, usize> = HashMap::new();
    let mut projects: Vec<(usize, Vec<usize>)> = Vec::new();

    for (fact, &target) in facts.iter().zip(&fact_targets) {
        let slot = *project_index
            .entry(fold_case(&fact.declaring_file))
            .or_insert_with(|| {
                graph.nodes.push(project_node(&fact.declaring_file));
                projects.push((graph.nodes.len() - 1, Vec::new()));
                projects.len() - 1
            });
        projects[slot].1.push(target);
    }

    for (project, targets) in &projects {
        let mut seen = HashSet::new();
        for &target in targets {
            if seen.insert(target) {
                let edge = DependencyEdge::direct(&graph.nodes[*project].id, &graph.nodes[target].id);
                graph.edges.push(edge);
            }
        }
    }

    if options.highlight_conflicts {
        detect_conflicts(&mut graph, &package_versions);
    }

    tracing::debug!(
        facts = facts.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        conflicts = graph.conflict_count(),
        "built dependency graph"
    );

    graph
}

fn detect_conflicts(graph: &mut DependencyGraph, package_versions: &[PackageVersions]) {
    for entry in package_versions.iter().filter(|p| p.versions.len() > 1) {
        let folded = fold_case(&entry.name);
        let matched: Vec<usize> = graph
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_package() && fold_case(&n.package_id) == folded)
            .map(|(i, _)| i)
            .collect();

        if matched.len() < 2 {
            continue;
        }

        let severity = classify_severity(entry.versions.iter().map(String::as_str));
        debug_assert!(severity > ConflictSeverity::None);

        for &index in &matched {
            let node = &mut graph.nodes[index];
            node.has_conflict = true;
            node.conflict_severity = severity;
        }

        for (i, &a) in matched.iter().enumerate() {
            for &b in &matched[i + 1..] {
                let edge = DependencyEdge::conflict(&graph.nodes[a].id, &graph.nodes[b].id);
                graph.edges.push(edge);
            }
        }

        let conflict = ConflictInfo {
            package_id: entry.name.clone(),
            versions: entry.versions.iter().cloned().collect(),
            node_ids: matched.iter().map(|&i| graph.nodes[i].id.clone()).collect(),
            severity,
            suggested_version: suggest_version(&entry.versions),
        };

        tracing::debug!(
            package = %conflict.package_id,
            versions = conflict.versions.len(),
            severity = %severity,
            "version conflict"
        );

        graph.conflicts.insert(entry.name.clone(), conflict);
    }
}

/// Create the node for a project file
///
/// The id embeds a hash of the whole path so that files sharing a name in
/// different directories stay distinct. Paths that differ only by case map to
/// the same project and therefore hash identically.
fn project_node(path: &str) -> DependencyNode {
    let file_name = file_name(path).to_string();

    let id = format!("project_{}_{}", file_name, path_hash(path));
    DependencyNode::project(id, &file_name, path)
}

/// Last component of a path written with `/` or `\` separators
fn file_name(path: &str) -> &str {
    match path.rsplit(&['/', '\\'][..]).next() {
        Some(name) if !name.is_empty() => name,
        _ => path,
    }
}

fn path_hash(path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(fold_case(path).as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    hash[..PROJECT_HASH_LEN].to_string()
}
