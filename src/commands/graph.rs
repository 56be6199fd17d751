//! Graph command - Build the dependency graph and print or export it
//!
//! Usage:
//!   nugraph graph scan.json                  # Text report
//!   nugraph graph 'scans/*.json' -f json     # Merge inputs, output JSON
//!   nugraph graph scan.json -f dot -o g.dot  # Graphviz DOT to a file
//!   nugraph graph scan.json --no-conflicts   # Skip conflict detection

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use nugraph::config::OutputFormat;
use nugraph::dependency::{
    ConflictInfo, ConflictSeverity, DependencyEdge, DependencyGraph, DependencyNode, EdgeType,
    GraphStats,
};
use nugraph::{build_graph, NugraphConfig, NugraphError};

use crate::utils::terminal::{print_success, severity_style};

/// Build the dependency graph and print or export it
#[derive(Args, Debug)]
pub struct GraphCommand {
    /// Facts files or glob patterns
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Output format: text, json, dot (default from nugraph.toml)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip conflict detection
    #[arg(long)]
    pub no_conflicts: bool,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

// ============================================================================
// JSON Output Structures
// ============================================================================

/// Root structure for JSON output
#[derive(Serialize, Debug)]
struct GraphJson<'a> {
    summary: GraphStats,
    nodes: &'a [DependencyNode],
    edges: &'a [DependencyEdge],
    conflicts: Vec<&'a ConflictInfo>,
}

impl GraphCommand {
    /// Execute the graph command
    pub fn execute(self, config: &NugraphConfig, _verbose: bool) -> Result<()> {
        let (_, input) = super::load_inputs(&self.inputs)?;

        let mut options = config.graph.clone();
        if self.no_conflicts {
            options.highlight_conflicts = false;
        }

        let graph = build_graph(&input.facts, &options);
        let format = self.format.unwrap_or(config.output.format);

        let rendered = match format {
            OutputFormat::Text => render_text(&graph),
            OutputFormat::Json => render_json(&graph)?,
            OutputFormat::Dot => render_dot(&graph),
        };

        match &self.output {
            Some(path) => {
                write_report(path, &rendered)?;
                print_success(&format!(
                    "Wrote {} nodes and {} edges to {}",
                    graph.node_count(),
                    graph.edge_count(),
                    path.display()
                ));
            }
            None => print!("{}", rendered),
        }

        Ok(())
    }
}

/// Write a rendered report to `path` without terminal styling
fn write_report(path: &Path, rendered: &str) -> Result<(), NugraphError> {
    fs::write(path, console::strip_ansi_codes(rendered).as_bytes()).map_err(|e| {
        NugraphError::Output {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

// ========================================================================
// Text Output
// ========================================================================

/// Render projects with their packages, followed by a conflict summary
pub(crate) fn render_text(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    let stats = graph.stats();

    let _ = writeln!(
        out,
        "{} projects, {} packages, {} conflicts",
        stats.project_count, stats.root_package_count, stats.conflict_count
    );

    for project in graph.nodes.iter().filter(|n| n.is_project()) {
        let path = project.declaring_file.as_deref().unwrap_or_default();
        let _ = writeln!(out, "\n{} ({})", project.label, path);

        let packages: Vec<_> = graph.packages_of(&project.id).collect();
        let count = packages.len();
        for (i, package) in packages.into_iter().enumerate() {
            let branch = if i + 1 == count { "└──" } else { "├──" };
            if package.has_conflict {
                let marker = format!("[{} conflict]", package.conflict_severity);
                let _ = writeln!(
                    out,
                    "{} {} {}",
                    branch,
                    package.label,
                    severity_style(package.conflict_severity, marker)
                );
            } else {
                let _ = writeln!(out, "{} {}", branch, package.label);
            }
        }
    }

    let conflicts = graph.conflicts_at_least(ConflictSeverity::None);
    if !conflicts.is_empty() {
        out.push_str(&render_conflicts(&conflicts));
    }

    out
}

/// Banner-framed list of conflicts
pub(crate) fn render_conflicts(conflicts: &[&ConflictInfo]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", "=".repeat(80));
    let _ = writeln!(out, "Version Conflicts Detected");
    let _ = writeln!(out, "{}", "=".repeat(80));

    for conflict in conflicts {
        let severity = format!("{} ({})", conflict.severity_label(), conflict.severity);
        let _ = writeln!(
            out,
            "\n  {} has {} different versions: {}",
            conflict.package_id,
            conflict.versions.len(),
            severity_style(conflict.severity, severity)
        );
        for version in &conflict.versions {
            let _ = writeln!(out, "      • {}", version);
        }
        if let Some(suggested) = &conflict.suggested_version {
            let _ = writeln!(out, "  Suggested: {}", suggested);
        }
    }

    out
}

// ========================================================================
// JSON Output
// ========================================================================

pub(crate) fn render_json(graph: &DependencyGraph) -> Result<String> {
    let json = GraphJson {
        summary: graph.stats(),
        nodes: &graph.nodes,
        edges: &graph.edges,
        conflicts: graph.conflicts.values().collect(),
    };
    let mut rendered =
        serde_json::to_string_pretty(&json).context("Failed to serialize graph to JSON")?;
    rendered.push('\n');
    Ok(rendered)
}

// ========================================================================
// DOT Output
// ========================================================================

pub(crate) fn render_dot(graph: &DependencyGraph) -> String {
    let mut out = String::new();
    out.push_str("digraph dependencies {\n");
    out.push_str("    rankdir=LR;\n");
    out.push_str("    node [shape=box, style=filled, fillcolor=lightblue, fontname=\"Helvetica\"];\n");
    out.push_str("    edge [fontname=\"Helvetica\", fontsize=10];\n\n");

    for node in &graph.nodes {
        let color = if node.is_project() {
            "lightgreen"
        } else {
            conflict_color(node)
        };
        let _ = writeln!(
            out,
            "    \"{}\" [label=\"{}\", fillcolor={}];",
            escape_dot(&node.id),
            escape_dot(&node.label),
            color
        );
    }

    out.push('\n');

    for edge in &graph.edges {
        let attrs = match edge.edge_type {
            EdgeType::Conflict => " [style=dashed, color=red, dir=none]",
            EdgeType::Direct | EdgeType::Transitive => "",
        };
        let _ = writeln!(
            out,
            "    \"{}\" -> \"{}\"{};",
            escape_dot(&edge.source),
            escape_dot(&edge.target),
            attrs
        );
    }

    out.push_str("}\n");
    out
}

fn conflict_color(node: &DependencyNode) -> &'static str {
    match node.conflict_severity {
        ConflictSeverity::Major => "salmon",
        ConflictSeverity::Minor => "orange",
        ConflictSeverity::Patch => "lightyellow",
        ConflictSeverity::None => "lightblue",
    }
}

fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nugraph::dependency::GraphOptions;
    use nugraph::PackageFact;

    fn sample_graph() -> DependencyGraph {
        let facts = vec![
            PackageFact::new("Serilog", "3.0.0", "/repo/src/Api/Api.csproj"),
            PackageFact::new("Newtonsoft.Json", "13.0.3", "/repo/src/Api/Api.csproj"),
            PackageFact::new("Serilog", "4.0.0", "/repo/src/Worker/Worker.csproj"),
        ];
        build_graph(&facts, &GraphOptions::default())
    }

    #[test]
    fn test_text_lists_projects_and_conflicts() {
        let text = render_text(&sample_graph());
        assert!(text.contains("2 projects, 3 packages, 1 conflicts"));
        assert!(text.contains("Api.csproj (/repo/src/Api/Api.csproj)"));
        assert!(text.contains("Newtonsoft.Json 13.0.3"));
        assert!(text.contains("[major conflict]"));
        assert!(text.contains("Version Conflicts Detected"));
        assert!(text.contains("Suggested: 4.0.0"));
    }

    #[test]
    fn test_text_without_conflicts_has_no_banner() {
        let facts = vec![PackageFact::new("Moq", "4.20.0", "/repo/Tests.csproj")];
        let text = render_text(&build_graph(&facts, &GraphOptions::default()));
        assert!(!text.contains("Version Conflicts Detected"));
    }

    #[test]
    fn test_json_projection() {
        let rendered = render_json(&sample_graph()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(value["summary"]["nodeCount"], 5);
        assert_eq!(value["summary"]["conflictCount"], 1);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
        assert_eq!(value["conflicts"][0]["packageId"], "Serilog");
        assert_eq!(value["conflicts"][0]["severity"], 3);
        assert_eq!(value["conflicts"][0]["suggestedVersion"], "4.0.0");
    }

    #[test]
    fn test_dot_draws_conflict_edges_dashed() {
        let dot = render_dot(&sample_graph());
        assert!(dot.starts_with("digraph dependencies {"));
        assert!(dot.contains("\"Serilog_3.0.0\" -> \"Serilog_4.0.0\" [style=dashed"));
        assert!(dot.contains("fillcolor=salmon"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_report_file_has_no_escape_codes() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("report.txt");
        let styled = format!(
            "Serilog 3.0.0 {}\n",
            console::style("[major conflict]").red().bold().force_styling(true)
        );
        assert!(styled.contains('\x1b'));

        write_report(&path, &styled).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "Serilog 3.0.0 [major conflict]\n");
    }

    #[test]
    fn test_write_report_to_missing_directory_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing").join("report.txt");
        let err = write_report(&path, "text").unwrap_err();
        assert!(matches!(err, NugraphError::Output { .. }));
    }

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot(r#"a"b\c"#), r#"a\"b\\c"#);
    }
}
