//! nugraph - dependency graph and version-conflict analysis
//!
//! Given the package references an external scanner found across a set of
//! project files, nugraph builds a graph of project and package nodes, finds
//! packages referenced at more than one version, classifies how risky each of
//! those conflicts is, and suggests a version to converge on.
//!
//! ```
//! use nugraph::dependency::{build_graph, ConflictSeverity, GraphOptions};
//! use nugraph::facts::PackageFact;
//!
//! let facts = vec![
//!     PackageFact::new("Serilog", "3.0.0", "src/Api/Api.csproj"),
//!     PackageFact::new("Serilog", "4.0.0", "src/Worker/Worker.csproj"),
//! ];
//!
//! let graph = build_graph(&facts, &GraphOptions::default());
//! let conflict = graph.conflict("serilog").unwrap();
//! assert_eq!(conflict.severity, ConflictSeverity::Major);
//! assert_eq!(conflict.suggested_version.as_deref(), Some("4.0.0"));
//! ```

pub mod config;
pub mod dependency;
pub mod error;
pub mod facts;
pub mod health;

pub use config::NugraphConfig;
pub use dependency::{build_graph, DependencyGraph, GraphBuilder, GraphOptions};
pub use error::NugraphError;
pub use facts::{FactSource, JsonFactSource, PackageFact};
pub use health::HealthScore;
