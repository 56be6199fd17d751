//! Health command - Score package health from collected registry metrics
//!
//! Usage:
//!   nugraph health scan.json          # Table, worst packages first
//!   nugraph health scan.json --json   # Output as JSON

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use console::style;
use serde::Serialize;

use nugraph::facts::{fold_case, ScanInput};
use nugraph::health::HealthStatus;
use nugraph::{HealthScore, NugraphConfig};

use crate::utils::terminal::print_warning;

/// Score package health from collected registry metrics
#[derive(Args, Debug)]
pub struct HealthCommand {
    /// Facts files or glob patterns
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Health of one referenced package
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PackageHealth {
    package_id: String,
    #[serde(flatten)]
    health: HealthScore,
}

impl HealthCommand {
    /// Execute the health command
    pub fn execute(self, _config: &NugraphConfig, _verbose: bool) -> Result<()> {
        let (_, input) = super::load_inputs(&self.inputs)?;
        let report = score_packages(&input, Utc::now());

        if self.json {
            let rendered =
                serde_json::to_string_pretty(&report).context("Failed to serialize health report")?;
            println!("{}", rendered);
            return Ok(());
        }

        if report.is_empty() {
            print_warning("No package metrics found in the inputs");
            return Ok(());
        }

        print_table(&report);
        Ok(())
    }
}

/// Score every referenced package that has metrics, worst first
fn score_packages(input: &ScanInput, now: DateTime<Utc>) -> Vec<PackageHealth> {
    let mut seen = HashSet::new();
    let mut report: Vec<PackageHealth> = input
        .facts
        .iter()
        .filter(|fact| seen.insert(fold_case(&fact.name)))
        .filter_map(|fact| {
            input.metrics_for(&fact.name).map(|metrics| PackageHealth {
                package_id: fact.name.clone(),
                health: HealthScore::from_metrics(metrics, now),
            })
        })
        .collect();

    for name in input.metrics.keys() {
        if !seen.contains(&fold_case(name)) {
            tracing::warn!(package = %name, "metrics for a package no project references, ignoring");
        }
    }

    report.sort_by(|a, b| {
        a.health
            .score
            .cmp(&b.health.score)
            .then_with(|| a.package_id.cmp(&b.package_id))
    });
    report
}

fn print_table(report: &[PackageHealth]) {
    let width = report
        .iter()
        .map(|p| p.package_id.len())
        .max()
        .unwrap_or(0)
        .max("Package".len());

    println!(
        "{:<width$}  {:>5}  {:<8}  {:>9}  {:>9}  {:>5}  {}",
        "Package", "Score", "Status", "Downloads", "Freshness", "Vulns", "Deprecated",
        width = width
    );
    println!("{}", "-".repeat(width + 58));

    for entry in report {
        let health = &entry.health;
        let status = format!("{:<8}", format!("{:?}", health.status));
        let status = match health.status {
            HealthStatus::Healthy => style(status).green(),
            HealthStatus::Warning => style(status).yellow(),
            HealthStatus::Critical => style(status).red().bold(),
        };
        println!(
            "{:<width$}  {:>5}  {}  {:>9}  {:>9}  {:>5}  {}",
            entry.package_id,
            health.score,
            status,
            health.downloads_score,
            health.freshness_score,
            health.vulnerability_count,
            if health.is_deprecated { "yes" } else { "no" },
            width = width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use nugraph::facts::PackageMetrics;
    use nugraph::PackageFact;

    fn metrics(total_downloads: u64, vulnerability_count: u32) -> PackageMetrics {
        PackageMetrics {
            total_downloads,
            last_published: None,
            vulnerability_count,
            is_deprecated: false,
        }
    }

    #[test]
    fn test_scores_referenced_packages_worst_first() {
        let mut input = ScanInput {
            facts: vec![
                PackageFact::new("Serilog", "3.0.0", "/a/A.csproj"),
                PackageFact::new("serilog", "4.0.0", "/b/B.csproj"),
                PackageFact::new("OldLib", "1.0.0", "/a/A.csproj"),
                PackageFact::new("NoMetrics", "1.0.0", "/a/A.csproj"),
            ],
            ..Default::default()
        };
        input.metrics.insert("serilog".to_string(), metrics(50_000_000, 0));
        input.metrics.insert("OldLib".to_string(), metrics(500, 3));
        input.metrics.insert("Unreferenced".to_string(), metrics(1, 0));

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let report = score_packages(&input, now);

        let names: Vec<_> = report.iter().map(|p| p.package_id.as_str()).collect();
        assert_eq!(names, ["OldLib", "Serilog"]);
        assert_eq!(report[0].health.status, HealthStatus::Critical);
    }

    #[test]
    fn test_json_flattens_score() {
        let entry = PackageHealth {
            package_id: "Moq".to_string(),
            health: HealthScore::compute(0, None, 0, false),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["packageId"], "Moq");
        assert_eq!(value["freshnessScore"], 50);
        assert_eq!(value["status"], "Critical");
    }
}
