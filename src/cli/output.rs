//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::collections::BTreeMap;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::baseline::BaselineDocument;
use crate::config::ValidationResult;
use crate::monitor::AggregateReport;
use crate::report::{difference_rows, not_in_baseline_rows};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Summary row for the comparison table.
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "RESOURCE_TYPE")]
    resource_type: String,
    #[tabled(rename = "NAMESPACE")]
    namespace: String,
    #[tabled(rename = "RESOURCE_NAME")]
    resource_name: String,
    #[tabled(rename = "IN_BASELINE")]
    in_baseline: &'static str,
}

/// Baseline category row for the summary table.
#[derive(Tabled)]
struct BaselineRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Alias")]
    alias: String,
    #[tabled(rename = "Entries")]
    entries: usize,
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result of a comparison run.
    #[must_use]
    pub fn format_report(&self, report: &AggregateReport, detailed: bool) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(report).unwrap_or_default(),
            OutputFormat::Text => Self::format_report_text(report, detailed),
        }
    }

    /// Formats a report as text.
    fn format_report_text(report: &AggregateReport, detailed: bool) -> String {
        if !report.has_findings() {
            return format!(
                "{} All deployed resources match the baseline ({} comparisons).\n",
                "✓".green(),
                report.compared
            );
        }

        let mut output = String::new();
        let _ = write!(
            output,
            "\nBaseline comparison\n   Baseline fingerprint: {}\n\n",
            short_hash(&report.baseline_fingerprint)
        );

        let differing = report.differences.iter().flat_map(|(key, records)| {
            records.keys().map(move |name| SummaryRow {
                resource_type: key.resource_type.to_string(),
                namespace: key.namespace.clone(),
                resource_name: name.clone(),
                in_baseline: "Yes",
            })
        });
        let missing = report.not_in_baseline.iter().flat_map(|(key, records)| {
            records.keys().map(move |name| SummaryRow {
                resource_type: key.resource_type.to_string(),
                namespace: key.namespace.clone(),
                resource_name: name.clone(),
                in_baseline: "No",
            })
        });

        output.push_str(&Table::new(differing.chain(missing)).to_string());
        output.push('\n');

        if detailed {
            let differing_rows = difference_rows(report);
            if !differing_rows.is_empty() {
                output.push_str("\nDiffering details:\n");
                output.push_str(&Table::new(differing_rows).to_string());
                output.push('\n');
            }

            let missing_rows = not_in_baseline_rows(report);
            if !missing_rows.is_empty() {
                output.push_str("\nNot in baseline:\n");
                output.push_str(&Table::new(missing_rows).to_string());
                output.push('\n');
            }
        }

        let _ = write!(
            output,
            "\n{} {} resources differ, {} not in baseline\n",
            "⚠".yellow(),
            report.difference_count().to_string().yellow(),
            report.not_in_baseline_count().to_string().red()
        );

        output
    }

    /// Formats a baseline summary.
    #[must_use]
    pub fn format_baseline(&self, baseline: &BaselineDocument, fingerprint: &str) -> String {
        let mut categories: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for resource_type in baseline.categories() {
            let aliases = categories.entry(resource_type.to_string()).or_default();
            for (alias, set) in baseline.aliases(resource_type) {
                aliases.insert(alias.to_string(), set.len());
            }
        }

        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&BaselineJson {
                fingerprint,
                entry_count: baseline.entry_count(),
                categories,
            })
            .unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = String::new();
                let _ = write!(
                    output,
                    "\nBaseline\n   Fingerprint: {}\n   Entries: {}\n\n",
                    short_hash(fingerprint),
                    baseline.entry_count()
                );

                if categories.is_empty() {
                    output.push_str("   Baseline is empty.\n");
                    return output;
                }

                let rows: Vec<BaselineRow> = categories
                    .into_iter()
                    .flat_map(|(category, aliases)| {
                        aliases.into_iter().map(move |(alias, entries)| BaselineRow {
                            category: category.clone(),
                            alias,
                            entries,
                        })
                    })
                    .collect();

                output.push_str(&Table::new(rows).to_string());
                output.push('\n');
                output
            }
        }
    }

    /// Formats a validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": result.errors.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "warnings": result.warnings,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Configuration is valid\n", "✓".green())
                } else {
                    let mut output = format!(
                        "{} Configuration has {} errors:\n",
                        "✗".red(),
                        result.error_count()
                    );
                    for error in &result.errors {
                        let _ = writeln!(output, "   - {error}");
                    }
                    output
                };

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }
}

/// First eight characters of a fingerprint.
fn short_hash(hash: &str) -> &str {
    hash.get(..8).unwrap_or(hash)
}

// JSON serialization helpers

#[derive(serde::Serialize)]
struct BaselineJson<'a> {
    fingerprint: &'a str,
    entry_count: usize,
    categories: BTreeMap<String, BTreeMap<String, usize>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineLoader;
    use crate::config::ValidationError;
    use crate::differ::BaselineDiffer;
    use crate::monitor::ComparisonKey;
    use crate::resource::{ResourceRecord, ResourceType};
    use serde_json::json;

    const BASELINE: &str = r#"{
        "pvc": { "cm": { "data-0": { "capacity": "10Gi" }, "data-1": { "capacity": "5Gi" } } },
        "cronjobs": { "cm": {}, "evnfm": { "cleanup": { "data": {} } } }
    }"#;

    fn report() -> AggregateReport {
        let baseline = BaselineLoader::new().parse_json(BASELINE).unwrap();
        let deployed = vec![
            ResourceRecord::from_value(json!({ "Name": "data-0", "Capacity": "20Gi" })).unwrap(),
            ResourceRecord::from_value(json!({ "Name": "extra", "Capacity": "1Gi" })).unwrap(),
        ];

        let mut report = AggregateReport::new("0123456789abcdef");
        report.merge(
            ComparisonKey::new("eric-eo-cm", ResourceType::Pvc),
            BaselineDiffer::new().compare_resource_details(
                &deployed,
                baseline.set(ResourceType::Pvc, "cm"),
                ResourceType::Pvc,
            ),
        );
        report
    }

    #[test]
    fn test_report_text_summary() {
        let text = OutputFormatter::new(OutputFormat::Text).format_report(&report(), false);

        for header in ["RESOURCE_TYPE", "NAMESPACE", "RESOURCE_NAME", "IN_BASELINE"] {
            assert!(text.contains(header), "missing header {header}");
        }
        assert!(text.contains("data-0"));
        assert!(text.contains("extra"));
        assert!(text.contains("01234567"));
        assert!(!text.contains("Differing details:"));
    }

    #[test]
    fn test_report_text_detailed() {
        let text = OutputFormatter::new(OutputFormat::Text).format_report(&report(), true);

        assert!(text.contains("Approved Value"));
        assert!(text.contains("Not in Baseline"));
    }

    #[test]
    fn test_report_clean() {
        let text = OutputFormatter::new(OutputFormat::Text).format_report(&AggregateReport::new("x"), true);
        assert!(text.contains("match the baseline"));
    }

    #[test]
    fn test_report_json() {
        let text = OutputFormatter::new(OutputFormat::Json).format_report(&report(), false);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value["differences"]["eric-eo-cm/pvc"]["data-0"]["Capacity"]["deployed"],
            "20Gi"
        );
        assert_eq!(value["not_in_baseline"]["eric-eo-cm/pvc"]["extra"]["type"], "PersistentVolumeClaim");
    }

    #[test]
    fn test_baseline_summary() {
        let baseline = BaselineLoader::new().parse_json(BASELINE).unwrap();

        let text = OutputFormatter::new(OutputFormat::Json).format_baseline(&baseline, "abc");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["entry_count"], 3);
        assert_eq!(value["categories"]["pvc"]["cm"], 2);
        assert_eq!(value["categories"]["cronjobs"]["cm"], 0);

        let text = OutputFormatter::new(OutputFormat::Text).format_baseline(&baseline, "abc");
        assert!(text.contains("evnfm"));
    }

    #[test]
    fn test_validation_output() {
        let result = ValidationResult {
            errors: vec![ValidationError {
                field: String::from("namespaces"),
                message: String::from("At least one namespace is required"),
            }],
            warnings: vec![String::from("resource type listed twice")],
        };

        let text = OutputFormatter::new(OutputFormat::Text).format_validation(&result, false);
        assert!(text.contains("namespaces: At least one namespace is required"));
        assert!(!text.contains("listed twice"));

        let text = OutputFormatter::new(OutputFormat::Json).format_validation(&result, true);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["valid"], false);
        assert_eq!(value["warnings"][0], "resource type listed twice");
    }
}
