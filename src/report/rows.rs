//! Tabular report rows.
//!
//! Flattens an [`AggregateReport`] into the two sheets downstream renderers
//! consume: `differing_details` and `not_in_baseline`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use crate::differ::ResourceDifference;
use crate::monitor::AggregateReport;

/// Name of the differences sheet.
pub const DIFFERING_DETAILS_SHEET: &str = "differing_details";
/// Name of the not-in-baseline sheet.
pub const NOT_IN_BASELINE_SHEET: &str = "not_in_baseline";

/// Container column value for PVC capacity rows.
const NO_CONTAINER: &str = "N/A";
/// Detail label for PVC capacity rows.
const CAPACITY_LABEL: &str = "Capacity";
/// Detail label for not-in-baseline rows.
const NOT_IN_BASELINE_LABEL: &str = "Not in Baseline";
/// Rendering of an absent baseline value.
const NO_VALUE: &str = "None";

/// One row of the `differing_details` sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct DifferenceRow {
    /// Resource type category.
    #[serde(rename = "Resource Type")]
    #[tabled(rename = "Resource Type")]
    pub resource_type: String,
    /// Cluster namespace.
    #[serde(rename = "Namespace")]
    #[tabled(rename = "Namespace")]
    pub namespace: String,
    /// Deployed resource name.
    #[serde(rename = "Deployed Resource Name")]
    #[tabled(rename = "Deployed Resource Name")]
    pub resource_name: String,
    /// Container name, `N/A` for PVC capacity rows.
    #[serde(rename = "Container")]
    #[tabled(rename = "Container")]
    pub container: String,
    /// What differs.
    #[serde(rename = "Differing Details")]
    #[tabled(rename = "Differing Details")]
    pub differing_details: String,
    /// Deployed value.
    #[serde(rename = "Deployed Value")]
    #[tabled(rename = "Deployed Value")]
    pub deployed_value: String,
    /// Approved baseline value.
    #[serde(rename = "Approved Value")]
    #[tabled(rename = "Approved Value")]
    pub approved_value: String,
}

/// One row of the `not_in_baseline` sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Tabled)]
pub struct NotInBaselineRow {
    /// Resource type category.
    #[serde(rename = "Resource Type")]
    #[tabled(rename = "Resource Type")]
    pub resource_type: String,
    /// Cluster namespace.
    #[serde(rename = "Namespace")]
    #[tabled(rename = "Namespace")]
    pub namespace: String,
    /// Deployed resource name.
    #[serde(rename = "Deployed Resource Name")]
    #[tabled(rename = "Deployed Resource Name")]
    pub resource_name: String,
    /// What differs.
    #[serde(rename = "Differing Details")]
    #[tabled(rename = "Differing Details")]
    pub differing_details: String,
}

/// Builds the `differing_details` rows, one per PVC or per container and
/// limit kind.
#[must_use]
pub fn difference_rows(report: &AggregateReport) -> Vec<DifferenceRow> {
    let mut rows = Vec::new();

    for (key, differences) in &report.differences {
        let resource_type = key.resource_type.to_string();

        for (name, difference) in differences {
            let row = |container: &str, label: &str, deployed: String, approved: String| {
                DifferenceRow {
                    resource_type: resource_type.clone(),
                    namespace: key.namespace.clone(),
                    resource_name: name.clone(),
                    container: container.to_string(),
                    differing_details: label.to_string(),
                    deployed_value: deployed,
                    approved_value: approved,
                }
            };

            match difference {
                ResourceDifference::Capacity { capacity } => rows.push(row(
                    NO_CONTAINER,
                    CAPACITY_LABEL,
                    capacity.deployed.clone(),
                    capacity.baseline.clone().unwrap_or_else(|| NO_VALUE.to_string()),
                )),
                ResourceDifference::Containers(containers) => {
                    for (container, kinds) in containers {
                        for (kind, diff) in kinds {
                            rows.push(row(
                                container,
                                kind.as_str(),
                                diff.deployed.render(),
                                diff.baseline.render(),
                            ));
                        }
                    }
                }
            }
        }
    }

    rows
}

/// Builds the `not_in_baseline` rows.
#[must_use]
pub fn not_in_baseline_rows(report: &AggregateReport) -> Vec<NotInBaselineRow> {
    report
        .not_in_baseline
        .iter()
        .flat_map(|(key, entries)| {
            entries.keys().map(move |name| NotInBaselineRow {
                resource_type: key.resource_type.to_string(),
                namespace: key.namespace.clone(),
                resource_name: name.clone(),
                differing_details: NOT_IN_BASELINE_LABEL.to_string(),
            })
        })
        .collect()
}

/// Both sheets plus run metadata, as exported to the workbook file.
#[derive(Debug, Clone, Serialize)]
pub struct Workbook {
    /// When the comparison ran.
    pub generated_at: DateTime<Utc>,
    /// Fingerprint of the baseline compared against.
    pub baseline_fingerprint: String,
    /// Rows of the `differing_details` sheet.
    pub differing_details: Vec<DifferenceRow>,
    /// Rows of the `not_in_baseline` sheet.
    pub not_in_baseline: Vec<NotInBaselineRow>,
}

impl From<&AggregateReport> for Workbook {
    fn from(report: &AggregateReport) -> Self {
        Self {
            generated_at: report.generated_at,
            baseline_fingerprint: report.baseline_fingerprint.clone(),
            differing_details: difference_rows(report),
            not_in_baseline: not_in_baseline_rows(report),
        }
    }
}
