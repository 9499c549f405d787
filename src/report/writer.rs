//! Report file writers.
//!
//! Writes the detail text file, the workbook export and the resource details
//! for a monitor run.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use crate::differ::ResourceDifference;
use crate::error::{ReportError, Result};
use crate::monitor::{AggregateReport, ResourceInventory};

use super::resources::ResourceDetails;
use super::rows::Workbook;

/// Writer for report files.
#[derive(Debug)]
pub struct ReportWriter {
    /// Path of the detail text file.
    differences_path: PathBuf,
    /// Path of the workbook export.
    workbook_path: PathBuf,
    /// Path of the resource details export.
    resources_path: PathBuf,
}

impl ReportWriter {
    /// Creates a writer for the given output paths.
    #[must_use]
    pub fn new(
        differences_path: impl Into<PathBuf>,
        workbook_path: impl Into<PathBuf>,
        resources_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            differences_path: differences_path.into(),
            workbook_path: workbook_path.into(),
            resources_path: resources_path.into(),
        }
    }

    /// Path of the detail text file.
    #[must_use]
    pub fn differences_path(&self) -> &Path {
        &self.differences_path
    }

    /// Path of the workbook export.
    #[must_use]
    pub fn workbook_path(&self) -> &Path {
        &self.workbook_path
    }

    /// Path of the resource details export.
    #[must_use]
    pub fn resources_path(&self) -> &Path {
        &self.resources_path
    }

    /// Writes both report files.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be written.
    pub async fn write_all(&self, report: &AggregateReport) -> Result<()> {
        self.write_differences(report).await?;
        self.write_workbook(report).await
    }

    /// Writes the detail text file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn write_differences(&self, report: &AggregateReport) -> Result<()> {
        let content = render_differences(report);
        write_file(&self.differences_path, content.as_bytes()).await?;
        info!("Wrote differences to {}", self.differences_path.display());
        Ok(())
    }

    /// Writes the workbook export.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn write_workbook(&self, report: &AggregateReport) -> Result<()> {
        let workbook = Workbook::from(report);
        let content = serde_json::to_string_pretty(&workbook).map_err(|e| ReportError::Serialization {
            message: e.to_string(),
        })?;

        write_file(&self.workbook_path, content.as_bytes()).await?;
        info!(
            "Wrote {} difference rows and {} not-in-baseline rows to {}",
            workbook.differing_details.len(),
            workbook.not_in_baseline.len(),
            self.workbook_path.display()
        );
        Ok(())
    }

    /// Writes every collected record, one sheet per namespace and type.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub async fn write_resource_details(&self, inventory: &ResourceInventory) -> Result<()> {
        let details = ResourceDetails::from_inventory(inventory);
        let content = serde_json::to_string_pretty(&details).map_err(|e| ReportError::Serialization {
            message: e.to_string(),
        })?;

        write_file(&self.resources_path, content.as_bytes()).await?;
        info!(
            "Wrote {} records in {} sheets to {}",
            details.record_count(),
            details.sheets.len(),
            self.resources_path.display()
        );
        Ok(())
    }
}

async fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    let failed = |e: std::io::Error| ReportError::WriteFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("Creating output directory: {}", parent.display());
            fs::create_dir_all(parent).await.map_err(failed)?;
        }
    }

    fs::write(path, content).await.map_err(failed)?;
    Ok(())
}

/// Renders the detail text for every differing resource.
#[must_use]
pub fn render_differences(report: &AggregateReport) -> String {
    let mut output = String::new();

    for (key, differences) in &report.differences {
        let _ = writeln!(output, "\nDifferences for {key}:");

        for (name, difference) in differences {
            let _ = writeln!(output, "Resource: {name}");

            match difference {
                ResourceDifference::Capacity { capacity } => {
                    let _ = writeln!(
                        output,
                        "  Capacity - Deployed: {} | Baseline: {}",
                        capacity.deployed,
                        capacity.baseline.as_deref().unwrap_or("None")
                    );
                }
                ResourceDifference::Containers(containers) => {
                    for (container, kinds) in containers {
                        let _ = writeln!(output, "  Container: {container}");
                        for (kind, diff) in kinds {
                            let _ = writeln!(
                                output,
                                "    {} - Deployed: {} | Baseline: {}",
                                kind.field_suffix(),
                                diff.deployed,
                                diff.baseline
                            );
                        }
                    }
                }
            }
        }
    }

    output
}
