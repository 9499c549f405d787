//! Configuration specification types for the baseline monitor.
//!
//! This module defines the structs that map to the `resbase.yaml` file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::report::resources_file_name;
use crate::resource::ResourceType;

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorConfig {
    /// Baseline file location.
    pub baseline: BaselineConfig,
    /// Snapshot file location.
    pub snapshot: SnapshotConfig,
    /// Namespaces to compare and their baseline aliases.
    #[serde(default)]
    pub namespaces: Vec<NamespaceMapping>,
    /// Resource types to collect.
    #[serde(default = "default_resource_types")]
    pub resource_types: Vec<ResourceType>,
    /// Report output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Baseline file configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaselineConfig {
    /// Path to the JSON baseline, relative to the config file.
    pub path: String,
}

/// Snapshot file configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Path to the JSON snapshot of deployed resources, relative to the config file.
    pub path: String,
}

/// A cluster namespace and the alias it is filed under in the baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamespaceMapping {
    /// Namespace name in the cluster.
    pub name: String,
    /// Alias used as the baseline key.
    pub alias: String,
}

/// Report output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Directory for report files, relative to the config file.
    #[serde(default = "default_output_dir")]
    pub dir: String,
    /// Detail text file name.
    #[serde(default = "default_differences_file")]
    pub differences_file: String,
    /// Workbook export file name.
    #[serde(default = "default_workbook_file")]
    pub workbook_file: String,
    /// Resource details file name. Derived from the namespace aliases when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources_file: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            differences_file: default_differences_file(),
            workbook_file: default_workbook_file(),
            resources_file: None,
        }
    }
}

fn default_resource_types() -> Vec<ResourceType> {
    ResourceType::ALL.to_vec()
}

fn default_output_dir() -> String {
    String::from(".")
}

fn default_differences_file() -> String {
    String::from("resource_differences.txt")
}

fn default_workbook_file() -> String {
    String::from("differing_resource_details.json")
}

impl MonitorConfig {
    /// Resolves the baseline path against the config file's directory.
    #[must_use]
    pub fn baseline_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.baseline.path)
    }

    /// Resolves the snapshot path against the config file's directory.
    #[must_use]
    pub fn snapshot_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.snapshot.path)
    }

    /// Resolves the detail text file path.
    #[must_use]
    pub fn differences_path(&self, base_dir: &Path) -> PathBuf {
        base_dir
            .join(&self.output.dir)
            .join(&self.output.differences_file)
    }

    /// Resolves the workbook export path.
    #[must_use]
    pub fn workbook_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.output.dir).join(&self.output.workbook_file)
    }

    /// Resource details file name, explicit or derived from the aliases.
    #[must_use]
    pub fn resources_file(&self) -> String {
        self.output
            .resources_file
            .clone()
            .unwrap_or_else(|| resources_file_name(&self.namespaces))
    }

    /// Resolves the resource details path.
    #[must_use]
    pub fn resources_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.output.dir).join(self.resources_file())
    }

    /// Returns true if the resource type is collected.
    #[must_use]
    pub fn collects(&self, resource_type: ResourceType) -> bool {
        self.resource_types.contains(&resource_type)
    }
}
