//! Snapshot file resource source.
//!
//! A snapshot is a JSON export of deployed resources shaped as
//! `{ namespace: { resource type: [flat record, ...] } }`, produced by
//! whatever tool talks to the cluster.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{ResbaseError, Result, SourceError};
use crate::resource::{ResourceRecord, ResourceType};

use super::store::ResourceSource;

/// Records keyed by namespace, then by resource type category.
type SnapshotRecords = BTreeMap<String, BTreeMap<String, Vec<ResourceRecord>>>;

/// Resource source backed by a snapshot file.
#[derive(Debug, Default)]
pub struct SnapshotSource {
    records: SnapshotRecords,
    skipped: usize,
}

impl SnapshotSource {
    /// Reads and parses a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or not a snapshot.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading snapshot from: {}", path.display());

        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(ResbaseError::Source(SourceError::SnapshotNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = fs::read_to_string(path).await.map_err(|e| {
            SourceError::invalid(format!("Failed to read {}: {e}", path.display()))
        })?;

        Self::from_json(&content)
    }

    /// Parses a snapshot from a JSON string.
    ///
    /// Records that cannot become a [`ResourceRecord`] (no name, not an
    /// object) are skipped with a warning and counted.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or not shaped as a snapshot.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, BTreeMap<String, Vec<Value>>> = serde_json::from_str(content)
            .map_err(|e| SourceError::invalid(format!("Failed to parse snapshot: {e}")))?;

        let mut source = Self::default();

        for (namespace, types) in raw {
            let by_type = source.records.entry(namespace.clone()).or_default();

            for (category, values) in types {
                let mut records = Vec::with_capacity(values.len());
                for value in values {
                    match ResourceRecord::from_value(value) {
                        Ok(record) => records.push(record),
                        Err(e) => {
                            warn!("Skipping record in {namespace}/{category}: {e}");
                            source.skipped += 1;
                        }
                    }
                }
                debug!("Snapshot {namespace}/{category}: {} records", records.len());
                by_type.insert(category, records);
            }
        }

        Ok(source)
    }

    /// Number of records skipped while parsing.
    #[must_use]
    pub const fn skipped_records(&self) -> usize {
        self.skipped
    }

    /// Namespaces present in the snapshot.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

#[async_trait]
impl ResourceSource for SnapshotSource {
    async fn collect(&self, namespace: &str, resource_type: ResourceType) -> Result<Vec<ResourceRecord>> {
        let records = self
            .records
            .get(namespace)
            .and_then(|types| types.get(resource_type.as_str()))
            .cloned()
            .unwrap_or_default();

        debug!(
            "Collected {} {resource_type} records from {namespace}",
            records.len()
        );
        Ok(records)
    }

    fn backend_type(&self) -> &'static str {
        "snapshot"
    }
}
