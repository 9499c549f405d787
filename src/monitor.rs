//! Baseline monitor.
//!
//! This module collects deployed resources for every configured namespace and
//! resource type, runs the differ once per namespace and baseline category,
//! and merges the results under a composite `(namespace, resource type)` key.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::baseline::{BaselineDocument, BaselineHasher};
use crate::config::MonitorConfig;
use crate::differ::{BaselineDiffer, Comparison, DifferenceRecord, NotInBaselineRecord};
use crate::error::Result;
use crate::resource::{ResourceRecord, ResourceType};
use crate::source::ResourceSource;

/// Identifies one comparison pass: a namespace and a resource type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComparisonKey {
    /// Cluster namespace.
    pub namespace: String,
    /// Resource type category.
    pub resource_type: ResourceType,
}

impl ComparisonKey {
    /// Creates a new key.
    #[must_use]
    pub fn new(namespace: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            namespace: namespace.into(),
            resource_type,
        }
    }
}

impl std::fmt::Display for ComparisonKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.namespace, self.resource_type)
    }
}

impl Serialize for ComparisonKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Merged results of a monitor run.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Fingerprint of the baseline compared against.
    pub baseline_fingerprint: String,
    /// Number of comparison passes performed.
    pub compared: usize,
    /// Differences per comparison pass; passes without differences are omitted.
    pub differences: BTreeMap<ComparisonKey, DifferenceRecord>,
    /// Not-in-baseline entries per comparison pass; empty passes are omitted.
    pub not_in_baseline: BTreeMap<ComparisonKey, NotInBaselineRecord>,
}

impl AggregateReport {
    /// Creates an empty report for a baseline fingerprint.
    #[must_use]
    pub fn new(baseline_fingerprint: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            baseline_fingerprint: baseline_fingerprint.into(),
            compared: 0,
            differences: BTreeMap::new(),
            not_in_baseline: BTreeMap::new(),
        }
    }

    /// Merges one comparison pass, keeping only non-empty maps.
    pub fn merge(&mut self, key: ComparisonKey, comparison: Comparison) {
        self.compared += 1;
        let (differences, not_in_baseline) = comparison.into_parts();

        if !differences.is_empty() {
            self.differences.insert(key.clone(), differences);
        }
        if !not_in_baseline.is_empty() {
            self.not_in_baseline.insert(key, not_in_baseline);
        }
    }

    /// Returns true if anything differs from or is missing in the baseline.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        !self.differences.is_empty() || !self.not_in_baseline.is_empty()
    }

    /// Number of resources with differences.
    #[must_use]
    pub fn difference_count(&self) -> usize {
        self.differences.values().map(BTreeMap::len).sum()
    }

    /// Number of resources absent from the baseline.
    #[must_use]
    pub fn not_in_baseline_count(&self) -> usize {
        self.not_in_baseline.values().map(BTreeMap::len).sum()
    }
}

/// Deployed records collected in one run, keyed by namespace and type.
#[derive(Debug, Clone, Default)]
pub struct ResourceInventory {
    records: BTreeMap<ComparisonKey, Vec<ResourceRecord>>,
}

impl ResourceInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the records collected for one namespace and type.
    pub fn insert(&mut self, key: ComparisonKey, records: Vec<ResourceRecord>) {
        self.records.insert(key, records);
    }

    /// Records collected for a namespace and type; empty if none were.
    #[must_use]
    pub fn records(&self, namespace: &str, resource_type: ResourceType) -> &[ResourceRecord] {
        self.records
            .get(&ComparisonKey::new(namespace, resource_type))
            .map_or(&[], Vec::as_slice)
    }

    /// Every collection pass with its records, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&ComparisonKey, &[ResourceRecord])> {
        self.records.iter().map(|(key, records)| (key, records.as_slice()))
    }

    /// Total number of collected records.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

/// Output of a full monitor run.
#[derive(Debug, Clone)]
pub struct MonitorRun {
    /// Everything that was collected.
    pub inventory: ResourceInventory,
    /// Comparison results.
    pub report: AggregateReport,
}

/// Runs baseline comparisons across namespaces and resource types.
pub struct BaselineMonitor<'a, S: ResourceSource> {
    /// Configuration.
    config: &'a MonitorConfig,
    /// Baseline document.
    baseline: &'a BaselineDocument,
    /// Deployed resource source.
    source: &'a S,
    /// Diff engine.
    differ: BaselineDiffer,
    /// Baseline hasher.
    hasher: BaselineHasher,
}

impl<'a, S: ResourceSource> BaselineMonitor<'a, S> {
    /// Creates a new monitor.
    #[must_use]
    pub const fn new(config: &'a MonitorConfig, baseline: &'a BaselineDocument, source: &'a S) -> Self {
        Self {
            config,
            baseline,
            source,
            differ: BaselineDiffer::new(),
            hasher: BaselineHasher::new(),
        }
    }

    /// Collects and then compares everything the configuration names.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to collect resources.
    pub async fn run(&self) -> Result<MonitorRun> {
        let inventory = self.collect().await?;
        let report = self.compare(&inventory);
        Ok(MonitorRun { inventory, report })
    }

    /// Collects every configured resource type in every configured namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails to collect resources.
    pub async fn collect(&self) -> Result<ResourceInventory> {
        info!(
            "Collecting {} resource types in {} namespaces using {} source",
            self.config.resource_types.len(),
            self.config.namespaces.len(),
            self.source.backend_type()
        );

        let mut inventory = ResourceInventory::new();
        for mapping in &self.config.namespaces {
            for resource_type in &self.config.resource_types {
                let key = ComparisonKey::new(&mapping.name, *resource_type);
                if inventory.records.contains_key(&key) {
                    continue;
                }

                let records = self.source.collect(&mapping.name, *resource_type).await?;
                debug!("Collected {} records for {key}", records.len());
                inventory.insert(key, records);
            }
        }

        info!("Collected {} records", inventory.record_count());
        Ok(inventory)
    }

    /// Compares every configured namespace against every baseline category.
    ///
    /// Categories the configuration does not collect have no records in the
    /// inventory and therefore never produce findings.
    #[must_use]
    pub fn compare(&self, inventory: &ResourceInventory) -> AggregateReport {
        let mut report = AggregateReport::new(self.hasher.hash_document(self.baseline));

        if self.baseline.is_empty() {
            warn!("Baseline has no categories, nothing to compare");
        }

        for resource_type in &self.config.resource_types {
            if self.baseline.aliases(*resource_type).next().is_none() {
                warn!("Baseline has no '{resource_type}' category, collected resources are not compared");
            }
        }

        for mapping in &self.config.namespaces {
            for resource_type in self.baseline.categories() {
                let key = ComparisonKey::new(&mapping.name, resource_type);
                debug!(
                    "Comparing {key} against baseline alias '{}'",
                    mapping.alias
                );

                let deployed = inventory.records(&mapping.name, resource_type);

                let baseline = self.baseline.set(resource_type, &mapping.alias);
                if baseline.is_none() {
                    debug!("No baseline for {resource_type} under alias '{}'", mapping.alias);
                }

                let comparison =
                    self.differ
                        .compare_resource_details(deployed, baseline, resource_type);
                report.merge(key, comparison);
            }
        }

        if report.has_findings() {
            info!(
                "{} resources differ, {} not in baseline",
                report.difference_count(),
                report.not_in_baseline_count()
            );
        } else {
            info!("No differences detected");
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineLoader;
    use crate::config::ConfigParser;
    use crate::source::SnapshotSource;
    use serde_json::json;

    const CONFIG: &str = r"
baseline:
  path: baseline.json
snapshot:
  path: snapshot.json
namespaces:
  - name: eric-eo-cm
    alias: cm
  - name: eric-eo-evnfm
    alias: evnfm
resource_types: [deployments, pvc]
";

    const BASELINE: &str = r#"{
        "deployments": {
            "cm": { "app": { "data": { "c1": { "limits": { "cpu": "250m", "memory": "1Gi" } } } } },
            "evnfm": { "vnfm": { "data": { "main": { "limits": { "cpu": "1", "memory": "2Gi" } } } } }
        },
        "pvc": {
            "cm": { "data-app-0": { "capacity": "10Gi" } }
        },
        "statefulsets": {
            "cm": { "db": { "data": {} } }
        }
    }"#;

    const SNAPSHOT: &str = r#"{
        "eric-eo-cm": {
            "deployments": [
                { "Name": "app", "Container Name": "c1", "Namespace": "eric-eo-cm", "Cpu Limits": "500m", "Memory Limits": "1Gi" },
                { "Name": "extra", "Container Name": "x", "Namespace": "eric-eo-cm" }
            ],
            "pvc": [ { "Name": "data-app-0", "Namespace": "eric-eo-cm", "Capacity": "10Gi" } ],
            "statefulsets": [ { "Name": "unlisted", "Container Name": "s", "Namespace": "eric-eo-cm" } ]
        },
        "eric-eo-evnfm": {
            "deployments": [
                { "Name": "vnfm", "Container Name": "main", "Namespace": "eric-eo-evnfm", "CPU Limits": "1", "Memory Limits": "2Gi" }
            ],
            "pvc": [ { "Name": "logs", "Namespace": "eric-eo-evnfm", "Capacity": "5Gi" } ]
        }
    }"#;

    async fn monitor_run() -> MonitorRun {
        let config = ConfigParser::new().parse_yaml(CONFIG, None).unwrap();
        let baseline = BaselineLoader::new().parse_json(BASELINE).unwrap();
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();

        BaselineMonitor::new(&config, &baseline, &source)
            .run()
            .await
            .expect("monitor run succeeds")
    }

    async fn run() -> AggregateReport {
        monitor_run().await.report
    }

    #[tokio::test]
    async fn test_run_merges_under_composite_keys() {
        let report = run().await;

        // 2 namespaces x 3 baseline categories
        assert_eq!(report.compared, 6);
        assert!(report.has_findings());

        let cm_deployments = ComparisonKey::new("eric-eo-cm", ResourceType::Deployments);
        assert!(report.differences[&cm_deployments].contains_key("app"));
        assert!(report.not_in_baseline[&cm_deployments].contains_key("extra"));

        let evnfm_pvc = ComparisonKey::new("eric-eo-evnfm", ResourceType::Pvc);
        assert_eq!(report.not_in_baseline[&evnfm_pvc]["logs"].kind, "PersistentVolumeClaim");

        assert_eq!(report.difference_count(), 1);
        assert_eq!(report.not_in_baseline_count(), 2);
    }

    #[tokio::test]
    async fn test_uncollected_category_never_reports() {
        let report = run().await;
        let key = ComparisonKey::new("eric-eo-cm", ResourceType::StatefulSets);

        assert!(!report.differences.contains_key(&key));
        assert!(!report.not_in_baseline.contains_key(&key));
    }

    #[tokio::test]
    async fn test_report_serializes_string_keys() {
        let report = run().await;
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(
            value["differences"]["eric-eo-cm/deployments"]["app"]["c1"]["limits"]["baseline"],
            json!({ "cpu": "250m", "memory": "1Gi" })
        );
        assert_eq!(value["baseline_fingerprint"].as_str().map(str::len), Some(64));
    }

    #[tokio::test]
    async fn test_inventory_holds_configured_types_only() {
        let inventory = monitor_run().await.inventory;

        let keys: Vec<String> = inventory.iter().map(|(key, _)| key.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "eric-eo-cm/deployments",
                "eric-eo-cm/pvc",
                "eric-eo-evnfm/deployments",
                "eric-eo-evnfm/pvc"
            ]
        );
        assert_eq!(inventory.record_count(), 5);
        assert!(inventory.records("eric-eo-cm", ResourceType::StatefulSets).is_empty());
        assert_eq!(inventory.records("eric-eo-cm", ResourceType::Deployments).len(), 2);
    }

    #[tokio::test]
    async fn test_collect_skips_repeated_types() {
        let mut config: MonitorConfig = ConfigParser::new().parse_yaml(CONFIG, None).unwrap();
        config.resource_types = vec![ResourceType::Pvc, ResourceType::Pvc];
        let baseline = BaselineLoader::new().parse_json(BASELINE).unwrap();
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();

        let inventory = BaselineMonitor::new(&config, &baseline, &source)
            .collect()
            .await
            .unwrap();
        assert_eq!(inventory.iter().count(), 2);
        assert_eq!(inventory.record_count(), 2);
    }

    #[test]
    fn test_merge_skips_empty_maps() {
        let mut report = AggregateReport::new("abc");
        report.merge(ComparisonKey::new("ns", ResourceType::Pvc), Comparison::default());

        assert_eq!(report.compared, 1);
        assert!(!report.has_findings());
        assert!(report.differences.is_empty());
    }

    #[test]
    fn test_key_display() {
        let key = ComparisonKey::new("eric-eo-cm", ResourceType::DaemonSets);
        assert_eq!(key.to_string(), "eric-eo-cm/daemonsets");
    }
}
