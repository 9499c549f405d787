//! Comparison outcome types.
//!
//! These types serialize to the nested shape downstream renderers consume:
//! resource name → `Capacity` for PVCs, or resource name → container →
//! limit kind → `{deployed, baseline}` for workloads.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::resource::{DimensionMap, LimitKind, ResourceRecord, ResourceType};

/// Deployed and approved capacity of a PVC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityDiff {
    /// Deployed capacity.
    pub deployed: String,
    /// Approved capacity, `None` when the baseline entry has none.
    pub baseline: Option<String>,
}

/// Deployed and approved values of one limit kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LimitDiff {
    /// Deployed values, trimmed to the compared dimensions.
    pub deployed: DimensionMap,
    /// Approved values.
    pub baseline: DimensionMap,
}

/// Differing limit kinds of one container.
pub type ContainerDifference = BTreeMap<LimitKind, LimitDiff>;

/// Everything that differs for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResourceDifference {
    /// A PVC whose capacity differs.
    Capacity {
        /// The capacity difference.
        #[serde(rename = "Capacity")]
        capacity: CapacityDiff,
    },
    /// A workload with differing containers, keyed by container name.
    Containers(BTreeMap<String, ContainerDifference>),
}

impl ResourceDifference {
    /// Returns the capacity difference of a PVC.
    #[must_use]
    pub const fn as_capacity(&self) -> Option<&CapacityDiff> {
        match self {
            Self::Capacity { capacity } => Some(capacity),
            Self::Containers(_) => None,
        }
    }

    /// Returns the differing containers of a workload.
    #[must_use]
    pub const fn containers(&self) -> Option<&BTreeMap<String, ContainerDifference>> {
        match self {
            Self::Capacity { .. } => None,
            Self::Containers(containers) => Some(containers),
        }
    }
}

/// Differences keyed by resource name.
pub type DifferenceRecord = BTreeMap<String, ResourceDifference>;

/// A deployed resource with no baseline entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotInBaselineEntry {
    /// Resource type tag, `PersistentVolumeClaim` for PVCs.
    #[serde(rename = "type")]
    pub kind: String,
    /// Namespace of the deployed resource.
    pub namespace: String,
    /// The full deployed record.
    pub details: ResourceRecord,
}

/// Not-in-baseline entries keyed by resource name.
pub type NotInBaselineRecord = BTreeMap<String, NotInBaselineEntry>;

/// Result of one comparison pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Comparison {
    /// Resources present in the baseline with differing values.
    pub differences: DifferenceRecord,
    /// Resources absent from the baseline.
    pub not_in_baseline: NotInBaselineRecord,
}

impl Comparison {
    /// Returns true if every deployed resource matched its baseline.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.differences.is_empty() && self.not_in_baseline.is_empty()
    }

    /// Splits into the differences and not-in-baseline maps.
    #[must_use]
    pub fn into_parts(self) -> (DifferenceRecord, NotInBaselineRecord) {
        (self.differences, self.not_in_baseline)
    }

    pub(super) fn record_not_in_baseline(&mut self, record: &ResourceRecord, resource_type: ResourceType) {
        self.not_in_baseline.insert(
            record.name().to_string(),
            NotInBaselineEntry {
                kind: resource_type.not_in_baseline_tag().to_string(),
                namespace: record.namespace().to_string(),
                details: record.clone(),
            },
        );
    }

    pub(super) fn record_capacity_difference(&mut self, name: &str, capacity: CapacityDiff) {
        self.differences
            .insert(name.to_string(), ResourceDifference::Capacity { capacity });
    }

    pub(super) fn record_limit_difference(
        &mut self,
        name: &str,
        container: &str,
        kind: LimitKind,
        diff: LimitDiff,
    ) {
        let entry = self
            .differences
            .entry(name.to_string())
            .or_insert_with(|| ResourceDifference::Containers(BTreeMap::new()));

        if let ResourceDifference::Containers(containers) = entry {
            containers
                .entry(container.to_string())
                .or_default()
                .insert(kind, diff);
        }
    }
}
