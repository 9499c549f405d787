//! Diff engine for comparing deployed resources against a baseline.
//!
//! PVCs are compared by capacity only. Workloads are compared per container
//! and per limit kind on cpu and memory, plus ephemeral storage when the
//! baseline declares it. Values are compared as opaque text; no unit
//! normalization takes place.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::baseline::{BaselineDimensions, BaselineSet, PvcBaseline, WorkloadBaseline};
use crate::resource::{DimensionMap, LimitKind, ResourceRecord, ResourceType};

use super::outcome::{CapacityDiff, Comparison, LimitDiff};

/// Engine comparing deployed records with baseline entries.
#[derive(Debug, Default)]
pub struct BaselineDiffer;

impl BaselineDiffer {
    /// Creates a new differ.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compares deployed records of one resource type with their baseline.
    ///
    /// `baseline` is the set for the records' category and namespace alias;
    /// `None` means the baseline has nothing for them. A set whose shape does
    /// not match `resource_type` is treated as empty.
    #[must_use]
    pub fn compare_resource_details(
        &self,
        deployed: &[ResourceRecord],
        baseline: Option<&BaselineSet>,
        resource_type: ResourceType,
    ) -> Comparison {
        let mut comparison = Comparison::default();

        if resource_type.is_pvc() {
            let entries = match baseline {
                Some(BaselineSet::Pvc(entries)) => Some(entries),
                Some(BaselineSet::Workload(_)) => {
                    warn!("Baseline set for {resource_type} has workload shape, treating as empty");
                    None
                }
                None => None,
            };
            for record in deployed {
                Self::compare_pvc(record, entries, &mut comparison);
            }
        } else {
            let entries = match baseline {
                Some(BaselineSet::Workload(entries)) => Some(entries),
                Some(BaselineSet::Pvc(_)) => {
                    warn!("Baseline set for {resource_type} has PVC shape, treating as empty");
                    None
                }
                None => None,
            };
            for record in deployed {
                Self::compare_workload(record, resource_type, entries, &mut comparison);
            }
        }

        comparison
    }

    /// Compares a single PVC record by capacity.
    fn compare_pvc(
        record: &ResourceRecord,
        entries: Option<&BTreeMap<String, PvcBaseline>>,
        comparison: &mut Comparison,
    ) {
        let name = record.name();
        debug!("Processing PVC: {name}");

        let Some(entry) = entries
            .and_then(|entries| entries.get(name))
            .filter(|entry| !entry.is_empty())
        else {
            debug!("PVC {name} not found in baseline");
            comparison.record_not_in_baseline(record, ResourceType::Pvc);
            return;
        };

        let baseline = entry.approved_capacity().map(|q| q.as_str().to_string());
        debug!("Baseline capacity for PVC {name}: {baseline:?}");

        if baseline.as_deref() != Some(record.capacity()) {
            comparison.record_capacity_difference(
                name,
                CapacityDiff {
                    deployed: record.capacity().to_string(),
                    baseline,
                },
            );
        }
    }

    /// Compares a single workload container record per limit kind.
    fn compare_workload(
        record: &ResourceRecord,
        resource_type: ResourceType,
        entries: Option<&BTreeMap<String, WorkloadBaseline>>,
        comparison: &mut Comparison,
    ) {
        let name = record.name();

        let Some(entry) = entries.and_then(|entries| entries.get(name)) else {
            debug!("Resource {name} not found in baseline");
            comparison.record_not_in_baseline(record, resource_type);
            return;
        };

        let container_name = record.container_name();
        let container = entry.container(container_name);
        if container.is_none() {
            debug!("Container '{container_name}' of {name} has no baseline entry");
        }

        for kind in LimitKind::ALL {
            let approved = container.and_then(|c| c.dimensions(kind));
            let diff = Self::limit_diff(record.dimensions(kind), approved);

            if diff.deployed != diff.baseline {
                debug!("{name}/{container_name} {kind} differ from baseline");
                comparison.record_limit_difference(name, container_name, kind, diff);
            }
        }
    }

    /// Builds the pair of dimension maps to compare for one limit kind.
    ///
    /// The baseline map holds the declared dimensions, or cpu and memory as
    /// "Not specified" when the limit kind is missing. The deployed map is
    /// trimmed to the same dimensions.
    fn limit_diff(deployed: &DimensionMap, approved: Option<&BaselineDimensions>) -> LimitDiff {
        let baseline = approved.map_or_else(
            DimensionMap::unspecified,
            BaselineDimensions::to_dimension_map,
        );

        LimitDiff {
            deployed: deployed.restricted_to(&baseline),
            baseline,
        }
    }
}
