//! Typed baseline model.
//!
//! The baseline file is a JSON document keyed by resource-type category, then
//! by namespace alias. Each leaf is either a set of PVC entries or a set of
//! workload entries, distinguished by the category.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::resource::{DimensionMap, LimitKind, NOT_SPECIFIED, ResourceType};

/// A baseline value, compared as opaque text.
///
/// Numbers and booleans in the baseline file are kept as their JSON text, so
/// `2` and `"2"` compare equal while `1Gi` and `1024Mi` do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(String);

impl Quantity {
    /// Creates a quantity from its text.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the quantity text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(Self(s)),
            Value::Number(n) => Ok(Self(n.to_string())),
            Value::Bool(b) => Ok(Self(b.to_string())),
            other => Err(serde::de::Error::custom(format!(
                "expected a scalar quantity, found {other}"
            ))),
        }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Approved values for one limit kind of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineDimensions {
    /// Approved CPU quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<Quantity>,
    /// Approved memory quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Quantity>,
    /// Approved ephemeral storage. When absent, storage is not compared.
    #[serde(
        rename = "ephemeral-storage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ephemeral_storage: Option<Quantity>,
}

impl BaselineDimensions {
    /// Returns true if the baseline declares an ephemeral storage value.
    #[must_use]
    pub const fn declares_ephemeral_storage(&self) -> bool {
        self.ephemeral_storage.is_some()
    }

    /// Converts to the map compared against deployed values.
    ///
    /// The map holds exactly the declared dimensions. When ephemeral storage
    /// is declared, cpu and memory are always present, padded with
    /// "Not specified".
    #[must_use]
    pub fn to_dimension_map(&self) -> DimensionMap {
        let text = |q: &Option<Quantity>| q.as_ref().map(|q| q.as_str().to_string());

        if self.declares_ephemeral_storage() {
            let padded = |q: &Option<Quantity>| Some(text(q).unwrap_or_else(|| NOT_SPECIFIED.to_string()));
            DimensionMap {
                cpu: padded(&self.cpu),
                memory: padded(&self.memory),
                ephemeral_storage: text(&self.ephemeral_storage),
            }
        } else {
            DimensionMap {
                cpu: text(&self.cpu),
                memory: text(&self.memory),
                ephemeral_storage: None,
            }
        }
    }
}

/// Approved limits and requests for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerBaseline {
    /// Approved limits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BaselineDimensions>,
    /// Approved requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<BaselineDimensions>,
}

impl ContainerBaseline {
    /// Returns the approved dimensions for a limit kind, if declared.
    #[must_use]
    pub const fn dimensions(&self, kind: LimitKind) -> Option<&BaselineDimensions> {
        match kind {
            LimitKind::Limits => self.limits.as_ref(),
            LimitKind::Requests => self.requests.as_ref(),
        }
    }
}

/// Baseline entry for a workload (deployment, statefulset, cronjob, daemonset).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadBaseline {
    /// Containers keyed by container name.
    #[serde(default, deserialize_with = "null_entries_as_default")]
    pub data: BTreeMap<String, ContainerBaseline>,
}

impl WorkloadBaseline {
    /// Looks up a container by name.
    #[must_use]
    pub fn container(&self, name: &str) -> Option<&ContainerBaseline> {
        self.data.get(name)
    }
}

/// Baseline entry for a persistent volume claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PvcBaseline {
    /// Approved capacity. The outer `None` means the key is absent, the inner
    /// `None` that it is present but null.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub capacity: Option<Option<Quantity>>,
    /// Other keys carried by the entry.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl PvcBaseline {
    /// Approved capacity, if the entry states one.
    #[must_use]
    pub fn approved_capacity(&self) -> Option<&Quantity> {
        self.capacity.as_ref().and_then(Option::as_ref)
    }

    /// Returns true if the entry carries no keys at all, null-valued ones
    /// included.
    ///
    /// Empty entries count as absent from the baseline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capacity.is_none() && self.extra.is_empty()
    }
}

/// Marks a key as present, keeping a null value as `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Reads a mapping whose own value, or any of whose entries, may be null;
/// nulls become defaults.
fn null_entries_as_default<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let entries = Option::<BTreeMap<String, Option<T>>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|(key, value)| (key, value.unwrap_or_default()))
        .collect())
}

/// Baseline entries for one category and namespace alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BaselineSet {
    /// PVC entries keyed by claim name.
    Pvc(BTreeMap<String, PvcBaseline>),
    /// Workload entries keyed by resource name.
    Workload(BTreeMap<String, WorkloadBaseline>),
}

impl BaselineSet {
    /// Parses a set from JSON, choosing the shape from the resource type.
    ///
    /// # Errors
    ///
    /// Returns the serde error if the value does not match the shape. A null
    /// set or null entry is read as empty.
    pub fn from_value(resource_type: ResourceType, value: Value) -> serde_json::Result<Self> {
        if resource_type.is_pvc() {
            null_entries_as_default(value).map(Self::Pvc)
        } else {
            null_entries_as_default(value).map(Self::Workload)
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Pvc(entries) => entries.len(),
            Self::Workload(entries) => entries.len(),
        }
    }

    /// Returns true if the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A complete baseline: category, then namespace alias, then entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BaselineDocument {
    categories: BTreeMap<ResourceType, BTreeMap<String, BaselineSet>>,
}

impl BaselineDocument {
    /// Creates an empty baseline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the set for a category and alias, replacing any previous one.
    pub fn insert(&mut self, resource_type: ResourceType, alias: impl Into<String>, set: BaselineSet) {
        self.categories
            .entry(resource_type)
            .or_default()
            .insert(alias.into(), set);
    }

    /// Categories present in the baseline, in order.
    pub fn categories(&self) -> impl Iterator<Item = ResourceType> + '_ {
        self.categories.keys().copied()
    }

    /// Aliases and sets recorded for a category.
    pub fn aliases(
        &self,
        resource_type: ResourceType,
    ) -> impl Iterator<Item = (&str, &BaselineSet)> + '_ {
        self.categories
            .get(&resource_type)
            .into_iter()
            .flat_map(|aliases| aliases.iter().map(|(a, s)| (a.as_str(), s)))
    }

    /// The set for a category and alias, if the baseline has one.
    #[must_use]
    pub fn set(&self, resource_type: ResourceType, alias: &str) -> Option<&BaselineSet> {
        self.categories.get(&resource_type)?.get(alias)
    }

    /// Total number of entries across all categories and aliases.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.categories
            .values()
            .flat_map(BTreeMap::values)
            .map(BaselineSet::len)
            .sum()
    }

    /// Returns true if the baseline has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quantity_accepts_scalars() {
        let dims: BaselineDimensions =
            serde_json::from_value(json!({ "cpu": 2, "memory": "1Gi" })).unwrap();
        assert_eq!(dims.cpu, Some(Quantity::new("2")));
        assert_eq!(dims.memory, Some(Quantity::new("1Gi")));
        assert!(!dims.declares_ephemeral_storage());

        let nested: Result<BaselineDimensions, _> =
            serde_json::from_value(json!({ "cpu": { "value": 1 } }));
        assert!(nested.is_err());
    }

    #[test]
    fn test_dimension_map_pads_missing_values() {
        let dims: BaselineDimensions =
            serde_json::from_value(json!({ "memory": "1Gi", "ephemeral-storage": "2Gi" }))
                .unwrap();
        let map = dims.to_dimension_map();

        assert_eq!(map.cpu.as_deref(), Some(NOT_SPECIFIED));
        assert_eq!(map.memory.as_deref(), Some("1Gi"));
        assert_eq!(map.ephemeral_storage.as_deref(), Some("2Gi"));
    }

    #[test]
    fn test_dimension_map_keeps_declared_set() {
        let dims: BaselineDimensions = serde_json::from_value(json!({ "cpu": "1" })).unwrap();
        let map = dims.to_dimension_map();

        assert_eq!(map.cpu.as_deref(), Some("1"));
        assert_eq!(map.memory, None);
        assert_eq!(map.ephemeral_storage, None);
        assert_eq!(serde_json::to_value(&map).unwrap(), json!({ "cpu": "1" }));
    }

    #[test]
    fn test_workload_without_data_is_empty() {
        let set = BaselineSet::from_value(
            ResourceType::Deployments,
            json!({ "app": {}, "job": { "data": null }, "db": null }),
        )
        .unwrap();

        match set {
            BaselineSet::Workload(entries) => {
                assert!(entries["app"].data.is_empty());
                assert!(entries["job"].data.is_empty());
                assert!(entries["db"].data.is_empty());
            }
            BaselineSet::Pvc(_) => panic!("expected workload set"),
        }
    }

    #[test]
    fn test_null_container_and_limit_kind_are_empty() {
        let set = BaselineSet::from_value(
            ResourceType::StatefulSets,
            json!({ "db": { "data": { "main": null, "side": { "limits": null, "requests": { "cpu": "1" } } } } }),
        )
        .unwrap();

        let BaselineSet::Workload(entries) = set else {
            panic!("expected workload set");
        };
        let db = &entries["db"];
        assert_eq!(db.container("main"), Some(&ContainerBaseline::default()));
        let side = db.container("side").unwrap();
        assert!(side.dimensions(LimitKind::Limits).is_none());
        assert!(side.dimensions(LimitKind::Requests).is_some());
    }

    #[test]
    fn test_empty_pvc_entry_counts_as_absent() {
        let set = BaselineSet::from_value(
            ResourceType::Pvc,
            json!({
                "data-0": {},
                "data-1": { "capacity": "10Gi" },
                "data-2": { "storageClass": "fast" },
                "data-3": { "capacity": null },
                "data-4": null
            }),
        )
        .unwrap();

        let BaselineSet::Pvc(entries) = set else {
            panic!("expected PVC set");
        };
        assert!(entries["data-0"].is_empty());
        assert!(entries["data-4"].is_empty());
        assert_eq!(entries["data-1"].approved_capacity(), Some(&Quantity::new("10Gi")));
        assert!(!entries["data-2"].is_empty());
        assert!(!entries["data-3"].is_empty());
        assert_eq!(entries["data-3"].approved_capacity(), None);
        assert_eq!(entries.len(), 5);
    }

    #[test]
    fn test_document_lookup() {
        let mut doc = BaselineDocument::new();
        doc.insert(
            ResourceType::Pvc,
            "cm",
            BaselineSet::from_value(ResourceType::Pvc, json!({ "a": { "capacity": "1Gi" } })).unwrap(),
        );

        assert!(doc.set(ResourceType::Pvc, "cm").is_some());
        assert!(doc.set(ResourceType::Pvc, "evnfm").is_none());
        assert!(doc.set(ResourceType::Deployments, "cm").is_none());
        assert_eq!(doc.entry_count(), 1);
        assert_eq!(doc.categories().collect::<Vec<_>>(), vec![ResourceType::Pvc]);
    }
}
