//! Deployed resource records.
//!
//! A collector hands over each deployed resource as a flat mapping of field
//! name to value. [`ResourceRecord`] resolves every field the comparison needs
//! once, at construction, and keeps the raw mapping for reporting.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::CompareError;

use super::types::{LimitKind, NOT_SPECIFIED};

/// Raw field mapping of a deployed resource, as produced by a collector.
pub type RawFields = serde_json::Map<String, Value>;

/// Field holding the resource name.
pub const NAME_FIELD: &str = "Name";
/// Field holding the namespace.
pub const NAMESPACE_FIELD: &str = "Namespace";
/// Field holding the container name of a workload record.
pub const CONTAINER_FIELD: &str = "Container Name";
/// Field holding the capacity of a PVC record.
pub const CAPACITY_FIELD: &str = "Capacity";

/// Namespace assumed when a record does not carry one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Accepted spellings of the CPU field prefix.
const CPU_PREFIXES: &[&str] = &["CPU", "Cpu"];
const MEMORY_PREFIX: &str = "Memory";
const EPHEMERAL_STORAGE_PREFIX: &str = "Ephemeral-storage";

/// Values of one limit kind, keyed by dimension.
///
/// A dimension is `None` when it does not take part in a comparison; it is
/// then omitted from serialized and rendered output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionMap {
    /// CPU quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    /// Memory quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    /// Ephemeral storage quantity.
    #[serde(
        rename = "ephemeral-storage",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub ephemeral_storage: Option<String>,
}

impl DimensionMap {
    /// A map with cpu and memory set to the "Not specified" sentinel.
    #[must_use]
    pub fn unspecified() -> Self {
        Self {
            cpu: Some(NOT_SPECIFIED.to_string()),
            memory: Some(NOT_SPECIFIED.to_string()),
            ephemeral_storage: None,
        }
    }

    /// Returns a copy holding only the dimensions present in `shape`.
    #[must_use]
    pub fn restricted_to(&self, shape: &Self) -> Self {
        let keep = |value: &Option<String>, present: &Option<String>| {
            present.as_ref().and(value.clone())
        };

        Self {
            cpu: keep(&self.cpu, &shape.cpu),
            memory: keep(&self.memory, &shape.memory),
            ephemeral_storage: keep(&self.ephemeral_storage, &shape.ephemeral_storage),
        }
    }

    /// Renders the present dimensions as `cpu=<v>, memory=<v>, ephemeral-storage=<v>`.
    #[must_use]
    pub fn render(&self) -> String {
        [
            ("cpu", &self.cpu),
            ("memory", &self.memory),
            ("ephemeral-storage", &self.ephemeral_storage),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.as_ref().map(|v| format!("{label}={v}")))
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl std::fmt::Display for DimensionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

/// One deployed resource instance with its defaults resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceRecord {
    name: String,
    namespace: String,
    container_name: String,
    capacity: String,
    limits: DimensionMap,
    requests: DimensionMap,
    fields: RawFields,
}

impl ResourceRecord {
    /// Builds a record from a flat field mapping.
    ///
    /// Missing optional fields take their documented defaults: namespace
    /// `"default"`, container `""`, and `"Not specified"` for capacity and
    /// every dimension.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::InvalidInput`] if `Name` is missing, null or
    /// empty. Records without a name would collide under one diff key.
    pub fn from_fields(fields: RawFields) -> Result<Self, CompareError> {
        let name = field_text(&fields, NAME_FIELD)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                CompareError::invalid_input(format!(
                    "record has no '{NAME_FIELD}' field: {}",
                    Value::Object(fields.clone())
                ))
            })?;

        let namespace =
            field_text(&fields, NAMESPACE_FIELD).unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let container_name = field_text(&fields, CONTAINER_FIELD).unwrap_or_default();
        let capacity =
            field_text(&fields, CAPACITY_FIELD).unwrap_or_else(|| NOT_SPECIFIED.to_string());
        let limits = dimensions_from_fields(&fields, LimitKind::Limits);
        let requests = dimensions_from_fields(&fields, LimitKind::Requests);

        Ok(Self {
            name,
            namespace,
            container_name,
            capacity,
            limits,
            requests,
            fields,
        })
    }

    /// Builds a record from a JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::InvalidInput`] if the value is not an object or
    /// lacks a name.
    pub fn from_value(value: Value) -> Result<Self, CompareError> {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            other => Err(CompareError::invalid_input(format!(
                "expected an object, found: {other}"
            ))),
        }
    }

    /// Resource name, unique within its type and namespace.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace, `"default"` when the record carried none.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Container name, empty for PVC records.
    #[must_use]
    pub fn container_name(&self) -> &str {
        &self.container_name
    }

    /// Deployed capacity.
    #[must_use]
    pub fn capacity(&self) -> &str {
        &self.capacity
    }

    /// Deployed dimensions for a limit kind, ephemeral storage included.
    #[must_use]
    pub const fn dimensions(&self, kind: LimitKind) -> &DimensionMap {
        match kind {
            LimitKind::Limits => &self.limits,
            LimitKind::Requests => &self.requests,
        }
    }
}

impl Serialize for ResourceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Reads a field as text; strings verbatim, other scalars as JSON text, null
/// as absent.
fn field_text(fields: &RawFields, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn dimensions_from_fields(fields: &RawFields, kind: LimitKind) -> DimensionMap {
    let suffix = kind.field_suffix();
    let lookup = |prefix: &str| field_text(fields, &format!("{prefix} {suffix}"));

    let cpu = CPU_PREFIXES.iter().find_map(|prefix| lookup(prefix));

    let or_unspecified = |value: Option<String>| Some(value.unwrap_or_else(|| NOT_SPECIFIED.to_string()));

    DimensionMap {
        cpu: or_unspecified(cpu),
        memory: or_unspecified(lookup(MEMORY_PREFIX)),
        ephemeral_storage: or_unspecified(lookup(EPHEMERAL_STORAGE_PREFIX)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_resolved_once() {
        let record = ResourceRecord::from_value(json!({ "Name": "pvc1", "Capacity": "10Gi" }))
            .expect("valid record");

        assert_eq!(record.name(), "pvc1");
        assert_eq!(record.namespace(), "default");
        assert_eq!(record.container_name(), "");
        assert_eq!(record.capacity(), "10Gi");
        assert_eq!(record.dimensions(LimitKind::Limits).cpu.as_deref(), Some(NOT_SPECIFIED));
        assert_eq!(
            record.dimensions(LimitKind::Requests).ephemeral_storage.as_deref(),
            Some(NOT_SPECIFIED)
        );
    }

    #[test]
    fn test_cpu_field_spellings() {
        let upper = ResourceRecord::from_value(json!({ "Name": "a", "CPU Limits": "1" })).unwrap();
        let title = ResourceRecord::from_value(json!({ "Name": "a", "Cpu Limits": "2" })).unwrap();

        assert_eq!(upper.dimensions(LimitKind::Limits).cpu.as_deref(), Some("1"));
        assert_eq!(title.dimensions(LimitKind::Limits).cpu.as_deref(), Some("2"));
    }

    #[test]
    fn test_scalar_values_rendered_as_text() {
        let record = ResourceRecord::from_value(json!({
            "Name": "app",
            "Cpu Requests": 2,
            "Memory Requests": null,
        }))
        .unwrap();

        let requests = record.dimensions(LimitKind::Requests);
        assert_eq!(requests.cpu.as_deref(), Some("2"));
        assert_eq!(requests.memory.as_deref(), Some(NOT_SPECIFIED));
    }

    #[test]
    fn test_missing_name_rejected() {
        assert!(ResourceRecord::from_value(json!({ "Namespace": "ns1" })).is_err());
        assert!(ResourceRecord::from_value(json!({ "Name": "" })).is_err());
        assert!(ResourceRecord::from_value(json!({ "Name": null })).is_err());
        assert!(ResourceRecord::from_value(json!(["Name"])).is_err());
    }

    #[test]
    fn test_serializes_as_raw_fields() {
        let raw = json!({ "Name": "app", "Container Name": "c1", "Extra": 1 });
        let record = ResourceRecord::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }

    #[test]
    fn test_dimension_map_render() {
        let mut map = DimensionMap::unspecified();
        map.cpu = Some(String::from("500m"));
        assert_eq!(map.render(), "cpu=500m, memory=Not specified");

        map.ephemeral_storage = Some(String::from("1Gi"));
        assert_eq!(
            map.to_string(),
            "cpu=500m, memory=Not specified, ephemeral-storage=1Gi"
        );

        let cpu_only = DimensionMap {
            cpu: Some(String::from("1")),
            ..DimensionMap::default()
        };
        assert_eq!(cpu_only.render(), "cpu=1");
    }

    #[test]
    fn test_restricted_to_baseline_shape() {
        let record = ResourceRecord::from_value(json!({
            "Name": "app",
            "CPU Limits": "2",
            "Memory Limits": "1Gi",
            "Ephemeral-storage Limits": "5Gi",
        }))
        .unwrap();
        let shape = DimensionMap {
            cpu: Some(String::from("1")),
            ..DimensionMap::default()
        };

        let trimmed = record.dimensions(LimitKind::Limits).restricted_to(&shape);
        assert_eq!(trimmed.cpu.as_deref(), Some("2"));
        assert_eq!(trimmed.memory, None);
        assert_eq!(trimmed.ephemeral_storage, None);
        assert_eq!(trimmed.render(), "cpu=2");
    }
}
