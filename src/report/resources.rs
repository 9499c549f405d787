//! Resource details export.
//!
//! Every record collected in a run, one sheet per namespace and resource
//! type, written whether or not anything differs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::NamespaceMapping;
use crate::monitor::ResourceInventory;
use crate::resource::ResourceRecord;

/// Suffix shared by every resource details file name.
const RESOURCES_SUFFIX: &str = "Resources.json";

/// Collected records grouped into named sheets.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceDetails {
    /// When the records were collected.
    pub generated_at: DateTime<Utc>,
    /// Records per `<namespace>_<resource type>` sheet.
    pub sheets: BTreeMap<String, Vec<ResourceRecord>>,
}

impl ResourceDetails {
    /// Groups an inventory into sheets.
    ///
    /// A namespace and type collected with no records still gets an empty
    /// sheet.
    #[must_use]
    pub fn from_inventory(inventory: &ResourceInventory) -> Self {
        let sheets = inventory
            .iter()
            .map(|(key, records)| (sheet_name(&key.namespace, key.resource_type), records.to_vec()))
            .collect();

        Self {
            generated_at: Utc::now(),
            sheets,
        }
    }

    /// Total number of records across all sheets.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.sheets.values().map(Vec::len).sum()
    }
}

fn sheet_name(namespace: &str, resource_type: impl std::fmt::Display) -> String {
    format!("{namespace}_{resource_type}")
}

/// Default file name for the resource details, derived from the aliases.
///
/// The `cm` alias is labelled `cCM`, any other alias is upper-cased, and the
/// labels are joined in sorted order: `cm` alone gives `cCM_Resources.json`,
/// `cm` with `evnfm` gives `EVNFM_cCM_Resources.json`.
#[must_use]
pub fn resources_file_name(namespaces: &[NamespaceMapping]) -> String {
    let mut labels: Vec<String> = namespaces
        .iter()
        .map(|mapping| match mapping.alias.as_str() {
            "cm" => String::from("cCM"),
            alias => alias.to_uppercase(),
        })
        .collect();
    labels.sort();
    labels.dedup();

    labels.push(RESOURCES_SUFFIX.to_string());
    labels.join("_")
}
