//! Baseline loader.
//!
//! Reads the JSON baseline file and builds a typed [`BaselineDocument`].
//! Unknown categories are skipped with a warning so a baseline can carry
//! entries for resource types this tool does not compare.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::{BaselineError, ResbaseError, Result};
use crate::resource::ResourceType;

use super::types::{BaselineDocument, BaselineSet};

/// Loader for baseline documents.
#[derive(Debug, Default)]
pub struct BaselineLoader;

impl BaselineLoader {
    /// Creates a new baseline loader.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Loads a baseline from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<BaselineDocument> {
        let path = path.as_ref();
        info!("Loading baseline from: {}", path.display());

        if !path.exists() {
            return Err(ResbaseError::Baseline(BaselineError::NotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path)?;
        self.parse_json(&content)
    }

    /// Parses a baseline from a JSON string.
    ///
    /// A category or alias set that cannot be read is skipped with a warning,
    /// so one bad entry does not hide the rest of the baseline.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not a JSON object.
    pub fn parse_json(&self, content: &str) -> Result<BaselineDocument> {
        let raw: BTreeMap<String, Value> = serde_json::from_str(content)
            .map_err(|e| BaselineError::malformed("document", e.to_string()))?;

        let mut document = BaselineDocument::new();

        for (category, aliases) in raw {
            let Ok(resource_type) = category.parse::<ResourceType>() else {
                warn!("Skipping unknown baseline category '{category}'");
                continue;
            };

            let aliases = match aliases {
                Value::Object(aliases) => aliases,
                Value::Null => continue,
                other => {
                    warn!("Skipping baseline category '{category}': expected an object, found {other}");
                    continue;
                }
            };

            for (alias, value) in aliases {
                match BaselineSet::from_value(resource_type, value) {
                    Ok(set) => {
                        debug!("Baseline {category}/{alias}: {} entries", set.len());
                        document.insert(resource_type, alias, set);
                    }
                    Err(e) => warn!("Skipping baseline set {category}.{alias}: {e}"),
                }
            }
        }

        info!(
            "Loaded baseline with {} entries across {} categories",
            document.entry_count(),
            document.categories().count()
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASELINE: &str = r#"{
        "deployments": {
            "cm": {
                "app": { "data": { "c1": { "limits": { "cpu": "250m", "memory": "1Gi" } } } }
            }
        },
        "pvc": {
            "cm": { "data-app-0": { "capacity": "10Gi" } }
        },
        "configmaps": {
            "cm": { "settings": {} }
        }
    }"#;

    #[test]
    fn test_parse_baseline() {
        let doc = BaselineLoader::new().parse_json(BASELINE).expect("valid baseline");

        assert_eq!(
            doc.categories().collect::<Vec<_>>(),
            vec![ResourceType::Deployments, ResourceType::Pvc]
        );
        assert!(matches!(
            doc.set(ResourceType::Pvc, "cm"),
            Some(BaselineSet::Pvc(_))
        ));
        assert!(matches!(
            doc.set(ResourceType::Deployments, "cm"),
            Some(BaselineSet::Workload(_))
        ));
        assert_eq!(doc.entry_count(), 2);
    }

    #[test]
    fn test_malformed_alias_set_is_skipped() {
        let doc = BaselineLoader::new()
            .parse_json(
                r#"{
                    "pvc": {
                        "cm": { "data-0": { "capacity": [1] } },
                        "evnfm": { "data-1": { "capacity": "5Gi" } }
                    },
                    "deployments": { "cm": "not a set" }
                }"#,
            )
            .expect("bad sets are skipped");

        assert!(doc.set(ResourceType::Pvc, "cm").is_none());
        assert!(doc.set(ResourceType::Pvc, "evnfm").is_some());
        assert!(doc.set(ResourceType::Deployments, "cm").is_none());
        assert_eq!(doc.entry_count(), 1);
    }

    #[test]
    fn test_null_sections_load_as_empty() {
        let doc = BaselineLoader::new()
            .parse_json(
                r#"{
                    "pvc": null,
                    "statefulsets": { "cm": null },
                    "deployments": {
                        "cm": {
                            "app": { "data": null },
                            "web": { "data": { "c1": null, "c2": { "limits": null } } }
                        }
                    }
                }"#,
            )
            .expect("null sections load");

        assert!(doc.set(ResourceType::Pvc, "cm").is_none());
        assert_eq!(doc.set(ResourceType::StatefulSets, "cm").map(BaselineSet::len), Some(0));
        assert_eq!(doc.set(ResourceType::Deployments, "cm").map(BaselineSet::len), Some(2));
    }

    #[test]
    fn test_non_object_document_fails() {
        let result = BaselineLoader::new().parse_json("[1, 2]");
        assert!(matches!(
            result,
            Err(ResbaseError::Baseline(BaselineError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let result = BaselineLoader::new().parse_json("not json");
        assert!(matches!(
            result,
            Err(ResbaseError::Baseline(BaselineError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(BASELINE.as_bytes()).expect("write baseline");

        let doc = BaselineLoader::new().load_file(file.path()).expect("load baseline");
        assert_eq!(doc.entry_count(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let result = BaselineLoader::new().load_file("/nonexistent/baseline.json");
        assert!(matches!(
            result,
            Err(ResbaseError::Baseline(BaselineError::NotFound { .. }))
        ));
    }
}
