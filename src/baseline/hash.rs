//! Baseline fingerprinting.
//!
//! Reports carry a fingerprint of the baseline they were produced against so
//! two reports can be told apart when the approved values change.

use sha2::{Digest, Sha256};

use super::types::{BaselineDimensions, BaselineDocument, BaselineSet};

/// Hasher for computing baseline fingerprints.
#[derive(Debug, Default)]
pub struct BaselineHasher;

impl BaselineHasher {
    /// Creates a new baseline hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a hash of the entire baseline document.
    ///
    /// Iteration follows the document's sorted maps, so the hash does not
    /// depend on key order in the source file.
    #[must_use]
    pub fn hash_document(&self, document: &BaselineDocument) -> String {
        let mut hasher = Sha256::new();

        for category in document.categories() {
            update_field(&mut hasher, category.as_str());
            for (alias, set) in document.aliases(category) {
                update_field(&mut hasher, alias);
                update_field(&mut hasher, &self.hash_set(set));
            }
        }

        hex::encode(hasher.finalize())
    }

    /// Computes a hash for one category/alias set.
    #[must_use]
    pub fn hash_set(&self, set: &BaselineSet) -> String {
        let mut hasher = Sha256::new();

        match set {
            BaselineSet::Pvc(entries) => {
                update_field(&mut hasher, "pvc");
                for (name, entry) in entries {
                    update_field(&mut hasher, name);
                    match &entry.capacity {
                        None => hasher.update([0]),
                        Some(None) => hasher.update([1]),
                        Some(Some(capacity)) => {
                            hasher.update([2]);
                            update_field(&mut hasher, capacity.as_str());
                        }
                    }
                    update_field(&mut hasher, &entry.extra.len().to_string());
                    for (key, value) in &entry.extra {
                        update_field(&mut hasher, key);
                        update_field(&mut hasher, &value.to_string());
                    }
                }
            }
            BaselineSet::Workload(entries) => {
                update_field(&mut hasher, "workload");
                for (name, entry) in entries {
                    update_field(&mut hasher, name);
                    update_field(&mut hasher, &entry.data.len().to_string());
                    for (container, baseline) in &entry.data {
                        update_field(&mut hasher, container);
                        hash_dimensions(&mut hasher, "limits", baseline.limits.as_ref());
                        hash_dimensions(&mut hasher, "requests", baseline.requests.as_ref());
                    }
                }
            }
        }

        hex::encode(hasher.finalize())
    }
}

/// Feeds one length-prefixed field, so adjacent fields cannot run together.
fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

fn hash_dimensions(hasher: &mut Sha256, kind: &str, dimensions: Option<&BaselineDimensions>) {
    update_field(hasher, kind);
    let Some(dimensions) = dimensions else {
        hasher.update([0]);
        return;
    };

    hasher.update([1]);
    for (label, value) in [
        ("cpu", &dimensions.cpu),
        ("memory", &dimensions.memory),
        ("ephemeral-storage", &dimensions.ephemeral_storage),
    ] {
        if let Some(value) = value {
            update_field(hasher, label);
            update_field(hasher, value.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::BaselineLoader;

    #[test]
    fn test_hash_is_order_independent() {
        let loader = BaselineLoader::new();
        let a = loader
            .parse_json(r#"{ "pvc": { "cm": { "a": { "capacity": "1Gi" }, "b": { "capacity": "2Gi" } } } }"#)
            .unwrap();
        let b = loader
            .parse_json(r#"{ "pvc": { "cm": { "b": { "capacity": "2Gi" }, "a": { "capacity": "1Gi" } } } }"#)
            .unwrap();

        let hasher = BaselineHasher::new();
        assert_eq!(hasher.hash_document(&a), hasher.hash_document(&b));
        assert_eq!(hasher.hash_document(&a).len(), 64);
    }

    #[test]
    fn test_hash_changes_with_values() {
        let loader = BaselineLoader::new();
        let a = loader
            .parse_json(r#"{ "deployments": { "cm": { "app": { "data": { "c1": { "limits": { "cpu": "1" } } } } } } }"#)
            .unwrap();
        let b = loader
            .parse_json(r#"{ "deployments": { "cm": { "app": { "data": { "c1": { "limits": { "cpu": "2" } } } } } } }"#)
            .unwrap();

        let hasher = BaselineHasher::new();
        assert_ne!(hasher.hash_document(&a), hasher.hash_document(&b));
    }

    #[test]
    fn test_field_boundaries_are_kept() {
        let loader = BaselineLoader::new();
        let a = loader
            .parse_json(r#"{ "pvc": { "cm": { "ab": { "capacity": "c" } } } }"#)
            .unwrap();
        let b = loader
            .parse_json(r#"{ "pvc": { "cm": { "a": { "capacity": "bc" } } } }"#)
            .unwrap();

        let hasher = BaselineHasher::new();
        assert_ne!(hasher.hash_document(&a), hasher.hash_document(&b));
    }

    #[test]
    fn test_null_capacity_differs_from_absent() {
        let loader = BaselineLoader::new();
        let null = loader
            .parse_json(r#"{ "pvc": { "cm": { "a": { "capacity": null } } } }"#)
            .unwrap();
        let absent = loader.parse_json(r#"{ "pvc": { "cm": { "a": {} } } }"#).unwrap();

        let hasher = BaselineHasher::new();
        assert_ne!(hasher.hash_document(&null), hasher.hash_document(&absent));
    }
}
