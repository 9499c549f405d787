//! Configuration validation.
//!
//! This module checks a monitor configuration for values the comparison
//! cannot work with, collecting every problem before failing.

use crate::error::{ConfigError, ResbaseError, Result};
use std::collections::HashSet;
use tracing::debug;

use super::spec::{MonitorConfig, NamespaceMapping};

/// Maximum length of a Kubernetes namespace name.
const MAX_NAMESPACE_LEN: usize = 63;

/// Validator for monitor configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a monitor configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails. Duplicate namespaces or aliases
    /// are reported as [`ConfigError::DuplicateName`].
    pub fn validate(&self, config: &MonitorConfig) -> Result<ValidationResult> {
        let mut result = self.check(config);

        if let Some((_, duplicate)) = duplicate_names(&config.namespaces).into_iter().next() {
            return Err(ResbaseError::Config(duplicate));
        }

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = result.errors.swap_remove(0);
            Err(ResbaseError::Config(ConfigError::validation(
                first_error.message,
                first_error.field,
            )))
        }
    }

    /// Runs every check and returns the collected result without failing.
    #[must_use]
    pub fn check(&self, config: &MonitorConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_paths(config, &mut result);
        Self::validate_namespaces(&config.namespaces, &mut result);
        Self::validate_duplicates(&config.namespaces, &mut result);
        Self::validate_resource_types(config, &mut result);
        Self::validate_output(config, &mut result);

        result
    }

    /// Validates baseline and snapshot locations.
    fn validate_paths(config: &MonitorConfig, result: &mut ValidationResult) {
        if config.baseline.path.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("baseline.path"),
                message: String::from("Baseline path cannot be empty"),
            });
        }

        if config.snapshot.path.trim().is_empty() {
            result.errors.push(ValidationError {
                field: String::from("snapshot.path"),
                message: String::from("Snapshot path cannot be empty"),
            });
        }
    }

    /// Validates the namespace mappings.
    fn validate_namespaces(namespaces: &[NamespaceMapping], result: &mut ValidationResult) {
        if namespaces.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("namespaces"),
                message: String::from("At least one namespace must be configured"),
            });
            return;
        }

        for (i, mapping) in namespaces.iter().enumerate() {
            let prefix = format!("namespaces[{i}]");

            if !is_valid_namespace(&mapping.name) {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.name"),
                    message: format!(
                        "Namespace '{}' is invalid. Must be a lowercase RFC 1123 label.",
                        mapping.name
                    ),
                });
            }

            if mapping.alias.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: format!("{prefix}.alias"),
                    message: format!("Namespace '{}' has an empty alias", mapping.name),
                });
            }
        }
    }

    /// Reports every namespace or alias mapped more than once.
    fn validate_duplicates(namespaces: &[NamespaceMapping], result: &mut ValidationResult) {
        for (field, duplicate) in duplicate_names(namespaces) {
            result.errors.push(ValidationError {
                field,
                message: duplicate.to_string(),
            });
        }
    }

    /// Validates the collected resource types.
    fn validate_resource_types(config: &MonitorConfig, result: &mut ValidationResult) {
        if config.resource_types.is_empty() {
            result.errors.push(ValidationError {
                field: String::from("resource_types"),
                message: String::from("At least one resource type must be collected"),
            });
            return;
        }

        let mut seen = HashSet::new();
        for resource_type in &config.resource_types {
            if !seen.insert(resource_type) {
                result
                    .warnings
                    .push(format!("Resource type '{resource_type}' is listed more than once"));
            }
        }
    }

    /// Validates output file names.
    fn validate_output(config: &MonitorConfig, result: &mut ValidationResult) {
        let output = &config.output;
        let mut files = vec![
            ("output.differences_file", &output.differences_file),
            ("output.workbook_file", &output.workbook_file),
        ];
        if let Some(resources_file) = &output.resources_file {
            files.push(("output.resources_file", resources_file));
        }

        for (field, value) in files {
            if value.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: field.to_string(),
                    message: String::from("Output file name cannot be empty"),
                });
            } else if value.contains('/') || value.contains('\\') {
                result.warnings.push(format!(
                    "{field} '{value}' contains a path separator; it is resolved under output.dir"
                ));
            }
        }

        if output.differences_file == output.workbook_file {
            result.errors.push(ValidationError {
                field: String::from("output.workbook_file"),
                message: String::from("Detail file and workbook file must differ"),
            });
        }

        let resources_file = config.resources_file();
        if resources_file == output.differences_file || resources_file == output.workbook_file {
            result.errors.push(ValidationError {
                field: String::from("output.resources_file"),
                message: format!("Resource details file '{resources_file}' collides with another report file"),
            });
        }
    }
}

/// Returns each repeated namespace name or alias with the field it repeats in.
fn duplicate_names(namespaces: &[NamespaceMapping]) -> Vec<(String, ConfigError)> {
    let mut names = HashSet::new();
    let mut aliases = HashSet::new();
    let mut duplicates = Vec::new();

    for (i, mapping) in namespaces.iter().enumerate() {
        if !names.insert(mapping.name.as_str()) {
            duplicates.push((
                format!("namespaces[{i}].name"),
                ConfigError::DuplicateName {
                    kind: String::from("namespace"),
                    name: mapping.name.clone(),
                },
            ));
        }
        if !aliases.insert(mapping.alias.as_str()) {
            duplicates.push((
                format!("namespaces[{i}].alias"),
                ConfigError::DuplicateName {
                    kind: String::from("alias"),
                    name: mapping.alias.clone(),
                },
            ));
        }
    }

    duplicates
}

/// Validates that a name is a Kubernetes namespace name.
/// Names must be lowercase alphanumeric with hyphens, starting and ending
/// with an alphanumeric character.
fn is_valid_namespace(name: &str) -> bool {
    if name.is_empty() || name.len() > MAX_NAMESPACE_LEN {
        return false;
    }

    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();

    if !name.starts_with(alnum) || !name.ends_with(alnum) {
        return false;
    }

    name.chars().all(|c| alnum(c) || c == '-')
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of errors.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Returns the number of warnings.
    #[must_use]
    pub const fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigParser;
    use crate::resource::ResourceType;

    fn config() -> MonitorConfig {
        ConfigParser::new()
            .parse_yaml(
                r"
baseline:
  path: baseline.json
snapshot:
  path: snapshot.json
namespaces:
  - name: eric-eo-cm
    alias: cm
",
                None,
            )
            .unwrap()
    }

    #[test]
    fn test_valid_namespace() {
        assert!(is_valid_namespace("eric-eo-cm"));
        assert!(is_valid_namespace("ns1"));
        assert!(is_valid_namespace("1ns"));
        assert!(is_valid_namespace("a"));
    }

    #[test]
    fn test_invalid_namespace() {
        assert!(!is_valid_namespace(""));
        assert!(!is_valid_namespace("Eric-Eo")); // uppercase
        assert!(!is_valid_namespace("-ns")); // starts with hyphen
        assert!(!is_valid_namespace("ns-")); // ends with hyphen
        assert!(!is_valid_namespace("ns_cm")); // underscore
        assert!(!is_valid_namespace(&"a".repeat(64))); // too long
    }

    #[test]
    fn test_valid_config() {
        let result = ConfigValidator::new().validate(&config()).unwrap();
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn test_no_namespaces() {
        let mut config = config();
        config.namespaces.clear();

        let result = ConfigValidator::new().check(&config);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors[0].field, "namespaces");
        assert!(ConfigValidator::new().validate(&config).is_err());
    }

    #[test]
    fn test_duplicate_alias() {
        let mut config = config();
        config.namespaces.push(NamespaceMapping {
            name: String::from("other"),
            alias: String::from("cm"),
        });

        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(matches!(
            err,
            ResbaseError::Config(ConfigError::DuplicateName { ref kind, .. }) if kind == "alias"
        ));
    }

    #[test]
    fn test_check_reports_duplicates() {
        let mut config = config();
        config.namespaces.push(NamespaceMapping {
            name: String::from("eric-eo-cm"),
            alias: String::from("cm"),
        });
        config.namespaces.push(NamespaceMapping {
            name: String::from("eric-eo-evnfm"),
            alias: String::from("cm"),
        });

        let result = ConfigValidator::new().check(&config);
        let fields: Vec<&str> = result.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["namespaces[1].name", "namespaces[1].alias", "namespaces[2].alias"]
        );
        assert_eq!(result.errors[0].message, "Duplicate namespace: eric-eo-cm");
    }

    #[test]
    fn test_duplicate_resource_type_warns() {
        let mut config = config();
        config.resource_types = vec![ResourceType::Pvc, ResourceType::Pvc];

        let result = ConfigValidator::new().validate(&config).unwrap();
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_resources_file_must_differ() {
        let mut config = config();
        config.output.resources_file = Some(config.output.workbook_file.clone());

        let result = ConfigValidator::new().check(&config);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.errors[0].field, "output.resources_file");
    }

    #[test]
    fn test_output_files_must_differ() {
        let mut config = config();
        config.output.workbook_file = config.output.differences_file.clone();

        let result = ConfigValidator::new().check(&config);
        assert!(!result.is_valid());
    }
}
