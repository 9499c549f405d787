//! Error types for the resource baseline tool.
//!
//! This module provides the error hierarchy for every stage of a baseline
//! comparison run: configuration, baseline loading, resource collection,
//! record construction and report output.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the resource baseline tool.
#[derive(Debug, Error)]
pub enum ResbaseError {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Baseline loading errors.
    #[error("Baseline error: {0}")]
    Baseline(#[from] BaselineError),

    /// Resource collection errors.
    #[error("Resource source error: {0}")]
    Source(#[from] SourceError),

    /// Comparison input errors.
    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    /// Report output errors.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The configuration file could not be parsed.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// Validation failed.
    #[error("Configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Field that failed validation.
        field: Option<String>,
    },

    /// Duplicate namespace or alias definition.
    #[error("Duplicate {kind}: {name}")]
    DuplicateName {
        /// What was duplicated (namespace, alias).
        kind: String,
        /// The duplicated name.
        name: String,
    },

    /// Unknown resource type.
    #[error("Unknown resource type: {resource_type}")]
    UnknownResourceType {
        /// The unrecognised resource type string.
        resource_type: String,
    },

    /// Malformed `alias:namespace` mapping.
    #[error("Invalid namespace mapping: {spec}")]
    InvalidNamespaceMapping {
        /// The offending mapping.
        spec: String,
    },
}

/// Baseline loading errors.
#[derive(Debug, Error)]
pub enum BaselineError {
    /// Baseline file not found.
    #[error("Baseline file not found: {path}")]
    NotFound {
        /// Path to the missing baseline.
        path: PathBuf,
    },

    /// Baseline file is not valid JSON or has the wrong shape.
    #[error("Malformed baseline at {location}: {message}")]
    Malformed {
        /// Where in the document the problem was found.
        location: String,
        /// Description of the problem.
        message: String,
    },
}

/// Resource collection errors.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Snapshot file not found.
    #[error("Snapshot file not found: {path}")]
    SnapshotNotFound {
        /// Path to the missing snapshot.
        path: PathBuf,
    },

    /// Snapshot could not be read or parsed.
    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot {
        /// Description of the problem.
        message: String,
    },
}

/// Comparison input errors.
#[derive(Debug, Error)]
pub enum CompareError {
    /// A deployed record violates the record contract.
    #[error("Invalid resource record: {message}")]
    InvalidInput {
        /// Description of the violation.
        message: String,
    },
}

/// Report output errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing a report file failed.
    #[error("Failed to write {path}: {message}")]
    WriteFailed {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        message: String,
    },

    /// Serializing a report failed.
    #[error("Report serialization error: {message}")]
    Serialization {
        /// Description of the serialization error.
        message: String,
    },
}

/// Result type alias for resource baseline operations.
pub type Result<T> = std::result::Result<T, ResbaseError>;

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl BaselineError {
    /// Creates a malformed-baseline error.
    #[must_use]
    pub fn malformed(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            location: location.into(),
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Creates an invalid-snapshot error.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            message: message.into(),
        }
    }
}

impl CompareError {
    /// Creates an invalid-input error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_field() {
        let err = ConfigError::validation("Output file name cannot be empty", "output.workbook_file");
        assert!(matches!(
            err,
            ConfigError::ValidationError { field: Some(ref field), .. } if field == "output.workbook_file"
        ));

        let err = ResbaseError::from(CompareError::invalid_input("missing Name"));
        assert_eq!(err.to_string(), "Comparison error: Invalid resource record: missing Name");
    }

    #[test]
    fn test_error_display() {
        let err = ResbaseError::from(ConfigError::DuplicateName {
            kind: String::from("alias"),
            name: String::from("cm"),
        });
        assert_eq!(err.to_string(), "Configuration error: Duplicate alias: cm");
    }
}
