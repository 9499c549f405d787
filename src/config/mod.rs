//! Configuration module for the baseline monitor.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `resbase.yaml`
//! - Environment and `.env` overrides
//! - Validation of configuration values

mod parser;
mod spec;
mod validator;

pub use parser::{
    ConfigParser, DEFAULT_CONFIG_FILES, ENV_BASELINE_PATH, ENV_NAMESPACES, ENV_OUTPUT_DIR,
    ENV_SNAPSHOT_PATH, find_config_file, parse_namespace_mappings,
};
pub use spec::{BaselineConfig, MonitorConfig, NamespaceMapping, OutputConfig, SnapshotConfig};
pub use validator::{ConfigValidator, ValidationError, ValidationResult};
