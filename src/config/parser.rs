//! Configuration parser for loading and merging configuration files.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with environment values taking precedence.

use crate::error::{ConfigError, ResbaseError, Result};
use std::path::Path;
use tracing::{debug, info};

use super::spec::{MonitorConfig, NamespaceMapping};

/// Environment variable overriding the baseline path.
pub const ENV_BASELINE_PATH: &str = "RESBASE_BASELINE_PATH";
/// Environment variable overriding the snapshot path.
pub const ENV_SNAPSHOT_PATH: &str = "RESBASE_SNAPSHOT_PATH";
/// Environment variable overriding the output directory.
pub const ENV_OUTPUT_DIR: &str = "RESBASE_OUTPUT_DIR";
/// Environment variable replacing the namespace list (`alias:namespace,...`).
pub const ENV_NAMESPACES: &str = "RESBASE_NAMESPACES";

/// Configuration parser for loading monitor configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<std::path::PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<MonitorConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ResbaseError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ResbaseError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        self.parse_yaml(&content, Some(path))
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<MonitorConfig> {
        debug!("Parsing YAML configuration");

        let config: MonitorConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            ResbaseError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!(
            "Parsed configuration with {} namespaces",
            config.namespaces.len()
        );
        Ok(config)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if
    /// `RESBASE_NAMESPACES` is malformed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<MonitorConfig> {
        let mut config = self.load_file(path)?;
        Self::apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies overrides read through `lookup` to the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the namespace override is malformed.
    pub fn apply_env_overrides<F>(config: &mut MonitorConfig, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_BASELINE_PATH) {
            debug!("Overriding baseline.path from environment");
            config.baseline.path = path;
        }

        if let Some(path) = lookup(ENV_SNAPSHOT_PATH) {
            debug!("Overriding snapshot.path from environment");
            config.snapshot.path = path;
        }

        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            debug!("Overriding output.dir from environment");
            config.output.dir = dir;
        }

        if let Some(spec) = lookup(ENV_NAMESPACES) {
            debug!("Overriding namespaces from environment");
            config.namespaces = parse_namespace_mappings(&spec)?;
        }

        Ok(())
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| std::path::PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                ResbaseError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }
}

/// Parses `alias:namespace` pairs separated by commas.
///
/// # Errors
///
/// Returns an error if a pair lacks a colon or has an empty side.
pub fn parse_namespace_mappings(spec: &str) -> Result<Vec<NamespaceMapping>> {
    spec.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<NamespaceMapping> {
            let (alias, name) = pair
                .split_once(':')
                .map(|(a, n)| (a.trim(), n.trim()))
                .filter(|(a, n)| !a.is_empty() && !n.is_empty())
                .ok_or_else(|| ConfigError::InvalidNamespaceMapping {
                    spec: pair.to_string(),
                })?;

            Ok(NamespaceMapping {
                name: name.to_string(),
                alias: alias.to_string(),
            })
        })
        .collect()
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["resbase.yaml", "resbase.yml"];

/// Finds the configuration file in the current directory or parent directories.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<std::path::PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    Err(ResbaseError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}
