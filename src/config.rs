//! Configuration management for the schema engine
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (schema-gate.toml)
//! - Environment variables (SCHEMA_GATE_*)
//!
//! ## Example config file (schema-gate.toml):
//! ```toml
//! schema_source_location = "schemas/api.json"
//! addressing_strategy = "linked"
//! validate_responses = true
//! draft = "draft4"
//! ```

use std::path::PathBuf;

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, Result};
use crate::format::FormatChecker;
use crate::store::AddressingStrategy;
use crate::validator::SchemaDraft;

/// Directory used by the flat strategy when no location is configured
pub const DEFAULT_SCHEMA_DIR: &str = "jsonschema";

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Schema directory (flat) or API-description file (linked)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_source_location: Option<PathBuf>,

    #[serde(default)]
    pub addressing_strategy: AddressingStrategy,

    /// Validate successful JSON responses after the handler ran
    #[serde(default)]
    pub validate_responses: bool,

    #[serde(default)]
    pub draft: SchemaDraft,

    /// Flat strategy only: sub-key holding each path's response schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_key: Option<String>,

    /// Runtime capability, never read from files
    #[serde(skip)]
    pub format_checker: FormatChecker,
}

impl EngineConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, optionally from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_locations = [
            "schema-gate.toml",
            ".schema-gate.toml",
            "config/schema-gate.toml",
        ];
        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "schema-gate") {
            let xdg_config = config_dir.config_dir().join("schema-gate.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SCHEMA_GATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    pub fn with_format_checker(mut self, format_checker: FormatChecker) -> Self {
        self.format_checker = format_checker;
        self
    }

    /// The schema location to load, resolved against the working directory.
    /// The linked strategy has no default and fails without one.
    pub fn source_location(&self) -> Result<PathBuf> {
        let location = match (&self.schema_source_location, self.addressing_strategy) {
            (Some(location), _) => location.clone(),
            (None, AddressingStrategy::Flat) => PathBuf::from(DEFAULT_SCHEMA_DIR),
            (None, AddressingStrategy::Linked) => return Err(LoadError::MissingSource),
        };
        if location.is_absolute() {
            Ok(location)
        } else {
            let cwd = std::env::current_dir().map_err(|source| LoadError::Io {
                path: location.clone(),
                source,
            })?;
            Ok(cwd.join(location))
        }
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.addressing_strategy, AddressingStrategy::Flat);
        assert!(!config.validate_responses);
        assert_eq!(config.draft, SchemaDraft::Draft4);
        assert!(config.format_checker.is_empty());
        assert!(config.source_location().unwrap().ends_with(DEFAULT_SCHEMA_DIR));
    }

    #[test]
    fn test_linked_requires_location() {
        let config = EngineConfig {
            addressing_strategy: AddressingStrategy::Linked,
            ..Default::default()
        };
        assert!(matches!(config.source_location(), Err(LoadError::MissingSource)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        fs::write(
            &path,
            "schema_source_location = \"/srv/api.json\"\naddressing_strategy = \"linked\"\nvalidate_responses = true\ndraft = \"draft7\"\n",
        )
        .unwrap();

        let config = EngineConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.addressing_strategy, AddressingStrategy::Linked);
        assert!(config.validate_responses);
        assert_eq!(config.draft, SchemaDraft::Draft7);
        assert_eq!(config.source_location().unwrap(), PathBuf::from("/srv/api.json"));
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gate.toml");
        fs::write(&path, "response_key = \"from-file\"\n").unwrap();

        std::env::set_var("SCHEMA_GATE_RESPONSE_KEY", "from-env");
        let loaded = EngineConfig::load_from(path.to_str());
        std::env::remove_var("SCHEMA_GATE_RESPONSE_KEY");

        assert_eq!(loaded.unwrap().response_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_serialize_config() {
        let config = EngineConfig {
            response_key: Some("response".to_string()),
            ..Default::default()
        };
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("addressing_strategy = \"flat\""));
        assert!(toml_str.contains("response_key = \"response\""));
        assert!(!toml_str.contains("format_checker"));
    }
}
