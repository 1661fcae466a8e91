//! Configuration types and parsing for starlift.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main project configuration from starlift.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Warehouse connection configuration
    #[serde(default)]
    pub warehouse: WarehouseConfig,

    /// Object-storage staging configuration
    pub staging: StagingConfig,

    /// Output directory for run-state files
    #[serde(default = "default_target_path")]
    pub target_path: String,
}

/// Warehouse type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseType {
    /// DuckDB (default; local runs and tests)
    #[default]
    DuckDb,
    /// Redshift
    Redshift,
}

impl std::fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarehouseType::DuckDb => write!(f, "duckdb"),
            WarehouseType::Redshift => write!(f, "redshift"),
        }
    }
}

/// Warehouse connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Warehouse type (duckdb or redshift)
    #[serde(rename = "type", default)]
    pub warehouse_type: WarehouseType,

    /// Database path (for DuckDB file-based or :memory:)
    #[serde(default = "default_warehouse_path")]
    pub path: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            warehouse_type: WarehouseType::default(),
            path: default_warehouse_path(),
        }
    }
}

/// Object-storage staging configuration
///
/// `bucket` and the keys address the source objects; `role_arn` is the
/// opaque IAM role identifier the warehouse assumes for the bulk load.
/// Neither is interpreted here beyond string formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StagingConfig {
    /// Source bucket name
    pub bucket: String,

    /// IAM role ARN the warehouse assumes to read the bucket
    pub role_arn: String,

    /// Key prefix for event logs
    #[serde(default = "default_events_key")]
    pub events_key: String,

    /// Key prefix for song metadata
    #[serde(default = "default_songs_key")]
    pub songs_key: String,

    /// Optional jsonpaths manifest URI for the events load.
    /// When absent, the events COPY uses automatic field mapping.
    #[serde(default)]
    pub events_jsonpaths: Option<String>,
}

const DEFAULT_WAREHOUSE_PATH: &str = ":memory:";

fn default_warehouse_path() -> String {
    DEFAULT_WAREHOUSE_PATH.to_string()
}

fn default_events_key() -> String {
    "log-data".to_string()
}

fn default_songs_key() -> String {
    "song-data".to_string()
}

fn default_target_path() -> String {
    "target".to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    /// Looks for starlift.yml or starlift.yaml.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("starlift.yml");
        let yaml_path = dir.join("starlift.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.staging.bucket.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "staging.bucket cannot be empty".to_string(),
            });
        }

        if self.staging.role_arn.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "staging.role_arn cannot be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Get absolute target path relative to a project root
    pub fn target_path_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.target_path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
