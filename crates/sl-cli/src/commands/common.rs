//! Shared helpers for command implementations

use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use sl_core::{Config, WarehouseType};
use sl_db::{DuckDbBackend, RedshiftBackend, Warehouse};
use std::path::Path;
use std::sync::Arc;

/// Load the project config, honoring the --config override
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(Path::new(path)).context("Failed to load config"),
        None => Config::load_from_dir(Path::new(&global.project_dir))
            .context("Failed to load project config"),
    }
}

/// Open the configured warehouse backend
pub fn open_warehouse(config: &Config, path_override: Option<&str>) -> Result<Arc<dyn Warehouse>> {
    let path = path_override.unwrap_or(&config.warehouse.path);
    let warehouse: Arc<dyn Warehouse> = match config.warehouse.warehouse_type {
        WarehouseType::DuckDb => {
            Arc::new(DuckDbBackend::new(path).context("Failed to connect to warehouse")?)
        }
        WarehouseType::Redshift => {
            Arc::new(RedshiftBackend::new(path).context("Failed to connect to warehouse")?)
        }
    };
    Ok(warehouse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_core::{StagingConfig, WarehouseConfig};

    fn config(warehouse_type: WarehouseType) -> Config {
        Config {
            name: "sparkify".to_string(),
            warehouse: WarehouseConfig {
                warehouse_type,
                path: ":memory:".to_string(),
            },
            staging: StagingConfig {
                bucket: "b".to_string(),
                role_arn: "arn".to_string(),
                events_key: "log-data".to_string(),
                songs_key: "song-data".to_string(),
                events_jsonpaths: None,
            },
            target_path: "target".to_string(),
        }
    }

    #[test]
    fn load_config_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("starlift.yml"),
            "name: sparkify\nstaging:\n  bucket: b\n  role_arn: arn\n",
        )
        .unwrap();

        let global = GlobalArgs {
            verbose: false,
            project_dir: dir.path().display().to_string(),
            config: None,
        };
        assert_eq!(load_config(&global).unwrap().name, "sparkify");
    }

    #[test]
    fn open_warehouse_duckdb_in_memory() {
        let warehouse = open_warehouse(&config(WarehouseType::DuckDb), None).unwrap();
        assert_eq!(warehouse.warehouse_type(), "duckdb");
    }

    #[test]
    fn open_warehouse_redshift_is_not_implemented() {
        let err = open_warehouse(&config(WarehouseType::Redshift), None).err().unwrap();
        assert!(format!("{err:#}").contains("not implemented"));
    }
}
