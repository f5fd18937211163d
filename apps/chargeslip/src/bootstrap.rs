use chargeslip_application::config::{self, Config};
use chargeslip_domain::repositories::snapshot::SnapshotStore;
use chargeslip_infrastructure::snapshot::{default_snapshot_path, FilesystemSnapshotStore};
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "CHARGESLIP_CONFIG";

/// `--config` wins over `CHARGESLIP_CONFIG`; blank values count as unset.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    cli_path.or_else(|| {
        std::env::var(CONFIG_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    })
}

/// Built-in defaults when no config file was named.
pub fn load_startup_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => {
            let (config, _source) = config::load_config_with_source(path)?;
            tracing::info!(config = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

pub fn resolve_snapshot_path(cli_state: Option<PathBuf>, config: &Config) -> Option<PathBuf> {
    cli_state
        .or_else(|| {
            config
                .persistence
                .state_path
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
        })
        .or_else(default_snapshot_path)
}

/// `None` when persistence is disabled or no location could be derived.
pub fn build_snapshot_store(
    cli_state: Option<PathBuf>,
    config: &Config,
) -> Option<Box<dyn SnapshotStore>> {
    if !config.persistence.enabled {
        tracing::info!("snapshot persistence disabled by config");
        return None;
    }
    match resolve_snapshot_path(cli_state, config) {
        Some(path) => {
            tracing::info!(state = %path.display(), "using snapshot file");
            Some(Box::new(FilesystemSnapshotStore::new(path)))
        }
        None => {
            tracing::warn!("no state directory (HOME unset); snapshot persistence off");
            None
        }
    }
}
