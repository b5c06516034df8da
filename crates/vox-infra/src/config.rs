//! Configuration file loading for vox.
//!
//! Reads `config.toml` (by default `<config_dir>/vox/config.toml`) into
//! [`VoxConfig`]. A missing file is the empty configuration. A file that
//! exists but cannot be read or parsed is an error.

use std::path::{Path, PathBuf};

use vox_types::config::VoxConfig;
use vox_types::error::ConfigError;

const APP_DIR: &str = "vox";
const CONFIG_FILE: &str = "config.toml";

/// Load configuration from `path`.
pub async fn load_config(path: &Path) -> Result<VoxConfig, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(VoxConfig::default());
        }
        Err(err) => {
            return Err(ConfigError::Read {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };

    let config: VoxConfig = toml::from_str(&content).map_err(|err| ConfigError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;

    tracing::debug!(
        path = %path.display(),
        topics = config.interviews.len(),
        "loaded config"
    );
    Ok(config)
}

/// `<config_dir>/vox/config.toml`, falling back to the working directory
/// on platforms without a config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Directory holding the database.
///
/// Priority: the config file's `data_dir`, then `env_dir` (the caller passes
/// `$VOX_DATA_DIR`), then `<data_dir>/vox`, then `~/.vox`.
pub fn resolve_data_dir(config: &VoxConfig, env_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = &config.data_dir {
        return dir.clone();
    }
    if let Some(dir) = env_dir {
        return dir.to_path_buf();
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .or_else(|| dirs::home_dir().map(|home| home.join(".vox")))
        .unwrap_or_else(|| PathBuf::from(".vox"))
}
