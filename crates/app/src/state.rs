use std::{fs, path::PathBuf};

use common::client::AppInfo;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const APP_NAME: &str = "safeurl";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// App descriptor presented to the network when authorising
    #[serde(default = "default_app_id")]
    pub app_id: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_vendor")]
    pub vendor: String,
}

fn default_app_id() -> String {
    "net.safeurl.app".to_string()
}

fn default_app_name() -> String {
    "safeurl".to_string()
}

fn default_vendor() -> String {
    "safeurl contributors".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            app_name: default_app_name(),
            vendor: default_vendor(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the safeurl directory (~/.safeurl)
    pub dir: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Path to the backing store file
    pub store_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the state directory path (custom or default ~/.safeurl)
    pub fn dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }
        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Load the state directory, creating it with a default config on
    /// first use. There is no key material to provision, so no separate
    /// init step is needed.
    pub fn load_or_init(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let dir = Self::dir(custom_path)?;
        let config_path = dir.join(CONFIG_FILE_NAME);
        let store_path = dir.join(STORE_FILE_NAME);

        if !dir.exists() {
            debug!(dir = %dir.display(), "creating state directory");
            fs::create_dir_all(&dir)?;
        }

        let config = if config_path.exists() {
            let config_toml = fs::read_to_string(&config_path)?;
            toml::from_str(&config_toml)?
        } else {
            let config = AppConfig::default();
            fs::write(&config_path, toml::to_string_pretty(&config)?)?;
            config
        };

        Ok(Self {
            dir,
            config_path,
            store_path,
            config,
        })
    }

    pub fn app_info(&self) -> AppInfo {
        AppInfo {
            id: self.config.app_id.clone(),
            name: self.config.app_name.clone(),
            vendor: self.config.vendor.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("backing store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_or_init_creates_directory_and_config() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("state");

        let state = AppState::load_or_init(Some(dir.clone())).unwrap();
        assert!(dir.exists());
        assert!(state.config_path.exists());
        assert_eq!(state.config.app_id, "net.safeurl.app");
    }

    #[test]
    fn test_load_or_init_reloads_existing_config() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("state");

        AppState::load_or_init(Some(dir.clone())).unwrap();
        fs::write(
            dir.join(CONFIG_FILE_NAME),
            "app_id = \"net.example.custom\"\n",
        )
        .unwrap();

        let state = AppState::load_or_init(Some(dir)).unwrap();
        assert_eq!(state.config.app_id, "net.example.custom");
        // omitted fields fall back to defaults
        assert_eq!(state.config.app_name, "safeurl");
    }

    #[test]
    fn test_custom_path_wins_over_home() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = AppState::dir(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(dir, tmp.path());
    }
}
