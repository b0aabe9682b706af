use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub database_url: Option<String>,
    pub database_path: Option<String>,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default = "default_top_sites_count")]
    pub top_sites_count: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_top_sites_count() -> usize {
    6
}

impl Settings {
    pub fn new() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            .add_source(
                Environment::with_prefix("WEBTRAIL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn config_file(&self) -> PathBuf {
        Path::new(&self.data_dir).join("config.json")
    }

    pub fn default_db_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("history.db")
    }
}

/// Settings that survive restarts: the chosen data source and the UI theme.
/// Lives as a small JSON file under the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub db_path: Option<String>,

    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_theme() -> String {
    "auto".to_string()
}

impl Default for StoredConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            theme: default_theme(),
        }
    }
}

impl StoredConfig {
    /// Load the persisted config. A missing or unreadable file falls back to
    /// defaults rather than erroring.
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
