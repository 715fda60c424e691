// src/storage/settings.rs
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::utils::validation::validate_rpc_url;

/// Key the settings record is stored under.
pub const SETTINGS_KEY: &str = "xandeum-settings";
pub const DEFAULT_PRIMARY_RPC: &str = "https://api.mainnet.xandeum.network";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub primary_rpc: String,
    pub backup_rpc: String,
    pub show_animations: bool,
    pub enable_notifications: bool,
    pub dev_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            primary_rpc: DEFAULT_PRIMARY_RPC.to_string(),
            backup_rpc: String::new(),
            show_animations: true,
            enable_notifications: false,
            dev_mode: false,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_rpc_url(&self.primary_rpc, false).map_err(SettingsError::Invalid)?;
        validate_rpc_url(&self.backup_rpc, true).map_err(SettingsError::Invalid)?;
        Ok(())
    }

    fn normalized(mut self) -> Self {
        self.primary_rpc = self.primary_rpc.trim().to_string();
        self.backup_rpc = self.backup_rpc.trim().to_string();
        if self.primary_rpc.is_empty() {
            self.primary_rpc = DEFAULT_PRIMARY_RPC.to_string();
        }
        self
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid settings: {0}")]
    Invalid(&'static str),
    #[error("settings file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// A single JSON settings record on disk.
pub struct SettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SettingsStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", SETTINGS_KEY)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored settings; a missing or unreadable record yields defaults.
    pub async fn load(&self) -> Settings {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Settings::default(),
            Err(e) => {
                warn!("Failed to read settings from {}: {}", self.path.display(), e);
                return Settings::default();
            }
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings.normalized(),
            Err(e) => {
                warn!("Ignoring corrupt settings at {}: {}", self.path.display(), e);
                Settings::default()
            }
        }
    }

    /// Validate and persist `settings`, replacing the previous record.
    pub async fn save(&self, settings: Settings) -> Result<Settings, SettingsError> {
        let settings = settings.normalized();
        settings.validate()?;

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&settings)?).await?;
        fs::rename(&tmp, &self.path).await?;

        info!("Settings saved to {}", self.path.display());
        Ok(settings)
    }
}
