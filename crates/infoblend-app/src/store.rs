use std::env;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use infoblend_config::ProviderConfig;
use infoblend_core::{SettingsStore, StoreError};

const DEFAULT_SETTINGS_FILE: &str = "infoblend.json";

/// Settings file location: explicit path, then `INFOBLEND_SETTINGS`, then the
/// working directory
pub fn settings_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit
        .or_else(|| env::var("INFOBLEND_SETTINGS").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
}

/// Provider settings persisted as a JSON object using the settings page keys
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl SettingsStore for JsonFileStore {
    async fn load(&self) -> Result<ProviderConfig, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", self.path.display());
                Ok(ProviderConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }
}
