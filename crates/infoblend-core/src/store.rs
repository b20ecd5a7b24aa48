use infoblend_config::ProviderConfig;

use crate::error::StoreError;

/// Source of provider settings. Read once per request, never cached, so
/// freshly saved settings apply to the next lookup.
#[async_trait::async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<ProviderConfig, StoreError>;
}

/// A fixed snapshot, useful for one-off calls and tests
#[async_trait::async_trait]
impl SettingsStore for ProviderConfig {
    async fn load(&self) -> Result<ProviderConfig, StoreError> {
        Ok(self.clone())
    }
}
