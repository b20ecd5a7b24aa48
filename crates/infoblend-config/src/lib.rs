use self::network::NetworkConfig;
use self::prompt::PromptConfig;

pub mod network;
pub mod prompt;
pub mod provider;

pub use provider::{Provider, ProviderConfig, ProviderOverrides};

/// Process-wide settings. Provider settings are not part of this; they are
/// loaded from the settings store on every request.
#[derive(Clone, Debug, Default)]
pub struct Config {
    pub network: NetworkConfig,
    pub prompt: PromptConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            network: NetworkConfig::new(),
            prompt: PromptConfig::new(),
        }
    }
}
