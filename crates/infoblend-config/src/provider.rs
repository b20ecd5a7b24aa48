use serde::{Deserialize, Serialize};

/// Backend used to resolve lookups.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Provider {
    /// Built-in dictionary REST API
    #[default]
    DictionaryApi,
    /// User configured endpoint, driven through the chat flow
    Custom,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::DictionaryApi => "dictionaryapi",
            Provider::Custom => "custom",
        }
    }
}

impl From<&str> for Provider {
    fn from(value: &str) -> Self {
        match value {
            "custom" => Provider::Custom,
            _ => Provider::DictionaryApi,
        }
    }
}

impl From<String> for Provider {
    fn from(value: String) -> Self {
        Provider::from(value.as_str())
    }
}

impl From<Provider> for String {
    fn from(value: Provider) -> Self {
        value.as_str().to_string()
    }
}

/// Persisted provider settings, keyed the way the settings page stores them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(rename = "apiProvider")]
    pub provider: Provider,
    /// URL template, may contain `{query}` or be used as a bare prefix
    #[serde(rename = "apiTemplate")]
    pub template: String,
    #[serde(rename = "apiKey")]
    pub key: String,
    /// Header carrying the key; empty means `x-api-key` plus bearer auth
    #[serde(rename = "apiKeyHeader")]
    pub key_header: String,
}

/// Transient per-request overrides used by the diagnostic `test` action.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderOverrides {
    pub provider: Option<String>,
    pub template: Option<String>,
    pub key: Option<String>,
    pub key_header: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl ProviderConfig {
    /// Apply overrides on top of the stored snapshot. Empty overrides are
    /// ignored.
    pub fn with_overrides(mut self, overrides: &ProviderOverrides) -> Self {
        if let Some(template) = non_empty(&overrides.template) {
            self.template = template.to_string();
        }
        if let Some(key) = non_empty(&overrides.key) {
            self.key = key.to_string();
        }
        if let Some(key_header) = non_empty(&overrides.key_header) {
            self.key_header = key_header.to_string();
        }
        if let Some(provider) = non_empty(&overrides.provider) {
            self.provider = Provider::from(provider);
        }
        self
    }

    pub fn is_custom(&self) -> bool {
        self.provider == Provider::Custom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_storage_keys() {
        let config: ProviderConfig = serde_json::from_str(
            r#"{"apiProvider":"custom","apiTemplate":"https://x/api?q={query}","apiKey":"abc"}"#,
        )
        .unwrap();

        assert_eq!(config.provider, Provider::Custom);
        assert_eq!(config.template, "https://x/api?q={query}");
        assert_eq!(config.key, "abc");
        assert!(config.key_header.is_empty());
    }

    #[test]
    fn test_empty_store_uses_defaults() {
        let config: ProviderConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ProviderConfig::default());
        assert_eq!(config.provider, Provider::DictionaryApi);
    }

    #[test]
    fn test_unknown_provider_falls_back_to_dictionary() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"apiProvider":"something-else"}"#).unwrap();
        assert_eq!(config.provider, Provider::DictionaryApi);

        let config: ProviderConfig = serde_json::from_str(r#"{"apiProvider":""}"#).unwrap();
        assert_eq!(config.provider, Provider::DictionaryApi);
    }

    #[test]
    fn test_overrides_skip_empty_values() {
        let stored = ProviderConfig {
            provider: Provider::DictionaryApi,
            template: "https://stored/{query}".to_string(),
            key: "stored-key".to_string(),
            key_header: String::new(),
        };
        let overrides = ProviderOverrides {
            provider: Some("custom".to_string()),
            template: Some(String::new()),
            key: Some("override-key".to_string()),
            key_header: None,
        };

        let effective = stored.with_overrides(&overrides);
        assert_eq!(effective.provider, Provider::Custom);
        assert_eq!(effective.template, "https://stored/{query}");
        assert_eq!(effective.key, "override-key");
        assert!(effective.key_header.is_empty());
    }

    #[test]
    fn test_serialize_round_trips_provider_name() {
        let config = ProviderConfig {
            provider: Provider::Custom,
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["apiProvider"], "custom");
    }
}
