use std::env;
use std::time::Duration;

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Clone, Debug)]
pub struct NetworkConfig {
    /// Base URL of the built-in dictionary API, the term is appended to it
    pub dictionary_url: String,
    /// Timeout applied to every single outbound call
    pub request_timeout_ms: u64,
    /// Upper bound for a whole lookup, all fallback stages included
    pub lookup_deadline_ms: u64,
}

impl NetworkConfig {
    pub fn new() -> Self {
        let dictionary_url = env::var("INFOBLEND_DICTIONARY_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DICTIONARY_URL.to_string());

        let request_timeout_ms = env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000); // 8 seconds default

        let lookup_deadline_ms = env::var("LOOKUP_DEADLINE_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(20000); // 20 seconds default

        Self {
            dictionary_url,
            request_timeout_ms,
            lookup_deadline_ms,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn lookup_deadline(&self) -> Duration {
        Duration::from_millis(self.lookup_deadline_ms)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            request_timeout_ms: 8000,
            lookup_deadline_ms: 20000,
        }
    }
}
