use infoblend_config::network::NetworkConfig;
use infoblend_config::prompt::PromptConfig;
use infoblend_config::ProviderConfig;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::json;

use crate::error::LookupError;
use crate::transport::{HttpRequest, Method};

pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Characters left alone by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_component(term: &str) -> String {
    utf8_percent_encode(term, URI_COMPONENT).to_string()
}

/// Builds outbound requests for one provider snapshot.
pub struct QueryBuilder<'a> {
    provider: &'a ProviderConfig,
    dictionary_url: &'a str,
    prompt: &'a PromptConfig,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(
        provider: &'a ProviderConfig,
        network: &'a NetworkConfig,
        prompt: &'a PromptConfig,
    ) -> Self {
        Self {
            provider,
            dictionary_url: &network.dictionary_url,
            prompt,
        }
    }

    fn uses_template(&self) -> bool {
        self.provider.is_custom() && !self.provider.template.is_empty()
    }

    /// Lookup URL for `term`
    pub fn url(&self, term: &str) -> String {
        let encoded = encode_component(term);
        if !self.uses_template() {
            return format!("{}{}", self.dictionary_url, encoded);
        }

        let template = &self.provider.template;
        if template.contains(QUERY_PLACEHOLDER) {
            template.replace(QUERY_PLACEHOLDER, &encoded)
        } else {
            format!("{template}{encoded}")
        }
    }

    /// Credential headers for the custom provider
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        let key = &self.provider.key;
        if !self.provider.is_custom() || key.is_empty() {
            return Vec::new();
        }

        if !self.provider.key_header.is_empty() {
            vec![(self.provider.key_header.clone(), key.clone())]
        } else {
            vec![
                ("x-api-key".to_string(), key.clone()),
                ("Authorization".to_string(), format!("Bearer {key}")),
            ]
        }
    }

    /// GET request against the dictionary API or the custom template
    pub fn get(&self, term: &str) -> HttpRequest {
        let mut request = HttpRequest::get(self.url(term));
        if self.uses_template() {
            request.headers = self.auth_headers();
        }
        request
    }

    /// POST request for the chat endpoint. The template is used verbatim.
    pub fn chat(&self, text: &str) -> Result<HttpRequest, LookupError> {
        if self.provider.template.is_empty() {
            return Err(LookupError::MissingTemplate);
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": self.prompt.render(text) }] }]
        });

        let mut request = HttpRequest {
            method: Method::Post,
            url: self.provider.template.clone(),
            headers: self.auth_headers(),
            body: Some(body),
        };
        request.set_header("Content-Type", "application/json");

        Ok(request)
    }
}
