use infoblend_config::ProviderOverrides;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LookupError;

/// Text used by the diagnostic `test` action
pub const TEST_QUERY: &str = "test";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Lookup,
    Test,
}

impl Action {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lookup" => Some(Action::Lookup),
            "test" => Some(Action::Test),
            _ => None,
        }
    }
}

/// Inbound message from the page-side agent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookupMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub action: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl LookupMessage {
    pub fn lookup(text: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            action: "lookup".to_string(),
            text: text.into(),
            candidates: (!candidates.is_empty()).then_some(candidates),
            ..Default::default()
        }
    }

    pub fn test(overrides: ProviderOverrides) -> Self {
        Self {
            action: "test".to_string(),
            template: overrides.template,
            api_key: overrides.key,
            api_key_header: overrides.key_header,
            provider: overrides.provider,
            ..Default::default()
        }
    }
}

/// Validated lookup, immutable for the duration of one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub action: Action,
    pub text: String,
    /// Caller-built phrases, most specific first
    pub candidates: Vec<String>,
    pub overrides: ProviderOverrides,
}

impl TryFrom<LookupMessage> for LookupRequest {
    type Error = LookupError;

    fn try_from(message: LookupMessage) -> Result<Self, Self::Error> {
        let action = Action::parse(&message.action).ok_or(LookupError::UnsupportedAction)?;

        let text = match action {
            Action::Test => TEST_QUERY.to_string(),
            Action::Lookup => message.text.trim().to_string(),
        };
        if text.is_empty() {
            return Err(LookupError::Empty);
        }

        let mut candidates: Vec<String> = Vec::new();
        for candidate in message.candidates.unwrap_or_default() {
            if !candidate.is_empty() && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        Ok(Self {
            action,
            text,
            candidates,
            overrides: ProviderOverrides {
                provider: message.provider,
                template: message.template,
                key: message.api_key,
                key_header: message.api_key_header,
            },
        })
    }
}

/// Successful resolution
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Display-ready definition, never empty
    pub definition: String,
    /// Parsed payload or original text, for diagnostics
    pub raw: Value,
    /// Phrase candidate that produced the hit
    pub matched_candidate: Option<String>,
}

/// Outbound result sent back to the page-side agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LookupResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            id: None,
            success: false,
            def: None,
            result: None,
            raw: None,
            candidate: None,
            error: Some(error.into()),
        }
    }

    pub fn with_id(mut self, id: Option<Value>) -> Self {
        self.id = id;
        self
    }
}

impl From<Answer> for LookupResponse {
    fn from(answer: Answer) -> Self {
        Self {
            id: None,
            success: true,
            def: Some(answer.definition.clone()),
            result: Some(answer.definition),
            raw: Some(answer.raw),
            candidate: answer.matched_candidate,
            error: None,
        }
    }
}

impl From<Result<Answer, LookupError>> for LookupResponse {
    fn from(result: Result<Answer, LookupError>) -> Self {
        match result {
            Ok(answer) => answer.into(),
            Err(e) => LookupResponse::failure(e.to_string()),
        }
    }
}
