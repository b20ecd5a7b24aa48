use infoblend_config::{Config, ProviderConfig};
use serde_json::{Value, json};
use tokio::time::{Instant, timeout_at};

use crate::error::{LookupError, TransportError};
use crate::extract::{extract_answer, extract_definition, is_truthy};
use crate::keywords::{MAX_KEYWORD_DEFINITIONS, is_phrase, keyword_candidates};
use crate::query::QueryBuilder;
use crate::transport::Transport;
use crate::types::{Answer, LookupRequest};

/// Longest definition handed back to the caller
pub const MAX_DEFINITION_CHARS: usize = 800;
/// Sentinel answer when nothing readable came back
pub const NO_ANSWER: &str = "(no answer)";

/// One GET round trip, parsed if the body is JSON
struct Fetched {
    ok: bool,
    status: u16,
    text: String,
    parsed: Option<Value>,
}

impl Fetched {
    fn raw(&self) -> Value {
        match &self.parsed {
            Some(parsed) if is_truthy(parsed) => parsed.clone(),
            _ => Value::String(self.text.clone()),
        }
    }
}

struct KeywordDefinition {
    word: String,
    definition: String,
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn display_or_sentinel(text: &str) -> String {
    let text = truncate_chars(text, MAX_DEFINITION_CHARS);
    if text.trim().is_empty() {
        NO_ANSWER.to_string()
    } else {
        text
    }
}

/// Runs the fallback stages for a single request against one provider
/// snapshot. Stages run strictly in sequence and stop on the first hit.
pub struct Resolver<'a> {
    transport: &'a dyn Transport,
    provider: &'a ProviderConfig,
    queries: QueryBuilder<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        provider: &'a ProviderConfig,
        config: &'a Config,
    ) -> Self {
        Self {
            transport,
            provider,
            queries: QueryBuilder::new(provider, &config.network, &config.prompt),
        }
    }

    /// Resolve `request`, finishing by `deadline`. Only the chat flow fails
    /// when the deadline passes; the dictionary flow answers with whatever
    /// it has gathered so far.
    pub async fn resolve(
        &self,
        request: &LookupRequest,
        deadline: Instant,
    ) -> Result<Answer, LookupError> {
        if self.provider.is_custom() {
            return timeout_at(deadline, self.resolve_chat(&request.text))
                .await
                .map_err(|_| LookupError::Deadline)?;
        }

        match timeout_at(deadline, self.try_candidates(&request.candidates)).await {
            Ok(Some(answer)) => return Ok(answer),
            Ok(None) => {}
            Err(_) => return Ok(Self::expired(&request.text)),
        }

        let primary = match timeout_at(deadline, self.fetch(&request.text)).await {
            Ok(Ok(primary)) => {
                if !primary.ok {
                    tracing::debug!(
                        "Primary lookup for '{}' returned HTTP {}",
                        request.text,
                        primary.status
                    );
                }
                primary
            }
            Ok(Err(e)) => {
                tracing::warn!("Primary lookup for '{}' failed: {}", request.text, e);
                Fetched {
                    ok: false,
                    status: 0,
                    text: e.to_string(),
                    parsed: None,
                }
            }
            Err(_) => return Ok(Self::expired(&request.text)),
        };

        if let Some(definition) = extract_definition(primary.parsed.as_ref()) {
            return Ok(Answer {
                definition,
                raw: primary.raw(),
                matched_candidate: None,
            });
        }

        if is_phrase(&request.text) {
            match timeout_at(deadline, self.try_keywords(&request.text, &primary)).await {
                Ok(Some(answer)) => return Ok(answer),
                Ok(None) => {}
                Err(_) => {
                    tracing::warn!("Keyword fallback for '{}' ran out of time", request.text);
                }
            }
        }

        Ok(Self::raw_fallback(primary))
    }

    /// Deadline passed before the primary lookup came back
    fn expired(text: &str) -> Answer {
        tracing::warn!("Lookup for '{}' ran out of time", text);
        Answer {
            definition: NO_ANSWER.to_string(),
            raw: Value::Null,
            matched_candidate: None,
        }
    }

    /// Single POST to the chat endpoint, no further fallback
    async fn resolve_chat(&self, text: &str) -> Result<Answer, LookupError> {
        let request = self.queries.chat(text)?;
        let response = self.transport.execute(&request).await?;

        if !response.is_success() {
            tracing::warn!("Chat endpoint returned HTTP {}", response.status);
        }

        let parsed = serde_json::from_str::<Value>(&response.body).ok();
        let definition = extract_answer(parsed.as_ref())
            .map(|answer| truncate_chars(&answer, MAX_DEFINITION_CHARS))
            .unwrap_or_else(|| NO_ANSWER.to_string());

        Ok(Answer {
            definition,
            raw: Value::Null,
            matched_candidate: None,
        })
    }

    async fn fetch(&self, term: &str) -> Result<Fetched, TransportError> {
        let response = self.transport.execute(&self.queries.get(term)).await?;

        let parsed = match serde_json::from_str::<Value>(&response.body) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::debug!("Response for '{}' is not JSON: {}", term, e);
                None
            }
        };

        Ok(Fetched {
            ok: response.is_success(),
            status: response.status,
            text: response.body,
            parsed,
        })
    }

    /// Successful definition for `term`, ignoring failures of any kind
    async fn define(&self, term: &str) -> Option<(String, Fetched)> {
        let fetched = match self.fetch(term).await {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Lookup for '{}' failed: {}", term, e);
                return None;
            }
        };

        if !fetched.ok {
            tracing::debug!("Skipping '{}': HTTP {}", term, fetched.status);
            return None;
        }

        let definition = extract_definition(fetched.parsed.as_ref())?;
        Some((definition, fetched))
    }

    async fn try_candidates(&self, candidates: &[String]) -> Option<Answer> {
        for candidate in candidates {
            tracing::debug!("Trying phrase candidate '{}'", candidate);
            if let Some((definition, fetched)) = self.define(candidate).await {
                return Some(Answer {
                    definition,
                    raw: fetched.raw(),
                    matched_candidate: Some(candidate.clone()),
                });
            }
        }
        None
    }

    async fn try_keywords(&self, text: &str, primary: &Fetched) -> Option<Answer> {
        let keywords = keyword_candidates(text);
        tracing::debug!("Keyword fallback for '{}': {:?}", text, keywords);

        let mut found: Vec<KeywordDefinition> = Vec::new();
        for word in keywords {
            if let Some((definition, _)) = self.define(&word).await {
                found.push(KeywordDefinition { word, definition });
            }
            if found.len() >= MAX_KEYWORD_DEFINITIONS {
                break;
            }
        }

        if found.is_empty() {
            return None;
        }

        let definition = found
            .iter()
            .map(|k| format!("{}: {}", k.word, k.definition))
            .collect::<Vec<_>>()
            .join("\n\n");

        let fallback: Vec<Value> = found
            .iter()
            .map(|k| json!({ "word": k.word, "def": k.definition }))
            .collect();

        Some(Answer {
            definition,
            raw: json!({
                "primary": primary.parsed.clone().unwrap_or(Value::Null),
                "fallback": fallback,
            }),
            matched_candidate: None,
        })
    }

    /// Nothing structured was found, hand back the primary payload itself
    fn raw_fallback(primary: Fetched) -> Answer {
        match primary.parsed {
            Some(parsed) if is_truthy(&parsed) => Answer {
                definition: display_or_sentinel(&parsed.to_string()),
                raw: parsed,
                matched_candidate: None,
            },
            _ => Answer {
                definition: display_or_sentinel(&primary.text),
                raw: Value::String(primary.text),
                matched_candidate: None,
            },
        }
    }
}
