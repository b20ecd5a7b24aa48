use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use infoblend_core::{HttpRequest, HttpResponse, Transport, TransportError};

pub const DICTIONARY: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

pub const NOT_FOUND_JSON: &str = concat!(
    r#"{"title":"No Definitions Found","#,
    r#""message":"Sorry pal, we couldn't find definitions for the word you were looking for.","#,
    r#""resolution":"You can try the search again at later time or head to the web instead."}"#
);

enum Reply {
    Respond(u16, String),
    Fail,
    Stall(Duration),
}

/// In-memory transport answering by exact URL and recording every call
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<String, Reply>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert(url.to_string(), Reply::Respond(status, body.to_string()));
        self
    }

    /// Dictionary entry for `word` with one meaning
    pub fn define(self, word: &str, pos: &str, definition: &str) -> Self {
        let body = serde_json::json!([{
            "word": word,
            "meanings": [{
                "partOfSpeech": pos,
                "definitions": [{ "definition": definition }]
            }]
        }]);
        let url = format!("{DICTIONARY}{}", word.replace(' ', "%20"));
        self.respond(&url, 200, &body.to_string())
    }

    pub fn fail(mut self, url: &str) -> Self {
        self.routes.insert(url.to_string(), Reply::Fail);
        self
    }

    pub fn stall(mut self, url: &str, delay: Duration) -> Self {
        self.routes.insert(url.to_string(), Reply::Stall(delay));
        self
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());

        match self.routes.get(&request.url) {
            Some(Reply::Respond(status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Reply::Fail) => Err(TransportError::Timeout),
            Some(Reply::Stall(delay)) => {
                tokio::time::sleep(*delay).await;
                Ok(HttpResponse {
                    status: 200,
                    body: "[]".to_string(),
                })
            }
            None => Ok(HttpResponse {
                status: 404,
                body: NOT_FOUND_JSON.to_string(),
            }),
        }
    }
}

/// Delegates to a shared transport so tests keep access to its call log
pub struct Shared<'a>(pub &'a ScriptedTransport);

#[async_trait::async_trait]
impl Transport for Shared<'_> {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.0.execute(request).await
    }
}
