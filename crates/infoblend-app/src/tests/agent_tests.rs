use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use infoblend_config::{Config, ProviderConfig};
use infoblend_core::{
    HttpRequest, HttpResponse, LookupMessage, LookupService, Transport, TransportError,
};
use serde_json::{Value, json};
use tokio::io::AsyncReadExt;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::agent::{serve_lines, spawn_agent};

/// Answers every lookup with the same dictionary entry
#[derive(Default)]
struct CannedTransport {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl Transport for CannedTransport {
    async fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let word = request.url.rsplit('/').next().unwrap_or_default();
        let entry = json!([{
            "word": word,
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": format!("meaning of {word}") }]
            }]
        }]);
        Ok(HttpResponse {
            status: 200,
            body: entry.to_string(),
        })
    }
}

fn service() -> Arc<LookupService<ProviderConfig, CannedTransport>> {
    Arc::new(LookupService::new(
        ProviderConfig::default(),
        CannedTransport::default(),
        Config::default(),
    ))
}

#[tokio::test]
async fn test_request_gets_single_answer() {
    let cancel = CancellationToken::new();
    let (handle, agent) = spawn_agent(service(), cancel.clone());

    let response = timeout(
        Duration::from_secs(2),
        handle.request(LookupMessage::lookup("cat", vec![])),
    )
    .await
    .expect("agent did not answer")
    .unwrap();

    assert!(response.success);
    assert_eq!(response.def.as_deref(), Some("(noun): meaning of cat"));

    cancel.cancel();
    agent.await.unwrap();
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let cancel = CancellationToken::new();
    let (handle, agent) = spawn_agent(service(), cancel.clone());

    let mut tasks = Vec::new();
    for word in ["cat", "dog", "owl", "eel"] {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle
                .request(LookupMessage::lookup(word, vec![]))
                .await
                .unwrap()
        }));
    }

    for (task, word) in tasks.into_iter().zip(["cat", "dog", "owl", "eel"]) {
        let response = timeout(Duration::from_secs(2), task).await.unwrap().unwrap();
        assert_eq!(
            response.def.as_deref(),
            Some(format!("(noun): meaning of {word}").as_str())
        );
    }

    cancel.cancel();
    agent.await.unwrap();
}

#[tokio::test]
async fn test_request_after_shutdown_fails() {
    let cancel = CancellationToken::new();
    let (handle, agent) = spawn_agent(service(), cancel.clone());
    cancel.cancel();
    agent.await.unwrap();

    let result = timeout(
        Duration::from_millis(500),
        handle.request(LookupMessage::lookup("cat", vec![])),
    )
    .await;
    assert!(!matches!(result, Ok(Ok(_))));
}

#[tokio::test]
async fn test_serve_lines_answers_every_line() {
    let cancel = CancellationToken::new();
    let (handle, agent) = spawn_agent(service(), cancel.clone());

    let input = concat!(
        r#"{"id":1,"action":"lookup","text":"cat"}"#,
        "\n\n",
        r#"{"id":2,"action":"lookup","text":"   "}"#,
        "\n",
        "not json\n",
        r#"{"id":3,"action":"highlight","text":"cat"}"#,
        "\n",
    );
    let (writer, mut reader) = tokio::io::duplex(64 * 1024);

    timeout(
        Duration::from_secs(2),
        serve_lines(handle, input.as_bytes(), writer, cancel.clone()),
    )
    .await
    .expect("serve loop did not finish")
    .unwrap();

    let mut output = String::new();
    reader.read_to_string(&mut output).await.unwrap();

    let mut responses: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 4);
    responses.sort_by_key(|r| r["id"].as_i64().unwrap_or(0));

    assert_eq!(responses[0]["success"], false);
    assert!(responses[0]["error"].as_str().unwrap().starts_with("invalid message"));

    assert_eq!(responses[1]["id"], 1);
    assert_eq!(responses[1]["def"], "(noun): meaning of cat");
    assert_eq!(responses[1]["result"], "(noun): meaning of cat");

    assert_eq!(responses[2]["id"], 2);
    assert_eq!(responses[2]["error"], "empty");

    assert_eq!(responses[3]["id"], 3);
    assert_eq!(responses[3]["error"], "unsupported action");

    cancel.cancel();
    agent.await.unwrap();
}
