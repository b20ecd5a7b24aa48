use std::sync::Arc;

use anyhow::Context;
use infoblend_core::{LookupMessage, LookupResponse, LookupService, SettingsStore, Transport};
use kanal::{AsyncReceiver, AsyncSender};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::oneshot;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

/// One request travelling to the background agent. The reply sender is
/// consumed by the answer, so each request gets exactly one response.
pub struct Envelope {
    pub message: LookupMessage,
    pub reply: oneshot::Sender<LookupResponse>,
}

/// Requester side of the channel
#[derive(Clone)]
pub struct AgentHandle {
    tx: AsyncSender<Envelope>,
}

impl AgentHandle {
    pub async fn request(&self, message: LookupMessage) -> anyhow::Result<LookupResponse> {
        let (reply, answer) = oneshot::channel();

        self.tx
            .send(Envelope { message, reply })
            .await
            .context("Background agent is not running")?;

        answer.await.context("Background agent dropped the request")
    }
}

/// Start the background agent on its own task
pub fn spawn_agent<S, T>(
    service: Arc<LookupService<S, T>>,
    cancel: CancellationToken,
) -> (AgentHandle, JoinHandle<()>)
where
    S: SettingsStore + 'static,
    T: Transport + 'static,
{
    let (tx, rx) = kanal::unbounded_async();
    let task = tokio::spawn(run_agent(service, rx, cancel));
    (AgentHandle { tx }, task)
}

/// Receive envelopes until cancelled or every handle is dropped. Each request
/// is answered on its own task so a slow lookup does not hold up the others.
async fn run_agent<S, T>(
    service: Arc<LookupService<S, T>>,
    rx: AsyncReceiver<Envelope>,
    cancel: CancellationToken,
) where
    S: SettingsStore + 'static,
    T: Transport + 'static,
{
    tracing::info!("Background agent started");
    loop {
        let envelope = tokio::select! {
            _ = cancel.cancelled() => break,
            received = rx.recv() => match received {
                Ok(envelope) => envelope,
                Err(_) => break,
            },
        };

        let service = Arc::clone(&service);
        tokio::spawn(async move {
            let response = service.handle(envelope.message).await;
            if envelope.reply.send(response).is_err() {
                tracing::debug!("Requester went away before the answer arrived");
            }
        });
    }
    tracing::info!("Background agent stopping");
}

/// Line-delimited JSON bridge: one inbound message per line in, one result
/// per line out. Answers are written as they complete.
pub async fn serve_lines<R, W>(
    handle: AgentHandle,
    input: R,
    mut output: W,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (out_tx, out_rx) = kanal::unbounded_async::<String>();

    let writer = tokio::spawn(async move {
        while let Ok(line) = out_rx.recv().await {
            output.write_all(line.as_bytes()).await?;
            output.write_all(b"\n").await?;
            output.flush().await?;
        }
        Ok::<(), std::io::Error>(())
    });

    let mut lines = BufReader::new(input).lines();
    let mut in_flight = JoinSet::new();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line.context("Failed to read request line")?,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        let handle = handle.clone();
        let out_tx = out_tx.clone();
        in_flight.spawn(async move {
            let response = match serde_json::from_str::<LookupMessage>(&line) {
                Ok(message) => handle
                    .request(message)
                    .await
                    .unwrap_or_else(|e| LookupResponse::failure(e.to_string())),
                Err(e) => LookupResponse::failure(format!("invalid message: {e}")),
            };

            match serde_json::to_string(&response) {
                Ok(json) => {
                    if let Err(e) = out_tx.send(json).await {
                        tracing::error!("Failed to queue response: {}", e);
                    }
                }
                Err(e) => tracing::error!("Failed to encode response: {}", e),
            }
        });
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Request task panicked: {}", e);
        }
    }

    drop(out_tx);
    writer.await.context("Writer task panicked")??;

    Ok(())
}
