use infoblend_config::Config;
use tokio::time::Instant;

use crate::error::LookupError;
use crate::lookup::Resolver;
use crate::store::SettingsStore;
use crate::transport::Transport;
use crate::types::{Answer, LookupMessage, LookupRequest, LookupResponse};

/// Top-level request handler of the background agent
pub struct LookupService<S, T> {
    store: S,
    transport: T,
    config: Config,
}

impl<S, T> LookupService<S, T>
where
    S: SettingsStore,
    T: Transport,
{
    pub fn new(store: S, transport: T, config: Config) -> Self {
        Self {
            store,
            transport,
            config,
        }
    }

    /// Answer one inbound message. Always produces exactly one response.
    pub async fn handle(&self, message: LookupMessage) -> LookupResponse {
        let id = message.id.clone();
        let result = self.respond(message).await;

        match &result {
            Ok(answer) => tracing::info!(
                "Lookup answered ({} chars, candidate: {:?})",
                answer.definition.chars().count(),
                answer.matched_candidate
            ),
            Err(e) => tracing::error!("Lookup failed: {}", e),
        }

        LookupResponse::from(result).with_id(id)
    }

    async fn respond(&self, message: LookupMessage) -> Result<Answer, LookupError> {
        let request = LookupRequest::try_from(message)?;
        tracing::info!("Lookup '{}' ({:?})", request.text, request.action);

        let provider = self.store.load().await?.with_overrides(&request.overrides);
        tracing::debug!("Using provider {}", provider.provider.as_str());

        let deadline = Instant::now() + self.config.network.lookup_deadline();
        let resolver = Resolver::new(&self.transport, &provider, &self.config);

        resolver.resolve(&request, deadline).await
    }
}
