// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini-backed agent runtime for the Parley chat front-end.
//!
//! [`GeminiRuntime`] implements [`AgentRuntime`]: it owns an agent identity,
//! an application name and an [`InMemorySessionRegistry`], and turns each
//! `run` call into a Gemini request carrying the session's history.

pub mod client;
pub mod registry;
pub mod sse;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use parley_config::ParleyConfig;
use parley_core::error::ParleyError;
use parley_core::traits::{AgentRuntime, EventStream, PluginAdapter};
use parley_core::types::{
    AgentEvent, AgentIdentity, Content, HealthStatus, Part, SessionId, TokenUsage,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

pub use crate::client::GeminiClient;
pub use crate::registry::{InMemorySessionRegistry, SessionKey};

use crate::client::ChunkStream;
use crate::types::{ApiContent, GenerateContentRequest, GenerateContentResponse};

/// Agent runtime that answers with Google Gemini.
///
/// In non-streaming mode each `run` yields exactly one final event. In
/// streaming mode each SSE chunk becomes a partial event and one final event
/// with the aggregated text follows the last chunk.
pub struct GeminiRuntime {
    identity: AgentIdentity,
    app_name: String,
    client: GeminiClient,
    registry: Arc<InMemorySessionRegistry>,
    streaming: bool,
}

impl GeminiRuntime {
    /// Creates a runtime from configuration and an API key.
    pub fn new(config: &ParleyConfig, api_key: &SecretString) -> Result<Self, ParleyError> {
        let client = GeminiClient::new(
            api_key.expose_secret(),
            &config.gemini.base_url,
            Duration::from_secs(config.gemini.timeout_secs),
        )?;

        let identity = AgentIdentity {
            name: config.agent.name.clone(),
            description: config.agent.description.clone(),
            instruction: config.agent.instruction.clone(),
            model: config.agent.model.clone(),
        };

        info!(
            agent = %identity.name,
            model = %identity.model,
            app_name = %config.app.app_name,
            streaming = config.gemini.streaming,
            "Gemini runtime initialized"
        );

        Ok(Self::from_parts(
            identity,
            config.app.app_name.clone(),
            client,
            config.gemini.streaming,
        ))
    }

    /// Assembles a runtime from already-built parts.
    pub fn from_parts(
        identity: AgentIdentity,
        app_name: String,
        client: GeminiClient,
        streaming: bool,
    ) -> Self {
        Self {
            identity,
            app_name,
            client,
            registry: Arc::new(InMemorySessionRegistry::new()),
            streaming,
        }
    }

    /// The agent identity this runtime answers as.
    pub fn identity(&self) -> &AgentIdentity {
        &self.identity
    }

    /// Application name sessions are registered under.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// The session registry.
    pub fn registry(&self) -> &Arc<InMemorySessionRegistry> {
        &self.registry
    }

    fn build_request(&self, history: &[Content], new_message: &Content) -> GenerateContentRequest {
        let contents = history
            .iter()
            .chain(std::iter::once(new_message))
            .map(ApiContent::from)
            .collect();

        let instruction = self.identity.instruction.trim();
        GenerateContentRequest {
            contents,
            system_instruction: (!instruction.is_empty()).then(|| ApiContent::system(instruction)),
        }
    }

    /// Runs one non-streaming exchange and commits it to the history.
    async fn run_once(
        &self,
        key: SessionKey,
        request: GenerateContentRequest,
        new_message: Content,
        invocation_id: String,
    ) -> Result<EventStream, ParleyError> {
        let response = self
            .client
            .generate_content(&self.identity.model, &request)
            .await?;

        let mut event = AgentEvent::new(invocation_id, &self.identity.name).final_response();
        if let Some(usage) = response.usage() {
            event = event.with_usage(usage);
        }

        match response.first_content().and_then(text_reply) {
            Some(content) => {
                self.registry
                    .append(&key, [new_message, content.clone()])
                    .await?;
                event = event.with_content(content);
            }
            None => log_empty_response(&response),
        }

        Ok(Box::pin(stream::iter(vec![Ok(event)])))
    }

    /// Starts a streaming exchange; the history is committed when the stream ends.
    async fn run_streaming(
        &self,
        key: SessionKey,
        request: GenerateContentRequest,
        new_message: Content,
        invocation_id: String,
    ) -> Result<EventStream, ParleyError> {
        let chunks = self
            .client
            .stream_generate_content(&self.identity.model, &request)
            .await?;

        let state = StreamState {
            chunks,
            text: String::new(),
            usage: None,
            registry: Arc::clone(&self.registry),
            key,
            new_message,
            author: self.identity.name.clone(),
            invocation_id,
        };

        Ok(Box::pin(stream::unfold(Some(state), next_stream_event)))
    }
}

/// Progress of one streamed `run` call.
struct StreamState {
    chunks: ChunkStream,
    text: String,
    usage: Option<TokenUsage>,
    registry: Arc<InMemorySessionRegistry>,
    key: SessionKey,
    new_message: Content,
    author: String,
    invocation_id: String,
}

/// Yields one partial event per chunk, then the aggregated final event.
/// A chunk error ends the stream.
async fn next_stream_event(
    state: Option<StreamState>,
) -> Option<(Result<AgentEvent, ParleyError>, Option<StreamState>)> {
    let mut state = state?;

    match state.chunks.next().await {
        Some(Ok(chunk)) => {
            if let Some(usage) = chunk.usage() {
                state.usage = Some(usage);
            }
            let text = chunk.text();
            let mut event = AgentEvent::new(&state.invocation_id, &state.author).partial();
            if !text.is_empty() {
                state.text.push_str(&text);
                event = event.with_content(Content::model_text(text));
            }
            Some((Ok(event), Some(state)))
        }
        Some(Err(e)) => Some((Err(e), None)),
        None => {
            let mut event = AgentEvent::new(&state.invocation_id, &state.author).final_response();
            if let Some(usage) = state.usage {
                event = event.with_usage(usage);
            }
            if state.text.is_empty() {
                warn!(session_id = %state.key.session_id, "Gemini stream ended without text");
            } else {
                let reply = Content::model_text(state.text);
                if let Err(e) = state
                    .registry
                    .append(&state.key, [state.new_message, reply.clone()])
                    .await
                {
                    return Some((Err(e), None));
                }
                event = event.with_content(reply);
            }
            Some((Ok(event), None))
        }
    }
}

/// Model content keeping only parts that carry text; `None` when no text is left.
fn text_reply(content: &ApiContent) -> Option<Content> {
    let parts: Vec<Part> = content
        .parts
        .iter()
        .filter_map(|p| p.text.clone())
        .map(Part::text)
        .collect();
    if parts.is_empty() {
        return None;
    }
    Some(Content {
        role: parley_core::types::MODEL_ROLE.to_string(),
        parts,
    })
}

fn log_empty_response(response: &GenerateContentResponse) {
    warn!(
        finish_reason = ?response.finish_reason(),
        block_reason = ?response.block_reason(),
        "Gemini returned no content"
    );
}

#[async_trait]
impl PluginAdapter for GeminiRuntime {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        let sessions = self.registry.len().await;
        debug!(sessions, "Gemini runtime shutting down");
        Ok(())
    }
}

#[async_trait]
impl AgentRuntime for GeminiRuntime {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<(), ParleyError> {
        self.registry
            .create(SessionKey::new(app_name, user_id, session_id))
            .await?;
        debug!(app_name, user_id, session_id = %session_id, "session created");
        Ok(())
    }

    async fn run(
        &self,
        user_id: &str,
        session_id: &SessionId,
        new_message: Content,
    ) -> Result<EventStream, ParleyError> {
        let key = SessionKey::new(&self.app_name, user_id, session_id);
        let history = self.registry.history(&key).await?;
        let request = self.build_request(&history, &new_message);
        let invocation_id = format!("inv-{}", uuid::Uuid::new_v4());

        debug!(
            session_id = %session_id,
            history = history.len(),
            streaming = self.streaming,
            "running agent"
        );

        if self.streaming {
            self.run_streaming(key, request, new_message, invocation_id)
                .await
        } else {
            self.run_once(key, request, new_message, invocation_id).await
        }
    }
}
