// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent client adapter.
//!
//! [`AgentClient`] wraps an [`AgentRuntime`] with a fixed application name
//! and user identifier. It provisions the remote session on first use and
//! reduces the runtime's event stream to the text of the final response.

use std::sync::Arc;

use futures::StreamExt;
use parley_config::model::AppConfig;
use parley_core::error::ParleyError;
use parley_core::traits::{AgentRuntime, EventStream};
use parley_core::types::Content;
use tracing::{debug, info};

use crate::session::ConversationSession;

/// Long-lived handle bound to one agent runtime.
pub struct AgentClient {
    runtime: Arc<dyn AgentRuntime>,
    app_name: String,
    user_id: String,
}

impl AgentClient {
    pub fn new(
        runtime: Arc<dyn AgentRuntime>,
        app_name: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            app_name: app_name.into(),
            user_id: user_id.into(),
        }
    }

    /// Builds a client using the `[app]` section for its identifiers.
    pub fn from_config(runtime: Arc<dyn AgentRuntime>, app: &AppConfig) -> Self {
        Self::new(runtime, app.app_name.clone(), app.user_id.clone())
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn runtime(&self) -> &Arc<dyn AgentRuntime> {
        &self.runtime
    }

    /// Creates the remote session if this session has not been provisioned.
    ///
    /// A failed creation leaves the session `Unprovisioned` and is not retried.
    pub async fn ensure_session(&self, session: &mut ConversationSession) -> Result<(), ParleyError> {
        if session.is_provisioned() {
            return Ok(());
        }

        self.runtime
            .create_session(&self.app_name, &self.user_id, session.id())
            .await?;
        session.mark_provisioned();

        info!(
            session_id = %session.id(),
            app_name = %self.app_name,
            runtime = self.runtime.name(),
            "session provisioned"
        );
        Ok(())
    }

    /// Sends one user message and returns the agent's full text reply.
    ///
    /// Only events marked as the final response contribute text. A turn with
    /// no final event yields an empty string.
    pub async fn send(
        &self,
        session: &mut ConversationSession,
        message: &str,
    ) -> Result<String, ParleyError> {
        self.ensure_session(session).await?;

        debug!(session_id = %session.id(), len = message.len(), "submitting message");
        let events = self
            .runtime
            .run(&self.user_id, session.id(), Content::user_text(message))
            .await?;

        let reply = collect_final_text(events).await?;
        debug!(session_id = %session.id(), reply_len = reply.len(), "reply received");
        Ok(reply)
    }
}

impl std::fmt::Debug for AgentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentClient")
            .field("runtime", &self.runtime.name())
            .field("app_name", &self.app_name)
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Drains an event stream, concatenating every text part of every final
/// event in arrival order. The first error item aborts the drain.
pub async fn collect_final_text(mut events: EventStream) -> Result<String, ParleyError> {
    let mut reply = String::new();
    let mut seen = 0usize;

    while let Some(event) = events.next().await {
        let event = event?;
        seen += 1;
        if !event.is_final_response() {
            continue;
        }
        if let Some(content) = &event.content {
            for text in content.parts.iter().filter_map(|p| p.text.as_deref()) {
                reply.push_str(text);
            }
        }
    }

    debug!(events = seen, reply_len = reply.len(), "event stream drained");
    Ok(reply)
}
