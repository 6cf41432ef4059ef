// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One chat turn: record the user message, ask the agent, record the reply.

use std::sync::Arc;

use parley_core::error::ParleyError;

use crate::client::AgentClient;
use crate::session::{ConversationSession, Transcript};

/// The UI's conversation: a session plus the client that answers it.
#[derive(Debug)]
pub struct ChatSession {
    session: ConversationSession,
    client: Arc<AgentClient>,
}

impl ChatSession {
    /// Starts a new conversation with a fresh session.
    pub fn new(client: Arc<AgentClient>) -> Self {
        Self::with_session(ConversationSession::new(), client)
    }

    pub fn with_session(session: ConversationSession, client: Arc<AgentClient>) -> Self {
        Self { session, client }
    }

    pub fn session(&self) -> &ConversationSession {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        self.session.transcript()
    }

    pub fn client(&self) -> &Arc<AgentClient> {
        &self.client
    }

    /// Runs one turn and returns the reply.
    ///
    /// The user entry is appended before the remote call. On error the
    /// assistant entry is not appended.
    pub async fn submit(&mut self, input: &str) -> Result<String, ParleyError> {
        self.session.transcript_mut().push_user(input);
        let reply = self.client.send(&mut self.session, input).await?;
        self.session.transcript_mut().push_assistant(reply.as_str());
        Ok(reply)
    }
}
