// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agent runtime trait: the boundary between the chat front-end and the
//! hosted conversational agent.

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::error::ParleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{AgentEvent, Content, SessionId};

/// Lazy sequence of response events for one `run` call.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, ParleyError>> + Send>>;

/// A conversational agent runtime with its own session registry.
#[async_trait]
pub trait AgentRuntime: PluginAdapter {
    /// Registers a new conversation session.
    ///
    /// Fails if the session already exists or the registry is unreachable.
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<(), ParleyError>;

    /// Submits a new message to an existing session and returns the
    /// response events in arrival order.
    async fn run(
        &self,
        user_id: &str,
        session_id: &SessionId,
        new_message: Content,
    ) -> Result<EventStream, ParleyError>;
}
