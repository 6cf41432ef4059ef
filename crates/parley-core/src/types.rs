// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the agent runtime boundary and the chat loop.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Content role for messages written by the user.
pub const USER_ROLE: &str = "user";

/// Content role for messages written by the model.
pub const MODEL_ROLE: &str = "model";

/// Opaque identifier scoping one conversation on the agent runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    /// Generates a fresh random (UUID v4) session identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Who wrote a transcript entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Identity of the agent wired into the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentIdentity {
    /// Agent name, used as the author of its events.
    pub name: String,
    /// Short human-readable description.
    pub description: String,
    /// Instruction text sent as the system instruction.
    pub instruction: String,
    /// Model identifier (e.g., "gemini-2.0-flash").
    pub model: String,
}

/// A single segment of message content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    /// Text segment, if this part carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

/// Structured message content: a role tag plus an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// Role tag: "user" or "model".
    pub role: String,
    /// Ordered parts.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// User content with a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: USER_ROLE.to_string(),
            parts: vec![Part::text(text)],
        }
    }

    /// Model content with a single text part.
    pub fn model_text(text: impl Into<String>) -> Self {
        Self {
            role: MODEL_ROLE.to_string(),
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenates every text segment, in order.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

/// Token usage reported by the model service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub response_tokens: u32,
    pub total_tokens: u32,
}

/// One item of the runtime's response sequence for a `run` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentEvent {
    /// Unique event id.
    pub id: String,
    /// Id shared by all events of one `run` call.
    pub invocation_id: String,
    /// Name of the agent (or "user") that produced the event.
    pub author: String,
    /// Content carried by the event, if any.
    pub content: Option<Content>,
    /// Set for incremental chunks of a streamed reply.
    pub partial: bool,
    /// Set once the agent has finished producing output for the turn.
    pub turn_complete: bool,
    /// Token usage, when reported.
    pub usage: Option<TokenUsage>,
    pub timestamp: DateTime<Utc>,
}

impl AgentEvent {
    /// Creates an empty, non-final event.
    pub fn new(invocation_id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            invocation_id: invocation_id.into(),
            author: author.into(),
            content: None,
            partial: false,
            turn_complete: false,
            usage: None,
            timestamp: Utc::now(),
        }
    }

    /// Attaches content.
    pub fn with_content(mut self, content: Content) -> Self {
        self.content = Some(content);
        self
    }

    /// Marks the event as an incremental chunk.
    pub fn partial(mut self) -> Self {
        self.partial = true;
        self.turn_complete = false;
        self
    }

    /// Marks the event as the final response of the turn.
    pub fn final_response(mut self) -> Self {
        self.partial = false;
        self.turn_complete = true;
        self
    }

    /// Attaches token usage.
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// True when this event is the agent's completed output for the turn.
    pub fn is_final_response(&self) -> bool {
        !self.partial && self.turn_complete
    }
}
