// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock agent runtime for deterministic testing.
//!
//! `MockRuntime` implements `AgentRuntime` with pre-scripted turns. Each
//! `run` call pops the next turn from a FIFO queue; when the queue is empty a
//! single final event with the text "mock response" is returned.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::stream;
use tokio::sync::Mutex;

use parley_core::ParleyError;
use parley_core::traits::{AgentRuntime, EventStream, PluginAdapter};
use parley_core::types::{AgentEvent, Content, HealthStatus, Part, SessionId};

/// One scripted answer to a `run` call.
#[derive(Debug, Clone)]
pub enum MockTurn {
    /// Yield these events in order.
    Events(Vec<AgentEvent>),
    /// Fail the `run` call itself.
    Error(String),
    /// Yield these events, then an error item.
    EventsThenError(Vec<AgentEvent>, String),
}

/// A final event whose content holds one text part per entry of `parts`.
pub fn final_text_event(parts: &[&str]) -> AgentEvent {
    let content = Content {
        role: parley_core::types::MODEL_ROLE.to_string(),
        parts: parts.iter().map(|t| Part::text(*t)).collect(),
    };
    AgentEvent::new("mock-inv", "mock-agent")
        .with_content(content)
        .final_response()
}

/// A partial event carrying `text`.
pub fn partial_text_event(text: &str) -> AgentEvent {
    AgentEvent::new("mock-inv", "mock-agent")
        .with_content(Content::model_text(text))
        .partial()
}

fn remote(message: impl Into<String>) -> ParleyError {
    ParleyError::RemoteService {
        message: message.into(),
        source: None,
    }
}

/// A mock agent runtime that answers with pre-configured turns.
#[derive(Default)]
pub struct MockRuntime {
    turns: Mutex<VecDeque<MockTurn>>,
    sessions: Mutex<HashSet<String>>,
    received: Mutex<Vec<Content>>,
    create_calls: AtomicUsize,
    run_calls: AtomicUsize,
    fail_create: AtomicBool,
}

impl MockRuntime {
    /// Create a mock runtime with an empty turn queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock runtime whose turns each answer with one final text event.
    pub fn with_replies(replies: Vec<String>) -> Self {
        Self::with_turns(
            replies
                .iter()
                .map(|r| MockTurn::Events(vec![final_text_event(&[r.as_str()])]))
                .collect(),
        )
    }

    /// Create a mock runtime pre-loaded with scripted turns.
    pub fn with_turns(turns: Vec<MockTurn>) -> Self {
        Self {
            turns: Mutex::new(VecDeque::from(turns)),
            ..Self::default()
        }
    }

    /// Add a turn to the end of the queue.
    pub async fn push_turn(&self, turn: MockTurn) {
        self.turns.lock().await.push_back(turn);
    }

    /// Make every later `create_session` call fail.
    pub fn fail_session_creation(&self, fail: bool) {
        self.fail_create.store(fail, Ordering::SeqCst);
    }

    /// Number of `create_session` calls, failed ones included.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Number of `run` calls, failed ones included.
    pub fn run_calls(&self) -> usize {
        self.run_calls.load(Ordering::SeqCst)
    }

    /// Messages passed to `run`, in order.
    pub async fn received(&self) -> Vec<Content> {
        self.received.lock().await.clone()
    }

    async fn next_turn(&self) -> MockTurn {
        self.turns
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| MockTurn::Events(vec![final_text_event(&["mock response"])]))
    }
}

#[async_trait]
impl PluginAdapter for MockRuntime {
    fn name(&self) -> &str {
        "mock-runtime"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ParleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ParleyError> {
        Ok(())
    }
}

#[async_trait]
impl AgentRuntime for MockRuntime {
    async fn create_session(
        &self,
        app_name: &str,
        user_id: &str,
        session_id: &SessionId,
    ) -> Result<(), ParleyError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_create.load(Ordering::SeqCst) {
            return Err(remote("session creation failed"));
        }

        let key = format!("{app_name}/{user_id}/{session_id}");
        if !self.sessions.lock().await.insert(key) {
            return Err(remote(format!("session already exists: {session_id}")));
        }
        Ok(())
    }

    async fn run(
        &self,
        user_id: &str,
        session_id: &SessionId,
        new_message: Content,
    ) -> Result<EventStream, ParleyError> {
        self.run_calls.fetch_add(1, Ordering::SeqCst);

        let known = self
            .sessions
            .lock()
            .await
            .iter()
            .any(|k| k.ends_with(&format!("/{user_id}/{session_id}")));
        if !known {
            return Err(remote(format!("session not found: {session_id}")));
        }

        self.received.lock().await.push(new_message);

        let items: Vec<Result<AgentEvent, ParleyError>> = match self.next_turn().await {
            MockTurn::Events(events) => events.into_iter().map(Ok).collect(),
            MockTurn::Error(message) => return Err(remote(message)),
            MockTurn::EventsThenError(events, message) => events
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(remote(message))))
                .collect(),
        };
        Ok(Box::pin(stream::iter(items)))
    }
}
