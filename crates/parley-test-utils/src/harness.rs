// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end chat turns.
//!
//! `TestHarness` wires a [`ChatSession`] and its [`AgentClient`] over a
//! [`MockRuntime`] and provides `send_message()` to drive turns in tests.

use std::sync::Arc;

use parley_agent::{AgentClient, ChatSession, Transcript};
use parley_core::ParleyError;

use crate::mock_runtime::{MockRuntime, MockTurn};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    turns: Vec<MockTurn>,
    app_name: String,
    user_id: String,
    fail_session_creation: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            turns: Vec::new(),
            app_name: "parley_test".to_string(),
            user_id: "test_user".to_string(),
            fail_session_creation: false,
        }
    }

    /// Set mock replies, one final text event per turn.
    pub fn with_replies(mut self, replies: Vec<String>) -> Self {
        self.turns = replies
            .iter()
            .map(|r| MockTurn::Events(vec![crate::final_text_event(&[r.as_str()])]))
            .collect();
        self
    }

    /// Set fully scripted turns.
    pub fn with_turns(mut self, turns: Vec<MockTurn>) -> Self {
        self.turns = turns;
        self
    }

    /// Set the application name and user identifier the client uses.
    pub fn with_identity(mut self, app_name: &str, user_id: &str) -> Self {
        self.app_name = app_name.to_string();
        self.user_id = user_id.to_string();
        self
    }

    /// Make remote session creation fail.
    pub fn with_failing_session_creation(mut self) -> Self {
        self.fail_session_creation = true;
        self
    }

    /// Build the test harness.
    pub fn build(self) -> TestHarness {
        let runtime = Arc::new(MockRuntime::with_turns(self.turns));
        runtime.fail_session_creation(self.fail_session_creation);

        let client = Arc::new(AgentClient::new(
            runtime.clone(),
            self.app_name,
            self.user_id,
        ));
        let chat = ChatSession::new(Arc::clone(&client));

        TestHarness {
            runtime,
            client,
            chat,
        }
    }
}

/// A chat session over a mock runtime.
pub struct TestHarness {
    /// The mock agent runtime.
    pub runtime: Arc<MockRuntime>,
    /// The client shared with the chat session.
    pub client: Arc<AgentClient>,
    /// The chat session driven by `send_message`.
    pub chat: ChatSession,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Run one chat turn and return the reply.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ParleyError> {
        self.chat.submit(text).await
    }

    /// The chat transcript so far.
    pub fn transcript(&self) -> &Transcript {
        self.chat.transcript()
    }

    /// Add a turn to the mock runtime's queue.
    pub async fn add_turn(&self, turn: MockTurn) {
        self.runtime.push_turn(turn).await;
    }
}
