// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-process conversation state.
//!
//! A [`ConversationSession`] is created once when the UI starts. Its
//! identifier never changes, the transcript only grows, and the provisioning
//! state moves from `Unprovisioned` to `Provisioned` exactly once.

use chrono::{DateTime, Utc};
use parley_core::types::{Role, SessionId};

/// Whether the remote session for this identifier has been created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvisionState {
    /// No remote session exists yet.
    #[default]
    Unprovisioned,
    /// The remote session was created successfully.
    Provisioned,
}

impl std::fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProvisionState::Unprovisioned => write!(f, "unprovisioned"),
            ProvisionState::Provisioned => write!(f, "provisioned"),
        }
    }
}

/// One role-tagged message in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Append-only log of the messages shown to the user.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a user message.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content.into());
    }

    /// Appends an assistant reply. An empty reply is recorded as-is.
    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content.into());
    }

    fn push(&mut self, role: Role, content: String) {
        self.entries.push(TranscriptEntry {
            role,
            content,
            created_at: Utc::now(),
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TranscriptEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// State of the single conversation owned by the UI.
#[derive(Debug, Clone)]
pub struct ConversationSession {
    id: SessionId,
    transcript: Transcript,
    state: ProvisionState,
    created_at: DateTime<Utc>,
}

impl ConversationSession {
    /// Creates a session with a fresh identifier, an empty transcript and
    /// the `Unprovisioned` state.
    pub fn new() -> Self {
        Self {
            id: SessionId::generate(),
            transcript: Transcript::new(),
            state: ProvisionState::Unprovisioned,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn provision_state(&self) -> ProvisionState {
        self.state
    }

    pub fn is_provisioned(&self) -> bool {
        self.state == ProvisionState::Provisioned
    }

    /// Records that the remote session now exists. There is no way back.
    pub fn mark_provisioned(&mut self) {
        self.state = ProvisionState::Provisioned;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty_and_unprovisioned() {
        let session = ConversationSession::new();
        assert!(session.transcript().is_empty());
        assert_eq!(session.provision_state(), ProvisionState::Unprovisioned);
        assert!(!session.is_provisioned());
        assert!(!session.id().as_str().is_empty());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let a = ConversationSession::new();
        let b = ConversationSession::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn mark_provisioned_keeps_id() {
        let mut session = ConversationSession::new();
        let id = session.id().clone();
        session.mark_provisioned();
        session.mark_provisioned();
        assert!(session.is_provisioned());
        assert_eq!(session.id(), &id);
    }

    #[test]
    fn provision_state_display() {
        assert_eq!(ProvisionState::Unprovisioned.to_string(), "unprovisioned");
        assert_eq!(ProvisionState::Provisioned.to_string(), "provisioned");
    }

    #[test]
    fn transcript_preserves_order_and_roles() {
        let mut transcript = Transcript::new();
        transcript.push_user("hi");
        transcript.push_assistant("hello");
        transcript.push_assistant("");

        let roles: Vec<Role> = transcript.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::Assistant]);
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.entries()[1].content, "hello");
        assert_eq!(transcript.entries()[2].content, "");
        assert_eq!((&transcript).into_iter().count(), 3);
    }
}
