// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation state and agent client adapter for the Parley chat front-end.
//!
//! - [`ConversationSession`] holds the session identifier, the transcript and
//!   the provisioning state for the lifetime of the UI process.
//! - [`AgentClient`] provisions the remote session on first use and turns a
//!   message into the agent's full text reply.
//! - [`ClientCache`] builds one client per distinct credential and reuses it.
//! - [`ChatSession`] runs one chat turn and keeps the transcript in step.

pub mod cache;
pub mod chat;
pub mod client;
pub mod session;

pub use cache::ClientCache;
pub use chat::ChatSession;
pub use client::{AgentClient, collect_final_text};
pub use session::{ConversationSession, ProvisionState, Transcript, TranscriptEntry};
