// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Parley chat front-end.
//!
//! This crate provides the error type, the shared message and event types,
//! and the [`AgentRuntime`] trait that sits between the chat loop and the
//! hosted agent.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ParleyError;
pub use traits::{AgentRuntime, EventStream, PluginAdapter};
pub use types::{AgentEvent, AgentIdentity, Content, HealthStatus, Part, Role, SessionId};
