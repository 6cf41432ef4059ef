// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Parley chat front-end.

use thiserror::Error;

/// The primary error type used across the agent runtime boundary and the chat loop.
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration errors (invalid values, unusable header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// No API key was supplied, so nothing can be sent.
    #[error("missing credential: please add your Google API key to continue")]
    MissingCredential,

    /// Failure reported by the agent runtime or the model service behind it
    /// (session creation, auth, network, quota).
    #[error("remote service error: {message}")]
    RemoteService {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ParleyError {
    /// Returns true if the error came from the remote side of the exchange.
    pub fn is_remote(&self) -> bool {
        matches!(self, ParleyError::RemoteService { .. })
    }
}
