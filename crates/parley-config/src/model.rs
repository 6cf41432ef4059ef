// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Placeholder written in place of secrets when printing configuration.
pub const REDACTED: &str = "[REDACTED]";

/// Top-level Parley configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParleyConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Agent identity wired into the runtime.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Application and user scoping for remote sessions.
    #[serde(default)]
    pub app: AppConfig,

    /// Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            agent: AgentConfig::default(),
            app: AppConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

impl ParleyConfig {
    /// Returns a copy with secrets replaced by [`REDACTED`], for display.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.gemini.api_key.is_some() {
            copy.gemini.api_key = Some(REDACTED.to_string());
        }
        copy
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Agent identity configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Agent name; shown as the author of replies.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Short description of the agent.
    #[serde(default = "default_agent_description")]
    pub description: String,

    /// Instruction text sent as the system instruction on every request.
    #[serde(default = "default_agent_instruction")]
    pub instruction: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            description: default_agent_description(),
            instruction: default_agent_instruction(),
            model: default_model(),
        }
    }
}

fn default_agent_name() -> String {
    "assistant".to_string()
}

fn default_agent_description() -> String {
    "A helpful conversational assistant.".to_string()
}

fn default_agent_instruction() -> String {
    "You are a helpful, friendly assistant. Answer questions clearly and concisely.".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

/// Application scoping for sessions on the agent runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Application name sessions are registered under.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// User identifier used for every session of this process.
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            user_id: default_user_id(),
        }
    }
}

fn default_app_name() -> String {
    "parley".to_string()
}

fn default_user_id() -> String {
    "local_user".to_string()
}

/// Gemini API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// Google API key. `None` falls back to `GOOGLE_API_KEY` or an interactive prompt.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the Generative Language API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Use `streamGenerateContent` (SSE) instead of `generateContent`.
    #[serde(default)]
    pub streaming: bool,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            streaming: false,
        }
    }
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}
