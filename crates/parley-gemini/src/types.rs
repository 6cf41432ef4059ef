// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini `generateContent` request/response types.

use parley_core::types::{Content, Part, TokenUsage};
use serde::{Deserialize, Serialize};

// --- Request types ---

/// A request to `models/{model}:generateContent` or `:streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Conversation so far, oldest first, ending with the new user message.
    pub contents: Vec<ApiContent>,

    /// System instruction (the agent's instruction text).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<ApiContent>,
}

/// Content in the Gemini wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiContent {
    /// "user" or "model"; omitted for system instructions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(default)]
    pub parts: Vec<ApiPart>,
}

/// A content part. Only text parts are produced or consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl ApiContent {
    /// System instruction content with a single text part and no role.
    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![ApiPart {
                text: Some(text.to_string()),
            }],
        }
    }
}

impl From<&Content> for ApiContent {
    fn from(content: &Content) -> Self {
        Self {
            role: Some(content.role.clone()),
            parts: content
                .parts
                .iter()
                .map(|p| ApiPart {
                    text: p.text.clone(),
                })
                .collect(),
        }
    }
}

impl From<ApiContent> for Content {
    fn from(content: ApiContent) -> Self {
        Self {
            role: content
                .role
                .unwrap_or_else(|| parley_core::types::MODEL_ROLE.to_string()),
            parts: content
                .parts
                .into_iter()
                .map(|p| Part { text: p.text })
                .collect(),
        }
    }
}

// --- Response types ---

/// A full response, or one SSE chunk of a streamed response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
    pub model_version: Option<String>,
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Content of the first candidate, if any.
    pub fn first_content(&self) -> Option<&ApiContent> {
        self.candidates.first().and_then(|c| c.content.as_ref())
    }

    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> String {
        self.first_content()
            .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default()
    }

    /// Finish reason of the first candidate.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
    }

    /// Block reason from prompt feedback, when the prompt was rejected.
    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }

    /// Token usage, if reported.
    pub fn usage(&self) -> Option<TokenUsage> {
        self.usage_metadata.as_ref().map(|u| TokenUsage {
            prompt_tokens: u.prompt_token_count,
            response_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        })
    }
}

/// One response candidate.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<ApiContent>,
    pub finish_reason: Option<String>,
}

/// Token counts reported by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

/// Feedback about the prompt, set when it was blocked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

// --- Error types ---

/// Error body returned by Google APIs.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

/// Details of an API error.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: Option<u16>,
    pub message: Option<String>,
    pub status: Option<String>,
}
