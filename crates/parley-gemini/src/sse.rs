// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SSE stream parser for `streamGenerateContent?alt=sse` responses.
//!
//! Each SSE `data:` payload is a complete `GenerateContentResponse` chunk.
//! Uses the `eventsource-stream` crate for SSE protocol compliance.

use std::pin::Pin;

use eventsource_stream::Eventsource;
use futures::stream::{Stream, StreamExt};
use parley_core::ParleyError;
use tracing::warn;

use crate::types::{ApiErrorResponse, GenerateContentResponse};

/// Parses a reqwest streaming response into a stream of response chunks.
///
/// Empty payloads are skipped. An error object sent mid-stream becomes an
/// `Err` item.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, ParleyError>> + Send>> {
    let event_stream = response.bytes_stream().eventsource();

    let mapped = event_stream.filter_map(|result| async move {
        match result {
            Ok(event) => parse_chunk(&event.data),
            Err(e) => Some(Err(ParleyError::RemoteService {
                message: format!("SSE stream error: {e}"),
                source: None,
            })),
        }
    });

    Box::pin(mapped)
}

/// Parses one SSE data payload.
pub(crate) fn parse_chunk(data: &str) -> Option<Result<GenerateContentResponse, ParleyError>> {
    let data = data.trim();
    if data.is_empty() {
        return None;
    }

    if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(data) {
        return Some(Err(ParleyError::RemoteService {
            message: format!(
                "Gemini stream error ({}): {}",
                api_err.error.status.unwrap_or_default(),
                api_err.error.message.unwrap_or_default()
            ),
            source: None,
        }));
    }

    match serde_json::from_str::<GenerateContentResponse>(data) {
        Ok(chunk) => Some(Ok(chunk)),
        Err(e) => {
            warn!(error = %e, "unparseable Gemini stream chunk");
            Some(Err(ParleyError::RemoteService {
                message: format!("failed to parse stream chunk: {e}"),
                source: Some(Box::new(e)),
            }))
        }
    }
}
