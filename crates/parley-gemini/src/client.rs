// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini Generative Language API.
//!
//! Provides [`GeminiClient`] which handles authentication, request
//! construction, error mapping and SSE streaming. Failed requests are
//! reported as-is; nothing is retried.

use std::pin::Pin;
use std::time::Duration;

use futures::Stream;
use parley_core::ParleyError;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::sse;
use crate::types::{ApiErrorResponse, GenerateContentRequest, GenerateContentResponse};

/// Stream of parsed chunks from `streamGenerateContent`.
pub type ChunkStream =
    Pin<Box<dyn Stream<Item = Result<GenerateContentResponse, ParleyError>> + Send>>;

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new Gemini API client.
    ///
    /// # Arguments
    /// * `api_key` - Google API key, sent as the `x-goog-api-key` header
    /// * `base_url` - API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    /// * `timeout` - per-request timeout
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, ParleyError> {
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|e| ParleyError::Config(format!("invalid API key header value: {e}")))?;
        key_value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", key_value);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ParleyError::RemoteService {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Returns the API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends a non-streaming `generateContent` request.
    pub async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ParleyError> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let response = self.post(&url, request).await?;

        let body = response.text().await.map_err(|e| ParleyError::RemoteService {
            message: format!("failed to read response body: {e}"),
            source: Some(Box::new(e)),
        })?;
        serde_json::from_str(&body).map_err(|e| ParleyError::RemoteService {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Sends a `streamGenerateContent?alt=sse` request and returns the parsed chunks.
    pub async fn stream_generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ChunkStream, ParleyError> {
        let url = format!("{}/models/{model}:streamGenerateContent?alt=sse", self.base_url);
        let response = self.post(&url, request).await?;
        Ok(sse::parse_sse_stream(response))
    }

    /// POSTs a request and maps non-success statuses to errors.
    async fn post(
        &self,
        url: &str,
        request: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ParleyError> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ParleyError::RemoteService {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, contents = request.contents.len(), "Gemini response received");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status, &body))
    }
}

/// Builds a [`ParleyError::RemoteService`] from an error status and body.
pub(crate) fn error_from_body(status: StatusCode, body: &str) -> ParleyError {
    let message = match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "Gemini API error ({}): {}",
            api_err
                .error
                .status
                .unwrap_or_else(|| status.as_u16().to_string()),
            api_err.error.message.unwrap_or_default()
        ),
        Err(_) => format!("API returned {status}: {body}"),
    };
    ParleyError::RemoteService {
        message,
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ApiContent;
    use futures::StreamExt;
    use parley_core::Content;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL: &str = "gemini-2.0-flash";

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-api-key", base_url, Duration::from_secs(5)).unwrap()
    }

    fn test_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![ApiContent::from(&Content::user_text("Hello"))],
            system_instruction: Some(ApiContent::system("Be helpful.")),
        }
    }

    #[tokio::test]
    async fn generate_content_success() {
        let server = MockServer::start().await;

        let response_body = serde_json::json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hi there!"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 3, "totalTokenCount": 6}
        });

        Mock::given(method("POST"))
            .and(path(format!("/models/{MODEL}:generateContent")))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Hello"}]}],
                "systemInstruction": {"parts": [{"text": "Be helpful."}]}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let result = client.generate_content(MODEL, &test_request()).await.unwrap();

        assert_eq!(result.text(), "Hi there!");
        assert_eq!(result.usage().unwrap().total_tokens, 6);
    }

    #[tokio::test]
    async fn generate_content_maps_google_error_body() {
        let server = MockServer::start().await;

        let error_body = serde_json::json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        });

        Mock::given(method("POST"))
            .and(path(format!("/models/{MODEL}:generateContent")))
            .respond_with(ResponseTemplate::new(400).set_body_json(&error_body))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content(MODEL, &test_request())
            .await
            .unwrap_err();
        assert!(err.is_remote());
        let msg = err.to_string();
        assert!(msg.contains("INVALID_ARGUMENT"), "got: {msg}");
        assert!(msg.contains("API key not valid."), "got: {msg}");
    }

    #[tokio::test]
    async fn generate_content_does_not_retry() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{MODEL}:generateContent")))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content(MODEL, &test_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("503"), "got: {err}");
    }

    #[tokio::test]
    async fn unparseable_success_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/models/{MODEL}:generateContent")))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let err = client
            .generate_content(MODEL, &test_request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse"), "got: {err}");
    }

    #[tokio::test]
    async fn stream_generate_content_yields_chunks() {
        let server = MockServer::start().await;

        let sse_body = concat!(
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hel\"}]}}]}\r\n\r\n",
            "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"lo\"}]},\"finishReason\":\"STOP\"}]}\r\n\r\n",
        );

        Mock::given(method("POST"))
            .and(path(format!("/models/{MODEL}:streamGenerateContent")))
            .and(query_param("alt", "sse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(sse_body),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let mut stream = client
            .stream_generate_content(MODEL, &test_request())
            .await
            .unwrap();

        let mut texts = Vec::new();
        while let Some(chunk) = stream.next().await {
            texts.push(chunk.unwrap().text());
        }
        assert_eq!(texts, vec!["Hel".to_string(), "lo".to_string()]);
    }

    #[test]
    fn error_from_plain_body_keeps_status() {
        let err = error_from_body(StatusCode::FORBIDDEN, "denied");
        assert_eq!(err.to_string(), "remote service error: API returned 403 Forbidden: denied");
    }

    #[test]
    fn invalid_api_key_header_is_config_error() {
        let err = GeminiClient::new("bad\nkey", "http://localhost", Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, ParleyError::Config(_)));
    }
}
