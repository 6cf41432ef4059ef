// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: configuration file -> Gemini runtime (against a mock
//! HTTP server) -> cached client -> chat turns.

use std::io::Write;
use std::sync::Arc;

use parley_agent::{AgentClient, ChatSession, ClientCache, ProvisionState};
use parley_config::ParleyConfig;
use parley_core::types::Role;
use parley_gemini::GeminiRuntime;
use parley_test_utils::{MockTurn, TestHarness, final_text_event};
use secrecy::SecretString;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn reply(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    }))
}

fn load_config(base_url: &str, extra: &str) -> (ParleyConfig, tempfile::NamedTempFile) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "[agent]\nname = \"helper\"\n\n[gemini]\nbase_url = \"{base_url}\"\n{extra}"
    )
    .unwrap();
    let config = parley_config::load_and_validate_path(file.path()).unwrap();
    (config, file)
}

fn gemini_cache(config: &ParleyConfig) -> ClientCache {
    let config = config.clone();
    ClientCache::new(move |key| {
        let runtime = GeminiRuntime::new(&config, key)?;
        Ok(AgentClient::from_config(Arc::new(runtime), &config.app))
    })
}

#[tokio::test]
async fn chat_turns_against_gemini() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(reply("Hi! How can I help?"))
        .expect(2)
        .mount(&server)
        .await;

    let (config, _file) = load_config(&server.uri(), "");
    let mut cache = gemini_cache(&config);
    let client = cache
        .get_or_create(&SecretString::from("test-key".to_string()))
        .unwrap();
    let mut chat = ChatSession::new(client);

    assert_eq!(chat.session().provision_state(), ProvisionState::Unprovisioned);
    assert_eq!(chat.submit("Hello").await.unwrap(), "Hi! How can I help?");
    assert_eq!(chat.submit("Again").await.unwrap(), "Hi! How can I help?");
    assert_eq!(chat.session().provision_state(), ProvisionState::Provisioned);

    let roles: Vec<Role> = chat.transcript().iter().map(|e| e.role).collect();
    assert_eq!(
        roles,
        vec![Role::User, Role::Assistant, Role::User, Role::Assistant]
    );
}

#[tokio::test]
async fn streaming_mode_returns_aggregated_reply() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hello\"}]}}]}\n\n",
        "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\" world\"}]},\"finishReason\":\"STOP\"}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.0-flash:streamGenerateContent"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(body),
        )
        .mount(&server)
        .await;

    let (config, _file) = load_config(&server.uri(), "streaming = true\n");
    assert!(config.gemini.streaming);

    let mut cache = gemini_cache(&config);
    let client = cache
        .get_or_create(&SecretString::from("test-key".to_string()))
        .unwrap();
    let mut chat = ChatSession::new(client);

    assert_eq!(chat.submit("hi").await.unwrap(), "Hello world");
}

#[tokio::test]
async fn auth_failure_surfaces_as_remote_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
            "error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}
        })))
        .mount(&server)
        .await;

    let (config, _file) = load_config(&server.uri(), "");
    let mut cache = gemini_cache(&config);
    let client = cache
        .get_or_create(&SecretString::from("bad-key".to_string()))
        .unwrap();
    let mut chat = ChatSession::new(client);

    let err = chat.submit("hello").await.unwrap_err();
    assert!(err.is_remote());
    assert!(err.to_string().contains("API key not valid"));
    assert_eq!(chat.transcript().len(), 1);
}

#[test]
fn same_key_reuses_runtime() {
    let (config, _file) = load_config("http://localhost:1", "");
    let mut cache = gemini_cache(&config);

    let a = cache.get_or_create(&SecretString::from("k1".to_string())).unwrap();
    let b = cache.get_or_create(&SecretString::from("k1".to_string())).unwrap();
    let c = cache.get_or_create(&SecretString::from("k2".to_string())).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert!(!Arc::ptr_eq(&a, &c));
    assert!(Arc::ptr_eq(a.runtime(), b.runtime()));
    assert_eq!(a.app_name(), "parley");
}

#[tokio::test]
async fn harness_drives_multi_turn_chat() {
    let mut harness = TestHarness::builder()
        .with_turns(vec![
            MockTurn::Events(vec![final_text_event(&["one"])]),
            MockTurn::Events(vec![final_text_event(&["two"])]),
        ])
        .build();

    assert_eq!(harness.send_message("first").await.unwrap(), "one");
    assert_eq!(harness.send_message("second").await.unwrap(), "two");
    assert_eq!(harness.transcript().len(), 4);
    assert_eq!(harness.runtime.create_calls(), 1);
}
