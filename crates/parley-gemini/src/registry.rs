// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process session registry.
//!
//! Holds the conversation history of every session created on the runtime,
//! keyed by (app name, user id, session id). Nothing is persisted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parley_core::types::{Content, SessionId};
use parley_core::ParleyError;
use tokio::sync::Mutex;

/// Registry key for one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub app_name: String,
    pub user_id: String,
    pub session_id: SessionId,
}

impl SessionKey {
    pub fn new(app_name: &str, user_id: &str, session_id: &SessionId) -> Self {
        Self {
            app_name: app_name.to_string(),
            user_id: user_id.to_string(),
            session_id: session_id.clone(),
        }
    }
}

/// Stored state of one session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub history: Vec<Content>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Session registry backed by a `HashMap` behind a tokio mutex.
#[derive(Debug, Default)]
pub struct InMemorySessionRegistry {
    sessions: Mutex<HashMap<SessionKey, SessionRecord>>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session. Fails if the key is already registered.
    pub async fn create(&self, key: SessionKey) -> Result<(), ParleyError> {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(&key) {
            return Err(ParleyError::RemoteService {
                message: format!("session already exists: {}", key.session_id),
                source: None,
            });
        }
        let now = Utc::now();
        sessions.insert(
            key,
            SessionRecord {
                history: Vec::new(),
                created_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    /// Returns a copy of the session's history. Fails if the session is unknown.
    pub async fn history(&self, key: &SessionKey) -> Result<Vec<Content>, ParleyError> {
        self.sessions
            .lock()
            .await
            .get(key)
            .map(|record| record.history.clone())
            .ok_or_else(|| not_found(key))
    }

    /// Appends contents to the session's history, in order.
    pub async fn append(
        &self,
        key: &SessionKey,
        contents: impl IntoIterator<Item = Content>,
    ) -> Result<(), ParleyError> {
        let mut sessions = self.sessions.lock().await;
        let record = sessions.get_mut(key).ok_or_else(|| not_found(key))?;
        record.history.extend(contents);
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Returns true if the session is registered.
    pub async fn contains(&self, key: &SessionKey) -> bool {
        self.sessions.lock().await.contains_key(key)
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found(key: &SessionKey) -> ParleyError {
    ParleyError::RemoteService {
        message: format!(
            "session not found: app={} user={} session={}",
            key.app_name, key.user_id, key.session_id
        ),
        source: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SessionKey {
        SessionKey::new("app", "user", &SessionId("s-1".into()))
    }

    #[tokio::test]
    async fn create_then_append_and_read() {
        let registry = InMemorySessionRegistry::new();
        registry.create(key()).await.unwrap();
        assert!(registry.contains(&key()).await);

        registry
            .append(&key(), [Content::user_text("hi"), Content::model_text("hello")])
            .await
            .unwrap();
        let history = registry.history(&key()).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, "user");
        assert_eq!(history[1].text(), "hello");
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let registry = InMemorySessionRegistry::new();
        registry.create(key()).await.unwrap();
        let err = registry.create(key()).await.unwrap_err();
        assert!(err.to_string().contains("already exists"));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let registry = InMemorySessionRegistry::new();
        assert!(registry.is_empty().await);
        let err = registry.history(&key()).await.unwrap_err();
        assert!(err.to_string().contains("session not found"));
        assert!(registry.append(&key(), Vec::<Content>::new()).await.is_err());
    }

    #[tokio::test]
    async fn keys_are_scoped_by_user() {
        let registry = InMemorySessionRegistry::new();
        registry.create(key()).await.unwrap();
        let other = SessionKey::new("app", "someone-else", &SessionId("s-1".into()));
        assert!(!registry.contains(&other).await);
        registry.create(other).await.unwrap();
        assert_eq!(registry.len().await, 2);
    }
}
