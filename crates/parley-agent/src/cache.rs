// SPDX-FileCopyrightText: 2026 Parley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential-keyed cache of agent clients.
//!
//! Building a client wires an agent identity, an HTTP client and a session
//! registry, so the UI builds one per distinct credential and reuses it.
//! Entries are keyed by the SHA-256 digest of the credential; the raw
//! secret is never stored as a map key.

use std::collections::HashMap;
use std::sync::Arc;

use parley_core::error::ParleyError;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::client::AgentClient;

/// Builds a client for a credential on a cache miss.
pub type ClientFactory =
    Box<dyn Fn(&SecretString) -> Result<AgentClient, ParleyError> + Send + Sync>;

/// Explicit credential -> client map owned by the UI layer.
pub struct ClientCache {
    factory: ClientFactory,
    clients: HashMap<String, Arc<AgentClient>>,
}

impl ClientCache {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&SecretString) -> Result<AgentClient, ParleyError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            clients: HashMap::new(),
        }
    }

    /// Returns the client for `credential`, building it on first use.
    ///
    /// A factory error is returned as-is and nothing is cached.
    pub fn get_or_create(
        &mut self,
        credential: &SecretString,
    ) -> Result<Arc<AgentClient>, ParleyError> {
        let key = credential_digest(credential);
        if let Some(client) = self.clients.get(&key) {
            debug!("agent client cache hit");
            return Ok(Arc::clone(client));
        }

        let client = Arc::new((self.factory)(credential)?);
        info!(
            app_name = client.app_name(),
            cached = self.clients.len() + 1,
            "agent client constructed"
        );
        self.clients.insert(key, Arc::clone(&client));
        Ok(client)
    }

    pub fn contains(&self, credential: &SecretString) -> bool {
        self.clients.contains_key(&credential_digest(credential))
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl std::fmt::Debug for ClientCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCache")
            .field("clients", &self.clients.len())
            .finish()
    }
}

fn credential_digest(credential: &SecretString) -> String {
    hex::encode(Sha256::digest(credential.expose_secret().as_bytes()))
}
