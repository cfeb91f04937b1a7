//! Key-value backends with per-entry expiry.

use crate::config::KvSettings;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// A string key-value store whose entries expire.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Value under `key`, `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key` for `ttl`.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process store. Used for local runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    /// True when no live entries remain.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

/// Redis spoken over its REST gateway (`/get/{key}`, `/set/{key}?EX=secs`).
pub struct RestStore {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RestReply {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RestStore {
    /// Create a client for the configured endpoint.
    pub fn new(settings: &KvSettings, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: settings.url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn reply(response: reqwest::Response) -> Result<RestReply> {
        let reply: RestReply = response.error_for_status()?.json().await?;
        match reply.error {
            Some(error) => Err(Error::RemoteFetchFailed(error)),
            None => Ok(reply),
        }
    }
}

#[async_trait]
impl KvStore for RestStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let request = self.client.get(format!("{}/get/{}", self.url, key));
        let reply = Self::reply(self.authorize(request).send().await?).await?;

        Ok(match reply.result {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(value)) => Some(value),
            Some(other) => Some(other.to_string()),
        })
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let request = self
            .client
            .post(format!("{}/set/{}", self.url, key))
            .query(&[("EX", ttl.as_secs())])
            .body(value.to_string());
        Self::reply(self.authorize(request).send().await?).await?;
        Ok(())
    }
}
