//! Cached wealth figures.
//!
//! The store client is owned by whoever builds the `CacheHandle` and is
//! created on first use, so a service without cache settings starts fine and
//! simply serves fallback figures.

use crate::config::{ApiConfig, KvSettings};
use crate::error::{Error, Result};
use crate::models::{BillionaireRecord, BillionairesSnapshot};
use crate::store::{KvStore, RestStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Key holding the full [`BillionairesSnapshot`].
pub const BILLIONAIRES_KEY: &str = "wealth:billionaires";

/// Key holding a single record.
pub fn record_key(id: &str) -> String {
    format!("wealth:{}", id)
}

/// Lazily connected handle to the wealth cache.
pub struct CacheHandle {
    settings: Option<KvSettings>,
    ttl: Duration,
    timeout: Duration,
    store: OnceCell<Option<Arc<dyn KvStore>>>,
}

impl CacheHandle {
    /// Handle that connects to the configured store on first use.
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            settings: config.kv.clone(),
            ttl: config.cache_ttl,
            timeout: config.request_timeout,
            store: OnceCell::new(),
        }
    }

    /// Handle over an already constructed store.
    pub fn with_store(store: Arc<dyn KvStore>, ttl: Duration) -> Self {
        Self {
            settings: None,
            ttl,
            timeout: Duration::ZERO,
            store: OnceCell::new_with(Some(Some(store))),
        }
    }

    /// Handle with no backing store; every read misses.
    pub fn unconfigured() -> Self {
        Self {
            settings: None,
            ttl: crate::config::CACHE_TTL,
            timeout: Duration::ZERO,
            store: OnceCell::new(),
        }
    }

    async fn store(&self) -> Result<Arc<dyn KvStore>> {
        let store = self
            .store
            .get_or_init(|| async {
                let Some(settings) = &self.settings else {
                    tracing::warn!("KV_REST_API_URL not set; serving fallback wealth figures");
                    return None;
                };
                match RestStore::new(settings, self.timeout) {
                    Ok(store) => {
                        tracing::info!("Connected cache client to {}", settings.url);
                        Some(Arc::new(store) as Arc<dyn KvStore>)
                    }
                    Err(e) => {
                        tracing::error!("Cache client setup failed: {}", e);
                        None
                    }
                }
            })
            .await;

        store
            .clone()
            .ok_or(Error::ConfigurationMissing("KV_REST_API_URL"))
    }

    async fn try_read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let store = self.store().await?;
        match store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.try_read_json(key).await {
            Ok(value) => value,
            Err(Error::ConfigurationMissing(_)) => None,
            Err(e) => {
                tracing::warn!("Cache read of {} failed: {}", key, e);
                None
            }
        }
    }

    /// Cached snapshot, `None` on miss or any cache failure.
    pub async fn read_billionaires(&self) -> Option<BillionairesSnapshot> {
        self.read_json(BILLIONAIRES_KEY).await
    }

    /// Cached record for one id, `None` on miss or any cache failure.
    pub async fn fetch_current_wealth(&self, id: &str) -> Option<BillionaireRecord> {
        self.read_json(&record_key(id)).await
    }

    /// Write a fresh record under both keys.
    pub async fn write_billionaire(&self, record: BillionaireRecord) -> Result<BillionairesSnapshot> {
        let store = self.store().await?;
        let snapshot = BillionairesSnapshot::new(record);

        store
            .set_ex(BILLIONAIRES_KEY, &serde_json::to_string(&snapshot)?, self.ttl)
            .await?;
        store
            .set_ex(
                &record_key(&snapshot.elon_musk.id),
                &serde_json::to_string(&snapshot.elon_musk)?,
                self.ttl,
            )
            .await?;

        tracing::info!(
            "Cached net worth {} for {}",
            snapshot.elon_musk.net_worth,
            snapshot.elon_musk.id
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::Utc;

    const TTL: Duration = Duration::from_secs(35 * 24 * 60 * 60);

    fn record() -> BillionaireRecord {
        BillionaireRecord {
            id: "elon-musk".into(),
            name: "Elon Musk".into(),
            net_worth: 432.1e9,
            rank: Some(1),
            source: "forbes".into(),
            last_updated: Utc::now(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn write_then_read_both_keys() {
        let store = Arc::new(MemoryStore::new());
        let cache = CacheHandle::with_store(store.clone(), TTL);

        let written = cache.write_billionaire(record()).await.unwrap();
        assert_eq!(cache.read_billionaires().await, Some(written.clone()));
        assert_eq!(
            cache.fetch_current_wealth("elon-musk").await,
            Some(written.elon_musk.clone())
        );

        let raw = store.get(BILLIONAIRES_KEY).await.unwrap().unwrap();
        assert_eq!(raw, serde_json::to_string(&written).unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn reads_miss_after_expiry() {
        let cache = CacheHandle::with_store(Arc::new(MemoryStore::new()), TTL);
        cache.write_billionaire(record()).await.unwrap();

        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        assert!(cache.read_billionaires().await.is_none());
        assert!(cache.fetch_current_wealth("elon-musk").await.is_none());
    }

    #[tokio::test]
    async fn unconfigured_cache_misses() {
        let cache = CacheHandle::unconfigured();
        assert!(cache.read_billionaires().await.is_none());
        assert!(matches!(
            cache.write_billionaire(record()).await,
            Err(Error::ConfigurationMissing(_))
        ));
    }

    #[tokio::test]
    async fn garbage_in_cache_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store.set_ex(BILLIONAIRES_KEY, "not json", TTL).await.unwrap();
        let cache = CacheHandle::with_store(store, TTL);
        assert!(cache.read_billionaires().await.is_none());
    }

    #[test]
    fn record_key_format() {
        assert_eq!(record_key("elon-musk"), "wealth:elon-musk");
    }
}
