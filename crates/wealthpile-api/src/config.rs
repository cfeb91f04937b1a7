//! Service configuration.

use crate::error::{Error, Result};
use std::net::SocketAddr;
use std::time::Duration;

/// Expiry applied to cached figures. Longer than the monthly refresh cadence
/// so a late refresh never leaves the cache empty.
pub const CACHE_TTL: Duration = Duration::from_secs(35 * 24 * 60 * 60);

const DEFAULT_API_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the key-value store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvSettings {
    pub url: String,
    pub token: Option<String>,
}

/// Third-party billionaire data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamSettings {
    pub url: String,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
}

/// Configuration for the wealth data service.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HTTP listen address
    pub api_addr: SocketAddr,

    /// Cache backend, absent when not configured
    pub kv: Option<KvSettings>,

    /// Secret the refresh endpoint expects as a bearer token
    pub cron_secret: Option<String>,

    /// Billionaire data source, absent when not configured
    pub upstream: Option<UpstreamSettings>,

    /// Expiry for cached figures
    pub cache_ttl: Duration,

    /// Timeout for outbound HTTP requests
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            kv: None,
            cron_secret: None,
            upstream: None,
            cache_ttl: CACHE_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build config from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_addr = var("WEALTHPILE_API_ADDR")
            .unwrap_or_else(|| DEFAULT_API_ADDR.to_string())
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("WEALTHPILE_API_ADDR: {}", e)))?;

        let kv = var("KV_REST_API_URL").map(|url| KvSettings {
            url: url.trim_end_matches('/').to_string(),
            token: var("KV_REST_API_TOKEN"),
        });

        let upstream = var("BILLIONAIRES_API_URL").map(|url| UpstreamSettings {
            url,
            api_key: var("BILLIONAIRES_API_KEY"),
            api_host: var("BILLIONAIRES_API_HOST"),
        });

        let request_timeout = match var("WEALTHPILE_REQUEST_TIMEOUT_SECS") {
            Some(secs) => Duration::from_secs(secs.parse().map_err(|_| {
                Error::InvalidConfig(format!("WEALTHPILE_REQUEST_TIMEOUT_SECS: {}", secs))
            })?),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            api_addr,
            kv,
            cron_secret: var("CRON_SECRET"),
            upstream,
            cache_ttl: CACHE_TTL,
            request_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_addr.port(), 8080);
        assert!(config.kv.is_none());
        assert!(config.upstream.is_none());
        assert!(config.cron_secret.is_none());
        assert_eq!(config.cache_ttl, CACHE_TTL);
    }

    #[test]
    fn reads_all_settings() {
        let config = ApiConfig::from_lookup(lookup(&[
            ("WEALTHPILE_API_ADDR", "127.0.0.1:9999"),
            ("KV_REST_API_URL", "https://kv.example.com/"),
            ("KV_REST_API_TOKEN", "tok"),
            ("CRON_SECRET", "s3cret"),
            ("BILLIONAIRES_API_URL", "https://data.example.com/person"),
            ("BILLIONAIRES_API_KEY", "key"),
        ]))
        .unwrap();

        assert_eq!(config.api_addr.port(), 9999);
        let kv = config.kv.unwrap();
        assert_eq!(kv.url, "https://kv.example.com");
        assert_eq!(kv.token.as_deref(), Some("tok"));
        assert_eq!(config.cron_secret.as_deref(), Some("s3cret"));
        let upstream = config.upstream.unwrap();
        assert_eq!(upstream.api_key.as_deref(), Some("key"));
        assert!(upstream.api_host.is_none());
    }

    #[test]
    fn empty_secret_means_open_access() {
        let config = ApiConfig::from_lookup(lookup(&[("CRON_SECRET", "  ")])).unwrap();
        assert!(config.cron_secret.is_none());
    }

    #[test]
    fn bad_address_is_an_error() {
        let result = ApiConfig::from_lookup(lookup(&[("WEALTHPILE_API_ADDR", "nope")]));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn cache_ttl_is_thirty_five_days() {
        assert_eq!(CACHE_TTL.as_secs(), 3_024_000);
    }
}
