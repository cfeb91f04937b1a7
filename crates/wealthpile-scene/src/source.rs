//! Profile acquisition from the wealth service.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use wealthpile_api::WealthResponse;
use wealthpile_growth::{WealthProfile, BILLIONAIRE_ID};

use crate::config::SceneConfig;
use crate::driver::ProfileSwapper;
use crate::error::{Error, Result};

/// Client for `GET /api/wealth` that never fails past its boundary.
#[derive(Debug, Clone)]
pub struct WealthSource {
    client: reqwest::Client,
    api_url: Option<String>,
}

impl WealthSource {
    /// Source querying the service at `api_url`, or built-ins only when `None`.
    pub fn new(api_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_url: api_url.map(|url| url.trim_end_matches('/').to_string()),
        })
    }

    pub fn from_config(config: &SceneConfig) -> Result<Self> {
        Self::new(config.api_url.clone(), config.request_timeout)
    }

    /// Current profile for `id`.
    ///
    /// Any failure to reach or understand the service yields the built-in
    /// profile with `is_live_data` unset. `None` only for ids with no
    /// built-in profile. The household has no remote source.
    pub async fn fetch_current_wealth(&self, id: &str) -> Option<WealthProfile> {
        let fallback = WealthProfile::builtin(id)?;
        if id != BILLIONAIRE_ID {
            return Some(fallback);
        }
        let Some(base) = self.api_url.as_deref() else {
            return Some(fallback);
        };

        match self.query(base).await {
            Ok(response) => {
                let profile = response.data.elon_musk.to_profile(response.source.is_live());
                tracing::info!(
                    source = ?response.source,
                    net_worth = profile.starting_wealth,
                    "Fetched wealth for {}",
                    id
                );
                Some(profile)
            }
            Err(e) => {
                tracing::warn!("Using built-in wealth for {}: {}", id, e);
                Some(fallback)
            }
        }
    }

    async fn query(&self, base: &str) -> Result<WealthResponse> {
        let response = self
            .client
            .get(format!("{}/api/wealth", base))
            .send()
            .await?
            .error_for_status()?;
        let body: WealthResponse = response.json().await?;
        if !body.success {
            return Err(Error::Fetch("service reported failure".to_string()));
        }
        Ok(body)
    }
}

/// Fetch `id` in the background and swap it into a running driver.
///
/// With `every` set the fetch repeats on that period, so a service that was
/// down at startup or a cache refreshed later is picked up; an unchanged
/// profile does not restart growth. Resolves to whether the last fetched
/// profile was delivered. The loop only ends when the driver has stopped (the
/// late result is dropped) or `id` has no profile at all, so it resolves to
/// false in both cases.
pub fn spawn_refresh(
    source: WealthSource,
    id: String,
    swapper: ProfileSwapper,
    every: Option<Duration>,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let mut ticker = every.map(|period| {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        });

        loop {
            if let Some(ticker) = ticker.as_mut() {
                ticker.tick().await;
            }
            let Some(profile) = source.fetch_current_wealth(&id).await else {
                return false;
            };
            if !swapper.swap(profile).await {
                tracing::debug!("Discarding wealth for {}: scene torn down", id);
                return false;
            }
            if ticker.is_none() {
                return true;
            }
        }
    })
}
