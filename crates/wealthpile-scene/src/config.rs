//! Scene driver configuration.

use crate::error::{Error, Result};
use std::net::SocketAddr;
use std::time::Duration;
use wealthpile_layout::DEFAULT_PILE_CAPACITY;

const DEFAULT_SCENE_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_FPS: u32 = 60;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Configuration for the scene server.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    /// HTTP listen address
    pub scene_addr: SocketAddr,

    /// Base URL of the wealth service; built-in profiles only when absent
    pub api_url: Option<String>,

    /// Frames per second
    pub fps: u32,

    /// Units per pile
    pub pile_capacity: u32,

    /// Timeout for wealth service requests
    pub request_timeout: Duration,

    /// How often profiles are refetched from the wealth service
    pub refresh_interval: Duration,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            scene_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_url: None,
            fps: DEFAULT_FPS,
            pile_capacity: DEFAULT_PILE_CAPACITY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl SceneConfig {
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

        let scene_addr = var("WEALTHPILE_SCENE_ADDR")
            .unwrap_or_else(|| DEFAULT_SCENE_ADDR.to_string())
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("WEALTHPILE_SCENE_ADDR: {}", e)))?;

        let positive = |name: &str| -> Result<Option<u32>> {
            match var(name) {
                Some(raw) => match raw.parse::<u32>() {
                    Ok(value) if value > 0 => Ok(Some(value)),
                    _ => Err(Error::InvalidConfig(format!("{}: {}", name, raw))),
                },
                None => Ok(None),
            }
        };

        let defaults = Self::default();
        Ok(Self {
            scene_addr,
            api_url: var("WEALTHPILE_API_URL").map(|url| url.trim_end_matches('/').to_string()),
            fps: positive("WEALTHPILE_FPS")?.unwrap_or(defaults.fps),
            pile_capacity: positive("WEALTHPILE_PILE_CAPACITY")?.unwrap_or(defaults.pile_capacity),
            request_timeout: defaults.request_timeout,
            refresh_interval: positive("WEALTHPILE_REFRESH_SECS")?
                .map(|secs| Duration::from_secs(u64::from(secs)))
                .unwrap_or(defaults.refresh_interval),
        })
    }

    /// Time between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}
