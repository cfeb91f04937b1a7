//! Wealthpile API - Wealth Data Service
//!
//! Supplies the net worth figures the scene animates and keeps them fresh.
//!
//! # Architecture
//!
//! - **Store**: key-value backends with expiry (in-memory, Redis REST gateway)
//! - **Cache**: lazily connected handle reading and writing wealth records
//! - **Upstream**: third-party billionaire API with ordered field extraction
//! - **API**: `GET /api/wealth` and the `/api/cron/update-wealth` refresh trigger
//!
//! Every read path degrades to built-in estimates: a missing cache, a miss or
//! a corrupt entry all produce a `fallback` response rather than an error.
//!
//! # Example
//!
//! ```no_run
//! use wealthpile_api::{ApiConfig, WealthServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::from_env()?;
//!     WealthServer::new(config)?.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod store;
pub mod upstream;

pub use cache::{record_key, CacheHandle, BILLIONAIRES_KEY};
pub use config::{ApiConfig, KvSettings, UpstreamSettings, CACHE_TTL};
pub use error::{Error, Result};
pub use models::{BillionaireRecord, BillionairesSnapshot, DataSource, WealthResponse};
pub use server::WealthServer;
pub use store::{KvStore, MemoryStore, RestStore};
pub use upstream::{BillionaireApi, NET_WORTH_EXTRACTORS};
