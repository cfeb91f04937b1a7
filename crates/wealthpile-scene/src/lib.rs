//! Wealthpile Scene
//!
//! Frame-driven rendering state for the billionaire and household piles.
//!
//! # Architecture
//!
//! - **Session**: binds a profile and derives a frame from the current time
//! - **Driver**: ticks a session at the display rate and publishes frames
//! - **Source**: acquires profiles from the wealth service, falling back to
//!   built-in estimates
//! - **Instances**: world-space unit tables ready for instanced drawing
//! - **Server**: REST snapshots and a WebSocket frame stream
//!
//! # Usage
//!
//! ```ignore
//! let session = Session::new(WealthProfile::billionaire_fallback(), 20, driver::now())?;
//! let (tx, rx) = tokio::sync::watch::channel(None);
//! let handle = FrameDriver::new(session, tx, Duration::from_millis(16)).spawn();
//!
//! let source = WealthSource::new(Some("http://localhost:8080".into()), timeout)?;
//! spawn_refresh(source, BILLIONAIRE_ID.into(), handle.swapper(), Some(Duration::from_secs(300)));
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod frame;
pub mod instances;
pub mod server;
pub mod session;
pub mod source;

pub use config::SceneConfig;
pub use driver::{DriverHandle, FrameDriver, FrameSink, ProfileSwapper};
pub use error::{Error, Result};
pub use frame::SceneFrame;
pub use instances::{UnitDimensions, UnitInstance};
pub use server::{FrameFeed, SceneResponse, SceneServer};
pub use session::Session;
pub use source::{spawn_refresh, WealthSource};
