//! Frame loop.
//!
//! A [`FrameDriver`] owns one [`Session`] and ticks it on a fixed interval,
//! handing each frame to a [`FrameSink`]. Profile swaps and shutdown arrive
//! over channels, so nothing outside the driver task touches session state.
//! Once the driver stops, its swap channel is closed and late swaps are
//! reported as discarded.

use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use wealthpile_growth::WealthProfile;

use crate::frame::SceneFrame;
use crate::session::Session;

const SWAP_QUEUE: usize = 8;

/// Current time on the runtime clock.
///
/// Follows tokio's clock so paused-time tests see consistent elapsed values.
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

/// Destination for rendered frames.
pub trait FrameSink: Send + 'static {
    /// Deliver a frame. Returning false stops the driver.
    fn publish(&mut self, frame: SceneFrame) -> bool;
}

impl FrameSink for watch::Sender<Option<SceneFrame>> {
    fn publish(&mut self, frame: SceneFrame) -> bool {
        self.send(Some(frame)).is_ok()
    }
}

impl FrameSink for mpsc::UnboundedSender<SceneFrame> {
    fn publish(&mut self, frame: SceneFrame) -> bool {
        self.send(frame).is_ok()
    }
}

/// Drives one session at a fixed frame rate.
pub struct FrameDriver<S> {
    session: Session,
    sink: S,
    interval: Duration,
}

impl<S: FrameSink> FrameDriver<S> {
    pub fn new(session: Session, sink: S, interval: Duration) -> Self {
        Self {
            session,
            sink,
            interval,
        }
    }

    /// Start the frame loop on the runtime.
    pub fn spawn(self) -> DriverHandle {
        let (swap_tx, swap_rx) = mpsc::channel(SWAP_QUEUE);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(swap_rx, shutdown_rx));
        DriverHandle {
            swapper: ProfileSwapper { tx: swap_tx },
            shutdown: shutdown_tx,
            task,
        }
    }

    async fn run(
        mut self,
        mut swaps: mpsc::Receiver<WealthProfile>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        let profile_id = self.session.profile().id.clone();
        tracing::debug!(profile = %profile_id, "Frame driver started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.changed() => break,

                Some(profile) = swaps.recv() => {
                    match self.session.swap(profile, now()) {
                        Ok(true) => tracing::info!(profile = %profile_id, "Profile swapped, growth restarted"),
                        Ok(false) => tracing::debug!(profile = %profile_id, "Profile unchanged"),
                        Err(e) => tracing::warn!(profile = %profile_id, "Rejected profile swap: {}", e),
                    }
                }

                _ = ticker.tick() => {
                    let frame = match self.session.tick(now()) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::error!(profile = %profile_id, "Frame failed: {}", e);
                            break;
                        }
                    };
                    if !self.sink.publish(frame) {
                        tracing::debug!(profile = %profile_id, "Frame sink closed");
                        break;
                    }
                }
            }
        }

        tracing::debug!(profile = %profile_id, "Frame driver stopped");
    }
}

/// Sends replacement profiles to a running driver.
#[derive(Debug, Clone)]
pub struct ProfileSwapper {
    tx: mpsc::Sender<WealthProfile>,
}

impl ProfileSwapper {
    /// Queue a swap. False when the driver has already stopped.
    pub async fn swap(&self, profile: WealthProfile) -> bool {
        self.tx.send(profile).await.is_ok()
    }
}

/// Control handle for a spawned driver.
pub struct DriverHandle {
    swapper: ProfileSwapper,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl DriverHandle {
    pub fn swapper(&self) -> ProfileSwapper {
        self.swapper.clone()
    }

    /// Whether the frame loop has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the frame loop and wait for it to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(e) = self.task.await {
            tracing::warn!("Frame driver task failed: {}", e);
        }
    }
}
