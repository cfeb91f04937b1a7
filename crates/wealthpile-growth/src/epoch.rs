//! Binding a profile to a display.

use std::time::Instant;

use crate::error::Result;
use crate::growth::{compute_growth, GrowthState};
use crate::profile::WealthProfile;

/// The moment a profile started accruing on screen.
///
/// Elapsed time never carries over from one profile to another: binding a
/// different profile restarts the clock.
#[derive(Debug, Clone)]
pub struct GrowthEpoch {
    profile: WealthProfile,
    started_at: Instant,
}

impl GrowthEpoch {
    /// Bind `profile` at `now`.
    pub fn bind(profile: WealthProfile, now: Instant) -> Self {
        Self {
            profile,
            started_at: now,
        }
    }

    /// Swap in `profile`, restarting the clock unless it is unchanged.
    ///
    /// Returns whether the epoch was reset.
    pub fn rebind(&mut self, profile: WealthProfile, now: Instant) -> bool {
        if profile == self.profile {
            return false;
        }
        *self = Self::bind(profile, now);
        true
    }

    /// The bound profile.
    pub fn profile(&self) -> &WealthProfile {
        &self.profile
    }

    /// When the profile was bound.
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Milliseconds since binding, zero if `now` precedes it.
    pub fn elapsed_ms(&self, now: Instant) -> u64 {
        now.saturating_duration_since(self.started_at).as_millis() as u64
    }

    /// Growth at `now`.
    pub fn growth_at(&self, now: Instant) -> Result<GrowthState> {
        compute_growth(&self.profile, self.elapsed_ms(now))
    }
}
