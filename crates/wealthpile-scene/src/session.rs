//! A profile bound to a display.

use std::time::Instant;

use wealthpile_growth::{GrowthEpoch, WealthProfile};
use wealthpile_layout::pile_count_for;

use crate::error::Result;
use crate::frame::SceneFrame;

/// Session state for one scene.
///
/// Holds no per-unit state, so a tick costs the same after a month of
/// accrual as after a second.
#[derive(Debug)]
pub struct Session {
    epoch: GrowthEpoch,
    pile_capacity: u32,
    frame: u64,
}

impl Session {
    /// Bind `profile` at `now`.
    pub fn new(profile: WealthProfile, pile_capacity: u32, now: Instant) -> Result<Self> {
        profile.validate()?;
        // Reject a bad capacity up front rather than on the first tick.
        pile_count_for(0, pile_capacity)?;
        Ok(Self {
            epoch: GrowthEpoch::bind(profile, now),
            pile_capacity,
            frame: 0,
        })
    }

    /// The bound profile.
    pub fn profile(&self) -> &WealthProfile {
        self.epoch.profile()
    }

    /// Replace the profile. Returns whether the epoch restarted.
    ///
    /// An invalid profile is rejected and the current one kept.
    pub fn swap(&mut self, profile: WealthProfile, now: Instant) -> Result<bool> {
        profile.validate()?;
        let reset = self.epoch.rebind(profile, now);
        if reset {
            self.frame = 0;
        }
        Ok(reset)
    }

    /// Derive the frame for `now`.
    pub fn tick(&mut self, now: Instant) -> Result<SceneFrame> {
        let growth = self.epoch.growth_at(now)?;

        let frame = SceneFrame::new(self.frame, self.epoch.profile(), growth, self.pile_capacity)?;
        self.frame += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wealthpile_growth::Error as GrowthError;
    use wealthpile_layout::Error as LayoutError;

    use crate::error::Error;

    fn dollar_per_ms() -> WealthProfile {
        let mut profile = WealthProfile::billionaire_fallback();
        profile.daily_increase = 86_400_000.0;
        profile.brick_value = 1_000.0;
        profile
    }

    #[test]
    fn first_frame_is_empty() {
        let t0 = Instant::now();
        let mut session = Session::new(dollar_per_ms(), 20, t0).unwrap();
        let frame = session.tick(t0).unwrap();

        assert_eq!(frame.frame, 0);
        assert_eq!(frame.unit_count(), 0);
        assert_eq!(frame.pile_count, 0);
        assert!(frame.arriving.is_none());
        assert!(frame.is_estimated());
    }

    #[test]
    fn units_accrue_into_piles() {
        let t0 = Instant::now();
        let mut session = Session::new(dollar_per_ms(), 20, t0).unwrap();
        let frame = session.tick(t0 + Duration::from_secs(45)).unwrap();

        assert_eq!(frame.unit_count(), 45);
        assert_eq!(frame.pile_count, 3);
        assert_eq!(frame.current_pile.map(|p| p.unit_count), Some(5));
        assert_eq!(frame.arriving.map(|a| a.unit_index), Some(44));
        assert_eq!(frame.grid_size, 2);
    }

    #[test]
    fn frames_count_up() {
        let t0 = Instant::now();
        let mut session = Session::new(dollar_per_ms(), 20, t0).unwrap();
        for expected in 0..5 {
            assert_eq!(session.tick(t0).unwrap().frame, expected);
        }
    }

    #[test]
    fn swap_restarts_growth() {
        let t0 = Instant::now();
        let mut session = Session::new(dollar_per_ms(), 20, t0).unwrap();
        let later = t0 + Duration::from_secs(10);
        assert_eq!(session.tick(later).unwrap().unit_count(), 10);

        let mut live = dollar_per_ms();
        live.starting_wealth = 450e9;
        live.is_live_data = true;
        assert!(session.swap(live, later).unwrap());

        let frame = session.tick(later).unwrap();
        assert_eq!(frame.unit_count(), 0);
        assert_eq!(frame.frame, 0);
        assert!(frame.profile.is_live_data);
        assert_eq!(frame.profile.starting_wealth, 450e9);
    }

    #[test]
    fn identical_swap_keeps_growth() {
        let t0 = Instant::now();
        let mut session = Session::new(dollar_per_ms(), 20, t0).unwrap();
        let later = t0 + Duration::from_secs(3);
        assert!(!session.swap(dollar_per_ms(), later).unwrap());
        assert_eq!(session.tick(later).unwrap().unit_count(), 3);
    }

    #[test]
    fn invalid_swap_keeps_current_profile() {
        let t0 = Instant::now();
        let mut session = Session::new(dollar_per_ms(), 20, t0).unwrap();
        let mut broken = dollar_per_ms();
        broken.brick_value = 0.0;

        let result = session.swap(broken, t0);
        assert!(matches!(
            result,
            Err(Error::Growth(GrowthError::InvalidProfile { .. }))
        ));
        assert_eq!(session.profile().brick_value, 1_000.0);
    }

    #[test]
    fn month_old_session_ticks_small_frames() {
        let t0 = Instant::now();
        let mut session = Session::new(WealthProfile::billionaire_fallback(), 20, t0).unwrap();
        let month = t0 + Duration::from_secs(30 * 24 * 60 * 60);

        let frame = session.tick(month).unwrap();
        assert_eq!(frame.unit_count(), 1_650_000);
        assert_eq!(frame.pile_count, 82_500);
        assert_eq!(frame.arriving.map(|a| a.unit_index), Some(1_649_999));

        let next = session.tick(month + Duration::from_millis(16)).unwrap();
        let bytes = serde_json::to_vec(&next).unwrap().len();
        assert!(bytes < 2_048, "frame is {} bytes", bytes);
    }

    #[test]
    fn zero_capacity_rejected() {
        let result = Session::new(dollar_per_ms(), 0, Instant::now());
        assert!(matches!(result, Err(Error::Layout(LayoutError::ZeroCapacity))));
    }
}
