//! Per-frame growth computation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::WealthProfile;
use crate::MS_PER_DAY;

/// Growth of one profile at one instant. Derived afresh every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthState {
    pub elapsed_ms: u64,
    pub growth_amount: f64,
    pub display_wealth: f64,
    /// Whole units accrued since the epoch
    pub growth_units: u64,
}

/// Growth of `profile` after `elapsed_ms` milliseconds.
///
/// Linear in `elapsed_ms` and therefore monotonically non-decreasing.
pub fn compute_growth(profile: &WealthProfile, elapsed_ms: u64) -> Result<GrowthState> {
    profile.validate()?;

    let growth_amount = elapsed_ms as f64 * (profile.daily_increase / MS_PER_DAY);
    let growth_units = calculate_units(growth_amount, profile.brick_value)?;

    Ok(GrowthState {
        elapsed_ms,
        growth_amount,
        display_wealth: profile.starting_wealth + growth_amount,
        growth_units,
    })
}

/// Whole units of `unit_value` contained in `wealth`.
///
/// Floors: a unit only counts once its full value has accrued.
pub fn calculate_units(wealth: f64, unit_value: f64) -> Result<u64> {
    if !(unit_value.is_finite() && unit_value > 0.0) {
        return Err(Error::InvalidUnitValue(unit_value));
    }
    if !(wealth > 0.0) {
        return Ok(0);
    }
    Ok((wealth / unit_value).floor() as u64)
}
