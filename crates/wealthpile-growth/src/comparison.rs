//! Billionaire versus household accrual.

use serde::{Deserialize, Serialize};

use crate::profile::WealthProfile;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// How two accrual rates relate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    /// `billionaire.daily_increase / household.daily_increase`
    pub daily_ratio: f64,
    /// Days the household needs to earn one second of billionaire growth
    pub household_days_per_billionaire_second: f64,
}

impl Comparison {
    /// Compare two profiles. `None` when the household does not grow at all.
    pub fn between(billionaire: &WealthProfile, household: &WealthProfile) -> Option<Self> {
        if !(household.daily_increase > 0.0) {
            return None;
        }

        let per_second = billionaire.daily_increase / SECONDS_PER_DAY;
        Some(Self {
            daily_ratio: billionaire.daily_increase / household.daily_increase,
            household_days_per_billionaire_second: per_second / household.daily_increase,
        })
    }
}
