//! Wealth profiles: who is being tracked and how their growth is drawn.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of the tracked billionaire.
pub const BILLIONAIRE_ID: &str = "elon-musk";

/// Identifier of the comparison household.
pub const AVERAGE_HOUSEHOLD_ID: &str = "average-household";

/// Built-in net worth estimate used when no live figure is available.
const BILLIONAIRE_FALLBACK_NET_WORTH: f64 = 420_000_000_000.0;

/// Roughly $200B a year.
const BILLIONAIRE_DAILY_INCREASE: f64 = 550_000_000.0;

/// One strap of a hundred $100 bills.
const BILLIONAIRE_BRICK_VALUE: f64 = 10_000.0;

/// Median US household net worth.
const HOUSEHOLD_NET_WORTH: f64 = 192_900.0;

/// About $7,500 a year.
const HOUSEHOLD_DAILY_INCREASE: f64 = 20.55;

const PENNY: f64 = 0.01;

/// Visual unit a profile's growth is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// A bundle of banknotes
    #[default]
    Brick,
    /// A single coin
    Penny,
}

/// One tracked entity.
///
/// `starting_wealth` is captured once when the profile is acquired. Growth is
/// always added on top of it and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthProfile {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub color: String,
    #[serde(alias = "netWorth")]
    pub starting_wealth: f64,
    /// Dollars accrued per 24 hours
    pub daily_increase: f64,
    /// Dollars represented by one visual unit
    pub brick_value: f64,
    pub is_live_data: bool,
    #[serde(default)]
    pub unit_kind: UnitKind,
}

impl WealthProfile {
    /// Static estimate for the tracked billionaire.
    pub fn billionaire_fallback() -> Self {
        Self {
            id: BILLIONAIRE_ID.to_string(),
            name: "Elon Musk".to_string(),
            emoji: "🚀".to_string(),
            color: "#22c55e".to_string(),
            starting_wealth: BILLIONAIRE_FALLBACK_NET_WORTH,
            daily_increase: BILLIONAIRE_DAILY_INCREASE,
            brick_value: BILLIONAIRE_BRICK_VALUE,
            is_live_data: false,
            unit_kind: UnitKind::Brick,
        }
    }

    /// Billionaire profile built from a fetched net worth figure.
    pub fn billionaire_live(name: impl Into<String>, net_worth: f64) -> Self {
        Self {
            name: name.into(),
            starting_wealth: net_worth,
            is_live_data: true,
            ..Self::billionaire_fallback()
        }
    }

    /// The comparison household, drawn in pennies.
    pub fn average_household() -> Self {
        Self {
            id: AVERAGE_HOUSEHOLD_ID.to_string(),
            name: "Average Household".to_string(),
            emoji: "🏠".to_string(),
            color: "#f59e0b".to_string(),
            starting_wealth: HOUSEHOLD_NET_WORTH,
            daily_increase: HOUSEHOLD_DAILY_INCREASE,
            brick_value: PENNY,
            is_live_data: false,
            unit_kind: UnitKind::Penny,
        }
    }

    /// Built-in profile for an id, if one exists.
    pub fn builtin(id: &str) -> Option<Self> {
        match id {
            BILLIONAIRE_ID => Some(Self::billionaire_fallback()),
            AVERAGE_HOUSEHOLD_ID => Some(Self::average_household()),
            _ => None,
        }
    }

    /// Check the profile can drive a growth computation.
    pub fn validate(&self) -> Result<()> {
        let reason = if !(self.brick_value.is_finite() && self.brick_value > 0.0) {
            "brick value must be positive"
        } else if !(self.daily_increase.is_finite() && self.daily_increase >= 0.0) {
            "daily increase must be non-negative"
        } else if !self.starting_wealth.is_finite() {
            "starting wealth must be finite"
        } else {
            return Ok(());
        };

        Err(Error::InvalidProfile {
            id: self.id.clone(),
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid() {
        assert!(WealthProfile::billionaire_fallback().validate().is_ok());
        assert!(WealthProfile::average_household().validate().is_ok());
    }

    #[test]
    fn builtin_lookup() {
        assert_eq!(
            WealthProfile::builtin(BILLIONAIRE_ID).map(|p| p.unit_kind),
            Some(UnitKind::Brick)
        );
        assert_eq!(
            WealthProfile::builtin(AVERAGE_HOUSEHOLD_ID).map(|p| p.unit_kind),
            Some(UnitKind::Penny)
        );
        assert!(WealthProfile::builtin("nobody").is_none());
    }

    #[test]
    fn live_profile_keeps_growth_parameters() {
        let live = WealthProfile::billionaire_live("Elon Musk", 500e9);
        let fallback = WealthProfile::billionaire_fallback();
        assert!(live.is_live_data);
        assert_eq!(live.starting_wealth, 500e9);
        assert_eq!(live.daily_increase, fallback.daily_increase);
        assert_eq!(live.brick_value, fallback.brick_value);
    }

    #[test]
    fn zero_brick_value_is_invalid() {
        let mut profile = WealthProfile::average_household();
        profile.brick_value = 0.0;
        assert!(matches!(
            profile.validate(),
            Err(Error::InvalidProfile { .. })
        ));
    }

    #[test]
    fn negative_daily_increase_is_invalid() {
        let mut profile = WealthProfile::average_household();
        profile.daily_increase = -1.0;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn accepts_net_worth_alias() {
        let json = r#"{
            "id": "x", "name": "X", "emoji": "", "color": "",
            "netWorth": 1000.0, "dailyIncrease": 1.0, "brickValue": 1.0,
            "isLiveData": true
        }"#;
        let profile: WealthProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.starting_wealth, 1000.0);
        assert_eq!(profile.unit_kind, UnitKind::Brick);
    }
}
