//! Wire and cache records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wealthpile_growth::{WealthProfile, BILLIONAIRE_ID};

/// A billionaire's net worth as stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillionaireRecord {
    pub id: String,
    pub name: String,
    /// Dollars
    pub net_worth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
    pub source: String,
    pub last_updated: DateTime<Utc>,
}

impl BillionaireRecord {
    /// Built-in estimate used when the cache has nothing.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        let profile = WealthProfile::billionaire_fallback();
        Self {
            id: profile.id,
            name: profile.name,
            net_worth: profile.starting_wealth,
            rank: Some(1),
            source: "estimate".to_string(),
            last_updated: now,
        }
    }

    /// Profile for the growth model. Only the billionaire has a live source.
    pub fn to_profile(&self, is_live_data: bool) -> WealthProfile {
        let mut profile = if self.id == BILLIONAIRE_ID {
            WealthProfile::billionaire_live(self.name.clone(), self.net_worth)
        } else {
            WealthProfile {
                id: self.id.clone(),
                name: self.name.clone(),
                starting_wealth: self.net_worth,
                ..WealthProfile::billionaire_fallback()
            }
        };
        profile.is_live_data = is_live_data;
        profile
    }
}

/// Everything stored under the `wealth:billionaires` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillionairesSnapshot {
    pub elon_musk: BillionaireRecord,
    pub updated_at: DateTime<Utc>,
}

impl BillionairesSnapshot {
    /// Snapshot wrapping a single fresh record.
    pub fn new(elon_musk: BillionaireRecord) -> Self {
        let updated_at = elon_musk.last_updated;
        Self {
            elon_musk,
            updated_at,
        }
    }

    /// Built-in estimates.
    pub fn fallback(now: DateTime<Utc>) -> Self {
        Self::new(BillionaireRecord::fallback(now))
    }
}

/// Where a served figure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Fallback,
}

impl DataSource {
    /// Whether the figure came from a live fetch.
    pub fn is_live(&self) -> bool {
        matches!(self, DataSource::Cache)
    }
}

/// Body of `GET /api/wealth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WealthResponse {
    pub success: bool,
    pub source: DataSource,
    pub data: BillionairesSnapshot,
}
