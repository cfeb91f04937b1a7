//! Per-frame scene snapshot.

use serde::{Deserialize, Serialize};
use wealthpile_growth::{GrowthState, WealthProfile};
use wealthpile_layout::{
    grid_size_hint, pile_count_for, pile_info, unit_placement, PileIndex, PileInfo, UnitPlacement,
};

use crate::error::Result;
use crate::instances::{camera_distance, unit_instances_from, UnitDimensions, UnitInstance};

/// Everything a renderer needs to draw one profile at one instant.
///
/// Size is independent of how many units have accrued: piles are described by
/// their count and the one currently filling. Full instance tables are
/// derived on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    /// Frame counter, restarted when the profile is swapped
    pub frame: u64,
    pub profile: WealthProfile,
    pub growth: GrowthState,
    pub pile_capacity: u32,
    pub pile_count: u64,
    /// Last pile in use, the only one that can be partial
    pub current_pile: Option<PileInfo>,
    /// The unit playing its arrival animation
    pub arriving: Option<UnitPlacement>,
    pub grid_size: u64,
    pub camera_distance: f32,
}

impl SceneFrame {
    /// Assemble a frame for `growth.growth_units` units.
    pub fn new(
        frame: u64,
        profile: &WealthProfile,
        growth: GrowthState,
        pile_capacity: u32,
    ) -> Result<Self> {
        let units = growth.growth_units;
        let pile_count = pile_count_for(units, pile_capacity)?;

        let arriving = match units.checked_sub(1) {
            Some(last) => unit_placement(last, units, pile_capacity)?,
            None => None,
        };
        let current_pile = match pile_count.checked_sub(1) {
            Some(last) => pile_info(PileIndex(last), units, pile_capacity)?,
            None => None,
        };

        let grid_size = grid_size_hint(pile_count);
        let dims = UnitDimensions::for_kind(profile.unit_kind);
        Ok(Self {
            frame,
            profile: profile.clone(),
            growth,
            pile_capacity,
            pile_count,
            current_pile,
            arriving,
            grid_size,
            camera_distance: camera_distance(grid_size, dims),
        })
    }

    /// Whole units on screen.
    pub fn unit_count(&self) -> u64 {
        self.growth.growth_units
    }

    /// Whether an "estimated data" indicator should be shown.
    pub fn is_estimated(&self) -> bool {
        !self.profile.is_live_data
    }

    /// Per-unit instance table for this frame.
    pub fn instances(&self) -> Result<Vec<UnitInstance>> {
        self.instances_from(0)
    }

    /// Instances for units accrued from `start` onwards.
    pub fn instances_from(&self, start: u64) -> Result<Vec<UnitInstance>> {
        unit_instances_from(
            start,
            self.unit_count(),
            self.pile_capacity,
            self.profile.unit_kind,
        )
    }
}
