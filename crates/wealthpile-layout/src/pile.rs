//! Bucketing units into piles and piles onto the grid.

use crate::error::{Error, Result};
use crate::spiral::{grid_position_for_pile_index, PileIndex, SpiralWalk};
use crate::GridCoord;

/// Where a single unit sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UnitPlacement {
    /// Global unit index, in accrual order
    pub unit_index: u64,
    /// Pile holding the unit
    pub pile_index: PileIndex,
    /// Slot within the pile, 0 at the bottom
    pub height_index: u32,
    /// Most recently accrued unit overall
    pub arriving: bool,
}

/// Summary of one pile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PileInfo {
    pub index: PileIndex,
    pub coord: GridCoord,
    pub unit_count: u32,
    /// Global index of the bottom unit
    pub first_unit: u64,
}

/// Complete placement of a unit count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Layout {
    pub pile_capacity: u32,
    pub positions: Vec<UnitPlacement>,
    pub piles: Vec<PileInfo>,
}

impl Layout {
    /// Number of units placed.
    pub fn total_units(&self) -> u64 {
        self.positions.len() as u64
    }

    /// Number of piles in use.
    pub fn pile_count(&self) -> u64 {
        self.piles.len() as u64
    }

    /// The unit flagged for the arrival treatment, if any.
    pub fn arriving(&self) -> Option<&UnitPlacement> {
        self.positions.last().filter(|p| p.arriving)
    }

    /// Pile holding the given global unit.
    pub fn pile_for_unit(&self, unit_index: u64) -> Option<&PileInfo> {
        let placement = self.positions.get(usize::try_from(unit_index).ok()?)?;
        self.piles.get(placement.pile_index.0 as usize)
    }

    /// Side length hint for camera framing.
    pub fn grid_size_hint(&self) -> u64 {
        grid_size_hint(self.pile_count())
    }
}

/// Lay `total_units` units out in piles of `pile_capacity`.
///
/// Piles fill strictly in order and only the last one may be partial. Zero
/// units produce an empty layout.
pub fn layout_units(total_units: u64, pile_capacity: u32) -> Result<Layout> {
    if pile_capacity == 0 {
        return Err(Error::ZeroCapacity);
    }
    let unit_count = usize::try_from(total_units).map_err(|_| Error::TooLarge(total_units))?;

    let capacity = u64::from(pile_capacity);
    let pile_count = total_units.div_ceil(capacity);

    let piles: Vec<PileInfo> = SpiralWalk::take_slots(pile_count)
        .enumerate()
        .map(|(i, coord)| {
            let first_unit = i as u64 * capacity;
            let unit_count = (total_units - first_unit).min(capacity) as u32;
            PileInfo {
                index: PileIndex(i as u64),
                coord,
                unit_count,
                first_unit,
            }
        })
        .collect();

    let mut positions = Vec::with_capacity(unit_count);
    positions.extend(placements_from(0, total_units, pile_capacity)?);

    Ok(Layout {
        pile_capacity,
        positions,
        piles,
    })
}

/// Number of piles `total_units` occupies.
pub fn pile_count_for(total_units: u64, pile_capacity: u32) -> Result<u64> {
    if pile_capacity == 0 {
        return Err(Error::ZeroCapacity);
    }
    Ok(total_units.div_ceil(u64::from(pile_capacity)))
}

/// Placement of one unit out of `total_units`, without building a [`Layout`].
///
/// `None` when `unit_index` is not placed.
pub fn unit_placement(
    unit_index: u64,
    total_units: u64,
    pile_capacity: u32,
) -> Result<Option<UnitPlacement>> {
    if pile_capacity == 0 {
        return Err(Error::ZeroCapacity);
    }
    if unit_index >= total_units {
        return Ok(None);
    }
    let capacity = u64::from(pile_capacity);
    Ok(Some(UnitPlacement {
        unit_index,
        pile_index: PileIndex(unit_index / capacity),
        height_index: (unit_index % capacity) as u32,
        arriving: unit_index + 1 == total_units,
    }))
}

/// Summary of pile `index` when `total_units` are laid out.
///
/// `None` for a pile that is not in use.
pub fn pile_info(index: PileIndex, total_units: u64, pile_capacity: u32) -> Result<Option<PileInfo>> {
    if index.0 >= pile_count_for(total_units, pile_capacity)? {
        return Ok(None);
    }
    let capacity = u64::from(pile_capacity);
    let first_unit = index.0 * capacity;
    Ok(Some(PileInfo {
        index,
        coord: grid_position_for_pile_index(index),
        unit_count: (total_units - first_unit).min(capacity) as u32,
        first_unit,
    }))
}

/// Placements of units `start..total_units`.
///
/// Lets a renderer that already drew `start` units fetch only the newcomers.
pub fn placements_from(
    start: u64,
    total_units: u64,
    pile_capacity: u32,
) -> Result<impl Iterator<Item = UnitPlacement>> {
    if pile_capacity == 0 {
        return Err(Error::ZeroCapacity);
    }
    let capacity = u64::from(pile_capacity);
    Ok((start.min(total_units)..total_units).map(move |unit_index| UnitPlacement {
        unit_index,
        pile_index: PileIndex(unit_index / capacity),
        height_index: (unit_index % capacity) as u32,
        arriving: unit_index + 1 == total_units,
    }))
}

/// Approximate side length of the occupied grid: `ceil(sqrt(num_piles))`.
///
/// Only meant to scale viewing distance.
pub fn grid_size_hint(num_piles: u64) -> u64 {
    let mut side = (num_piles as f64).sqrt().ceil() as u64;
    while side.saturating_mul(side) < num_piles {
        side += 1;
    }
    while side > 0 && (side - 1) * (side - 1) >= num_piles {
        side -= 1;
    }
    side
}
