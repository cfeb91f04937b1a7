//! World-space instance tables for unit meshes.
//!
//! Grid cells map onto the ground plane (x, z) with a fixed pitch per unit
//! kind; stack height runs along +y.

use glam::Vec3;
use wealthpile_growth::UnitKind;
use wealthpile_layout::{grid_position_for_pile_index, placements_from, GridCoord};

use crate::error::Result;

/// Physical size of one unit in scene units (1 unit = 10 cm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl UnitDimensions {
    /// A strap of one hundred banknotes.
    pub const BRICK: Self = Self {
        width: 1.56,
        height: 0.11,
        depth: 0.66,
    };

    /// A one-cent coin.
    pub const PENNY: Self = Self {
        width: 0.19,
        height: 0.0152,
        depth: 0.19,
    };

    /// Dimensions for a unit kind.
    pub fn for_kind(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Brick => Self::BRICK,
            UnitKind::Penny => Self::PENNY,
        }
    }

    /// Distance between neighbouring pile centres.
    pub fn pitch(&self) -> f32 {
        self.width.max(self.depth) * 1.25
    }
}

/// Centre of the unit at `height_index` in the pile on `coord`.
#[inline]
pub fn grid_to_world(coord: GridCoord, height_index: u32, dims: UnitDimensions) -> Vec3 {
    let pitch = dims.pitch();
    Vec3::new(
        coord.x as f32 * pitch,
        (height_index as f32 + 0.5) * dims.height,
        coord.z as f32 * pitch,
    )
}

/// GPU instance data for a single unit.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable, serde::Serialize)]
pub struct UnitInstance {
    /// World position (x, y, z)
    pub position: [f32; 3],
    /// 1 for the unit playing its arrival animation, else 0
    pub arriving: u32,
}

impl UnitInstance {
    /// Whether this unit gets the arrival treatment.
    pub fn is_arriving(&self) -> bool {
        self.arriving != 0
    }
}

/// Instance table for units `start..total_units`, in accrual order.
///
/// `start = 0` yields the whole scene; a renderer that already holds `start`
/// instances asks only for the newcomers.
pub fn unit_instances_from(
    start: u64,
    total_units: u64,
    pile_capacity: u32,
    kind: UnitKind,
) -> Result<Vec<UnitInstance>> {
    let dims = UnitDimensions::for_kind(kind);
    let mut pile = None;
    let instances = placements_from(start, total_units, pile_capacity)?
        .map(|p| {
            let coord = match pile {
                Some((index, coord)) if index == p.pile_index => coord,
                _ => {
                    let coord = grid_position_for_pile_index(p.pile_index);
                    pile = Some((p.pile_index, coord));
                    coord
                }
            };
            UnitInstance {
                position: grid_to_world(coord, p.height_index, dims).to_array(),
                arriving: u32::from(p.arriving),
            }
        })
        .collect();
    Ok(instances)
}

/// Vertical field of view assumed when framing the scene.
pub const FRAMING_FOV: f32 = std::f32::consts::FRAC_PI_4;

const MIN_CAMERA_DISTANCE: f32 = 3.0;
const FRAMING_MARGIN: f32 = 1.3;

/// Viewing distance that keeps a `grid_size` x `grid_size` patch in frame.
///
/// `grid_size` is a hint (`ceil(sqrt(piles))`), not an exact extent.
pub fn camera_distance(grid_size: u64, dims: UnitDimensions) -> f32 {
    let extent = grid_size.max(1) as f32 * dims.pitch();
    let distance = (extent * 0.5 * FRAMING_MARGIN) / (FRAMING_FOV * 0.5).tan();
    distance.max(MIN_CAMERA_DISTANCE)
}

/// Camera eye `distance` away from the origin, looking down on the piles.
pub fn camera_eye(distance: f32) -> Vec3 {
    Vec3::new(0.5, 1.0, 1.0).normalize() * distance
}
