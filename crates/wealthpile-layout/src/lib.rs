//! Wealthpile Layout
//!
//! Deterministic placement of discrete wealth units (bricks, pennies) in 3D.
//!
//! # Grid
//!
//! Piles live on an integer (x, z) grid. Pile `n` is assigned the cell reached
//! after `n` steps of a square spiral walk that starts at the origin, heads
//! towards +x and turns counter-clockwise, with segment lengths 1, 1, 2, 2,
//! 3, 3, ... Ring `k` (cells at Chebyshev distance `k`) holds `8k` piles and
//! completely surrounds ring `k - 1`.
//!
//! # Append stability
//!
//! A pile's cell depends only on its own index. Adding units never relocates
//! earlier piles, so a renderer can keep existing instances in place and only
//! animate the newcomer.
//!
//! # Piles
//!
//! Units fill piles strictly in order, `pile_capacity` at a time. Within a pile
//! unit `i` sits at height index `i`.

mod error;
mod grid;
mod pile;
mod spiral;

pub use error::{Error, Result};
pub use grid::GridCoord;
pub use pile::{
    grid_size_hint, layout_units, pile_count_for, pile_info, placements_from, unit_placement, Layout,
    PileInfo, UnitPlacement,
};
pub use spiral::{
    coord_to_pile_index, grid_position_for_pile_index, slots_in_ring, total_slots_through,
    PileIndex, SpiralWalk,
};

/// Units a pile holds before the next pile is started.
pub const DEFAULT_PILE_CAPACITY: u32 = 20;
