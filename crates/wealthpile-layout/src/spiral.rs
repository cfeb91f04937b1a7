//! Square spiral enumeration of pile cells.
//!
//! The walk starts at the origin heading towards +x. After each segment it
//! turns 90° counter-clockwise (right, up, left, down) and every second turn
//! the segment grows by one cell, giving lengths 1, 1, 2, 2, 3, 3, ...
//!
//! # Ring structure
//!
//! - Ring 0: the origin (1 slot)
//! - Ring k > 0: every cell with `max(|x|, |z|) = k` (8k slots)
//!
//! The walk enters ring `k` at index `(2k - 1)^2`, on cell `(k, 1 - k)`, and
//! then traces four sides of `2k` cells each: up the right edge, along the top
//! towards -x, down the left edge and back along the bottom. That lets
//! `grid_position_for_pile_index` jump straight to a cell without walking,
//! while [`SpiralWalk`] performs the literal walk for sequential consumers.

use crate::GridCoord;

/// A pile's position in spiral order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PileIndex(pub u64);

impl PileIndex {
    /// The pile at the origin.
    pub const ORIGIN: Self = Self(0);

    /// Create from raw index.
    #[inline]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Determine which ring this index falls in.
    ///
    /// Ring 0: index 0
    /// Ring 1: indices 1-8
    /// Ring 2: indices 9-24
    /// Ring k: indices from (2k-1)^2 to (2k+1)^2 - 1
    pub fn ring(&self) -> u64 {
        if self.0 == 0 {
            return 0;
        }

        // Smallest k with (2k+1)^2 > index
        let mut low = 1u64;
        let mut high = ((self.0 as f64).sqrt() as u64) / 2 + 2;

        while low < high {
            let mid = (low + high) / 2;
            if total_slots_through(mid) <= self.0 {
                low = mid + 1;
            } else {
                high = mid;
            }
        }
        low
    }

    /// Offset within the ring (0 to 8k-1 for ring k > 0).
    pub fn offset_in_ring(&self) -> u64 {
        let ring = self.ring();
        if ring == 0 {
            return 0;
        }
        self.0 - total_slots_through(ring - 1)
    }
}

impl From<u64> for PileIndex {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<PileIndex> for u64 {
    fn from(value: PileIndex) -> Self {
        value.0
    }
}

/// Number of slots in ring k.
#[inline]
pub const fn slots_in_ring(ring: u64) -> u64 {
    if ring == 0 {
        1
    } else {
        8 * ring
    }
}

/// Total slots through ring k (inclusive): `(2k + 1)^2`.
#[inline]
pub const fn total_slots_through(ring: u64) -> u64 {
    let side = ring.saturating_mul(2).saturating_add(1);
    side.saturating_mul(side)
}

/// Grid cell of pile `index`.
///
/// Idempotent and independent of every other pile, so positions handed out
/// earlier never change when more piles are added.
pub fn grid_position_for_pile_index(index: PileIndex) -> GridCoord {
    if index.0 == 0 {
        return GridCoord::ORIGIN;
    }

    let ring = index.ring();
    let offset = index.offset_in_ring();
    let side_len = 2 * ring;
    let side = offset / side_len;
    let along = (offset % side_len) as i64;
    let k = ring as i64;

    match side {
        0 => GridCoord::new(k, 1 - k + along),
        1 => GridCoord::new(k - 1 - along, k),
        2 => GridCoord::new(-k, k - 1 - along),
        _ => GridCoord::new(1 - k + along, -k),
    }
}

/// Pile index that lands on `coord`. Inverse of [`grid_position_for_pile_index`].
pub fn coord_to_pile_index(coord: GridCoord) -> PileIndex {
    let ring = coord.ring();
    if ring == 0 {
        return PileIndex::ORIGIN;
    }

    let k = ring as i64;
    let (side, along) = if coord.x == k && coord.z > -k {
        (0, coord.z + k - 1)
    } else if coord.z == k && coord.x < k {
        (1, k - 1 - coord.x)
    } else if coord.x == -k && coord.z < k {
        (2, k - 1 - coord.z)
    } else {
        (3, coord.x + k - 1)
    };

    let base = total_slots_through(ring - 1);
    PileIndex(base + side * 2 * ring + along as u64)
}

/// Iterator performing the literal spiral walk.
///
/// Yields one cell per step in constant time, which makes it the cheapest way
/// to lay out a long run of consecutive piles.
#[derive(Debug, Clone)]
pub struct SpiralWalk {
    position: GridCoord,
    direction: usize,
    segment_len: u64,
    steps_in_segment: u64,
    turns: u64,
    emitted: u64,
    limit: Option<u64>,
}

impl SpiralWalk {
    /// Create an unbounded walk from the origin.
    pub fn new() -> Self {
        Self {
            position: GridCoord::ORIGIN,
            direction: 0,
            segment_len: 1,
            steps_in_segment: 0,
            turns: 0,
            emitted: 0,
            limit: None,
        }
    }

    /// Create a walk that yields the first `count` cells.
    pub fn take_slots(count: u64) -> Self {
        Self {
            limit: Some(count),
            ..Self::new()
        }
    }

    fn advance(&mut self) {
        self.position = self.position + GridCoord::DIRECTIONS[self.direction];
        self.steps_in_segment += 1;

        if self.steps_in_segment == self.segment_len {
            self.steps_in_segment = 0;
            self.direction = (self.direction + 1) % 4;
            self.turns += 1;
            if self.turns % 2 == 0 {
                self.segment_len += 1;
            }
        }
    }
}

impl Default for SpiralWalk {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for SpiralWalk {
    type Item = GridCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(limit) = self.limit {
            if self.emitted >= limit {
                return None;
            }
        }

        let coord = self.position;
        self.emitted += 1;
        self.advance();
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.limit {
            Some(limit) => {
                let remaining = limit.saturating_sub(self.emitted) as usize;
                (remaining, Some(remaining))
            }
            None => (usize::MAX, None),
        }
    }
}
