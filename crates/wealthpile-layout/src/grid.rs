//! Integer ground-plane coordinates.
//!
//! The pile grid lives in the (x, z) plane of the scene; y is reserved for
//! stacking height and never appears here.

use std::ops::{Add, Neg, Sub};

/// A cell on the pile grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridCoord {
    pub x: i64,
    pub z: i64,
}

impl GridCoord {
    /// Origin of the grid, home of pile 0.
    pub const ORIGIN: Self = Self { x: 0, z: 0 };

    /// The four walk directions in counter-clockwise order, starting at +x.
    pub const DIRECTIONS: [Self; 4] = [
        Self { x: 1, z: 0 },  // right
        Self { x: 0, z: 1 },  // up
        Self { x: -1, z: 0 }, // left
        Self { x: 0, z: -1 }, // down
    ];

    /// Create a new coordinate.
    pub const fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Chebyshev distance between two cells.
    pub fn chebyshev_distance(&self, other: &Self) -> u64 {
        let dx = (self.x - other.x).unsigned_abs();
        let dz = (self.z - other.z).unsigned_abs();
        dx.max(dz)
    }

    /// Spiral ring this cell belongs to (0 = origin).
    pub fn ring(&self) -> u64 {
        self.chebyshev_distance(&Self::ORIGIN)
    }

    /// The eight cells touching this one, diagonals included.
    pub fn surrounding(&self) -> [Self; 8] {
        [
            Self::new(1, 0),
            Self::new(1, 1),
            Self::new(0, 1),
            Self::new(-1, 1),
            Self::new(-1, 0),
            Self::new(-1, -1),
            Self::new(0, -1),
            Self::new(1, -1),
        ]
        .map(|d| *self + d)
    }
}

impl Add for GridCoord {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            z: self.z + other.z,
        }
    }
}

impl Sub for GridCoord {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            z: self.z - other.z,
        }
    }
}

impl Neg for GridCoord {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            z: -self.z,
        }
    }
}

impl From<(i64, i64)> for GridCoord {
    fn from((x, z): (i64, i64)) -> Self {
        Self { x, z }
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_is_chebyshev_distance() {
        assert_eq!(GridCoord::ORIGIN.ring(), 0);
        assert_eq!(GridCoord::new(1, 1).ring(), 1);
        assert_eq!(GridCoord::new(-2, 1).ring(), 2);
        assert_eq!(GridCoord::new(3, -7).ring(), 7);
    }

    #[test]
    fn surrounding_cells_are_ring_one() {
        let cells = GridCoord::ORIGIN.surrounding();
        for c in cells {
            assert_eq!(c.ring(), 1);
        }

        let mut sorted = cells.to_vec();
        sorted.sort_by_key(|c| (c.x, c.z));
        sorted.dedup();
        assert_eq!(sorted.len(), 8);
    }

    #[test]
    fn directions_turn_counter_clockwise() {
        // Rotating (x, z) by 90° CCW gives (-z, x).
        for i in 0..4 {
            let d = GridCoord::DIRECTIONS[i];
            let next = GridCoord::DIRECTIONS[(i + 1) % 4];
            assert_eq!(next, GridCoord::new(-d.z, d.x));
        }
    }

    #[test]
    fn addition_subtraction() {
        let a = GridCoord::new(1, 2);
        let b = GridCoord::new(4, -1);

        assert_eq!(a + b, GridCoord::new(5, 1));
        assert_eq!(a - b, GridCoord::new(-3, 3));
        assert_eq!(a + (-b), a - b);
    }
}
