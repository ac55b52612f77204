//! `Extent`: the six-integer box `[x0, x1, y0, y1, z0, z1]` addressing a
//! structured grid.
//!
//! An extent names inclusive logical point coordinates; the cells of an
//! extent live between consecutive point coordinates, so a non-degenerate
//! axis of width `w` carries `w` cells and `w + 1` points. An axis whose
//! min equals its max is *degenerate*: it carries one point sheet and
//! contributes a single cell layer.
//!
//! `Extent` is `#[repr(transparent)]` over `[i32; 6]` so descriptor records
//! can carry it on the wire without translation.

use bytemuck::{Pod, Zeroable};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Six-int box `[x0, x1, y0, y1, z0, z1]` naming inclusive logical
/// coordinates. Valid iff `x0 <= x1 && y0 <= y1 && z0 <= z1`.
#[repr(transparent)]
#[derive(
    Copy, Clone, Default, PartialEq, Eq, Hash, Pod, Zeroable, serde::Serialize, serde::Deserialize,
)]
pub struct Extent(pub [i32; 6]);

impl Extent {
    /// Build an extent from its six bounds.
    #[inline]
    pub const fn new(x0: i32, x1: i32, y0: i32, y1: i32, z0: i32, z1: i32) -> Self {
        Self([x0, x1, y0, y1, z0, z1])
    }

    /// An extent is valid iff every axis has `min <= max`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0[0] <= self.0[1] && self.0[2] <= self.0[3] && self.0[4] <= self.0[5]
    }

    /// Lower bound of `axis` (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn min(&self, axis: usize) -> i32 {
        self.0[2 * axis]
    }

    /// Upper bound of `axis`.
    #[inline]
    pub fn max(&self, axis: usize) -> i32 {
        self.0[2 * axis + 1]
    }

    /// True when `axis` has zero width.
    #[inline]
    pub fn is_degenerate(&self, axis: usize) -> bool {
        self.0[2 * axis] == self.0[2 * axis + 1]
    }

    /// Point width of `axis`: `max - min`.
    #[inline]
    pub fn width(&self, axis: usize) -> i32 {
        self.0[2 * axis + 1] - self.0[2 * axis]
    }

    /// Number of non-degenerate axes (1, 2 or 3 for valid, non-empty data).
    #[inline]
    pub fn data_dimension(&self) -> i32 {
        (0..3).filter(|&a| !self.is_degenerate(a)).count() as i32
    }

    /// Cell counts per axis; a degenerate axis contributes one cell layer.
    #[inline]
    pub fn cell_dims(&self) -> [i32; 3] {
        [
            self.width(0).max(1),
            self.width(1).max(1),
            self.width(2).max(1),
        ]
    }

    /// Point counts per axis.
    #[inline]
    pub fn point_dims(&self) -> [i32; 3] {
        [self.width(0) + 1, self.width(1) + 1, self.width(2) + 1]
    }

    /// Total number of cells addressed by this extent.
    #[inline]
    pub fn num_cells(&self) -> usize {
        let d = self.cell_dims();
        d[0] as usize * d[1] as usize * d[2] as usize
    }

    /// Total number of points addressed by this extent.
    #[inline]
    pub fn num_points(&self) -> usize {
        let d = self.point_dims();
        d[0] as usize * d[1] as usize * d[2] as usize
    }

    /// Translate every axis by `-shift`, expressing this extent relative to a
    /// new origin.
    #[inline]
    pub fn shifted_by(&self, shift: [i32; 3]) -> Self {
        Self([
            self.0[0] - shift[0],
            self.0[1] - shift[0],
            self.0[2] - shift[1],
            self.0[3] - shift[1],
            self.0[4] - shift[2],
            self.0[5] - shift[2],
        ])
    }

    /// Grow by the given per-side thickness: mins move down, maxes move up.
    #[inline]
    pub fn grown_by(&self, thickness: [i32; 6]) -> Self {
        Self([
            self.0[0] - thickness[0],
            self.0[1] + thickness[1],
            self.0[2] - thickness[2],
            self.0[3] + thickness[3],
            self.0[4] - thickness[4],
            self.0[5] + thickness[5],
        ])
    }

    /// True when `ijk` lies inside this extent (point coordinates).
    #[inline]
    pub fn contains(&self, ijk: [i32; 3]) -> bool {
        (0..3).all(|a| ijk[a] >= self.min(a) && ijk[a] <= self.max(a))
    }
}

impl Index<usize> for Extent {
    type Output = i32;
    #[inline]
    fn index(&self, i: usize) -> &i32 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Extent {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut i32 {
        &mut self.0[i]
    }
}

impl fmt::Debug for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extent[{}, {}, {}, {}, {}, {}]",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}, {}, {}]",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}


#[cfg(test)]
mod layout_tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(Extent, [i32; 6]);
}

#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let e = Extent::new(0, 4, -2, 3, 5, 5);
        let s = serde_json::to_string(&e)?;
        let back: Extent = serde_json::from_str(&s)?;
        assert_eq!(back, e);
        Ok(())
    }

    #[test]
    fn bincode_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let e = Extent::new(-1, 6, 0, 4, 0, 4);
        let bytes = bincode::serialize(&e)?;
        let back: Extent = bincode::deserialize(&bytes)?;
        assert_eq!(back, e);
        Ok(())
    }
}
