//! Adjacency and overlap bitmasks between two extents in a common frame.
//!
//! The adjacency mask answers "which of *our* faces does the neighbor
//! touch"; the overlap mask answers "on which axes do the two extents
//! strictly overlap". Together with the block dimensionality they classify
//! every geometric configuration into face, edge or corner adjacency, or
//! reject it.

use super::extent::Extent;
use std::fmt;

/// 6-bit face adjacency code. `AdjacencyMask::LEFT` being set means the
/// neighboring block it refers to is on the left of the current block, and
/// so on.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct AdjacencyMask(pub u8);

impl AdjacencyMask {
    pub const LEFT: u8 = 0x01;
    pub const RIGHT: u8 = 0x02;
    pub const FRONT: u8 = 0x04;
    pub const BACK: u8 = 0x08;
    pub const BOTTOM: u8 = 0x10;
    pub const TOP: u8 = 0x20;

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn intersects(self, bits: u8) -> bool {
        self.0 & bits != 0
    }

    /// Mirror every axis: the input side's "neighbor on our left" becomes the
    /// output side's "neighbor on our right", which is a single left shift of
    /// the bit pattern.
    #[inline]
    pub fn mirrored(self) -> Self {
        Self(self.0 << 1)
    }
}

impl fmt::Debug for AdjacencyMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AdjacencyMask({:#04x})", self.0)
    }
}

/// 3-bit axis overlap code; bit set iff the half-open intervals on that axis
/// strictly overlap.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct OverlapMask(pub u8);

impl OverlapMask {
    pub const X: u8 = 0x01;
    pub const Y: u8 = 0x02;
    pub const XY: u8 = 0x03;
    pub const Z: u8 = 0x04;
    pub const XZ: u8 = 0x05;
    pub const YZ: u8 = 0x06;

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn intersects(self, bits: u8) -> bool {
        self.0 & bits != 0
    }
}

impl fmt::Debug for OverlapMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OverlapMask({:#04x})", self.0)
    }
}

/// Compute the adjacency and overlap masks mapping the configuration between
/// `local` and a neighbor `extent` already shifted into the local frame.
///
/// Adjacency bits on degenerate local axes are forced off, so the block
/// dimensionality is carried by the mask itself.
pub fn compute_masks(local: &Extent, extent: &Extent) -> (AdjacencyMask, OverlapMask) {
    let adjacency = ((u8::from(local[0] == extent[1]) * AdjacencyMask::LEFT)
        | (u8::from(local[1] == extent[0]) * AdjacencyMask::RIGHT)
        | (u8::from(local[2] == extent[3]) * AdjacencyMask::FRONT)
        | (u8::from(local[3] == extent[2]) * AdjacencyMask::BACK)
        | (u8::from(local[4] == extent[5]) * AdjacencyMask::BOTTOM)
        | (u8::from(local[5] == extent[4]) * AdjacencyMask::TOP))
        & (((AdjacencyMask::LEFT | AdjacencyMask::RIGHT) * u8::from(local[0] != local[1]))
            | ((AdjacencyMask::FRONT | AdjacencyMask::BACK) * u8::from(local[2] != local[3]))
            | ((AdjacencyMask::BOTTOM | AdjacencyMask::TOP) * u8::from(local[4] != local[5])));

    let overlap = u8::from(local[0] < extent[1] && extent[0] < local[1])
        | (u8::from(local[2] < extent[3] && extent[2] < local[3]) << 1)
        | (u8::from(local[4] < extent[5] && extent[4] < local[5]) << 2);

    (AdjacencyMask(adjacency), OverlapMask(overlap))
}

/// Topological class of a valid adjacency: the local face indices (0..6)
/// through which ghost layers must grow.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AdjacencyClass {
    /// Two blocks share a 2-D face.
    Face(usize),
    /// Two blocks share an edge but no face.
    Edge(usize, usize),
    /// Two blocks touch at a single corner.
    Corner(usize, usize, usize),
}

impl AdjacencyClass {
    /// Visit every local face index of this class.
    #[inline]
    pub fn for_each_face(&self, mut f: impl FnMut(usize)) {
        match *self {
            AdjacencyClass::Face(a) => f(a),
            AdjacencyClass::Edge(a, b) => {
                f(a);
                f(b);
            }
            AdjacencyClass::Corner(a, b, c) => {
                f(a);
                f(b);
                f(c);
            }
        }
    }
}

/// Classify a `(dim, adjacency, overlap)` triple into face, edge or corner
/// adjacency. Returns `None` for any combination inconsistent with the block
/// dimensionality; callers treat that as a mask violation and drop the
/// neighbor.
pub fn classify(
    dim: i32,
    adjacency: AdjacencyMask,
    overlap: OverlapMask,
) -> Option<AdjacencyClass> {
    let a = adjacency.bits();
    let o = overlap;

    // Face adjacency: the two blocks share a 2-D face (or the analogue in
    // lower dimensions).
    if (((dim == 3 && o.bits() == OverlapMask::YZ)
        || (dim == 2 && o.intersects(OverlapMask::YZ))
        || (dim == 1 && o.is_empty()))
        && adjacency.intersects(AdjacencyMask::LEFT | AdjacencyMask::RIGHT))
        || (((dim == 3 && o.bits() == OverlapMask::XZ) || (dim == 2 && o.intersects(OverlapMask::XZ)))
            && adjacency.intersects(AdjacencyMask::FRONT | AdjacencyMask::BACK))
        || (((dim == 3 && o.bits() == OverlapMask::XY) || (dim == 2 && o.intersects(OverlapMask::XY)))
            && adjacency.intersects(AdjacencyMask::BOTTOM | AdjacencyMask::TOP))
    {
        let idx = match a {
            x if x == AdjacencyMask::LEFT => 0,
            x if x == AdjacencyMask::RIGHT => 1,
            x if x == AdjacencyMask::FRONT => 2,
            x if x == AdjacencyMask::BACK => 3,
            x if x == AdjacencyMask::BOTTOM => 4,
            x if x == AdjacencyMask::TOP => 5,
            _ => return None,
        };
        return Some(AdjacencyClass::Face(idx));
    }

    // Edge adjacency: edges overlap but no face does.
    if (((dim == 3 && o.bits() == OverlapMask::X) || (dim == 2 && o.is_empty()))
        && adjacency.intersects(AdjacencyMask::FRONT | AdjacencyMask::BACK)
        && adjacency.intersects(AdjacencyMask::BOTTOM | AdjacencyMask::TOP))
        || (((dim == 3 && o.bits() == OverlapMask::Y) || (dim == 2 && o.is_empty()))
            && adjacency.intersects(AdjacencyMask::LEFT | AdjacencyMask::RIGHT)
            && adjacency.intersects(AdjacencyMask::BOTTOM | AdjacencyMask::TOP))
        || (((dim == 3 && o.bits() == OverlapMask::Z) || (dim == 2 && o.is_empty()))
            && adjacency.intersects(AdjacencyMask::LEFT | AdjacencyMask::RIGHT)
            && adjacency.intersects(AdjacencyMask::FRONT | AdjacencyMask::BACK))
    {
        let (idx1, idx2) = match a {
            x if x == AdjacencyMask::FRONT | AdjacencyMask::BOTTOM => (2, 4),
            x if x == AdjacencyMask::FRONT | AdjacencyMask::TOP => (2, 5),
            x if x == AdjacencyMask::BACK | AdjacencyMask::BOTTOM => (3, 4),
            x if x == AdjacencyMask::BACK | AdjacencyMask::TOP => (3, 5),
            x if x == AdjacencyMask::LEFT | AdjacencyMask::BOTTOM => (0, 4),
            x if x == AdjacencyMask::LEFT | AdjacencyMask::TOP => (0, 5),
            x if x == AdjacencyMask::RIGHT | AdjacencyMask::BOTTOM => (1, 4),
            x if x == AdjacencyMask::RIGHT | AdjacencyMask::TOP => (1, 5),
            x if x == AdjacencyMask::LEFT | AdjacencyMask::FRONT => (0, 2),
            x if x == AdjacencyMask::LEFT | AdjacencyMask::BACK => (0, 3),
            x if x == AdjacencyMask::RIGHT | AdjacencyMask::FRONT => (1, 2),
            x if x == AdjacencyMask::RIGHT | AdjacencyMask::BACK => (1, 3),
            _ => return None,
        };
        return Some(AdjacencyClass::Edge(idx1, idx2));
    }

    // Corner adjacency: corners touch but no edge or face overlaps.
    let (idx1, idx2, idx3) = match a {
        x if x == AdjacencyMask::LEFT | AdjacencyMask::FRONT | AdjacencyMask::BOTTOM => (0, 2, 4),
        x if x == AdjacencyMask::LEFT | AdjacencyMask::FRONT | AdjacencyMask::TOP => (0, 2, 5),
        x if x == AdjacencyMask::LEFT | AdjacencyMask::BACK | AdjacencyMask::BOTTOM => (0, 3, 4),
        x if x == AdjacencyMask::LEFT | AdjacencyMask::BACK | AdjacencyMask::TOP => (0, 3, 5),
        x if x == AdjacencyMask::RIGHT | AdjacencyMask::FRONT | AdjacencyMask::BOTTOM => (1, 2, 4),
        x if x == AdjacencyMask::RIGHT | AdjacencyMask::FRONT | AdjacencyMask::TOP => (1, 2, 5),
        x if x == AdjacencyMask::RIGHT | AdjacencyMask::BACK | AdjacencyMask::BOTTOM => (1, 3, 4),
        x if x == AdjacencyMask::RIGHT | AdjacencyMask::BACK | AdjacencyMask::TOP => (1, 3, 5),
        _ => return None,
    };
    Some(AdjacencyClass::Corner(idx1, idx2, idx3))
}
