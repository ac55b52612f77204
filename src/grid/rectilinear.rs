//! Rectilinear grids: geometry defined by three 1-D coordinate arrays plus
//! an extent. Array lengths follow the point dimensions of the extent.

use super::{AttributeSet, Scalar};
use crate::topology::extent::Extent;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RectilinearGrid<S: Scalar> {
    pub extent: Extent,
    /// Per-axis coordinate arrays, indexed `[x, y, z]`.
    pub coords: [Vec<S>; 3],
    pub cell_data: AttributeSet,
    pub point_data: AttributeSet,
}

impl<S: Scalar> RectilinearGrid<S> {
    pub fn new(extent: Extent, x: Vec<S>, y: Vec<S>, z: Vec<S>) -> Self {
        Self {
            extent,
            coords: [x, y, z],
            cell_data: AttributeSet::default(),
            point_data: AttributeSet::default(),
        }
    }

    /// Coordinate arrays restricted to `sub`, which must lie inside the
    /// grid's extent.
    pub fn coords_for(&self, sub: &Extent) -> [Vec<S>; 3] {
        let slice = |axis: usize| -> Vec<S> {
            let lo = (sub.min(axis) - self.extent.min(axis)) as usize;
            let hi = (sub.max(axis) - self.extent.min(axis)) as usize;
            self.coords[axis][lo..=hi].to_vec()
        };
        [slice(0), slice(1), slice(2)]
    }
}


// ---------------------------------------------------------------------------
// Halo pipeline capability
// ---------------------------------------------------------------------------

use crate::algs::link::clone_grid_data;
use crate::algs::matching::rectilinear::{self, RectilinearDescriptor};
use crate::algs::wire::{put_array, put_pod, WireCursor, WireGridGeomHdr, FAMILY_RECTILINEAR};
use crate::block::{BlockInfo, BlockStructure, GridFamily};
use crate::error::GridHaloError;

/// Per-block accumulation for rectilinear grids: the six ghost-coordinate
/// segments collected while matching, one per side.
#[derive(Clone, Debug)]
pub struct RectilinearExtra<S: Scalar> {
    pub coordinate_ghosts: [Vec<S>; 6],
}

impl<S: Scalar> Default for RectilinearExtra<S> {
    fn default() -> Self {
        Self {
            coordinate_ghosts: std::array::from_fn(|_| Vec::new()),
        }
    }
}

impl<S: Scalar> GridFamily for RectilinearGrid<S> {
    const FAMILY_CODE: u16 = FAMILY_RECTILINEAR;
    const SCALAR_CODE: u16 = S::WIRE_CODE;

    type Descriptor = RectilinearDescriptor<S>;
    type InfoExtra = RectilinearExtra<S>;

    fn extent(&self) -> Extent {
        self.extent
    }

    fn data_dimension(&self) -> i32 {
        self.extent.data_dimension()
    }

    fn cell_data(&self) -> &AttributeSet {
        &self.cell_data
    }

    fn cell_data_mut(&mut self) -> &mut AttributeSet {
        &mut self.cell_data
    }

    fn point_data(&self) -> &AttributeSet {
        &self.point_data
    }

    fn point_data_mut(&mut self) -> &mut AttributeSet {
        &mut self.point_data
    }

    fn make_local(&self, info: &BlockInfo<Self>) -> RectilinearDescriptor<S> {
        RectilinearDescriptor {
            coords: self.coords_for(&info.extent),
        }
    }

    fn encode_descriptor(
        dim: i32,
        extent: Extent,
        local: &RectilinearDescriptor<S>,
        out: &mut Vec<u8>,
    ) {
        put_pod(out, &WireGridGeomHdr::new(dim, extent.0));
        put_array(out, &local.coords[0]);
        put_array(out, &local.coords[1]);
        put_array(out, &local.coords[2]);
    }

    fn decode_descriptor(
        cur: &mut WireCursor<'_>,
    ) -> Result<(i32, Extent, RectilinearDescriptor<S>), GridHaloError> {
        let hdr: WireGridGeomHdr = cur.read()?;
        let x = cur.read_array::<S>()?;
        let y = cur.read_array::<S>()?;
        let z = cur.read_array::<S>()?;
        Ok((
            hdr.dim(),
            Extent(hdr.extent()),
            RectilinearDescriptor { coords: [x, y, z] },
        ))
    }

    fn try_match(
        local_extent: Extent,
        local_dim: i32,
        local: &RectilinearDescriptor<S>,
        remote: &mut BlockStructure<Self>,
    ) -> bool {
        rectilinear::synchronize_extents(local_extent, local_dim, local, remote)
    }

    /// Keep the ghost-coordinate segment for `side` in sync with the
    /// accumulated thickness: the deepest neighbor on a side provides the
    /// samples. Lower sides take the run ending one before the neighbor's
    /// last entry (the shared boundary value); upper sides take the run
    /// starting one after its first.
    fn accumulate_ghosts(
        info: &mut BlockInfo<Self>,
        side: usize,
        structure: &BlockStructure<Self>,
    ) {
        let thickness = info.ghost_thickness[side] as usize;
        let coords = &structure.geometry.coords[side / 2];
        let segment = &mut info.extra.coordinate_ghosts[side];
        if segment.len() >= thickness || coords.len() <= thickness {
            return;
        }
        if side % 2 == 0 {
            let n = coords.len();
            *segment = coords[n - 1 - thickness..n - 1].to_vec();
        } else {
            *segment = coords[1..=thickness].to_vec();
        }
    }

    fn build_output(&self, info: &BlockInfo<Self>) -> Self {
        let mut coords = self.coords_for(&info.extent);
        for axis in 0..3 {
            let pre = &info.extra.coordinate_ghosts[2 * axis];
            let post = &info.extra.coordinate_ghosts[2 * axis + 1];
            if pre.is_empty() && post.is_empty() {
                continue;
            }
            let mut merged = Vec::with_capacity(pre.len() + coords[axis].len() + post.len());
            merged.extend_from_slice(pre);
            merged.extend_from_slice(&coords[axis]);
            merged.extend_from_slice(post);
            coords[axis] = merged;
        }
        let mut output = RectilinearGrid {
            extent: info.output_extent(),
            coords,
            cell_data: AttributeSet::default(),
            point_data: AttributeSet::default(),
        };
        clone_grid_data(self, &mut output);
        output
    }
}
