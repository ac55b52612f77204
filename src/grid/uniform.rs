//! Uniform grids: geometry defined by origin, spacing, a 3×3 direction
//! matrix and an extent. Points are implicit.

use super::AttributeSet;
use crate::topology::extent::Extent;

/// Axis-aligned or oriented uniform grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformGrid {
    pub extent: Extent,
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
    /// Row-major direction matrix mapping index axes to world axes.
    pub direction: [[f64; 3]; 3],
    pub cell_data: AttributeSet,
    pub point_data: AttributeSet,
}

impl UniformGrid {
    /// Axis-aligned grid with an identity direction matrix.
    pub fn new(extent: Extent, origin: [f64; 3], spacing: [f64; 3]) -> Self {
        Self {
            extent,
            origin,
            spacing,
            direction: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            cell_data: AttributeSet::default(),
            point_data: AttributeSet::default(),
        }
    }

    /// Unit quaternion `[w, x, y, z]` equivalent to the direction matrix.
    ///
    /// Two blocks can only match when the inner product of their orientation
    /// quaternions is 1 within machine epsilon.
    pub fn orientation_quaternion(&self) -> [f64; 4] {
        matrix3x3_to_quaternion(&self.direction)
    }
}

/// Convert a rotation matrix to a unit quaternion `[w, x, y, z]`.
pub(crate) fn matrix3x3_to_quaternion(m: &[[f64; 3]; 3]) -> [f64; 4] {
    let trace = m[0][0] + m[1][1] + m[2][2];
    if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        [
            0.25 / s,
            (m[2][1] - m[1][2]) * s,
            (m[0][2] - m[2][0]) * s,
            (m[1][0] - m[0][1]) * s,
        ]
    } else if m[0][0] > m[1][1] && m[0][0] > m[2][2] {
        let s = 2.0 * (1.0 + m[0][0] - m[1][1] - m[2][2]).sqrt();
        [
            (m[2][1] - m[1][2]) / s,
            0.25 * s,
            (m[0][1] + m[1][0]) / s,
            (m[0][2] + m[2][0]) / s,
        ]
    } else if m[1][1] > m[2][2] {
        let s = 2.0 * (1.0 + m[1][1] - m[0][0] - m[2][2]).sqrt();
        [
            (m[0][2] - m[2][0]) / s,
            (m[0][1] + m[1][0]) / s,
            0.25 * s,
            (m[1][2] + m[2][1]) / s,
        ]
    } else {
        let s = 2.0 * (1.0 + m[2][2] - m[0][0] - m[1][1]).sqrt();
        [
            (m[1][0] - m[0][1]) / s,
            (m[0][2] + m[2][0]) / s,
            (m[1][2] + m[2][1]) / s,
            0.25 * s,
        ]
    }
}


// ---------------------------------------------------------------------------
// Halo pipeline capability
// ---------------------------------------------------------------------------

use crate::algs::link::clone_grid_data;
use crate::algs::matching::uniform::{self, UniformDescriptor};
use crate::algs::wire::{put_pod, WireCursor, WireUniformGeom, FAMILY_UNIFORM};
use crate::block::{BlockInfo, BlockStructure, GridFamily};
use crate::error::GridHaloError;

impl GridFamily for UniformGrid {
    const FAMILY_CODE: u16 = FAMILY_UNIFORM;
    const SCALAR_CODE: u16 = 0;

    type Descriptor = UniformDescriptor;
    type InfoExtra = ();

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

    fn make_local(&self, _info: &BlockInfo<Self>) -> UniformDescriptor {
        UniformDescriptor {
            origin: self.origin,
            spacing: self.spacing,
            quaternion: self.orientation_quaternion(),
        }
    }

    fn encode_descriptor(dim: i32, extent: Extent, local: &UniformDescriptor, out: &mut Vec<u8>) {
        put_pod(
            out,
            &WireUniformGeom::new(dim, local.origin, local.spacing, local.quaternion, extent.0),
        );
    }

    fn decode_descriptor(
        cur: &mut WireCursor<'_>,
    ) -> Result<(i32, Extent, UniformDescriptor), GridHaloError> {
        let geom: WireUniformGeom = cur.read()?;
        Ok((
            geom.dim(),
            Extent(geom.extent()),
            UniformDescriptor {
                origin: geom.origin(),
                spacing: geom.spacing(),
                quaternion: geom.quaternion(),
            },
        ))
    }

    fn try_match(
        _local_extent: Extent,
        local_dim: i32,
        local: &UniformDescriptor,
        remote: &mut BlockStructure<Self>,
    ) -> bool {
        uniform::synchronize_extents(local_dim, local, remote)
    }

    fn accumulate_ghosts(
        _info: &mut BlockInfo<Self>,
        _side: usize,
        _structure: &BlockStructure<Self>,
    ) {
        // Points are implicit for uniform grids.
    }

    fn build_output(&self, info: &BlockInfo<Self>) -> Self {
        let mut output = UniformGrid {
            extent: info.output_extent(),
            origin: self.origin,
            spacing: self.spacing,
            direction: self.direction,
            cell_data: AttributeSet::default(),
            point_data: AttributeSet::default(),
        };
        clone_grid_data(self, &mut output);
        output
    }
}
