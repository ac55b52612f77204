//! Curvilinear grids: geometry defined by an explicit 3-D array of point
//! positions plus an extent. Points are stored flat, row-major over the
//! point extent (x fastest).

use super::{AttributeSet, Scalar};
use crate::topology::extent::Extent;
use crate::topology::ids::point_id;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurvilinearGrid<S: Scalar> {
    pub extent: Extent,
    pub points: Vec<[S; 3]>,
    pub cell_data: AttributeSet,
    pub point_data: AttributeSet,
}

impl<S: Scalar> CurvilinearGrid<S> {
    pub fn new(extent: Extent, points: Vec<[S; 3]>) -> Self {
        Self {
            extent,
            points,
            cell_data: AttributeSet::default(),
            point_data: AttributeSet::default(),
        }
    }

    /// Point position at structured coordinates `ijk`.
    #[inline]
    pub fn point(&self, ijk: [i32; 3]) -> [S; 3] {
        self.points[point_id(&self.extent, ijk)]
    }

    /// Extent of the external face `face_id` (0..6) of `extent`: the face's
    /// normal axis is collapsed onto the face value, the other axes keep
    /// their full range.
    pub fn face_extent(extent: &Extent, face_id: usize) -> Extent {
        let mut e = *extent;
        let opposite = if face_id % 2 == 1 {
            face_id - 1
        } else {
            face_id + 1
        };
        e[opposite] = extent[face_id];
        e
    }

    /// Copy the layer of points lying on external face `face_id` of `sub`
    /// (a sub-extent of this grid, typically the peeled extent). The layer
    /// is indexed by [`point_id`] over [`Self::face_extent`]`(sub, face_id)`.
    pub fn outer_face_layer(&self, sub: &Extent, face_id: usize) -> Vec<[S; 3]> {
        let face = Self::face_extent(sub, face_id);
        let mut layer = vec![[S::zeroed(); 3]; face.num_points()];
        let axis = face_id / 2;
        let mut ijk = [0i32; 3];
        ijk[axis] = face[face_id];
        let (u, v) = tangent_axes(face_id);
        for y in face.min(v)..=face.max(v) {
            ijk[v] = y;
            for x in face.min(u)..=face.max(u) {
                ijk[u] = x;
                layer[point_id(&face, ijk)] = self.point(ijk);
            }
        }
        layer
    }
}

/// The two in-face axes of face `face_id`, ordered as the face's local
/// (x, y) sweep axes.
#[inline]
pub fn tangent_axes(face_id: usize) -> (usize, usize) {
    let x_dim = {
        let d = (face_id + 2) % 6;
        d - d % 2
    };
    let y_dim = {
        let d = (face_id + 4) % 6;
        d - d % 2
    };
    (x_dim / 2, y_dim / 2)
}


// ---------------------------------------------------------------------------
// Halo pipeline capability
// ---------------------------------------------------------------------------

use crate::algs::link::clone_grid_data;
use crate::algs::matching::curvilinear::{self, CurvilinearDescriptor};
use crate::algs::wire::{put_array, put_pod, WireCursor, WireGridGeomHdr, FAMILY_CURVILINEAR};
use crate::block::{BlockInfo, BlockStructure, GridFamily};
use crate::error::GridHaloError;

impl<S: Scalar> GridFamily for CurvilinearGrid<S> {
    const FAMILY_CODE: u16 = FAMILY_CURVILINEAR;
    const SCALAR_CODE: u16 = S::WIRE_CODE;

    type Descriptor = CurvilinearDescriptor<S>;
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

    /// The six outer-face point layers of the peeled extent, materialized
    /// once per block and reused for every neighbor.
    fn make_local(&self, info: &BlockInfo<Self>) -> CurvilinearDescriptor<S> {
        CurvilinearDescriptor {
            faces: std::array::from_fn(|face_id| self.outer_face_layer(&info.extent, face_id)),
        }
    }

    fn encode_descriptor(
        dim: i32,
        extent: Extent,
        local: &CurvilinearDescriptor<S>,
        out: &mut Vec<u8>,
    ) {
        put_pod(out, &WireGridGeomHdr::new(dim, extent.0));
        for face in &local.faces {
            put_array(out, face);
        }
    }

    fn decode_descriptor(
        cur: &mut WireCursor<'_>,
    ) -> Result<(i32, Extent, CurvilinearDescriptor<S>), GridHaloError> {
        let hdr: WireGridGeomHdr = cur.read()?;
        let mut faces: [Vec<[S; 3]>; 6] = Default::default();
        for face in &mut faces {
            *face = cur.read_array::<[S; 3]>()?;
        }
        Ok((hdr.dim(), Extent(hdr.extent()), CurvilinearDescriptor { faces }))
    }

    fn try_match(
        local_extent: Extent,
        local_dim: i32,
        local: &CurvilinearDescriptor<S>,
        remote: &mut BlockStructure<Self>,
    ) -> bool {
        curvilinear::synchronize_extents(local_extent, local_dim, local, remote)
    }

    fn accumulate_ghosts(
        _info: &mut BlockInfo<Self>,
        _side: usize,
        _structure: &BlockStructure<Self>,
    ) {
        // Ghost points arrive over the exchange once the enlarged point
        // buffer exists.
    }

    fn build_output(&self, info: &BlockInfo<Self>) -> Self {
        let out_extent = info.output_extent();
        let mut points = vec![[S::zeroed(); 3]; out_extent.num_points()];
        for k in info.extent.min(2)..=info.extent.max(2) {
            for j in info.extent.min(1)..=info.extent.max(1) {
                for i in info.extent.min(0)..=info.extent.max(0) {
                    points[point_id(&out_extent, [i, j, k])] = self.point([i, j, k]);
                }
            }
        }
        let mut output = CurvilinearGrid {
            extent: out_extent,
            points,
            cell_data: AttributeSet::default(),
            point_data: AttributeSet::default(),
        };
        clone_grid_data(self, &mut output);
        output
    }

    fn encode_point_payload(&self, ids: &[usize], out: &mut Vec<u8>) {
        let positions: Vec<[S; 3]> = ids.iter().map(|&id| self.points[id]).collect();
        put_array(out, &positions);
    }

    fn apply_point_payload(
        output: &mut Self,
        ids: &[usize],
        cur: &mut WireCursor<'_>,
    ) -> Result<(), GridHaloError> {
        let positions: Vec<[S; 3]> = cur.read_array()?;
        if positions.len() != ids.len() {
            return Err(GridHaloError::GeometryPayloadMismatch {
                expected: ids.len(),
                got: positions.len(),
            });
        }
        for (&id, &position) in ids.iter().zip(&positions) {
            output.points[id] = position;
        }
        Ok(())
    }

    fn skip_point_payload(cur: &mut WireCursor<'_>) -> Result<(), GridHaloError> {
        cur.read_array::<[S; 3]>().map(|_| ())
    }
}
