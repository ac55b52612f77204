//! Per-block state for the halo exchange.
//!
//! [`BlockInfo`] is locally owned and never transmitted; [`BlockStructure`]
//! is the local view of one remote block, created during the descriptor
//! round and retained until the link map is finalized. Entries for
//! non-adjacent remotes are erased during matching.
//!
//! The [`GridFamily`] trait is the capability seam between the generic
//! pipeline and the three grid families: peeling support, descriptor
//! codec, extent synchronization (matching), ghost-coordinate accumulation,
//! and output construction.

use hashbrown::HashMap;
use std::collections::BTreeSet;
use std::fmt;

use crate::algs::wire::WireCursor;
use crate::error::GridHaloError;
use crate::grid::AttributeSet;
use crate::topology::extent::Extent;
use crate::topology::mask::AdjacencyMask;

/// Globally unique block id. Gids are rank-contiguous; see
/// [`crate::algs::exchange::BlockAssigner`].
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[repr(transparent)]
pub struct BlockId(pub u32);

impl BlockId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BlockId").field(&self.0).finish()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 2-D logical rectangle describing how a neighbor's face maps into a
/// local face under a rotation/reflection of index axes (curvilinear only).
///
/// `extent_id` is the face index (0..6) the rectangle lies on, `-1` when
/// unset. Orientations are `±1` once set.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
pub struct Grid2d {
    pub extent_id: i32,
    pub start_x: i32,
    pub end_x: i32,
    pub start_y: i32,
    pub end_y: i32,
    pub x_orientation: i32,
    pub y_orientation: i32,
}

impl Default for Grid2d {
    fn default() -> Self {
        Self {
            extent_id: -1,
            start_x: 0,
            end_x: 0,
            start_y: 0,
            end_y: 0,
            x_orientation: 0,
            y_orientation: 0,
        }
    }
}

/// Locally owned per-block state. Built from the local input during setup,
/// destroyed at teardown.
#[derive(Clone, Debug)]
pub struct BlockInfo<G: GridFamily> {
    /// Peeled extent (after the ghost strip).
    pub extent: Extent,
    /// Per-side ghost thickness accumulator, initially zero.
    pub ghost_thickness: [i32; 6],
    /// Family-specific accumulation (rectilinear ghost-coordinate segments).
    pub extra: G::InfoExtra,
}

impl<G: GridFamily> BlockInfo<G> {
    pub fn new(extent: Extent) -> Self {
        Self {
            extent,
            ghost_thickness: [0; 6],
            extra: G::InfoExtra::default(),
        }
    }

    /// Enlarged output extent once all neighbors were processed.
    #[inline]
    pub fn output_extent(&self) -> Extent {
        self.extent.grown_by(self.ghost_thickness)
    }
}

/// A remote neighbor's descriptor as seen locally; one per known remote
/// block.
#[derive(Clone, Debug)]
pub struct BlockStructure<G: GridFamily> {
    /// Remote peeled extent, in the remote block's own frame.
    pub extent: Extent,
    /// Remote data dimension.
    pub dim: i32,
    /// Family-specific geometry.
    pub geometry: G::Descriptor,
    /// Remote extent expressed in the local frame; set by the matcher.
    pub shifted_extent: Extent,
    /// `shifted_extent` widened on the side(s) facing us as matching
    /// discovers overlap.
    pub extent_with_new_ghosts: Extent,
    /// Which of *our* faces this neighbor touches.
    pub adjacency: AdjacencyMask,
    /// Face interface rectangle (curvilinear only).
    pub interface: Grid2d,
}

impl<G: GridFamily> BlockStructure<G> {
    pub fn new(extent: Extent, dim: i32, geometry: G::Descriptor) -> Self {
        Self {
            extent,
            dim,
            geometry,
            shifted_extent: extent,
            extent_with_new_ghosts: extent,
            adjacency: AdjacencyMask::default(),
            interface: Grid2d::default(),
        }
    }
}

/// All per-block state a rank holds for one of its local blocks.
pub struct Block<G: GridFamily> {
    pub gid: BlockId,
    pub info: BlockInfo<G>,
    /// The local block's own descriptor over its peeled extent.
    pub local: G::Descriptor,
    /// Local data dimension.
    pub dim: i32,
    /// Remote descriptors keyed by sender gid.
    pub structures: HashMap<BlockId, BlockStructure<G>>,
    /// Gids of the neighbors this block exchanges payloads with.
    pub links: BTreeSet<BlockId>,
}

impl<G: GridFamily> Block<G> {
    pub fn new(gid: BlockId, info: BlockInfo<G>, local: G::Descriptor, dim: i32) -> Self {
        Self {
            gid,
            info,
            local,
            dim,
            structures: HashMap::new(),
            links: BTreeSet::new(),
        }
    }
}

/// Capability seam between the generic halo pipeline and one grid family.
///
/// The pipeline is written once against this trait; `UniformGrid`,
/// `RectilinearGrid<S>` and `CurvilinearGrid<S>` each implement it, which is
/// where the per-family matcher specializations live.
pub trait GridFamily: Clone + Send + Sync + Sized {
    /// Family tag carried in wire headers.
    const FAMILY_CODE: u16;
    /// Coordinate scalar tag carried in wire headers; 0 when the family has
    /// no coordinate arrays.
    const SCALAR_CODE: u16;

    /// Family-specific geometry of a block descriptor. The default value
    /// stands in for blocks with invalid extents, which send nothing.
    type Descriptor: Clone + Default + Send + Sync + fmt::Debug;
    /// Family-specific accumulation attached to [`BlockInfo`].
    type InfoExtra: Default + Clone + Send + Sync + fmt::Debug;

    fn extent(&self) -> Extent;
    fn data_dimension(&self) -> i32;

    fn cell_data(&self) -> &AttributeSet;
    fn cell_data_mut(&mut self) -> &mut AttributeSet;
    fn point_data(&self) -> &AttributeSet;
    fn point_data_mut(&mut self) -> &mut AttributeSet;

    /// Build the local descriptor for the peeled extent.
    fn make_local(&self, info: &BlockInfo<Self>) -> Self::Descriptor;

    /// Append the family geometry payload (dim, extent, and family-specific
    /// geometry, in the published enqueue order) to a descriptor record.
    fn encode_descriptor(dim: i32, extent: Extent, local: &Self::Descriptor, out: &mut Vec<u8>);

    /// Parse the family geometry payload of a descriptor record.
    fn decode_descriptor(
        cur: &mut WireCursor<'_>,
    ) -> Result<(i32, Extent, Self::Descriptor), GridHaloError>;

    /// Decide whether `remote` describes a region adjacent to the local
    /// block; on success store the local-frame shifted extent (and, for
    /// curvilinear, the face interface) into `remote` and return `true`.
    fn try_match(
        local_extent: Extent,
        local_dim: i32,
        local: &Self::Descriptor,
        remote: &mut BlockStructure<Self>,
    ) -> bool;

    /// Per-side hook run while ghost thickness accumulates (rectilinear
    /// appends neighbor coordinate samples).
    fn accumulate_ghosts(
        info: &mut BlockInfo<Self>,
        side: usize,
        structure: &BlockStructure<Self>,
    );

    /// Build the enlarged output grid: geometry sized to
    /// [`BlockInfo::output_extent`], interior attributes cloned from the
    /// input, ghost marker arrays allocated and zeroed.
    fn build_output(&self, info: &BlockInfo<Self>) -> Self;

    /// Append the round-B geometry payload for the given input-side point
    /// ids (curvilinear ships point positions; other families have none).
    fn encode_point_payload(&self, ids: &[usize], out: &mut Vec<u8>) {
        let _ = (ids, out);
    }

    /// Consume the round-B geometry payload into the output at the given
    /// output-side point ids.
    fn apply_point_payload(
        output: &mut Self,
        ids: &[usize],
        cur: &mut WireCursor<'_>,
    ) -> Result<(), GridHaloError> {
        let _ = (output, ids, cur);
        Ok(())
    }

    /// Consume and discard the round-B geometry payload (used when a
    /// received message cannot be applied).
    fn skip_point_payload(cur: &mut WireCursor<'_>) -> Result<(), GridHaloError> {
        let _ = cur;
        Ok(())
    }
}
