//! # grid-halo
//!
//! grid-halo is a distributed ghost-layer (halo) exchange engine for
//! partitioned structured grids. Given N locally owned blocks distributed
//! across P processes, each possibly already carrying some ghost layers, it
//! determines every pair of spatially adjacent blocks, computes the precise
//! index ranges to copy, and produces enlarged output grids whose ghost
//! cells and points are correctly marked.
//!
//! ## Grid families
//! - [`grid::UniformGrid`]: origin, spacing, 3x3 direction matrix, extent.
//! - [`grid::RectilinearGrid`]: three 1-D coordinate arrays plus extent.
//! - [`grid::CurvilinearGrid`]: an explicit 3-D point array plus extent.
//!
//! ## Features
//! - Six-face topological matching across unknown rotations/reflections for
//!   curvilinear blocks
//! - Bit-mask encoding of face/edge/corner adjacency
//! - Peeling of pre-existing ghost layers
//! - Pluggable transport (serial, threaded, MPI behind `mpi-support`) with a
//!   two-round all-to-all protocol and no shared memory between peers
//! - Hidden/duplicate ghost marking via a published byte-mask vocabulary
//!
//! ## Usage
//! ```rust
//! use grid_halo::prelude::*;
//!
//! let a = UniformGrid::new(Extent::new(0, 4, 0, 4, 0, 4), [0.0; 3], [1.0; 3]);
//! let b = UniformGrid::new(Extent::new(4, 8, 0, 4, 0, 4), [0.0; 3], [1.0; 3]);
//! let inputs = vec![a, b];
//! let mut outputs = vec![UniformGrid::default(), UniformGrid::default()];
//! let summary =
//!     compute_uniform_ghosts(&inputs, &mut outputs, 0, 2, &NoComm).unwrap();
//! assert_eq!(outputs[0].extent, Extent::new(0, 6, 0, 4, 0, 4));
//! assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));
//! ```
//!
//! Entry points take the transport as an explicit `&impl Communicator`;
//! the crate never owns process-global state. Recoverable per-neighbor
//! conditions are reported through the `log` facade; install any logger to
//! see them.

pub mod algs;
pub mod block;
pub mod error;
pub mod grid;
pub mod topology;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::communicator::{Communicator, NoComm, RayonComm, Wait};
    #[cfg(feature = "mpi-support")]
    pub use crate::algs::communicator::MpiComm;
    pub use crate::algs::exchange::{
        compute_curvilinear_ghosts, compute_ghosts, compute_rectilinear_ghosts,
        compute_uniform_ghosts, BlockAssigner, LinkSummary,
    };
    pub use crate::block::{BlockId, Grid2d, GridFamily};
    pub use crate::error::GridHaloError;
    pub use crate::grid::markers;
    pub use crate::grid::{
        AttributeSet, CurvilinearGrid, FieldArray, RectilinearGrid, Scalar, UniformGrid,
    };
    pub use crate::topology::extent::Extent;
    pub use crate::topology::mask::{AdjacencyMask, OverlapMask};
}
