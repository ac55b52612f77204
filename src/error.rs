//! GridHaloError: unified error type for grid-halo public APIs
//!
//! All public entry points return `Result<_, GridHaloError>` instead of
//! panicking. Recoverable per-neighbor conditions (an inconsistent adjacency
//! mask, an invalid peer extent) are handled locally by dropping the neighbor
//! and are logged rather than surfaced here.

use crate::block::BlockId;
use crate::topology::extent::Extent;
use thiserror::Error;

/// Unified error type for grid-halo operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridHaloError {
    /// `inputs` and `outputs` slices passed to an entry point differ in length.
    #[error("inputs/outputs length mismatch: {inputs} inputs vs {outputs} outputs")]
    LengthMismatch { inputs: usize, outputs: usize },
    /// A local block's extent has `min > max` on some axis.
    #[error("block {gid} has invalid extent {extent}")]
    InvalidExtent { gid: BlockId, extent: Extent },
    /// A wire buffer ended before a complete record could be read.
    #[error("truncated wire buffer: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    /// A descriptor was produced by an incompatible crate version.
    #[error("wire version mismatch: got {got}, expected {expected}")]
    VersionMismatch { got: u16, expected: u16 },
    /// A descriptor belongs to a different grid family than the receiver's.
    #[error("grid family mismatch on the wire: got code {got}, expected {expected}")]
    FamilyMismatch { got: u16, expected: u16 },
    /// Coordinate arrays on the wire carry a different element type.
    #[error("coordinate scalar mismatch on the wire: got code {got}, expected {expected}")]
    ScalarMismatch { got: u16, expected: u16 },
    /// A geometry payload carries a different element count than the id list
    /// it must fill.
    #[error("geometry payload length mismatch: expected {expected} entries, got {got}")]
    GeometryPayloadMismatch { expected: usize, got: usize },
    /// A payload was addressed to a block this rank does not own.
    #[error("received payload for unknown block {0}")]
    UnknownBlock(BlockId),
    /// The underlying transport failed; the operation aborts.
    #[error("transport failure: {0}")]
    TransportFailure(String),
}
