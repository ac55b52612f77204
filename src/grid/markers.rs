//! Ghost marker vocabulary written into cell/point ghost arrays.
//!
//! Markers are bit flags; consumers union them with any pre-existing marker
//! rather than overwriting whole bytes.

/// Cell received from a neighboring block over the exchange.
pub const DUPLICATE_CELL: u8 = 0x01;
/// Allocated cell that no neighbor will ever fill (dangling halo).
pub const HIDDEN_CELL: u8 = 0x02;

/// Point received from a neighboring block over the exchange.
pub const DUPLICATE_POINT: u8 = 0x01;
/// Allocated point that no neighbor will ever fill.
pub const HIDDEN_POINT: u8 = 0x02;
