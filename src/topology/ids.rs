//! Row-major cell and point id maps for an extent.
//!
//! Ids are always computed against the extent of the grid that owns the
//! array being indexed, never against an intersection box. A degenerate axis
//! contributes one cell layer, so 2-D and 1-D grids still enumerate cells.

use super::extent::Extent;

/// Id of the cell at `ijk` within `extent`, row-major (x fastest).
#[inline]
pub fn cell_id(extent: &Extent, ijk: [i32; 3]) -> usize {
    let dims = extent.cell_dims();
    let i = (ijk[0] - extent.min(0)) as usize;
    let j = (ijk[1] - extent.min(1)) as usize;
    let k = (ijk[2] - extent.min(2)) as usize;
    i + dims[0] as usize * (j + dims[1] as usize * k)
}

/// Id of the point at `ijk` within `extent`, row-major (x fastest).
#[inline]
pub fn point_id(extent: &Extent, ijk: [i32; 3]) -> usize {
    let dims = extent.point_dims();
    let i = (ijk[0] - extent.min(0)) as usize;
    let j = (ijk[1] - extent.min(1)) as usize;
    let k = (ijk[2] - extent.min(2)) as usize;
    i + dims[0] as usize * (j + dims[1] as usize * k)
}

/// Structured coordinates of the point with the given id within `extent`.
#[inline]
pub fn point_ijk(extent: &Extent, id: usize) -> [i32; 3] {
    let dims = extent.point_dims();
    let nx = dims[0] as usize;
    let ny = dims[1] as usize;
    [
        extent.min(0) + (id % nx) as i32,
        extent.min(1) + ((id / nx) % ny) as i32,
        extent.min(2) + (id / (nx * ny)) as i32,
    ]
}
