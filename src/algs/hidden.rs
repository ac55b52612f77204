//! Hidden-ghost marking.
//!
//! The enlarged output allocates its full ghost thickness on every side, but
//! only the regions actually covered by a neighbor receive data. The end
//! slabs are therefore painted HIDDEN up front; the receive pass overwrites
//! the cells and points a neighbor really fills. Painting is unconditional
//! and idempotent, and degenerate axes contribute nothing.

use crate::grid::markers::{HIDDEN_CELL, HIDDEN_POINT};
use crate::topology::extent::Extent;
use crate::topology::ids::{cell_id, point_id};

#[allow(clippy::too_many_arguments)]
fn fill_cell_region(
    ghosts: &mut [u8],
    grid_extent: &Extent,
    imin: i32,
    imax: i32,
    jmin: i32,
    jmax: i32,
    kmin: i32,
    kmax: i32,
) {
    for k in kmin..kmax {
        for j in jmin..jmax {
            for i in imin..imax {
                ghosts[cell_id(grid_extent, [i, j, k])] |= HIDDEN_CELL;
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_point_region(
    ghosts: &mut [u8],
    grid_extent: &Extent,
    imin: i32,
    imax: i32,
    jmin: i32,
    jmax: i32,
    kmin: i32,
    kmax: i32,
) {
    for k in kmin..=kmax {
        for j in jmin..=jmax {
            for i in imin..=imax {
                ghosts[point_id(grid_extent, [i, j, k])] |= HIDDEN_POINT;
            }
        }
    }
}

/// Paint the allocated ghost slabs of one output grid.
///
/// `extent` is the enlarged output extent, `inner` the peeled extent the
/// slabs were grown from. Cell markers cover the slab's cells; point markers
/// stop one point short of the inner region because boundary points are
/// shared with it.
pub fn fill_hidden_ghosts(
    extent: &Extent,
    inner: &Extent,
    cell_ghosts: &mut [u8],
    point_ghosts: &mut [u8],
) {
    let degenerate = [
        i32::from(extent[0] == extent[1]),
        i32::from(extent[2] == extent[3]),
        i32::from(extent[4] == extent[5]),
    ];

    if degenerate[0] == 0 {
        fill_cell_region(
            cell_ghosts,
            extent,
            extent[0],
            inner[0],
            extent[2],
            extent[3] + degenerate[1],
            extent[4],
            extent[5] + degenerate[2],
        );
        fill_cell_region(
            cell_ghosts,
            extent,
            inner[1],
            extent[1],
            extent[2],
            extent[3] + degenerate[1],
            extent[4],
            extent[5] + degenerate[2],
        );
        fill_point_region(
            point_ghosts,
            extent,
            extent[0],
            inner[0] - 1,
            extent[2],
            extent[3],
            extent[4],
            extent[5],
        );
        fill_point_region(
            point_ghosts,
            extent,
            inner[1] + 1,
            extent[1],
            extent[2],
            extent[3],
            extent[4],
            extent[5],
        );
    }
    if degenerate[1] == 0 {
        fill_cell_region(
            cell_ghosts,
            extent,
            extent[0],
            extent[1] + degenerate[0],
            extent[2],
            inner[2],
            extent[4],
            extent[5] + degenerate[2],
        );
        fill_cell_region(
            cell_ghosts,
            extent,
            extent[0],
            extent[1] + degenerate[0],
            inner[3],
            extent[3],
            extent[4],
            extent[5] + degenerate[2],
        );
        fill_point_region(
            point_ghosts,
            extent,
            extent[0],
            extent[1],
            extent[2],
            inner[2] - 1,
            extent[4],
            extent[5],
        );
        fill_point_region(
            point_ghosts,
            extent,
            extent[0],
            extent[1],
            inner[3] + 1,
            extent[3],
            extent[4],
            extent[5],
        );
    }
    if degenerate[2] == 0 {
        fill_cell_region(
            cell_ghosts,
            extent,
            extent[0],
            extent[1] + degenerate[0],
            extent[2],
            extent[3] + degenerate[1],
            extent[4],
            inner[4],
        );
        fill_cell_region(
            cell_ghosts,
            extent,
            extent[0],
            extent[1] + degenerate[0],
            extent[2],
            extent[3] + degenerate[1],
            inner[5],
            extent[5],
        );
        fill_point_region(
            point_ghosts,
            extent,
            extent[0],
            extent[1],
            extent[2],
            extent[3],
            extent[4],
            inner[4] - 1,
        );
        fill_point_region(
            point_ghosts,
            extent,
            extent[0],
            extent[1],
            extent[2],
            extent[3],
            inner[5] + 1,
            extent[5],
        );
    }
}
