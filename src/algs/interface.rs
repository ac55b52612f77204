//! Interface id lists: which cells/points travel along a link.
//!
//! Input-side lists select what a block sends (ids in the input grid);
//! output-side lists select where a block writes what it receives (ids in
//! the enlarged output grid). Both enumerate the intersection box in
//! row-major order, so sender and receiver agree element-by-element.

use crate::block::{Block, BlockId, GridFamily};
use crate::topology::extent::Extent;
use crate::topology::ids::{cell_id, point_id};
use crate::topology::mask::AdjacencyMask;

/// Ids in `grid_extent` of the cells lying in the intersection of
/// `local_extent` and `extent`. Degenerate local axes contribute their
/// single cell layer.
pub fn grid_interface_cell_ids(
    local_extent: &Extent,
    extent: &Extent,
    grid_extent: &Extent,
) -> Vec<usize> {
    let imin = extent[0].max(local_extent[0]);
    let imax = extent[1].min(local_extent[1]) + i32::from(local_extent[0] == local_extent[1]);
    let jmin = extent[2].max(local_extent[2]);
    let jmax = extent[3].min(local_extent[3]) + i32::from(local_extent[2] == local_extent[3]);
    let kmin = extent[4].max(local_extent[4]);
    let kmax = extent[5].min(local_extent[5]) + i32::from(local_extent[4] == local_extent[5]);

    let mut ids = Vec::new();
    for k in kmin..kmax {
        for j in jmin..jmax {
            for i in imin..imax {
                ids.push(cell_id(grid_extent, [i, j, k]));
            }
        }
    }
    ids
}

/// Ids in `grid_extent` of the points lying in the intersection of
/// `local_extent` and `extent`.
///
/// Ownership of a shared boundary point goes to the block on the
/// right/back/top side of the pairing: when the adjacency mask carries one
/// of those bits, the corresponding max is decremented so the owner keeps
/// its non-ghost copy.
pub fn grid_interface_point_ids(
    adjacency: AdjacencyMask,
    local_extent: &Extent,
    extent: &Extent,
    grid_extent: &Extent,
) -> Vec<usize> {
    let imin = extent[0].max(local_extent[0]);
    let mut imax = extent[1].min(local_extent[1]);
    let jmin = extent[2].max(local_extent[2]);
    let mut jmax = extent[3].min(local_extent[3]);
    let kmin = extent[4].max(local_extent[4]);
    let mut kmax = extent[5].min(local_extent[5]);

    if adjacency.intersects(AdjacencyMask::RIGHT) {
        imax -= 1;
    }
    if adjacency.intersects(AdjacencyMask::BACK) {
        jmax -= 1;
    }
    if adjacency.intersects(AdjacencyMask::TOP) {
        kmax -= 1;
    }

    let mut ids = Vec::new();
    for k in kmin..=kmax {
        for j in jmin..=jmax {
            for i in imin..=imax {
                ids.push(point_id(grid_extent, [i, j, k]));
            }
        }
    }
    ids
}

/// Input-side cell ids for the link from `block` to neighbor `gid`: the
/// cells of the input that fall inside the neighbor's extent once its new
/// ghost layers are counted.
pub fn input_interface_cell_ids<G: GridFamily>(
    block: &Block<G>,
    gid: BlockId,
    input_extent: &Extent,
) -> Vec<usize> {
    match block.structures.get(&gid) {
        Some(s) => {
            grid_interface_cell_ids(&block.info.extent, &s.extent_with_new_ghosts, input_extent)
        }
        None => Vec::new(),
    }
}

/// Output-side cell ids for the link from neighbor `gid` into `block`'s
/// output: the output cells that fall inside the neighbor's own region.
pub fn output_interface_cell_ids<G: GridFamily>(
    block: &Block<G>,
    gid: BlockId,
    output_extent: &Extent,
) -> Vec<usize> {
    match block.structures.get(&gid) {
        Some(s) => grid_interface_cell_ids(output_extent, &s.shifted_extent, output_extent),
        None => Vec::new(),
    }
}

/// Input-side point ids for the link from `block` to neighbor `gid`.
pub fn input_interface_point_ids<G: GridFamily>(
    block: &Block<G>,
    gid: BlockId,
    input_extent: &Extent,
) -> Vec<usize> {
    match block.structures.get(&gid) {
        Some(s) => grid_interface_point_ids(
            s.adjacency,
            &block.info.extent,
            &s.extent_with_new_ghosts,
            input_extent,
        ),
        None => Vec::new(),
    }
}

/// Output-side point ids for the link from neighbor `gid` into `block`'s
/// output. The adjacency mask is mirrored: the input side's "left neighbor"
/// is the output side's "right neighbor", which keeps the ownership rule
/// symmetric across the pair.
pub fn output_interface_point_ids<G: GridFamily>(
    block: &Block<G>,
    gid: BlockId,
    output_extent: &Extent,
) -> Vec<usize> {
    match block.structures.get(&gid) {
        Some(s) => grid_interface_point_ids(
            s.adjacency.mirrored(),
            output_extent,
            &s.shifted_extent,
            output_extent,
        ),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_ids_enumerate_the_intersection_row_major() {
        let local = Extent::new(0, 4, 0, 4, 0, 4);
        // A neighbor grown two cells into us across our right face.
        let neighbor = Extent::new(2, 8, 0, 4, 0, 4);
        let ids = grid_interface_cell_ids(&local, &neighbor, &local);
        assert_eq!(ids.len(), 2 * 4 * 4);
        // First row: cells (2,0,0) and (3,0,0).
        assert_eq!(ids[0], cell_id(&local, [2, 0, 0]));
        assert_eq!(ids[1], cell_id(&local, [3, 0, 0]));
        assert_eq!(ids[2], cell_id(&local, [2, 1, 0]));
    }

    #[test]
    fn degenerate_axis_still_yields_one_layer_of_cells() {
        let local = Extent::new(0, 4, 0, 4, 1, 1);
        let neighbor = Extent::new(2, 8, 0, 4, 1, 1);
        let ids = grid_interface_cell_ids(&local, &neighbor, &local);
        assert_eq!(ids.len(), 2 * 4);
    }

    #[test]
    fn point_counts_pair_up_across_a_link() {
        // A = [0,4], B = [4,8] along x, two ghost layers each way.
        let a = Extent::new(0, 4, 0, 4, 0, 4);
        let b = Extent::new(4, 8, 0, 4, 0, 4);

        // A sends to B: B's extent grown two cells into A, A's mask RIGHT.
        // The shared column x = 4 belongs to B and is not sent.
        let b_grown = Extent::new(2, 8, 0, 4, 0, 4);
        let a_sends =
            grid_interface_point_ids(AdjacencyMask(AdjacencyMask::RIGHT), &a, &b_grown, &a);
        assert_eq!(a_sends.len(), 2 * 5 * 5);

        // B receives from A: B's output extent against A's region, with B's
        // mask for A (LEFT) mirrored. Counts pair element-by-element.
        let b_output = Extent::new(2, 8, 0, 4, 0, 4);
        let b_receives = grid_interface_point_ids(
            AdjacencyMask(AdjacencyMask::LEFT).mirrored(),
            &b_output,
            &a,
            &b_output,
        );
        assert_eq!(b_receives.len(), a_sends.len());

        // B sends to A: A's extent grown toward B, B's mask LEFT keeps the
        // shared column in, so A receives and duplicates it.
        let a_grown = Extent::new(0, 6, 0, 4, 0, 4);
        let b_sends =
            grid_interface_point_ids(AdjacencyMask(AdjacencyMask::LEFT), &b, &a_grown, &b);
        assert_eq!(b_sends.len(), 3 * 5 * 5);

        let a_output = Extent::new(0, 6, 0, 4, 0, 4);
        let a_receives = grid_interface_point_ids(
            AdjacencyMask(AdjacencyMask::RIGHT).mirrored(),
            &a_output,
            &b,
            &a_output,
        );
        assert_eq!(a_receives.len(), b_sends.len());
    }

    #[test]
    fn left_pairing_sends_the_boundary_points() {
        let local = Extent::new(4, 8, 0, 4, 0, 4);
        let neighbor = Extent::new(0, 4, 0, 4, 0, 4);
        let sending = grid_interface_point_ids(
            AdjacencyMask(AdjacencyMask::LEFT),
            &local,
            &neighbor,
            &local,
        );
        // x = 4 is ours (we are the right block of the pairing), and it is
        // what the left neighbor needs.
        assert_eq!(sending.len(), 5 * 5);
        assert_eq!(sending[0], point_id(&local, [4, 0, 0]));
    }
}
