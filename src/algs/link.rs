//! Link building and ghost allocation.
//!
//! For every surviving (neighbor, shifted extent) pair: compute the
//! adjacency/overlap masks, classify into face/edge/corner adjacency, bump
//! the per-side ghost thickness, widen the neighbor's extent toward us, and
//! record the link. Afterwards each output grid is enlarged to the
//! accumulated extent and its interior data cloned from the input.

use crate::block::{Block, BlockInfo, BlockStructure, GridFamily};
use crate::topology::ids::{cell_id, point_id};
use crate::topology::mask::{classify, compute_masks};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Run matching and allocation for every local block, then build the
/// enlarged outputs. Per-block state is disjoint, so blocks may be processed
/// in parallel.
pub(crate) fn build_links_and_allocate<G: GridFamily>(
    blocks: &mut [Block<G>],
    inputs: &[G],
    outputs: &mut [G],
    output_ghost_levels: i32,
) {
    #[cfg(feature = "rayon")]
    {
        blocks
            .par_iter_mut()
            .zip_eq(inputs.par_iter())
            .zip_eq(outputs.par_iter_mut())
            .for_each(|((block, input), output)| {
                process_block(block, input, output, output_ghost_levels);
            });
    }
    #[cfg(not(feature = "rayon"))]
    {
        for ((block, input), output) in blocks.iter_mut().zip(inputs).zip(outputs.iter_mut()) {
            process_block(block, input, output, output_ghost_levels);
        }
    }
}

fn process_block<G: GridFamily>(
    block: &mut Block<G>,
    input: &G,
    output: &mut G,
    output_ghost_levels: i32,
) {
    let local_extent = block.info.extent;
    if !local_extent.is_valid() {
        // The block still exists, but exchanges nothing.
        log::warn!(
            "block {}: invalid extent {local_extent}; no ghosts will be generated",
            block.gid
        );
        block.structures.clear();
        return;
    }

    let Block {
        gid,
        info,
        local,
        dim,
        structures,
        links,
    } = block;
    let dim = *dim;

    structures.retain(|&neighbor_gid, structure| {
        if !G::try_match(local_extent, dim, local, structure) {
            return false;
        }

        let (adjacency, overlap) = compute_masks(&local_extent, &structure.shifted_extent);
        structure.adjacency = adjacency;
        structure.extent_with_new_ghosts = structure.shifted_extent;

        match classify(dim, adjacency, overlap) {
            Some(class) => {
                class.for_each_face(|idx| {
                    add_ghost_layer(info, structure, idx, output_ghost_levels);
                });
                links.insert(neighbor_gid);
                true
            }
            None => {
                if !adjacency.is_empty() {
                    log::warn!(
                        "block {gid}: adjacency mask {adjacency:?} with overlap {overlap:?} \
                         is inconsistent with a {dim}-D grid; dropping neighbor {neighbor_gid}"
                    );
                }
                false
            }
        }
    });

    #[cfg(any(debug_assertions, feature = "check-invariants"))]
    {
        for (neighbor_gid, structure) in structures.iter() {
            let grown = &structure.extent_with_new_ghosts;
            let shifted = &structure.shifted_extent;
            assert!(
                (0..3).all(|a| grown.min(a) <= shifted.min(a) && grown.max(a) >= shifted.max(a)),
                "neighbor {neighbor_gid} shrank while widening: {grown} vs {shifted}"
            );
        }
        for side in 0..6 {
            assert!(
                info.ghost_thickness[side] <= output_ghost_levels,
                "ghost thickness exceeds the requested level on side {side}"
            );
        }
    }

    *output = input.build_output(info);
}

/// Account for an adjacency on local face `idx`: clamp the requested ghost
/// depth to the neighbor's available depth, keep the per-side maximum, and
/// grow the neighbor's extent toward us on the opposite side.
fn add_ghost_layer<G: GridFamily>(
    info: &mut BlockInfo<G>,
    structure: &mut BlockStructure<G>,
    idx: usize,
    output_ghost_levels: i32,
) {
    let extent = structure.shifted_extent;
    let upper = idx % 2 == 1;
    let opposite = if upper { idx - 1 } else { idx + 1 };
    let depth = output_ghost_levels.min((extent[idx] - extent[opposite]).abs());

    info.ghost_thickness[idx] = info.ghost_thickness[idx].max(depth);
    structure.extent_with_new_ghosts[opposite] += if upper { -depth } else { depth };

    G::accumulate_ghosts(info, idx, structure);
}

/// Clone the input's attribute data into the enlarged output over the region
/// both extents cover, and allocate zeroed ghost marker arrays. Ghost
/// regions are filled later, over the exchange or by the hidden-ghost pass.
pub(crate) fn clone_grid_data<G: GridFamily>(input: &G, output: &mut G) {
    let in_extent = input.extent();
    let out_extent = output.extent();

    output.cell_data_mut().ensure_ghosts(out_extent.num_cells());
    output
        .point_data_mut()
        .ensure_ghosts(out_extent.num_points());

    // Degenerate axes get one cell of thickness so 2-D and 1-D grids copy.
    let cell_lo = |a: usize| in_extent.min(a).max(out_extent.min(a));
    let cell_hi = |a: usize| {
        (in_extent.max(a).max(in_extent.min(a) + 1))
            .min(out_extent.max(a).max(out_extent.min(a) + 1))
    };

    let cell_fields: Vec<_> = input.cell_data().fields.clone();
    let out_cells = &mut output.cell_data_mut().fields;
    out_cells.clear();
    for field in &cell_fields {
        let mut values = vec![0.0; out_extent.num_cells()];
        for k in cell_lo(2)..cell_hi(2) {
            for j in cell_lo(1)..cell_hi(1) {
                for i in cell_lo(0)..cell_hi(0) {
                    values[cell_id(&out_extent, [i, j, k])] =
                        field.values[cell_id(&in_extent, [i, j, k])];
                }
            }
        }
        out_cells.push(crate::grid::FieldArray::new(field.name.clone(), values));
    }

    let point_lo = |a: usize| in_extent.min(a).max(out_extent.min(a));
    let point_hi = |a: usize| in_extent.max(a).min(out_extent.max(a));

    let point_fields: Vec<_> = input.point_data().fields.clone();
    let out_points = &mut output.point_data_mut().fields;
    out_points.clear();
    for field in &point_fields {
        let mut values = vec![0.0; out_extent.num_points()];
        for k in point_lo(2)..=point_hi(2) {
            for j in point_lo(1)..=point_hi(1) {
                for i in point_lo(0)..=point_hi(0) {
                    values[point_id(&out_extent, [i, j, k])] =
                        field.values[point_id(&in_extent, [i, j, k])];
                }
            }
        }
        out_points.push(crate::grid::FieldArray::new(field.name.clone(), values));
    }
}
