use grid_halo::grid::markers::{DUPLICATE_POINT, HIDDEN_POINT};
use grid_halo::prelude::*;
use grid_halo::topology::ids::point_id;

/// Identity-embedded lattice shifted by `offset`: point (i, j, k) sits at
/// (i, j, k) + offset.
fn lattice(extent: Extent, offset: [f64; 3]) -> CurvilinearGrid<f64> {
    let dims = extent.point_dims();
    let mut points = Vec::with_capacity(extent.num_points());
    for k in 0..dims[2] {
        for j in 0..dims[1] {
            for i in 0..dims[0] {
                points.push([
                    (extent.min(0) + i) as f64 + offset[0],
                    (extent.min(1) + j) as f64 + offset[1],
                    (extent.min(2) + k) as f64 + offset[2],
                ]);
            }
        }
    }
    CurvilinearGrid::new(extent, points)
}

fn run(
    inputs: &[CurvilinearGrid<f64>],
    output_levels: i32,
) -> (Vec<CurvilinearGrid<f64>>, LinkSummary) {
    let mut outputs = vec![CurvilinearGrid::default(); inputs.len()];
    let summary = compute_curvilinear_ghosts(inputs, &mut outputs, 0, output_levels, &NoComm)
        .expect("pipeline");
    (outputs, summary)
}

#[test]
fn aligned_blocks_link_and_exchange_ghost_points() {
    let inputs = vec![
        lattice(Extent::new(0, 2, 0, 2, 0, 2), [0.0; 3]),
        lattice(Extent::new(2, 4, 0, 2, 0, 2), [0.0; 3]),
    ];
    let (outputs, summary) = run(&inputs, 1);

    assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));
    assert_eq!(outputs[0].extent, Extent::new(0, 3, 0, 2, 0, 2));
    assert_eq!(outputs[1].extent, Extent::new(1, 4, 0, 2, 0, 2));

    // The ghost point sheet at x = 3 arrived from the neighbor.
    let out = &outputs[0];
    for k in 0..=2 {
        for j in 0..=2 {
            let p = out.points[point_id(&out.extent, [3, j, k])];
            assert_eq!(p, [3.0, j as f64, k as f64], "ghost point (3,{j},{k})");
        }
    }
    // Interior points came from the input.
    assert_eq!(out.points[point_id(&out.extent, [0, 0, 0])], [0.0, 0.0, 0.0]);
}

#[test]
fn rotated_neighbor_is_matched_through_its_own_face() {
    // The neighbor occupies x in [2, 4] but indexes x in the opposite
    // direction: its point (i, j, k) sits at (4 - i, j, k).
    let a = lattice(Extent::new(0, 2, 0, 2, 0, 2), [0.0; 3]);
    let extent_b = Extent::new(0, 2, 0, 2, 0, 2);
    let dims = extent_b.point_dims();
    let mut points = Vec::with_capacity(extent_b.num_points());
    for k in 0..dims[2] {
        for j in 0..dims[1] {
            for i in 0..dims[0] {
                points.push([4.0 - i as f64, j as f64, k as f64]);
            }
        }
    }
    let b = CurvilinearGrid::new(extent_b, points);

    let (outputs, summary) = run(&[a, b], 1);
    assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));
    // The local frame still grows across its right face.
    assert_eq!(outputs[0].extent, Extent::new(0, 3, 0, 2, 0, 2));
}

#[test]
fn separated_blocks_do_not_link() {
    let inputs = vec![
        lattice(Extent::new(0, 2, 0, 2, 0, 2), [0.0; 3]),
        lattice(Extent::new(0, 2, 0, 2, 0, 2), [10.0, 0.0, 0.0]),
    ];
    let (outputs, summary) = run(&inputs, 1);
    assert!(summary.links_of(BlockId(0)).unwrap().is_empty());
    assert_eq!(outputs[0].extent, Extent::new(0, 2, 0, 2, 0, 2));
}

#[test]
fn shared_face_points_duplicate_on_the_lower_block() {
    let inputs = vec![
        lattice(Extent::new(0, 2, 0, 2, 0, 2), [0.0; 3]),
        lattice(Extent::new(2, 4, 0, 2, 0, 2), [0.0; 3]),
    ];
    let (outputs, _) = run(&inputs, 1);

    let a_marks = outputs[0].point_data.ghosts.as_ref().unwrap();
    let b_marks = outputs[1].point_data.ghosts.as_ref().unwrap();
    let a_mark = a_marks[point_id(&outputs[0].extent, [2, 1, 1])];
    let b_mark = b_marks[point_id(&outputs[1].extent, [2, 1, 1])];
    assert_eq!(a_mark, DUPLICATE_POINT);
    assert_eq!(b_mark, 0);
}

#[test]
fn unfilled_halo_points_stay_hidden() {
    // The neighbor only spans half of our y range; the rest of the halo
    // sheet has no source and keeps its hidden marking.
    let inputs = vec![
        lattice(Extent::new(0, 2, 0, 4, 0, 2), [0.0; 3]),
        lattice(Extent::new(2, 4, 0, 2, 0, 2), [0.0; 3]),
    ];
    let (outputs, summary) = run(&inputs, 1);
    assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));

    let out = &outputs[0];
    assert_eq!(out.extent, Extent::new(0, 3, 0, 4, 0, 2));
    let marks = out.point_data.ghosts.as_ref().unwrap();
    assert_eq!(marks[point_id(&out.extent, [3, 1, 1])], DUPLICATE_POINT);
    assert_eq!(marks[point_id(&out.extent, [3, 4, 1])], HIDDEN_POINT);
}
