use grid_halo::grid::markers::HIDDEN_CELL;
use grid_halo::prelude::*;

fn sheet(extent: Extent, x: Vec<f64>, y: Vec<f64>) -> RectilinearGrid<f64> {
    RectilinearGrid::new(extent, x, y, vec![0.0])
}

fn run(
    inputs: &[RectilinearGrid<f64>],
    input_levels: i32,
    output_levels: i32,
) -> (Vec<RectilinearGrid<f64>>, LinkSummary) {
    let mut outputs = vec![RectilinearGrid::default(); inputs.len()];
    let summary =
        compute_rectilinear_ghosts(inputs, &mut outputs, input_levels, output_levels, &NoComm)
            .expect("pipeline");
    (outputs, summary)
}

#[test]
fn adjacent_sheets_append_the_neighbors_coordinate() {
    // x-coords [0,1,2] and [2,3,4] with a shared y axis: single-face
    // adjacency, one ghost layer.
    let inputs = vec![
        sheet(
            Extent::new(0, 2, 0, 3, 0, 0),
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
        sheet(
            Extent::new(2, 4, 0, 3, 0, 0),
            vec![2.0, 3.0, 4.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
    ];
    let (outputs, summary) = run(&inputs, 0, 1);

    assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));
    assert_eq!(outputs[0].extent, Extent::new(0, 3, 0, 3, 0, 0));
    // The appended ghost x-coordinate is the neighbor's second sample.
    assert_eq!(outputs[0].coords[0], vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(outputs[0].coords[1], vec![0.0, 1.0, 2.0, 3.0]);

    assert_eq!(outputs[1].extent, Extent::new(1, 4, 0, 3, 0, 0));
    assert_eq!(outputs[1].coords[0], vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn value_mismatch_keeps_sheets_apart() {
    // Index-adjacent extents whose x coordinates do not continue each other.
    let inputs = vec![
        sheet(
            Extent::new(0, 2, 0, 3, 0, 0),
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
        sheet(
            Extent::new(2, 4, 0, 3, 0, 0),
            vec![2.5, 3.5, 4.5],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
    ];
    let (outputs, summary) = run(&inputs, 0, 1);
    assert!(summary.links_of(BlockId(0)).unwrap().is_empty());
    assert_eq!(outputs[0].coords[0], vec![0.0, 1.0, 2.0]);
}

#[test]
fn differing_index_origins_still_match_on_values() {
    // The second sheet indexes from zero; the coordinate values place it to
    // the right of the first.
    let inputs = vec![
        sheet(
            Extent::new(0, 2, 0, 3, 0, 0),
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
        sheet(
            Extent::new(0, 2, 0, 3, 0, 0),
            vec![2.0, 3.0, 4.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
    ];
    let (outputs, summary) = run(&inputs, 0, 1);
    assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));
    assert_eq!(outputs[0].extent, Extent::new(0, 3, 0, 3, 0, 0));
    assert_eq!(outputs[0].coords[0], vec![0.0, 1.0, 2.0, 3.0]);
}

#[test]
fn ghost_coordinates_prepend_on_the_lower_side() {
    let inputs = vec![
        sheet(
            Extent::new(0, 2, 0, 3, 0, 0),
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
        sheet(
            Extent::new(2, 4, 0, 3, 0, 0),
            vec![2.0, 3.0, 4.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
    ];
    let (outputs, _) = run(&inputs, 0, 2);
    // Both of the left sheet's cells fit into the right sheet's halo.
    assert_eq!(outputs[1].extent, Extent::new(0, 4, 0, 3, 0, 0));
    assert_eq!(outputs[1].coords[0], vec![0.0, 1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn stripping_input_ghosts_restores_the_input_extent() {
    // Each sheet carries one ghost column toward its neighbor.
    let mut a = sheet(
        Extent::new(0, 3, 0, 3, 0, 0),
        vec![0.0, 1.0, 2.0, 3.0],
        vec![0.0, 1.0, 2.0, 3.0],
    );
    let mut b = sheet(
        Extent::new(1, 4, 0, 3, 0, 0),
        vec![1.0, 2.0, 3.0, 4.0],
        vec![0.0, 1.0, 2.0, 3.0],
    );
    {
        let extent = a.extent;
        let ghosts = a.cell_data.ensure_ghosts(extent.num_cells());
        for j in 0..3 {
            ghosts[grid_halo::topology::ids::cell_id(&extent, [2, j, 0])] = 1;
        }
    }
    {
        let extent = b.extent;
        let ghosts = b.cell_data.ensure_ghosts(extent.num_cells());
        for j in 0..3 {
            ghosts[grid_halo::topology::ids::cell_id(&extent, [1, j, 0])] = 1;
        }
    }

    let (outputs, summary) = run(&[a, b], 1, 1);
    assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));
    assert_eq!(outputs[0].extent, Extent::new(0, 3, 0, 3, 0, 0));
    assert_eq!(outputs[0].coords[0], vec![0.0, 1.0, 2.0, 3.0]);
    assert_eq!(outputs[1].extent, Extent::new(1, 4, 0, 3, 0, 0));
    assert_eq!(outputs[1].coords[0], vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn hidden_cells_appear_where_no_neighbor_covers() {
    // The right sheet is shorter in y, so part of the left sheet's halo is
    // allocated but never filled.
    let inputs = vec![
        sheet(
            Extent::new(0, 2, 0, 3, 0, 0),
            vec![0.0, 1.0, 2.0],
            vec![0.0, 1.0, 2.0, 3.0],
        ),
        sheet(
            Extent::new(2, 4, 0, 2, 0, 0),
            vec![2.0, 3.0, 4.0],
            vec![0.0, 1.0, 2.0],
        ),
    ];
    let (outputs, summary) = run(&inputs, 0, 1);
    assert!(summary.links_of(BlockId(0)).unwrap().contains(&BlockId(1)));

    let out = &outputs[0];
    assert_eq!(out.extent, Extent::new(0, 3, 0, 3, 0, 0));
    let ghosts = out.cell_data.ghosts.as_ref().unwrap();
    let e = out.extent;
    // Rows covered by the neighbor are duplicates; the top row of the halo
    // has no grid to get data from and stays hidden.
    assert_eq!(
        ghosts[grid_halo::topology::ids::cell_id(&e, [2, 0, 0])],
        grid_halo::grid::markers::DUPLICATE_CELL
    );
    assert_eq!(
        ghosts[grid_halo::topology::ids::cell_id(&e, [2, 2, 0])],
        HIDDEN_CELL
    );
}
