//! Curvilinear grid matcher.
//!
//! Two curvilinear blocks may touch on any of the 6×6 face pairs with any of
//! the 8 axis rotations/reflections. For every face pair, the four corners
//! of the querying face are located in the other face's point layer; each
//! coincident corner seeds a 2-D sweep that advances both index pairs in all
//! four sign combinations and keeps the largest matching rectangle. The
//! search also runs with local/remote swapped to catch asymmetrical
//! embeddings, and stops as soon as a full 2-D face is found.

use crate::block::{BlockStructure, Grid2d};
use crate::grid::curvilinear::{tangent_axes, CurvilinearGrid};
use crate::grid::Scalar;
use crate::topology::extent::Extent;
use crate::topology::ids::{point_id, point_ijk};

/// Family geometry of a curvilinear block descriptor: the six outer-face
/// point layers, each indexed over the collapsed face extent.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvilinearDescriptor<S: Scalar> {
    pub faces: [Vec<[S; 3]>; 6],
}

impl<S: Scalar> Default for CurvilinearDescriptor<S> {
    fn default() -> Self {
        Self {
            faces: std::array::from_fn(|_| Vec::new()),
        }
    }
}

const SWEEP_DIRECTION: [i32; 2] = [1, -1];

#[derive(Default)]
struct SweepState {
    /// Rectangle on the local block's face.
    local_grid: Grid2d,
    /// Rectangle on the neighbor's face.
    grid: Grid2d,
    connected: bool,
    best_connection_found: bool,
}

#[inline]
fn values_equal3<S: Scalar>(a: [S; 3], b: [S; 3]) -> bool {
    S::values_equal(a[0], b[0]) && S::values_equal(a[1], b[1]) && S::values_equal(a[2], b[2])
}

/// Nearest point of `pts` to `target` by Euclidean distance.
fn nearest_point_id<S: Scalar>(pts: &[[S; 3]], target: [S; 3]) -> Option<usize> {
    let t = [target[0].as_f64(), target[1].as_f64(), target[2].as_f64()];
    let mut best: Option<(usize, f64)> = None;
    for (id, p) in pts.iter().enumerate() {
        let dx = p[0].as_f64() - t[0];
        let dy = p[1].as_f64() - t[1];
        let dz = p[2].as_f64() - t[2];
        let d2 = dx * dx + dy * dy + dz * dz;
        match best {
            Some((_, bd)) if bd <= d2 => {}
            _ => best = Some((id, d2)),
        }
    }
    best.map(|(id, _)| id)
}

/// In-face extent indices (even) of face `face_id`'s x and y sweep axes.
#[inline]
fn face_dims(face_id: usize) -> (usize, usize) {
    let (u, v) = tangent_axes(face_id);
    (2 * u, 2 * v)
}

/// Look for the querying face's corners inside the other face and seed
/// sweeps from every coincident corner. One match is not sufficient to stop:
/// an edge can be caught on one face while an entire face fits elsewhere.
#[allow(clippy::too_many_arguments)]
fn grids_fit<S: Scalar>(
    state: &mut SweepState,
    query_pts: &[[S; 3]],
    query_extent: &Extent,
    query_face_id: usize,
    pts: &[[S; 3]],
    extent: &Extent,
    face_id: usize,
) -> bool {
    let (query_x_dim, query_y_dim) = face_dims(query_face_id);
    let x_corners = [query_extent[query_x_dim], query_extent[query_x_dim + 1]];
    let y_corners = [query_extent[query_y_dim], query_extent[query_y_dim + 1]];

    let mut query_ijk = [0i32; 3];
    query_ijk[query_face_id / 2] = query_extent[query_face_id];

    let mut ret = false;
    for x_corner_id in 0..2 {
        query_ijk[query_x_dim / 2] = x_corners[x_corner_id];
        for y_corner_id in 0..2 {
            query_ijk[query_y_dim / 2] = y_corners[y_corner_id];
            let query_point = query_pts[point_id(query_extent, query_ijk)];
            let Some(pid) = nearest_point_id(pts, query_point) else {
                continue;
            };
            if !values_equal3(pts[pid], query_point) {
                continue;
            }
            if sweep_grids(
                state,
                query_pts,
                query_face_id,
                query_extent,
                query_x_dim,
                x_corners[x_corner_id],
                x_corners[(x_corner_id + 1) % 2],
                SWEEP_DIRECTION[x_corner_id],
                query_y_dim,
                y_corners[y_corner_id],
                y_corners[(y_corner_id + 1) % 2],
                SWEEP_DIRECTION[y_corner_id],
                pts,
                pid,
                face_id,
                extent,
            ) {
                ret = true;
            }
        }
    }
    ret
}

/// Sweep both faces from a coincident corner in every direction pair. A
/// candidate rectangle replaces the incumbent only when strictly larger in
/// one of its dimensions, so the first rectangle found wins ties.
#[allow(clippy::too_many_arguments)]
fn sweep_grids<S: Scalar>(
    state: &mut SweepState,
    query_pts: &[[S; 3]],
    query_face_id: usize,
    query_extent: &Extent,
    query_x_dim: usize,
    query_x_begin: i32,
    query_x_end: i32,
    direction_x: i32,
    query_y_dim: usize,
    query_y_begin: i32,
    query_y_end: i32,
    direction_y: i32,
    pts: &[[S; 3]],
    pid: usize,
    face_id: usize,
    extent: &Extent,
) -> bool {
    let mut query_ijk = [0i32; 3];
    query_ijk[query_face_id / 2] = query_extent[query_face_id];
    let start_ijk = point_ijk(extent, pid);

    let (x_dim, y_dim) = face_dims(face_id);
    let x_corners = [extent[x_dim], extent[x_dim + 1]];
    let y_corners = [extent[y_dim], extent[y_dim + 1]];
    let x_begin = start_ijk[x_dim / 2];
    let y_begin = start_ijk[y_dim / 2];

    let mut ret = false;
    for x_corner_id in 0..2 {
        for y_corner_id in 0..2 {
            let sweep_x = SWEEP_DIRECTION[x_corner_id];
            let sweep_y = SWEEP_DIRECTION[y_corner_id];
            let mut ijk = start_ijk;
            let mut fitting = true;

            let mut query_x = query_x_begin;
            let mut query_y = query_y_begin;
            let mut x = x_begin;
            let mut y = y_begin;

            while fitting
                && query_x != query_x_end + direction_x
                && x != x_corners[(x_corner_id + 1) % 2] + sweep_x
            {
                query_ijk[query_x_dim / 2] = query_x;
                ijk[x_dim / 2] = x;

                query_y = query_y_begin;
                y = y_begin;
                while fitting
                    && query_y != query_y_end + direction_y
                    && y != y_corners[(y_corner_id + 1) % 2] + sweep_y
                {
                    query_ijk[query_y_dim / 2] = query_y;
                    ijk[y_dim / 2] = y;

                    let query_point = query_pts[point_id(query_extent, query_ijk)];
                    let point = pts[point_id(extent, ijk)];
                    if !values_equal3(point, query_point) {
                        fitting = false;
                    }
                    query_y += direction_y;
                    y += sweep_y;
                }
                query_x += direction_x;
                x += sweep_x;
            }
            query_x -= direction_x;
            query_y -= direction_y;
            x -= sweep_x;
            y -= sweep_y;

            let incumbent = &state.local_grid;
            if fitting
                && (incumbent.extent_id < 0
                    || (incumbent.end_x - incumbent.start_x).abs()
                        < (query_x - query_x_begin).abs()
                    || (incumbent.end_y - incumbent.start_y).abs()
                        < (query_y - query_y_begin).abs())
            {
                state.local_grid = Grid2d {
                    extent_id: query_face_id as i32,
                    start_x: query_x_begin,
                    end_x: query_x,
                    start_y: query_y_begin,
                    end_y: query_y,
                    x_orientation: direction_x,
                    y_orientation: direction_y,
                };
                state.grid = Grid2d {
                    extent_id: face_id as i32,
                    start_x: x_begin,
                    end_x: x,
                    start_y: y_begin,
                    end_y: y,
                    x_orientation: sweep_x,
                    y_orientation: sweep_y,
                };
                ret = true;
            }
        }
    }
    ret
}

/// Try every remote face against one local face; on success canonicalize the
/// local rectangle so its orientations are positive (flipping the remote
/// rectangle accordingly).
#[allow(clippy::too_many_arguments)]
fn fit_face_pair<S: Scalar>(
    state: &mut SweepState,
    local_layer: &[[S; 3]],
    local_face: &Extent,
    local_face_id: usize,
    remote_layer: &[[S; 3]],
    remote_face: &Extent,
    remote_face_id: usize,
) {
    if grids_fit(
        state,
        local_layer,
        local_face,
        local_face_id,
        remote_layer,
        remote_face,
        remote_face_id,
    ) {
        state.connected = true;
    } else if grids_fit(
        state,
        remote_layer,
        remote_face,
        remote_face_id,
        local_layer,
        local_face,
        local_face_id,
    ) {
        state.connected = true;
        std::mem::swap(&mut state.grid, &mut state.local_grid);
    } else {
        return;
    }

    if state.local_grid.start_x > state.local_grid.end_x {
        std::mem::swap(&mut state.local_grid.start_x, &mut state.local_grid.end_x);
        state.local_grid.x_orientation *= -1;
        std::mem::swap(&mut state.grid.start_x, &mut state.grid.end_x);
        state.grid.x_orientation *= -1;
    }
    if state.local_grid.start_y > state.local_grid.end_y {
        std::mem::swap(&mut state.local_grid.start_y, &mut state.local_grid.end_y);
        state.local_grid.y_orientation *= -1;
        std::mem::swap(&mut state.grid.start_y, &mut state.grid.end_y);
        state.grid.y_orientation *= -1;
    }

    // A full 2-D rectangle is the best connection there is.
    if state.grid.end_x - state.grid.start_x != 0 && state.grid.end_y - state.grid.start_y != 0 {
        state.best_connection_found = true;
    }
}

pub(crate) fn synchronize_extents<S: Scalar>(
    local_extent: Extent,
    local_dim: i32,
    local: &CurvilinearDescriptor<S>,
    remote: &mut BlockStructure<CurvilinearGrid<S>>,
) -> bool {
    let extent = remote.extent;
    if remote.dim != local_dim || !extent.is_valid() {
        return false;
    }

    let remote_faces: [Extent; 6] =
        std::array::from_fn(|i| CurvilinearGrid::<S>::face_extent(&extent, i));

    let mut state = SweepState::default();
    for local_face_id in 0..6 {
        if state.best_connection_found {
            break;
        }
        let local_face = CurvilinearGrid::<S>::face_extent(&local_extent, local_face_id);
        let local_layer = &local.faces[local_face_id];
        for remote_face_id in 0..6 {
            if state.best_connection_found {
                break;
            }
            fit_face_pair(
                &mut state,
                local_layer,
                &local_face,
                local_face_id,
                &remote.geometry.faces[remote_face_id],
                &remote_faces[remote_face_id],
                remote_face_id,
            );
        }
    }

    if !state.connected {
        return false;
    }

    let local_grid = state.local_grid;
    let fid = local_grid.extent_id as usize;
    let (x_dim, y_dim) = face_dims(fid);

    // The two in-face axes take the discovered rectangle; the out-of-face
    // axis starts on our face and extends away from us by the neighbor's
    // depth behind its matched face.
    let mut shifted = extent;
    shifted[x_dim] = local_grid.start_x;
    shifted[x_dim + 1] = local_grid.end_x;
    shifted[y_dim] = local_grid.start_y;
    shifted[y_dim + 1] = local_grid.end_y;

    let rid = state.grid.extent_id as usize;
    let r_opposite = if rid % 2 == 1 { rid - 1 } else { rid + 1 };
    let depth = (extent[rid] - extent[r_opposite]).abs();
    let axis = fid / 2;
    if fid % 2 == 1 {
        shifted[2 * axis] = local_extent[fid];
        shifted[2 * axis + 1] = local_extent[fid] + depth;
    } else {
        shifted[2 * axis + 1] = local_extent[fid];
        shifted[2 * axis] = local_extent[fid] - depth;
    }

    remote.shifted_extent = shifted;
    remote.interface = state.grid;
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockStructure;

    /// Identity-embedded grid: point (i, j, k) sits at (i, j, k).
    fn lattice(extent: Extent) -> CurvilinearGrid<f64> {
        let dims = extent.point_dims();
        let mut points = Vec::with_capacity(extent.num_points());
        for k in 0..dims[2] {
            for j in 0..dims[1] {
                for i in 0..dims[0] {
                    points.push([
                        (extent.min(0) + i) as f64,
                        (extent.min(1) + j) as f64,
                        (extent.min(2) + k) as f64,
                    ]);
                }
            }
        }
        CurvilinearGrid::new(extent, points)
    }

    fn descriptor(grid: &CurvilinearGrid<f64>) -> CurvilinearDescriptor<f64> {
        let sub = grid.extent;
        CurvilinearDescriptor {
            faces: std::array::from_fn(|i| grid.outer_face_layer(&sub, i)),
        }
    }

    #[test]
    fn aligned_neighbors_connect_on_the_right_face() {
        let a = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        let b = lattice(Extent::new(2, 4, 0, 2, 0, 2));
        let local = descriptor(&a);
        let mut remote = BlockStructure::new(b.extent, 3, descriptor(&b));
        assert!(synchronize_extents(a.extent, 3, &local, &mut remote));
        assert_eq!(remote.shifted_extent, Extent::new(2, 4, 0, 2, 0, 2));
        // The neighbor was matched through its left face.
        assert_eq!(remote.interface.extent_id, 0);
        assert_eq!(remote.interface.x_orientation, 1);
        assert_eq!(remote.interface.y_orientation, 1);
    }

    #[test]
    fn differing_index_origins_still_connect() {
        // Same geometry as above but the neighbor indexes from zero.
        let a = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        let mut b = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        for p in &mut b.points {
            p[0] += 2.0;
        }
        let local = descriptor(&a);
        let mut remote = BlockStructure::new(b.extent, 3, descriptor(&b));
        assert!(synchronize_extents(a.extent, 3, &local, &mut remote));
        assert_eq!(remote.shifted_extent, Extent::new(2, 4, 0, 2, 0, 2));
    }

    #[test]
    fn separated_blocks_do_not_connect() {
        let a = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        let mut b = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        for p in &mut b.points {
            p[0] += 5.0;
        }
        let local = descriptor(&a);
        let mut remote = BlockStructure::new(b.extent, 3, descriptor(&b));
        assert!(!synchronize_extents(a.extent, 3, &local, &mut remote));
    }

    #[test]
    fn rotated_neighbor_matches_with_flipped_orientation() {
        // The neighbor occupies x in [2, 4] but its own x index runs in the
        // opposite direction: point (i, j, k) sits at (4 - i, j, k).
        let a = lattice(Extent::new(0, 2, 0, 2, 0, 2));
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
        let local = descriptor(&a);
        let mut remote = BlockStructure::new(b.extent, 3, descriptor(&b));
        assert!(synchronize_extents(a.extent, 3, &local, &mut remote));
        // The neighbor's matched face is its own right face (x = 0 there maps
        // to x = 4 here), one extent deep behind our right face.
        assert_eq!(remote.interface.extent_id, 1);
        assert_eq!(remote.shifted_extent[0], 2);
        assert_eq!(remote.shifted_extent[1], 4);
    }

    #[test]
    fn reflected_face_pair_keeps_local_orientations_positive() {
        // The neighbor touches our left face with its own y-max face, its
        // index axes rotated so that its k tracks our y and its i tracks our
        // z in reverse: point (i, j, k) sits at (j - 2, k, 2 - i).
        let a = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        let extent_b = Extent::new(0, 2, 0, 2, 0, 2);
        let dims = extent_b.point_dims();
        let mut points = Vec::with_capacity(extent_b.num_points());
        for k in 0..dims[2] {
            for j in 0..dims[1] {
                for i in 0..dims[0] {
                    points.push([(j - 2) as f64, k as f64, (2 - i) as f64]);
                }
            }
        }
        let b = CurvilinearGrid::new(extent_b, points);
        let local = descriptor(&a);
        let mut remote = BlockStructure::new(b.extent, 3, descriptor(&b));
        assert!(synchronize_extents(a.extent, 3, &local, &mut remote));

        // The neighbor was matched through its y-max face and lands one
        // depth behind our left face.
        let itf = remote.interface;
        assert_eq!(itf.extent_id, 3);
        assert_eq!(itf.x_orientation, 1);
        assert_eq!(itf.y_orientation, -1);
        assert_eq!(remote.shifted_extent, Extent::new(-2, 0, 0, 2, 0, 2));
    }

    #[test]
    fn corner_contact_yields_degenerate_rectangle() {
        let a = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        let mut b = lattice(Extent::new(0, 2, 0, 2, 0, 2));
        for p in &mut b.points {
            p[0] += 2.0;
            p[1] += 2.0;
            p[2] += 2.0;
        }
        let local = descriptor(&a);
        let mut remote = BlockStructure::new(b.extent, 3, descriptor(&b));
        assert!(synchronize_extents(a.extent, 3, &local, &mut remote));
        let itf = remote.interface;
        assert_eq!(itf.start_x, itf.end_x);
        assert_eq!(itf.start_y, itf.end_y);
    }
}
