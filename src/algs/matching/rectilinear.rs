//! Rectilinear grid matcher.
//!
//! Per axis, an [`AxisFit`] locates the contiguous run of value-equal
//! entries shared by the two coordinate arrays: the array with the smaller
//! last value is the "lower" one, the other is scanned for the entry where
//! the run begins, and the run must extend to the lower array's end. The
//! remote extent is then translated so the runs coincide.

use crate::block::BlockStructure;
use crate::grid::rectilinear::RectilinearGrid;
use crate::grid::Scalar;
use crate::topology::extent::Extent;

/// Family geometry of a rectilinear block descriptor: the three peeled
/// coordinate arrays.
#[derive(Clone, Debug, PartialEq)]
pub struct RectilinearDescriptor<S: Scalar> {
    pub coords: [Vec<S>; 3],
}

impl<S: Scalar> Default for RectilinearDescriptor<S> {
    fn default() -> Self {
        Self {
            coords: [Vec::new(), Vec::new(), Vec::new()],
        }
    }
}

/// Result of fitting two coordinate arrays along one axis. `min_id`/`max_id`
/// index the remote array, `local_min_id`/`local_max_id` the local one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct AxisFit {
    pub min_id: i32,
    pub max_id: i32,
    pub local_min_id: i32,
    pub local_max_id: i32,
    pub overlaps: bool,
}

impl Default for AxisFit {
    fn default() -> Self {
        Self {
            min_id: 0,
            max_id: -1,
            local_min_id: 0,
            local_max_id: -1,
            overlaps: false,
        }
    }
}

/// Locate the shared run of `local` and `remote` coordinates.
pub(crate) fn fit_axis<S: Scalar>(local: &[S], remote: &[S]) -> AxisFit {
    let mut fit = AxisFit::default();
    if local.is_empty() || remote.is_empty() {
        return fit;
    }
    let local_is_upper = local[local.len() - 1] > remote[remote.len() - 1];
    let (lower_max, upper_max) = if local_is_upper {
        (remote, local)
    } else {
        (local, remote)
    };
    if let Some((lower_ids, upper_ids)) = fit_arrays(lower_max, upper_max) {
        fit.overlaps = true;
        if local_is_upper {
            (fit.min_id, fit.max_id) = lower_ids;
            (fit.local_min_id, fit.local_max_id) = upper_ids;
        } else {
            (fit.local_min_id, fit.local_max_id) = lower_ids;
            (fit.min_id, fit.max_id) = upper_ids;
        }
    }
    fit
}

/// Fit the array ending lower against the one ending higher. On success the
/// inclusive overlap ranges are returned as `(lower_max ids, upper_max ids)`.
fn fit_arrays<S: Scalar>(lower_max: &[S], upper_max: &[S]) -> Option<((i32, i32), (i32, i32))> {
    let lower_is_min = !(lower_max[0] > upper_max[0]);
    let (lower_min, upper_min) = if lower_is_min {
        (lower_max, upper_max)
    } else {
        (upper_max, lower_max)
    };

    // Scan the lower-starting array for the entry where the run could begin.
    let mut id = 0usize;
    while id < lower_min.len()
        && lower_min[id] < upper_min[0]
        && !S::values_equal(lower_min[id], upper_min[0])
    {
        id += 1;
    }
    if id == lower_min.len() {
        return None;
    }

    // Entry-by-entry verification; the run must reach the lower array's end.
    let mut lower_id = id;
    let mut upper_id = 0usize;
    while lower_id < lower_min.len()
        && upper_id < upper_min.len()
        && S::values_equal(lower_min[lower_id], upper_min[upper_id])
    {
        lower_id += 1;
        upper_id += 1;
    }
    if lower_id != lower_min.len() {
        return None;
    }

    let lower_min_ids = (id as i32, lower_id as i32 - 1);
    let upper_min_ids = (0, upper_id as i32 - 1);
    Some(if lower_is_min {
        (lower_min_ids, upper_min_ids)
    } else {
        (upper_min_ids, lower_min_ids)
    })
}

pub(crate) fn synchronize_extents<S: Scalar>(
    local_extent: Extent,
    local_dim: i32,
    local: &RectilinearDescriptor<S>,
    remote: &mut BlockStructure<RectilinearGrid<S>>,
) -> bool {
    let extent = remote.extent;
    if remote.dim != local_dim || !extent.is_valid() {
        return false;
    }

    let fits = [
        fit_axis(&local.coords[0], &remote.geometry.coords[0]),
        fit_axis(&local.coords[1], &remote.geometry.coords[1]),
        fit_axis(&local.coords[2], &remote.geometry.coords[2]),
    ];

    // The overlap between the two grids needs at least one degenerate
    // dimension for them to be adjacent rather than intersecting.
    if (!fits[0].overlaps || !fits[1].overlaps || !fits[2].overlaps)
        && (fits[0].min_id != fits[0].max_id
            || fits[1].min_id != fits[1].max_id
            || fits[2].min_id != fits[2].max_id)
    {
        return false;
    }

    let shift = [
        extent[0] + fits[0].min_id - local_extent[0] - fits[0].local_min_id,
        extent[2] + fits[1].min_id - local_extent[2] - fits[1].local_min_id,
        extent[4] + fits[2].min_id - local_extent[4] - fits[2].local_min_id,
    ];
    remote.shifted_extent = extent.shifted_by(shift);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_prefix_run_is_found() {
        // Shared boundary value 2.0 at local index 2, remote index 0.
        let fit = fit_axis(&[0.0f64, 1.0, 2.0], &[2.0, 3.0, 4.0]);
        assert!(fit.overlaps);
        assert_eq!((fit.local_min_id, fit.local_max_id), (2, 2));
        assert_eq!((fit.min_id, fit.max_id), (0, 0));
    }

    #[test]
    fn run_with_pre_existing_ghost_overlap() {
        // Two shared entries: local [2,3] against remote's leading [2,3].
        let fit = fit_axis(&[0.0f64, 1.0, 2.0, 3.0], &[2.0, 3.0, 4.0, 5.0]);
        assert!(fit.overlaps);
        assert_eq!((fit.local_min_id, fit.local_max_id), (2, 3));
        assert_eq!((fit.min_id, fit.max_id), (0, 1));
    }

    #[test]
    fn identical_arrays_overlap_fully() {
        let fit = fit_axis(&[0.0f64, 1.0, 2.0], &[0.0, 1.0, 2.0]);
        assert!(fit.overlaps);
        assert_eq!((fit.local_min_id, fit.local_max_id), (0, 2));
        assert_eq!((fit.min_id, fit.max_id), (0, 2));
    }

    #[test]
    fn remote_below_local_swaps_roles() {
        let fit = fit_axis(&[2.0f64, 3.0, 4.0], &[0.0, 1.0, 2.0]);
        assert!(fit.overlaps);
        assert_eq!((fit.local_min_id, fit.local_max_id), (0, 0));
        assert_eq!((fit.min_id, fit.max_id), (2, 2));
    }

    #[test]
    fn value_mismatch_does_not_overlap() {
        let fit = fit_axis(&[0.0f64, 1.0, 2.0], &[2.5, 3.5]);
        assert!(!fit.overlaps);
        let fit = fit_axis(&[0.0f64, 1.0, 2.0], &[1.0, 2.5]);
        assert!(!fit.overlaps);
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        let fit = fit_axis(&[0.0f64, 1.0], &[5.0, 6.0]);
        assert!(!fit.overlaps);
    }

    #[test]
    fn integer_axes_use_exact_equality() {
        let fit = fit_axis(&[0i32, 2, 4], &[4, 6, 8]);
        assert!(fit.overlaps);
        assert_eq!((fit.local_min_id, fit.local_max_id), (2, 2));
        assert_eq!((fit.min_id, fit.max_id), (0, 0));
    }

    fn structure(
        extent: Extent,
        dim: i32,
        coords: [Vec<f64>; 3],
    ) -> BlockStructure<RectilinearGrid<f64>> {
        BlockStructure::new(extent, dim, RectilinearDescriptor { coords })
    }

    #[test]
    fn two_dimensional_neighbors_synchronize() {
        // A: x [0,1,2], B: x [2,3,4]; y shared [0,1,2,3]; both 2-D sheets.
        let local = RectilinearDescriptor {
            coords: [vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0, 3.0], vec![0.0]],
        };
        let mut remote = structure(
            Extent::new(0, 2, 0, 3, 0, 0),
            2,
            [vec![2.0, 3.0, 4.0], vec![0.0, 1.0, 2.0, 3.0], vec![0.0]],
        );
        assert!(synchronize_extents(
            Extent::new(0, 2, 0, 3, 0, 0),
            2,
            &local,
            &mut remote
        ));
        assert_eq!(remote.shifted_extent, Extent::new(2, 4, 0, 3, 0, 0));
    }

    #[test]
    fn intersecting_grids_are_rejected() {
        // Remote x range sits strictly inside the local one: no adjacency.
        let local = RectilinearDescriptor {
            coords: [vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0, 1.0], vec![0.0]],
        };
        let mut remote = structure(
            Extent::new(0, 1, 0, 1, 0, 0),
            2,
            [vec![1.0, 2.0], vec![0.0, 1.0], vec![0.0]],
        );
        assert!(!synchronize_extents(
            Extent::new(0, 4, 0, 1, 0, 0),
            2,
            &local,
            &mut remote
        ));
    }
}
