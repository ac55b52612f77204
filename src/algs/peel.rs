//! Ghost peeling: recover the inner non-ghost extent of a grid that already
//! carries ghost layers.
//!
//! A cursor walks inward from each of the two extreme corners, one axis at a
//! time; an axis locks once the next step would enter a ghost cell.
//! Degenerate axes start locked, and a ghost level larger than an axis width
//! clamps to the axis width. The returned extent is expressed in the input's
//! own frame.

use crate::topology::extent::Extent;
use crate::topology::ids::cell_id;

/// Compute the extent of a grid once its ghost layers are removed.
///
/// `ghosts` is the cell-ghost marker array mapped over `extent`; any nonzero
/// marker counts as ghost. Absent array means nothing to peel.
pub fn peel_off_ghost_layers(
    extent: &Extent,
    ghosts: Option<&[u8]>,
    ghost_level: i32,
) -> Extent {
    let ghosts = match ghosts {
        Some(g) if !g.is_empty() && ghost_level > 0 => g,
        _ => return *extent,
    };

    let imin = extent[0];
    let imax = extent[1].max(extent[0] + 1);
    let jmin = extent[2];
    let jmax = extent[3].max(extent[2] + 1);
    let kmin = extent[4];
    let kmax = extent[5].max(extent[4] + 1);

    let is_ghost = |ijk: [i32; 3]| ghosts[cell_id(extent, ijk)] != 0;

    let mut peeled = *extent;

    {
        // Bottom-left-front corner: start the cursor `ghost_level` cells in
        // and walk each unlocked axis back out until the step before a ghost.
        let mut ijk = [
            (imin + ghost_level).min(imax - 1),
            (jmin + ghost_level).min(jmax - 1),
            (kmin + ghost_level).min(kmax - 1),
        ];
        let mut lock = [
            extent[0] == extent[1],
            extent[2] == extent[3],
            extent[4] == extent[5],
        ];
        let mins = [imin, jmin, kmin];

        while (!lock[0] || !lock[1] || !lock[2])
            && (lock[0] || ijk[0] > mins[0])
            && (lock[1] || ijk[1] > mins[1])
            && (lock[2] || ijk[2] > mins[2])
            && !is_ghost(ijk)
        {
            for dim in 0..3 {
                if !lock[dim] {
                    ijk[dim] -= 1;
                    if is_ghost(ijk) {
                        ijk[dim] += 1;
                        lock[dim] = true;
                    }
                }
            }
        }
        peeled[0] = ijk[0];
        peeled[2] = ijk[1];
        peeled[4] = ijk[2];
    }
    {
        // Same walk from the top-right-back corner.
        let mut ijk = [
            (imax - 1 - ghost_level).max(imin),
            (jmax - 1 - ghost_level).max(jmin),
            (kmax - 1 - ghost_level).max(kmin),
        ];
        let mut lock = [
            extent[0] == extent[1],
            extent[2] == extent[3],
            extent[4] == extent[5],
        ];
        let maxes = [imax, jmax, kmax];

        while (!lock[0] || !lock[1] || !lock[2])
            && (lock[0] || ijk[0] < maxes[0] - 1)
            && (lock[1] || ijk[1] < maxes[1] - 1)
            && (lock[2] || ijk[2] < maxes[2] - 1)
            && !is_ghost(ijk)
        {
            for dim in 0..3 {
                if !lock[dim] {
                    ijk[dim] += 1;
                    if is_ghost(ijk) {
                        ijk[dim] -= 1;
                        lock[dim] = true;
                    }
                }
            }
        }
        peeled[1] = ijk[0] + i32::from(extent[0] != extent[1]);
        peeled[3] = ijk[1] + i32::from(extent[2] != extent[3]);
        peeled[5] = ijk[2] + i32::from(extent[4] != extent[5]);
    }
    peeled
}
