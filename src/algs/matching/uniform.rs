//! Uniform grid matcher.
//!
//! Two uniform blocks connect when their spacings are colinear with equal
//! magnitude, their orientation quaternions are equal (inner product 1 for
//! unit quaternions), and their origins differ by an integer number of
//! spacings. The remote extent is then translated onto the local index
//! lattice.

use crate::block::BlockStructure;
use crate::grid::uniform::UniformGrid;
use crate::grid::nearly_equal;

/// Family geometry of a uniform block descriptor.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct UniformDescriptor {
    pub origin: [f64; 3],
    pub spacing: [f64; 3],
    pub quaternion: [f64; 4],
}

pub(crate) fn synchronize_extents(
    local_dim: i32,
    local: &UniformDescriptor,
    remote: &mut BlockStructure<UniformGrid>,
) -> bool {
    let extent = remote.extent;
    let geom = &remote.geometry;

    // spacing == localSpacing  <=>  dot(spacing, localSpacing) == |localSpacing|^2
    // q == localQ              <=>  dot(q, localQ) == 1 (both unit quaternions)
    let spacing_dot: f64 = (0..3).map(|a| geom.spacing[a] * local.spacing[a]).sum();
    let spacing_norm2: f64 = local.spacing.iter().map(|v| v * v).sum();
    let q_dot: f64 = (0..4).map(|a| geom.quaternion[a] * local.quaternion[a]).sum();

    if !extent.is_valid()
        || remote.dim != local_dim
        || !nearly_equal(spacing_dot, spacing_norm2)
        || (q_dot - 1.0).abs() >= f64::EPSILON
    {
        return false;
    }

    let mut shift = [0i32; 3];
    for a in 0..3 {
        if geom.spacing[a] != 0.0 {
            shift[a] = ((geom.origin[a] - local.origin[a]) / geom.spacing[a]).round() as i32;
        }
    }
    remote.shifted_extent = extent.shifted_by(shift);
    true
}
