use grid_halo::topology::extent::Extent;
use grid_halo::topology::mask::{classify, compute_masks, AdjacencyClass, AdjacencyMask};
use proptest::prelude::*;

fn arb_extent() -> impl Strategy<Value = Extent> {
    (
        (-8i32..8, 0i32..6),
        (-8i32..8, 0i32..6),
        (-8i32..8, 0i32..6),
    )
        .prop_map(|((x0, w), (y0, h), (z0, d))| {
            Extent::new(x0, x0 + w, y0, y0 + h, z0, z0 + d)
        })
}

proptest! {
    /// Adjacency bits never fire on a degenerate local axis.
    #[test]
    fn degenerate_axes_carry_no_adjacency_bits(a in arb_extent(), b in arb_extent()) {
        let (adj, _) = compute_masks(&a, &b);
        if a.is_degenerate(0) {
            prop_assert!(!adj.intersects(AdjacencyMask::LEFT | AdjacencyMask::RIGHT));
        }
        if a.is_degenerate(1) {
            prop_assert!(!adj.intersects(AdjacencyMask::FRONT | AdjacencyMask::BACK));
        }
        if a.is_degenerate(2) {
            prop_assert!(!adj.intersects(AdjacencyMask::BOTTOM | AdjacencyMask::TOP));
        }
    }

    /// The overlap mask is symmetric between the two extents.
    #[test]
    fn overlap_is_symmetric(a in arb_extent(), b in arb_extent()) {
        let (_, ab) = compute_masks(&a, &b);
        let (_, ba) = compute_masks(&b, &a);
        prop_assert_eq!(ab, ba);
    }

    /// Separated extents (a gap on some axis) never classify as adjacent.
    #[test]
    fn gapped_extents_never_classify(a in arb_extent(), gap in 1i32..4) {
        let b = Extent::new(
            a[1] + gap,
            a[1] + gap + 2,
            a[2],
            a[3],
            a[4],
            a[5],
        );
        let (adj, ovl) = compute_masks(&a, &b);
        prop_assert_eq!(classify(a.data_dimension(), adj, ovl), None);
    }

    /// Whenever a classification exists, its face count matches the number
    /// of adjacency bits, and every face lies on a non-degenerate axis.
    #[test]
    fn classification_is_consistent_with_the_mask(a in arb_extent(), b in arb_extent()) {
        let dim = a.data_dimension();
        let (adj, ovl) = compute_masks(&a, &b);
        if let Some(class) = classify(dim, adj, ovl) {
            let mut faces = Vec::new();
            class.for_each_face(|idx| faces.push(idx));
            prop_assert_eq!(faces.len() as u32, adj.bits().count_ones());
            for idx in faces {
                prop_assert!(!a.is_degenerate(idx / 2));
            }
            match class {
                AdjacencyClass::Face(_) => prop_assert_eq!(adj.bits().count_ones(), 1),
                AdjacencyClass::Edge(x, y) => prop_assert!(x / 2 != y / 2),
                AdjacencyClass::Corner(x, y, z) => {
                    prop_assert!(x / 2 != y / 2 && y / 2 != z / 2 && x / 2 != z / 2)
                }
            }
        }
    }
}
