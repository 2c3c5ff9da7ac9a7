//! Dyadic interval lock tests.
//!
//! Proves:
//! 1. The three children of any interval cover it without gaps
//! 2. Containment is antisymmetric across levels
//! 3. Every child that survives the domain filter meets the domain

use brickwork_kernel::DyadicInterval;
use lock_tests::scenarios::f64_of;
use proptest::prelude::*;

fn iv(code: i64, level: i32) -> DyadicInterval {
    DyadicInterval::new(code, level)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// ACCEPTANCE: branch coverage
    #[test]
    fn children_cover_parent(k in -10_000i64..10_000, p in -20i32..=20) {
        let parent = iv(k, p);
        let [left, middle, right] = parent.branch();

        let quarter = 0.25 * 2f64.powi(p);
        prop_assert_eq!(f64_of(&left.lower_edge()), f64_of(&parent.lower_edge()) - quarter);
        prop_assert_eq!(f64_of(&right.upper_edge()), f64_of(&parent.upper_edge()) + quarter);
        // neighbours share an edge
        prop_assert_eq!(f64_of(&left.upper_edge()), f64_of(&middle.lower_edge()));
        prop_assert_eq!(f64_of(&middle.upper_edge()), f64_of(&right.lower_edge()));
        for child in [&left, &middle, &right] {
            prop_assert_eq!(child.level(), p - 1);
        }
    }

    /// ACCEPTANCE: containment antisymmetry
    #[test]
    fn containment_is_antisymmetric(
        a in -500i64..500,
        b in -500i64..500,
        pa in -20i32..=20,
        pb in -20i32..=20,
    ) {
        let x = iv(a, pa);
        let y = iv(b, pb);
        if x.is_within(&y) && y.is_within(&x) {
            prop_assert_eq!(x, y);
        }
    }

    #[test]
    fn within_matches_real_edges(
        a in -500i64..500,
        b in -50i64..50,
        pa in -10i32..=0,
        pb in 1i32..=10,
    ) {
        let inner = iv(a, pa);
        let outer = iv(b, pb);
        let exact = f64_of(&outer.lower_edge()) < f64_of(&inner.lower_edge())
            && f64_of(&inner.upper_edge()) < f64_of(&outer.upper_edge());
        prop_assert_eq!(inner.is_within(&outer), exact);
    }

    #[test]
    fn overlapping_children_meet_the_domain(k in -64i64..64, depth in 1i32..6) {
        let domain = iv(0, 3);
        let level = 3 - depth;
        let candidate = iv(k, level);
        for child in candidate.branch() {
            if child.overlaps(&domain) {
                prop_assert!(f64_of(&child.upper_edge()) > f64_of(&domain.lower_edge()));
                prop_assert!(f64_of(&child.lower_edge()) < f64_of(&domain.upper_edge()));
            }
        }
    }
}

#[test]
fn strict_containment_keeps_only_the_middle_child_of_the_root() {
    let root = iv(0, 3);
    let kept: Vec<_> = root.branch().into_iter().filter(|c| c.is_within(&root)).collect();
    assert_eq!(kept, vec![iv(0, 2)]);
    assert!(root.branch().iter().all(|c| c.overlaps(&root)));
}
