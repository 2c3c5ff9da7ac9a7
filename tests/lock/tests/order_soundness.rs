//! Ordering and pruning lock tests.
//!
//! Proves:
//! 1. Edge comparisons agree with real-number ordering for levels in [-20, 20]
//! 2. Certified outputs enclose every sampled function value over the box
//! 3. Eclipsed boxes never hold a value below the eclipsing box
//! 4. Product moduli bound the true variation

use std::cmp::Ordering;
use std::rc::Rc;

use brickwork_kernel::{gradient, ApplyOptions, DyadicInterval, FunctionModulus, Real, Term};
use brickwork_search::{
    compare_lower_bound, compare_upper_bound, eclipses, Objective, SearchCandidate,
};
use lock_tests::scenarios::{f64_of, univariate_terms};
use proptest::prelude::*;

fn iv(code: i64, level: i32) -> DyadicInterval {
    DyadicInterval::new(code, level)
}

fn objective(terms: &[Term], dimension_count: usize) -> Rc<Objective> {
    Rc::new(Objective::new(
        FunctionModulus::polynomial(terms),
        gradient(terms, dimension_count),
        ApplyOptions::default(),
    ))
}

fn candidate(objective: &Rc<Objective>, inputs: Vec<DyadicInterval>) -> SearchCandidate {
    let domain: Rc<[DyadicInterval]> = vec![iv(0, 6); inputs.len()].into();
    SearchCandidate::new(domain, inputs, objective).unwrap()
}

/// `f` at `lower + width·i/4` on each dimension, for `i` in 0..=4.
fn samples(objective: &Objective, inputs: &[DyadicInterval]) -> Vec<f64> {
    let mut points: Vec<Vec<Real>> = vec![Vec::new()];
    for input in inputs {
        let width = input.half_width().shift_left(1);
        let mut next = Vec::new();
        for point in &points {
            for i in 0..=4 {
                let mut extended = point.clone();
                extended.push(&input.lower_edge() + &(&width * &Real::from_ratio(i, 4)));
                next.push(extended);
            }
        }
        points = next;
    }
    points
        .iter()
        .map(|p| f64_of(&objective.function.evaluate(p).unwrap()))
        .collect()
}

proptest! {
    /// ACCEPTANCE: order consistency
    #[test]
    fn edge_orders_agree_with_reals(
        a in -300i64..300,
        b in -300i64..300,
        pa in -20i32..=20,
        pb in -20i32..=20,
    ) {
        let x = iv(a, pa);
        let y = iv(b, pb);

        let lower = f64_of(&x.lower_edge()).total_cmp(&f64_of(&y.lower_edge()));
        match lower {
            Ordering::Equal if pa < pb => prop_assert_eq!(compare_lower_bound(&x, &y), Ordering::Less),
            Ordering::Equal if pa > pb => prop_assert_eq!(compare_lower_bound(&x, &y), Ordering::Greater),
            exact => prop_assert_eq!(compare_lower_bound(&x, &y), exact),
        }

        let upper = f64_of(&x.upper_edge()).total_cmp(&f64_of(&y.upper_edge()));
        match upper {
            Ordering::Equal if pa < pb => prop_assert_eq!(compare_upper_bound(&x, &y), Ordering::Greater),
            Ordering::Equal if pa > pb => prop_assert_eq!(compare_upper_bound(&x, &y), Ordering::Less),
            exact => prop_assert_eq!(compare_upper_bound(&x, &y), exact),
        }
    }

    #[test]
    fn lower_bound_order_is_transitive(
        codes in proptest::collection::vec((-100i64..100, -20i32..=20), 3),
    ) {
        let [x, y, z] = [
            iv(codes[0].0, codes[0].1),
            iv(codes[1].0, codes[1].1),
            iv(codes[2].0, codes[2].1),
        ];
        if compare_lower_bound(&x, &y) != Ordering::Greater
            && compare_lower_bound(&y, &z) != Ordering::Greater
        {
            prop_assert_ne!(compare_lower_bound(&x, &z), Ordering::Greater);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn certified_output_encloses_samples(k in -40i64..40, level in -6i32..=1) {
        // x^3 - 3x
        let objective = objective(&univariate_terms(&[(1, 3), (-3, 1)]), 1);
        let inputs = vec![iv(k, level)];
        let boxed = candidate(&objective, inputs.clone());
        let low = f64_of(&boxed.output().lower().lower_edge());
        let high = f64_of(&boxed.output().upper().upper_edge());
        for value in samples(&objective, &inputs) {
            prop_assert!(low <= value && value <= high, "{} outside [{}, {}]", value, low, high);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// ACCEPTANCE: product modulus soundness over two variables
    #[test]
    fn product_modulus_bounds_variation(
        cx in -16i64..16,
        cy in -16i64..16,
        level in -4i32..=0,
        tx in -4i64..=4,
        ty in -4i64..=4,
    ) {
        // (x + 1)·(y^2 - x)
        let x = FunctionModulus::projection(0);
        let f = FunctionModulus::sum(&x, &FunctionModulus::constant(Real::one()));
        let g = FunctionModulus::sum(
            &FunctionModulus::power(1, 2),
            &FunctionModulus::scaled(Real::from_integer(-1), &x),
        );
        let product = FunctionModulus::product(&f, &g);

        let centre = [iv(cx, level).midpoint(), iv(cy, level).midpoint()];
        let widths = [iv(0, level).half_width(), iv(0, level).half_width()];
        let moved = [
            &centre[0] + &(&widths[0] * &Real::from_ratio(tx, 4)),
            &centre[1] + &(&widths[1] * &Real::from_ratio(ty, 4)),
        ];
        let bound = f64_of(&product.modulus(&centre, &widths).unwrap());
        let at_centre = f64_of(&product.evaluate(&centre).unwrap());
        let at_moved = f64_of(&product.evaluate(&moved).unwrap());
        prop_assert!((at_moved - at_centre).abs() <= bound + 1e-6);
    }
}

/// ACCEPTANCE: eclipse soundness
#[test]
fn eclipsed_boxes_lie_strictly_above() {
    // x^2 + y^2 - x·y on a grid of quarter-width boxes
    let terms = [
        Term::new(Real::from_integer(1), 0, 2),
        Term::new(Real::from_integer(1), 1, 2),
    ];
    let bowl = FunctionModulus::polynomial(&terms);
    let cross = FunctionModulus::scaled(
        Real::from_integer(-1),
        &FunctionModulus::product(&FunctionModulus::projection(0), &FunctionModulus::projection(1)),
    );
    let objective = Rc::new(Objective::new(
        FunctionModulus::sum(&bowl, &cross),
        gradient(&terms, 2),
        ApplyOptions::default(),
    ));

    let boxes: Vec<SearchCandidate> = (-4..=4)
        .flat_map(|i| (-4..=4).map(move |j| (i, j)))
        .map(|(i, j)| candidate(&objective, vec![iv(i, -1), iv(j, -1)]))
        .collect();

    let mut checked = 0;
    for a in &boxes {
        let max_a = samples(&objective, a.inputs())
            .into_iter()
            .fold(f64::MIN, f64::max);
        for b in &boxes {
            if !eclipses(a, b) {
                continue;
            }
            checked += 1;
            let min_b = samples(&objective, b.inputs())
                .into_iter()
                .fold(f64::MAX, f64::min);
            assert!(
                max_a < min_b,
                "{:?} eclipses {:?} but {max_a} >= {min_b}",
                a.inputs(),
                b.inputs()
            );
        }
    }
    assert!(checked > 0, "grid should contain eclipsed pairs");
}
