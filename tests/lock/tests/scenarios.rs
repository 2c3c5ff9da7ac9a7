//! End-to-end search lock tests on univariate polynomials.
//!
//! All runs use the iteration clock, so each scenario is exactly
//! reproducible and independent of machine speed.

use brickwork_search::{Phase, SearchPolicy, TerminationReason};
use lock_tests::scenarios::{cubic, f64_of, run_logical, square_on_four, univariate_engine};

fn encloses(lower: f64, upper: f64, value: f64) -> bool {
    lower <= value && value <= upper
}

/// ACCEPTANCE: scenario 1, `x^2` on `[-4, 4]`
#[test]
fn square_converges_to_zero() {
    let outcome = run_logical(&square_on_four(200));

    let global = &outcome.global;
    assert!(encloses(
        f64_of(&global.output.lower_edge()),
        f64_of(&global.output.upper_edge()),
        0.0
    ));
    assert!(encloses(
        f64_of(&global.inputs[0].lower_edge()),
        f64_of(&global.inputs[0].upper_edge()),
        0.0
    ));

    let x = f64_of(&outcome.local.point()[0]);
    let value = f64_of(&outcome.local.value());
    assert!(x.abs() < 0.05, "local point {x}");
    assert!(value.abs() < 1e-3, "local value {value}");
    assert_eq!(outcome.termination_reason(), &TerminationReason::BudgetExhausted);
}

#[test]
fn square_output_hull_narrows_with_budget() {
    let widths: Vec<f64> = [50, 200, 1000]
        .into_iter()
        .map(|budget| {
            let output = run_logical(&square_on_four(budget)).global.output;
            let (lower, upper) = (output.lower_edge(), output.upper_edge());
            assert!(f64_of(&lower) <= 0.0 && 0.0 <= f64_of(&upper), "budget {budget}");
            f64_of(&(&upper - &lower))
        })
        .collect();
    assert!(widths[1] < widths[0], "{widths:?}");
    assert!(widths[2] < widths[1], "{widths:?}");
    assert!(widths[2] < 1e-12, "{widths:?}");
}

/// ACCEPTANCE: scenario 2, `x^3 - 3x` on `[-2, 2]`
#[test]
fn cubic_finds_the_interior_minimum() {
    let outcome = run_logical(&cubic(2, 300));

    let low = f64_of(&outcome.global.output.lower_edge());
    let high = f64_of(&outcome.global.output.upper_edge());
    assert!(encloses(low, high, -2.0), "[{low}, {high}]");

    // the local phase steers to the flat minimum at x = 1
    let x = f64_of(&outcome.local.point()[0]);
    let value = f64_of(&outcome.local.value());
    assert!((x - 1.0).abs() < 0.25, "local point {x}");
    assert!((value + 2.0).abs() < 0.1, "local value {value}");
}

#[test]
fn cubic_on_wider_domain_brackets_the_edge_minimum() {
    // on [-4, 4] the minimum is f(-4) = -52
    let outcome = run_logical(&cubic(3, 200));
    let low = f64_of(&outcome.global.output.lower_edge());
    let high = f64_of(&outcome.global.output.upper_edge());
    assert!(encloses(low, high, -52.0), "[{low}, {high}]");
}

#[test]
fn global_bound_is_taken_at_the_phase_switch() {
    let outcome = run_logical(&square_on_four(100));
    let metadata = &outcome.trace.metadata;
    // iteration i reads elapsed i+1; 80·100 ≤ 100·(i+1) first at i = 79
    assert_eq!(metadata.phase_switch_iteration, Some(79));
    assert!(outcome.trace.iterations[..79]
        .iter()
        .all(|e| e.phase == Phase::Global));
    assert!(outcome.trace.iterations[79..]
        .iter()
        .all(|e| e.phase == Phase::Local));
}

#[test]
fn local_only_policy_switches_immediately() {
    let policy = SearchPolicy {
        global_phase_percent: 0,
        ..SearchPolicy::with_budget(20)
    };
    let outcome = run_logical(&univariate_engine(&[(1, 2)], 3, policy));
    assert_eq!(outcome.trace.metadata.phase_switch_iteration, Some(0));
    assert!(outcome.global_description().starts_with("f([-"));
}

#[test]
fn history_only_grows() {
    let outcome = run_logical(&cubic(2, 150));
    let lengths: Vec<u64> = outcome
        .trace
        .iterations
        .iter()
        .map(|e| e.history_len)
        .collect();
    assert!(lengths.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        outcome.trace.metadata.history_len,
        1 + outcome.trace.metadata.total_children_generated
            - outcome.trace.metadata.total_duplicates_suppressed
    );
}

#[test]
fn descriptions_use_decimal_edges() {
    let outcome = run_logical(&square_on_four(0));
    assert_eq!(
        outcome.global_description().split(" ==> ").next(),
        Some("f([-4,4])")
    );
    assert!(outcome.local_description().starts_with("f(0) ==> "));
}
