//! Search determinism lock tests.
//!
//! With the iteration clock the trace is a pure function of the problem and
//! the policy, so repeated runs must produce byte-identical canonical bytes.

use brickwork_search::SearchPolicy;
use lock_tests::scenarios::{cubic, run_logical, square_on_four, univariate_engine};

// ---------------------------------------------------------------------------
// ACCEPTANCE: determinism in-process
// ---------------------------------------------------------------------------

#[test]
fn search_determinism_inproc_n5() {
    let engine = cubic(2, 120);
    let first = run_logical(&engine);
    let first_bytes = first.trace.to_canonical_json_bytes().unwrap();

    for _ in 1..5 {
        let again = run_logical(&engine);
        assert_eq!(
            again.trace.to_canonical_json_bytes().unwrap(),
            first_bytes,
            "trace bytes diverged between runs"
        );
        assert_eq!(again.global_description(), first.global_description());
        assert_eq!(again.local_description(), first.local_description());
    }
}

#[test]
fn fresh_engines_agree() {
    let a = run_logical(&square_on_four(80));
    let b = run_logical(&square_on_four(80));
    assert_eq!(a.trace.digest().unwrap(), b.trace.digest().unwrap());
}

#[test]
fn frontier_sequence_is_recorded_per_iteration() {
    let outcome = run_logical(&cubic(2, 60));
    assert_eq!(outcome.trace.iterations.len(), 60);
    for (i, event) in outcome.trace.iterations.iter().enumerate() {
        assert_eq!(event.iteration, i as u64);
        assert!(event.frontier_digest.starts_with("sha256:"));
        assert!(event.branched.starts_with("sha256:"));
    }
}

#[test]
fn budget_changes_the_trace() {
    let short = run_logical(&square_on_four(40));
    let long = run_logical(&square_on_four(41));
    assert_ne!(
        short.trace.to_canonical_json_bytes().unwrap(),
        long.trace.to_canonical_json_bytes().unwrap()
    );
}

#[test]
fn phase_split_is_part_of_the_trace() {
    let policy = |percent| SearchPolicy {
        global_phase_percent: percent,
        ..SearchPolicy::with_budget(30)
    };
    let a = run_logical(&univariate_engine(&[(1, 2)], 3, policy(80)));
    let b = run_logical(&univariate_engine(&[(1, 2)], 3, policy(50)));
    assert_ne!(a.trace.digest().unwrap(), b.trace.digest().unwrap());
}
