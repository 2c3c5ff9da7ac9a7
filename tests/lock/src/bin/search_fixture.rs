//! Binary that runs `x^3 - 3x` on `[-2, 2]` through the driver with an
//! iteration clock and prints deterministic output lines for cross-process
//! verification.
//!
//! Usage: `search_fixture`
//!
//! Output: key=value lines (see source for format).

use brickwork_harness::{Polynomial, RunConfig};
use brickwork_search::{IterationClock, SearchPolicy};

fn main() {
    let config = RunConfig {
        polynomial: Polynomial::from_coefficients(&[1.0, 0.0, -3.0, 0.0])
            .expect("valid coefficients"),
        n: 1,
        seconds: 0,
    };
    let report = config
        .run_with_clock(SearchPolicy::with_budget(120), &mut IterationClock::new())
        .expect("search run failed");
    let trace = &report.outcome.trace;

    let bytes = trace
        .to_canonical_json_bytes()
        .expect("trace serializes");
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).expect("invalid trace JSON");
    let term_type = parsed["metadata"]["termination_reason"]["type"]
        .as_str()
        .expect("missing termination_reason.type");

    println!("trace_digest={}", trace.digest().expect("trace digests").as_str());
    println!("trace_bytes={}", bytes.len());
    println!("termination_reason={term_type}");
    println!("total_iterations={}", trace.metadata.total_iterations);
    println!("history_len={}", trace.metadata.history_len);
    println!("global={}", report.outcome.global_description());
    println!("local={}", report.outcome.local_description());
}
