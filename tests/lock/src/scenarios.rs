//! Reference problems used across lock tests and the fixture binary.

use brickwork_kernel::{gradient, FunctionModulus, Real, Term};
use brickwork_search::{IterationClock, SearchEngine, SearchOutcome, SearchPolicy};

/// `Σ c·x^e` over one variable.
#[must_use]
pub fn univariate_terms(coefficients: &[(i64, u32)]) -> Vec<Term> {
    coefficients
        .iter()
        .map(|&(c, e)| Term::new(Real::from_integer(c), 0, e))
        .collect()
}

/// Engine over `[-2^(level-1), 2^(level-1)]` for a univariate polynomial.
///
/// # Panics
///
/// Panics if the engine rejects the configuration.
#[must_use]
pub fn univariate_engine(
    coefficients: &[(i64, u32)],
    level: i32,
    policy: SearchPolicy,
) -> SearchEngine {
    let terms = univariate_terms(coefficients);
    SearchEngine::new(
        FunctionModulus::polynomial(&terms),
        gradient(&terms, 1),
        1,
        level,
        policy,
    )
    .expect("valid engine")
}

/// `x^2` on `[-4, 4]`.
#[must_use]
pub fn square_on_four(budget: u64) -> SearchEngine {
    univariate_engine(&[(1, 2)], 3, SearchPolicy::with_budget(budget))
}

/// `x^3 - 3x` on `[-2^(level-1), 2^(level-1)]`.
#[must_use]
pub fn cubic(level: i32, budget: u64) -> SearchEngine {
    univariate_engine(&[(1, 3), (-3, 1)], level, SearchPolicy::with_budget(budget))
}

/// Run with a fresh iteration clock.
///
/// # Panics
///
/// Panics if the search fails.
#[must_use]
pub fn run_logical(engine: &SearchEngine) -> SearchOutcome {
    engine
        .search_with_clock(&mut IterationClock::new())
        .expect("search succeeds")
}

/// `f64` value of an exact real; lock tests only compare small dyadics.
///
/// # Panics
///
/// Panics if the approximation fails.
#[must_use]
pub fn f64_of(value: &Real) -> f64 {
    value.to_f64().expect("approximation succeeds")
}
