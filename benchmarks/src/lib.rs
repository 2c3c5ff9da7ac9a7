//! Shared helpers for brickwork benchmark suites.

use std::rc::Rc;

use brickwork_kernel::{gradient, ApplyOptions, DyadicInterval, FunctionModulus, Real, Term};
use brickwork_search::{Objective, SearchCandidate, SearchEngine, SearchPolicy};

/// A named polynomial problem run under the iteration clock.
pub struct Regime {
    pub name: &'static str,
    /// `(coefficient, exponent)` pairs over one variable.
    pub coefficients: &'static [(i64, u32)],
    pub starting_level: i32,
    pub budget: u64,
}

/// Regimes covering a smooth bowl, a cubic with an interior minimum, and
/// a wide domain whose minimum sits on the edge.
#[must_use]
pub fn regimes() -> Vec<Regime> {
    vec![
        Regime {
            name: "square",
            coefficients: &[(1, 2)],
            starting_level: 3,
            budget: 200,
        },
        Regime {
            name: "cubic",
            coefficients: &[(1, 3), (-3, 1)],
            starting_level: 2,
            budget: 200,
        },
        Regime {
            name: "cubic_wide",
            coefficients: &[(1, 3), (-3, 1)],
            starting_level: 5,
            budget: 200,
        },
    ]
}

fn terms(coefficients: &[(i64, u32)]) -> Vec<Term> {
    coefficients
        .iter()
        .map(|&(c, e)| Term::new(Real::from_integer(c), 0, e))
        .collect()
}

impl Regime {
    /// Build the engine for this regime.
    ///
    /// # Panics
    ///
    /// Panics if the engine rejects the configuration. Benchmark setup
    /// failures are fatal.
    #[must_use]
    pub fn engine(&self) -> SearchEngine {
        let terms = terms(self.coefficients);
        SearchEngine::new(
            FunctionModulus::polynomial(&terms),
            gradient(&terms, 1),
            1,
            self.starting_level,
            SearchPolicy::with_budget(self.budget),
        )
        .expect("valid regime")
    }
}

/// The objective for `x^3 - 3x`.
#[must_use]
pub fn cubic_objective() -> Rc<Objective> {
    let terms = terms(&[(1, 3), (-3, 1)]);
    Rc::new(Objective::new(
        FunctionModulus::polynomial(&terms),
        gradient(&terms, 1),
        ApplyOptions::default(),
    ))
}

/// `count` adjacent boxes at `level`, centred on zero.
///
/// # Panics
///
/// Panics if a box fails to evaluate.
#[must_use]
pub fn cubic_boxes(count: i64, level: i32) -> Vec<SearchCandidate> {
    let objective = cubic_objective();
    let domain: Rc<[DyadicInterval]> = vec![DyadicInterval::new(0, 4)].into();
    (0..count)
        .map(|i| {
            let inputs = vec![DyadicInterval::new(i - count / 2, level)];
            SearchCandidate::new(Rc::clone(&domain), inputs, &objective).expect("evaluates")
        })
        .collect()
}
