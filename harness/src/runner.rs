//! Driver runner: reads a polynomial, runs the search, renders the report.
//!
//! # Pipeline
//!
//! ```text
//! prompt degree → prompt coefficients → print polynomial
//!   → prompt n → prompt seconds → SearchEngine::search() → print report
//! ```

use std::fmt;
use std::io::{BufRead, Write};

use brickwork_search::{Clock, SearchEngine, SearchOutcome, SearchPolicy, WallClock};
use tracing::info;

use crate::error::HarnessError;
use crate::polynomial::Polynomial;
use crate::prompt::Prompter;

/// Everything one driver run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub polynomial: Polynomial,
    /// The domain is `[-2^n, 2^n]`.
    pub n: i32,
    pub seconds: u64,
}

impl RunConfig {
    /// Level of the root interval `(0, n+1)`.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidInterval`] if `n+1` overflows.
    pub fn starting_level(&self) -> Result<i32, HarnessError> {
        self.n
            .checked_add(1)
            .ok_or(HarnessError::InvalidInterval { n: self.n })
    }

    /// Default policy with a budget of `seconds` in milliseconds.
    #[must_use]
    pub fn policy(&self) -> SearchPolicy {
        SearchPolicy::with_budget(self.seconds.saturating_mul(1000))
    }

    /// Build the one-dimensional engine.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidInterval`], a coefficient conversion
    /// failure, or the engine's configuration error.
    pub fn engine(&self, policy: SearchPolicy) -> Result<SearchEngine, HarnessError> {
        let level = self.starting_level()?;
        let (function, derivatives) = self.polynomial.to_problem()?;
        Ok(SearchEngine::new(function, derivatives, 1, level, policy)?)
    }

    /// Run against the wall clock.
    ///
    /// # Errors
    ///
    /// See [`RunConfig::run_with_clock`].
    pub fn run(&self) -> Result<Report, HarnessError> {
        self.run_with_clock(self.policy(), &mut WallClock::start())
    }

    /// Run with an explicit policy and clock.
    ///
    /// # Errors
    ///
    /// Returns configuration errors from [`RunConfig::engine`] and
    /// evaluation errors from the search.
    pub fn run_with_clock<C: Clock + ?Sized>(
        &self,
        policy: SearchPolicy,
        clock: &mut C,
    ) -> Result<Report, HarnessError> {
        let engine = self.engine(policy)?;
        info!(
            polynomial = %self.polynomial,
            n = self.n,
            budget = engine.policy().budget,
            "starting search"
        );
        let outcome = engine.search_with_clock(clock)?;
        Ok(Report {
            polynomial: self.polynomial.clone(),
            outcome,
        })
    }
}

/// Result lines printed after a run.
#[derive(Debug, Clone)]
pub struct Report {
    pub polynomial: Polynomial,
    pub outcome: SearchOutcome,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Global search result: {}",
            self.outcome.global_description()
        )?;
        writeln!(
            f,
            "Local search estimate: {}",
            self.outcome.local_description()
        )
    }
}

/// Prompt for the polynomial, domain and time budget.
///
/// The chosen polynomial is echoed before the domain is asked for.
///
/// # Errors
///
/// Returns input, parse and coefficient errors.
pub fn read_config<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
) -> Result<RunConfig, HarnessError> {
    let degree: u32 = prompter.ask("Enter degree of polynomial: ", "a non-negative degree")?;
    let mut coefficients = Vec::new();
    for i in (0..=degree).rev() {
        let prompt = format!("Enter parameter 'a' for term 'ax^{i}': ");
        coefficients.push(prompter.ask::<f64>(&prompt, "a number")?);
    }
    let polynomial = Polynomial::from_coefficients(&coefficients)?;
    writeln!(prompter.output(), "Chosen polynomial: {polynomial}")?;

    let n = prompter.ask(
        "Enter 'n' value of starting interval [-2^n,2^n]: ",
        "an integer",
    )?;
    let seconds = prompter.ask(
        "Enter number of seconds to run for: ",
        "a whole number of seconds",
    )?;
    Ok(RunConfig {
        polynomial,
        n,
        seconds,
    })
}

/// The interactive driver: prompt, search with the wall clock, report.
///
/// # Errors
///
/// Returns any [`HarnessError`] from reading, configuring or searching.
pub fn run_interactive<R: BufRead, W: Write>(input: R, output: W) -> Result<(), HarnessError> {
    let mut prompter = Prompter::new(input, output);
    let config = read_config(&mut prompter)?;
    let report = config.run()?;
    let out = prompter.output();
    writeln!(out)?;
    write!(out, "{report}")?;
    out.flush()?;
    Ok(())
}
