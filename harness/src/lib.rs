//! Brickwork Harness: console driver for univariate polynomial minimization.
//!
//! The harness reads a polynomial, a domain exponent and a time budget,
//! hands the problem to the search engine and prints the certified global
//! bound and the local estimate.
//!
//! The harness does NOT implement search logic. It delegates to
//! `brickwork_search`; the polynomial model owns only input and display.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod polynomial;
pub mod prompt;
pub mod runner;

pub use error::HarnessError;
pub use polynomial::Polynomial;
pub use runner::{run_interactive, RunConfig};
