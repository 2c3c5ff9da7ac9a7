//! Brickwork Kernel: exact reals, dyadic interval codes and certified
//! function evaluation.
//!
//! # API Surface
//!
//! - [`real::Real`] -- constructive real with bit-exact `approx(n)`
//! - [`interval::DyadicInterval`] -- the `(k, p)` interval code and its brick branching
//! - [`modulus::FunctionModulus::apply`] -- certified output triple for a box of inputs
//!
//! # Module Dependency Direction
//!
//! `real` ← `interval` ← `modulus`
//!
//! One-way only. No cycles. `real` depends on nothing internal.

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod interval;
pub mod modulus;
pub mod real;

pub use interval::DyadicInterval;
pub use modulus::{gradient, ApplyOptions, CertifiedOutput, EvalError, FunctionModulus, Term};
pub use real::{AbortSignal, Real, RealError};
