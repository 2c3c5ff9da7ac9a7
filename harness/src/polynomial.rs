//! Univariate polynomials as entered at the console.
//!
//! Coefficients are `f64` because that is what the user types; each one is
//! converted exactly into a kernel [`Real`] when the problem is built.

use std::fmt;

use brickwork_kernel::{gradient, FunctionModulus, Real, Term};

use crate::error::HarnessError;

/// One nonzero `a·x^i` term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Monomial {
    pub coefficient: f64,
    pub exponent: u32,
}

/// A polynomial in `x`, highest exponent first, zero terms omitted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polynomial {
    terms: Vec<Monomial>,
}

impl Polynomial {
    /// Build from coefficients listed highest exponent first, so the last
    /// entry is the constant term.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::InvalidCoefficient`] for a NaN or infinite
    /// coefficient.
    pub fn from_coefficients(highest_first: &[f64]) -> Result<Self, HarnessError> {
        let degree = highest_first.len().saturating_sub(1);
        let mut terms = Vec::new();
        for (i, &coefficient) in highest_first.iter().enumerate() {
            let exponent = u32::try_from(degree - i).unwrap_or(u32::MAX);
            if !coefficient.is_finite() {
                return Err(HarnessError::InvalidCoefficient {
                    exponent,
                    value: coefficient,
                });
            }
            if coefficient != 0.0 {
                terms.push(Monomial {
                    coefficient,
                    exponent,
                });
            }
        }
        Ok(Self { terms })
    }

    #[must_use]
    pub fn terms(&self) -> &[Monomial] {
        &self.terms
    }

    /// Highest exponent with a nonzero coefficient; zero for the zero
    /// polynomial.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.terms.first().map_or(0, |t| t.exponent)
    }

    #[must_use]
    pub fn derivative(&self) -> Self {
        let terms = self
            .terms
            .iter()
            .filter(|t| t.exponent > 0)
            .map(|t| Monomial {
                coefficient: t.coefficient * f64::from(t.exponent),
                exponent: t.exponent - 1,
            })
            .collect();
        Self { terms }
    }

    /// Exact kernel terms over variable 0.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Real`] if a coefficient cannot be converted.
    pub fn kernel_terms(&self) -> Result<Vec<Term>, HarnessError> {
        self.terms
            .iter()
            .map(|t| -> Result<Term, HarnessError> {
                Ok(Term::new(Real::from_f64(t.coefficient)?, 0, t.exponent))
            })
            .collect()
    }

    /// The polynomial and its derivative as function moduli.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Real`] if a coefficient cannot be converted.
    pub fn to_problem(&self) -> Result<(FunctionModulus, Vec<FunctionModulus>), HarnessError> {
        let terms = self.kernel_terms()?;
        Ok((FunctionModulus::polynomial(&terms), gradient(&terms, 1)))
    }

    /// Evaluate with floating point; display and tests only.
    #[must_use]
    pub fn evaluate_f64(&self, x: f64) -> f64 {
        self.terms
            .iter()
            .map(|t| t.coefficient * x.powi(i32::try_from(t.exponent).unwrap_or(i32::MAX)))
            .sum()
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match term.exponent {
                0 => write!(f, "{}", term.coefficient)?,
                1 => write!(f, "{}x", term.coefficient)?,
                e => write!(f, "{}x^{e}", term.coefficient)?,
            }
        }
        Ok(())
    }
}
