//! Functions paired with a modulus of continuity.
//!
//! A [`FunctionModulus`] represents `f: ℝⁿ → ℝ` together with `m` such that
//! `|f(y) − f(x)| ≤ m(x, e)` whenever `|y_i − x_i| ≤ e_i` for every `i`.
//! [`FunctionModulus::apply`] turns that bound into a certified output
//! interval for a box of dyadic inputs.
//!
//! Combinator trees share sub-trees through `Rc`; evaluation memoizes per
//! node so a power built by squaring stays logarithmic in the exponent.

use std::collections::HashMap;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::One;

use crate::interval::DyadicInterval;
use crate::real::{check_level, AbortSignal, Real, RealError};

/// Failure while evaluating a [`FunctionModulus`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvalError {
    #[error(transparent)]
    Real(#[from] RealError),
    /// A projection asked for a variable the caller did not supply.
    #[error("variable x{index} is projected but only {supplied} values were supplied")]
    MissingVariable { index: usize, supplied: usize },
}

/// Knobs for [`FunctionModulus::apply`].
#[derive(Debug, Clone)]
pub struct ApplyOptions {
    /// Finest output level `apply` will certify at. A zero or tiny modulus
    /// is rounded up to this level.
    pub finest_level: i32,
    /// Checked by every approximation made on behalf of `apply`.
    pub abort: AbortSignal,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            finest_level: -1024,
            abort: AbortSignal::never(),
        }
    }
}

/// Conservative lower, centre and upper codes at one output level.
///
/// The true image of the input box lies in
/// `[lower.lower_edge(), upper.upper_edge()]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertifiedOutput {
    lower: DyadicInterval,
    centre: DyadicInterval,
    upper: DyadicInterval,
}

impl CertifiedOutput {
    /// The triple `(m-1, q)`, `(m, q)`, `(m+1, q)`.
    #[must_use]
    pub fn around(centre_code: BigInt, level: i32) -> Self {
        Self {
            lower: DyadicInterval::new(&centre_code - 1, level),
            upper: DyadicInterval::new(&centre_code + 1, level),
            centre: DyadicInterval::new(centre_code, level),
        }
    }

    #[must_use]
    pub fn lower(&self) -> &DyadicInterval {
        &self.lower
    }

    #[must_use]
    pub fn centre(&self) -> &DyadicInterval {
        &self.centre
    }

    #[must_use]
    pub fn upper(&self) -> &DyadicInterval {
        &self.upper
    }

    #[must_use]
    pub fn level(&self) -> i32 {
        self.centre.level()
    }
}

/// A combinator tree node.
#[derive(Debug)]
pub enum Combinator {
    Constant(Real),
    Projection(usize),
    Sum(FunctionModulus, FunctionModulus),
    Product(FunctionModulus, FunctionModulus),
}

/// A shared, immutable function with modulus of continuity.
#[derive(Debug, Clone)]
pub struct FunctionModulus {
    node: Rc<Combinator>,
}

impl FunctionModulus {
    fn from_combinator(node: Combinator) -> Self {
        Self {
            node: Rc::new(node),
        }
    }

    /// `f ≡ y`, modulus `0`.
    #[must_use]
    pub fn constant(value: Real) -> Self {
        Self::from_combinator(Combinator::Constant(value))
    }

    /// `f(xs) = xs[index]`, modulus `es[index]`.
    #[must_use]
    pub fn projection(index: usize) -> Self {
        Self::from_combinator(Combinator::Projection(index))
    }

    /// `f + g`, modulus `m_f + m_g`.
    #[must_use]
    pub fn sum(f: &Self, g: &Self) -> Self {
        Self::from_combinator(Combinator::Sum(f.clone(), g.clone()))
    }

    /// `f · g`, modulus `|g(x)|·m_f + |f(x)|·m_g + m_f·m_g`.
    #[must_use]
    pub fn product(f: &Self, g: &Self) -> Self {
        Self::from_combinator(Combinator::Product(f.clone(), g.clone()))
    }

    /// `c · f`.
    #[must_use]
    pub fn scaled(coefficient: Real, f: &Self) -> Self {
        Self::product(&Self::constant(coefficient), f)
    }

    /// `xs[index]^exponent`, squaring shared sub-trees.
    #[must_use]
    pub fn power(index: usize, exponent: u32) -> Self {
        match exponent {
            0 => Self::constant(Real::one()),
            1 => Self::projection(index),
            _ => {
                let half = Self::power(index, exponent / 2);
                let square = Self::product(&half, &half);
                if exponent % 2 == 1 {
                    Self::product(&square, &Self::projection(index))
                } else {
                    square
                }
            }
        }
    }

    /// `Σ coefficient · x_variable^exponent`; the empty sum is the zero
    /// constant.
    #[must_use]
    pub fn polynomial(terms: &[Term]) -> Self {
        terms
            .iter()
            .map(Term::to_function)
            .reduce(|acc, term| Self::sum(&acc, &term))
            .unwrap_or_else(|| Self::constant(Real::zero()))
    }

    #[must_use]
    pub fn combinator(&self) -> &Combinator {
        &self.node
    }

    /// One more than the largest projected index; `0` for constants.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self.combinator() {
            Combinator::Constant(_) => 0,
            Combinator::Projection(index) => index + 1,
            Combinator::Sum(f, g) | Combinator::Product(f, g) => f.arity().max(g.arity()),
        }
    }

    /// `f(xs)` as a lazily refinable real.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingVariable`] when `xs` is shorter than the
    /// projections need.
    pub fn evaluate(&self, xs: &[Real]) -> Result<Real, EvalError> {
        Evaluation::new(xs, &[]).value(self)
    }

    /// `m(xs, es)` as a lazily refinable real.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::MissingVariable`] when `xs` or `es` is shorter
    /// than the projections need.
    pub fn modulus(&self, xs: &[Real], es: &[Real]) -> Result<Real, EvalError> {
        Evaluation::new(xs, es).modulus(self)
    }

    /// Certified enclosure of `f` over the box `xs`.
    ///
    /// The output level `q` is the finest one with `m(cs, es) ≤ 2^(q-1)`
    /// that the modulus can be bounded at, but never finer than
    /// `options.finest_level`. With `m = f(cs).approx(q)` the true image of
    /// the box lies within `[(m-1)·2^q − 2^(q-1), (m+1)·2^q + 2^(q-1)]`.
    ///
    /// # Errors
    ///
    /// Propagates [`RealError::PrecisionOverflow`] and
    /// [`RealError::Aborted`] unchanged, and fails with
    /// [`EvalError::MissingVariable`] for an input box that is too short.
    pub fn apply(
        &self,
        xs: &[DyadicInterval],
        options: &ApplyOptions,
    ) -> Result<CertifiedOutput, EvalError> {
        let centres: Vec<Real> = xs.iter().map(DyadicInterval::midpoint).collect();
        let widths: Vec<Real> = xs.iter().map(DyadicInterval::half_width).collect();

        let mut evaluation = Evaluation::new(&centres, &widths);
        let bound = evaluation.modulus(self)?;
        let level = output_level(&bound, options)?;
        let value = evaluation.value(self)?;
        let centre = value.approx_with(level, &options.abort)?;
        Ok(CertifiedOutput::around(centre, level))
    }
}

/// Smallest certifiable `q` with `bound ≤ 2^(q-1)`, clamped at
/// `options.finest_level`.
fn output_level(bound: &Real, options: &ApplyOptions) -> Result<i32, RealError> {
    let floor = i64::from(options.finest_level);
    let stop = floor - 2;
    let mut probe: i64 = if floor > 0 { stop } else { 0 };
    loop {
        let approx = bound.approx_with(check_level(probe)?, &options.abort)?;
        if approx >= BigInt::from(4) || probe <= stop {
            // bound ≤ (approx + 1)·2^probe
            let ceiling = (approx + BigInt::one()).max(BigInt::one());
            let bits = i64::try_from((ceiling - 1u32).bits()).unwrap_or(i64::MAX);
            let level = (probe + 1 + bits).max(floor);
            return check_level(level);
        }
        probe = (2 * probe - 8).max(stop);
    }
}

/// Per-call memo of values and moduli keyed by node address.
struct Evaluation<'a> {
    xs: &'a [Real],
    es: &'a [Real],
    values: HashMap<*const Combinator, Real>,
    moduli: HashMap<*const Combinator, Real>,
}

impl<'a> Evaluation<'a> {
    fn new(xs: &'a [Real], es: &'a [Real]) -> Self {
        Self {
            xs,
            es,
            values: HashMap::new(),
            moduli: HashMap::new(),
        }
    }

    fn value(&mut self, f: &FunctionModulus) -> Result<Real, EvalError> {
        let key = Rc::as_ptr(&f.node);
        if let Some(known) = self.values.get(&key) {
            return Ok(known.clone());
        }
        let value = match f.combinator() {
            Combinator::Constant(y) => y.clone(),
            Combinator::Projection(index) => lookup(self.xs, *index)?,
            Combinator::Sum(a, b) => self.value(a)? + self.value(b)?,
            Combinator::Product(a, b) => self.value(a)? * self.value(b)?,
        };
        self.values.insert(key, value.clone());
        Ok(value)
    }

    fn modulus(&mut self, f: &FunctionModulus) -> Result<Real, EvalError> {
        let key = Rc::as_ptr(&f.node);
        if let Some(known) = self.moduli.get(&key) {
            return Ok(known.clone());
        }
        let modulus = match f.combinator() {
            Combinator::Constant(_) => Real::zero(),
            Combinator::Projection(index) => {
                lookup(self.xs, *index)?;
                lookup(self.es, *index)?
            }
            Combinator::Sum(a, b) => self.modulus(a)? + self.modulus(b)?,
            Combinator::Product(a, b) => {
                let fa = self.value(a)?.abs();
                let fb = self.value(b)?.abs();
                let ma = self.modulus(a)?;
                let mb = self.modulus(b)?;
                &fb * &ma + &fa * &mb + &ma * &mb
            }
        };
        self.moduli.insert(key, modulus.clone());
        Ok(modulus)
    }
}

fn lookup(values: &[Real], index: usize) -> Result<Real, EvalError> {
    values
        .get(index)
        .cloned()
        .ok_or(EvalError::MissingVariable {
            index,
            supplied: values.len(),
        })
}

/// One monomial `coefficient · x_variable^exponent`.
#[derive(Debug, Clone)]
pub struct Term {
    pub coefficient: Real,
    pub variable: usize,
    pub exponent: u32,
}

impl Term {
    #[must_use]
    pub fn new(coefficient: Real, variable: usize, exponent: u32) -> Self {
        Self {
            coefficient,
            variable,
            exponent,
        }
    }

    /// `∂/∂x_variable`, or `None` when the derivative vanishes.
    #[must_use]
    pub fn partial_derivative(&self, variable: usize) -> Option<Self> {
        if variable != self.variable || self.exponent == 0 {
            return None;
        }
        Some(Self {
            coefficient: &self.coefficient * &Real::from_integer(self.exponent),
            variable,
            exponent: self.exponent - 1,
        })
    }

    #[must_use]
    pub fn to_function(&self) -> FunctionModulus {
        FunctionModulus::scaled(
            self.coefficient.clone(),
            &FunctionModulus::power(self.variable, self.exponent),
        )
    }
}

/// One partial-derivative polynomial per dimension.
#[must_use]
pub fn gradient(terms: &[Term], dimension_count: usize) -> Vec<FunctionModulus> {
    (0..dimension_count)
        .map(|variable| {
            let partials: Vec<Term> = terms
                .iter()
                .filter_map(|term| term.partial_derivative(variable))
                .collect();
            FunctionModulus::polynomial(&partials)
        })
        .collect()
}
