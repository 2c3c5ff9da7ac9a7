//! Constructive real numbers with bit-exact truncated approximations.
//!
//! A [`Real`] is an immutable expression DAG. Asking for `approx(n)` returns
//! an integer `m` with `|m·2^n − x| ≤ 2^n`; each node caches its finest
//! approximation so that repeated requests at coarser levels are free.
//!
//! Nodes are reference counted and the cache uses interior mutability, so a
//! `Real` is cheap to clone but confined to one thread. Cancellation crosses
//! threads through [`AbortSignal`].

mod abort;
mod approx;

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::{Float, Signed, ToPrimitive};

pub use abort::AbortSignal;
pub(crate) use approx::{check_level, scale};

/// Largest level magnitude (in bits) any approximation may request.
pub const MAX_LEVEL_MAGNITUDE: i64 = 1 << 20;

/// Failure of a real-number computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RealError {
    /// An approximation needed a level outside `±MAX_LEVEL_MAGNITUDE`.
    #[error("precision overflow: level {level} is outside the supported range")]
    PrecisionOverflow { level: i64 },
    /// The computation observed a raised [`AbortSignal`].
    #[error("computation aborted")]
    Aborted,
    /// A non-finite float cannot be represented exactly.
    #[error("cannot represent non-finite value {value}")]
    NotFinite { value: f64 },
}

/// An exact real number, approximated lazily to any requested level.
#[derive(Clone)]
pub struct Real {
    node: Rc<Node>,
}

struct Node {
    kind: Kind,
    cache: RefCell<Option<Cached>>,
}

struct Cached {
    level: i32,
    approx: BigInt,
}

pub(crate) enum Kind {
    Integer(BigInt),
    /// `x · 2^bits`
    Shift(Real, i32),
    Negate(Real),
    Add(Real, Real),
    Multiply(Real, Real),
    Inverse(Real),
    Abs(Real),
}

impl Kind {
    fn name(&self) -> &'static str {
        match self {
            Kind::Integer(_) => "integer",
            Kind::Shift(..) => "shift",
            Kind::Negate(_) => "negate",
            Kind::Add(..) => "add",
            Kind::Multiply(..) => "multiply",
            Kind::Inverse(_) => "inverse",
            Kind::Abs(_) => "abs",
        }
    }
}

impl Real {
    fn from_kind(kind: Kind) -> Self {
        Self {
            node: Rc::new(Node {
                kind,
                cache: RefCell::new(None),
            }),
        }
    }

    #[must_use]
    pub fn from_integer(value: impl Into<BigInt>) -> Self {
        Self::from_kind(Kind::Integer(value.into()))
    }

    #[must_use]
    pub fn zero() -> Self {
        Self::from_integer(0)
    }

    #[must_use]
    pub fn one() -> Self {
        Self::from_integer(1)
    }

    /// The exact value of a finite `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`RealError::NotFinite`] for NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self, RealError> {
        if !value.is_finite() {
            return Err(RealError::NotFinite { value });
        }
        let (mantissa, exponent, sign) = Float::integer_decode(value);
        let signed = BigInt::from(mantissa) * i32::from(sign);
        Ok(Self::from_integer(signed).shift_left(i32::from(exponent)))
    }

    /// `numerator / denominator`. A zero denominator surfaces as
    /// [`RealError::PrecisionOverflow`] on the first approximation.
    #[must_use]
    pub fn from_ratio(numerator: impl Into<BigInt>, denominator: impl Into<BigInt>) -> Self {
        Self::from_integer(numerator) * Self::from_integer(denominator).inverse()
    }

    /// `self · 2^bits`.
    #[must_use]
    pub fn shift_left(&self, bits: i32) -> Self {
        if bits == 0 {
            return self.clone();
        }
        Self::from_kind(Kind::Shift(self.clone(), bits))
    }

    #[must_use]
    pub fn negate(&self) -> Self {
        Self::from_kind(Kind::Negate(self.clone()))
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self::from_kind(Kind::Abs(self.clone()))
    }

    /// `1 / self`. Approximating the inverse of zero fails with
    /// [`RealError::PrecisionOverflow`].
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self::from_kind(Kind::Inverse(self.clone()))
    }

    /// `self^exponent` by repeated squaring; `x^0` is one.
    #[must_use]
    pub fn pow(&self, exponent: u32) -> Self {
        let mut result: Option<Self> = None;
        let mut base = self.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = Some(match result {
                    Some(acc) => &acc * &base,
                    None => base.clone(),
                });
            }
            remaining >>= 1;
            if remaining > 0 {
                base = &base * &base;
            }
        }
        result.unwrap_or_else(Self::one)
    }

    fn sum(&self, other: &Self) -> Self {
        Self::from_kind(Kind::Add(self.clone(), other.clone()))
    }

    fn difference(&self, other: &Self) -> Self {
        self.sum(&other.negate())
    }

    fn product(&self, other: &Self) -> Self {
        Self::from_kind(Kind::Multiply(self.clone(), other.clone()))
    }

    fn quotient(&self, other: &Self) -> Self {
        self.product(&other.inverse())
    }

    /// An integer `m` with `|m·2^level − self| ≤ 2^level`.
    ///
    /// # Errors
    ///
    /// Returns [`RealError::PrecisionOverflow`] when the computation needs a
    /// level beyond [`MAX_LEVEL_MAGNITUDE`].
    pub fn approx(&self, level: i32) -> Result<BigInt, RealError> {
        self.approx_with(level, &AbortSignal::never())
    }

    /// [`Real::approx`], checking `signal` at every node visited.
    ///
    /// # Errors
    ///
    /// Returns [`RealError::PrecisionOverflow`] as [`Real::approx`] does, and
    /// [`RealError::Aborted`] once `signal` has been raised.
    pub fn approx_with(&self, level: i32, signal: &AbortSignal) -> Result<BigInt, RealError> {
        let level = check_level(i64::from(level))?;
        self.approx_in(level, signal)
    }

    pub(crate) fn approx_in(&self, level: i32, signal: &AbortSignal) -> Result<BigInt, RealError> {
        signal.check()?;
        if let Some(cached) = self.node.cache.borrow().as_ref() {
            if cached.level <= level {
                let shift = i64::from(cached.level) - i64::from(level);
                return Ok(scale(&cached.approx, shift));
            }
        }
        let approx = self.node.kind.approximate(level, signal)?;
        *self.node.cache.borrow_mut() = Some(Cached {
            level,
            approx: approx.clone(),
        });
        Ok(approx)
    }

    /// The exact sign, refining until it can be decided.
    ///
    /// # Errors
    ///
    /// A value equal to zero never resolves and ends with
    /// [`RealError::PrecisionOverflow`]; `signal` aborts as usual.
    pub fn sign(&self, signal: &AbortSignal) -> Result<Ordering, RealError> {
        let mut level: i64 = -20;
        loop {
            let approx = self.approx_in(check_level(level)?, signal)?;
            if approx.abs() > BigInt::from(1) {
                return Ok(if approx.is_negative() {
                    Ordering::Less
                } else {
                    Ordering::Greater
                });
            }
            level *= 2;
        }
    }

    /// Compare with `other`, reporting `Equal` when they are within about
    /// `2^(level+1)` of each other.
    ///
    /// # Errors
    ///
    /// Propagates approximation failures.
    pub fn compare_with_tolerance(&self, other: &Self, level: i32) -> Result<Ordering, RealError> {
        let difference = self.difference(other).approx(level)?;
        let one = BigInt::from(1);
        Ok(if difference > one {
            Ordering::Greater
        } else if difference < -one {
            Ordering::Less
        } else {
            Ordering::Equal
        })
    }

    /// Nearest-ish `f64`, accurate to about `2^-64` absolute.
    ///
    /// # Errors
    ///
    /// Propagates approximation failures.
    pub fn to_f64(&self) -> Result<f64, RealError> {
        let approx = self.approx(-64)?;
        let value = approx.to_f64().unwrap_or(f64::NAN);
        Ok(value * (-64.0f64).exp2())
    }

    /// Decimal rendering with exactly `digits` fractional digits.
    ///
    /// The last digit may be off by one.
    ///
    /// # Errors
    ///
    /// Propagates approximation failures.
    pub fn to_decimal_string(&self, digits: u32) -> Result<String, RealError> {
        let scaled = self * &Self::from_integer(BigInt::from(10).pow(digits));
        let approx = scaled.approx(0)?;
        Ok(format_scaled_decimal(&approx, digits))
    }
}

/// Render `value / 10^digits` with exactly `digits` fractional digits.
pub(crate) fn format_scaled_decimal(value: &BigInt, digits: u32) -> String {
    let width = digits as usize + 1;
    let magnitude = value.abs().to_string();
    let padded = format!("{magnitude:0>width$}");
    let split = padded.len() - digits as usize;
    let sign = if value.is_negative() { "-" } else { "" };
    if digits == 0 {
        format!("{sign}{padded}")
    } else {
        format!("{sign}{}.{}", &padded[..split], &padded[split..])
    }
}

impl fmt::Debug for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.node.cache.borrow();
        let mut s = f.debug_struct("Real");
        s.field("kind", &self.node.kind.name());
        if let Some(cached) = cache.as_ref() {
            s.field("level", &cached.level).field("approx", &cached.approx);
        }
        s.finish()
    }
}

impl From<BigInt> for Real {
    fn from(value: BigInt) -> Self {
        Self::from_integer(value)
    }
}

impl From<i64> for Real {
    fn from(value: i64) -> Self {
        Self::from_integer(value)
    }
}

impl From<i32> for Real {
    fn from(value: i32) -> Self {
        Self::from_integer(value)
    }
}

macro_rules! forward_binary_op {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl $trait<&Real> for &Real {
            type Output = Real;
            fn $method(self, rhs: &Real) -> Real {
                self.$inner(rhs)
            }
        }

        impl $trait<Real> for Real {
            type Output = Real;
            fn $method(self, rhs: Real) -> Real {
                self.$inner(&rhs)
            }
        }

        impl $trait<&Real> for Real {
            type Output = Real;
            fn $method(self, rhs: &Real) -> Real {
                self.$inner(rhs)
            }
        }

        impl $trait<Real> for &Real {
            type Output = Real;
            fn $method(self, rhs: Real) -> Real {
                self.$inner(&rhs)
            }
        }
    };
}

forward_binary_op!(Add, add, sum);
forward_binary_op!(Sub, sub, difference);
forward_binary_op!(Mul, mul, product);
forward_binary_op!(Div, div, quotient);

impl Neg for Real {
    type Output = Real;
    fn neg(self) -> Real {
        self.negate()
    }
}

impl Neg for &Real {
    type Output = Real;
    fn neg(self) -> Real {
        self.negate()
    }
}
