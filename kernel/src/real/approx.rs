//! Approximation algorithms for each expression node.
//!
//! Every function here returns an integer `m` for a target level `p` such
//! that `|m·2^p − x| ≤ 2^p`. Level arithmetic is carried in `i64` and
//! narrowed through [`check_level`], which is where precision overflow is
//! detected.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use super::{AbortSignal, Kind, Real, RealError, MAX_LEVEL_MAGNITUDE};

/// Narrow a level to `i32`, failing when it leaves the supported range.
pub(crate) fn check_level(level: i64) -> Result<i32, RealError> {
    if level.abs() > MAX_LEVEL_MAGNITUDE {
        return Err(RealError::PrecisionOverflow { level });
    }
    i32::try_from(level).map_err(|_| RealError::PrecisionOverflow { level })
}

/// `value · 2^shift`, rounding half up when `shift` is negative.
pub(crate) fn scale(value: &BigInt, shift: i64) -> BigInt {
    if shift >= 0 {
        value << shift.unsigned_abs()
    } else {
        let adjusted: BigInt = value >> (shift.unsigned_abs() - 1);
        (adjusted + 1) >> 1u32
    }
}

/// Bit length of `|value|` as a signed level offset.
pub(crate) fn bit_length(value: &BigInt) -> i64 {
    i64::try_from(value.bits()).unwrap_or(i64::MAX)
}

impl Kind {
    pub(super) fn approximate(&self, level: i32, signal: &AbortSignal) -> Result<BigInt, RealError> {
        let p = i64::from(level);
        match self {
            Kind::Integer(n) => Ok(scale(n, -p)),
            Kind::Shift(x, bits) => x.approx_in(check_level(p - i64::from(*bits))?, signal),
            Kind::Negate(x) => Ok(-x.approx_in(level, signal)?),
            Kind::Add(a, b) => {
                let inner = check_level(p - 2)?;
                let sum = a.approx_in(inner, signal)? + b.approx_in(inner, signal)?;
                Ok(scale(&sum, -2))
            }
            Kind::Multiply(a, b) => multiply(a, b, p, signal),
            Kind::Inverse(x) => inverse(x, p, signal),
            Kind::Abs(x) => Ok(x.approx_in(level, signal)?.abs()),
        }
    }
}

impl Real {
    /// Most significant digit position `d` with `2^(d-1) < |x| < 2^(d+1)`.
    ///
    /// `None` means `|x|` is too small to resolve at level `n`.
    pub(crate) fn msd(&self, n: i64, signal: &AbortSignal) -> Result<Option<i64>, RealError> {
        let level = check_level(n - 1)?;
        let magnitude = self.approx_in(level, signal)?.abs();
        if magnitude <= BigInt::one() {
            return Ok(None);
        }
        Ok(Some(i64::from(level) + bit_length(&magnitude) - 1))
    }

    /// Search for the msd with geometrically finer probes down to `floor`.
    pub(crate) fn iter_msd(&self, floor: i64, signal: &AbortSignal) -> Result<Option<i64>, RealError> {
        let mut probe: i64 = 0;
        while probe > floor + 30 {
            if let Some(msd) = self.msd(probe, signal)? {
                return Ok(Some(msd));
            }
            probe = (probe * 3) / 2 - 16;
        }
        self.msd(floor, signal)
    }
}

fn multiply(a: &Real, b: &Real, p: i64, signal: &AbortSignal) -> Result<BigInt, RealError> {
    let half = (p >> 1) - 1;
    let (x, y, msd_x) = match a.msd(half, signal)? {
        Some(msd) => (a, b, msd),
        None => match b.msd(half, signal)? {
            Some(msd) => (b, a, msd),
            // Both factors are below 2^half, so the product is below 2^p.
            None => return Ok(BigInt::zero()),
        },
    };

    let level_y = check_level(p - msd_x - 3)?;
    let approx_y = y.approx_in(level_y, signal)?;
    if approx_y.is_zero() {
        return Ok(BigInt::zero());
    }
    let msd_y = i64::from(level_y) + bit_length(&approx_y) - 1;

    let level_x = check_level(p - msd_y - 3)?;
    let approx_x = x.approx_in(level_x, signal)?;

    let shift = i64::from(level_x) + i64::from(level_y) - p;
    Ok(scale(&(approx_x * approx_y), shift))
}

fn inverse(x: &Real, p: i64, signal: &AbortSignal) -> Result<BigInt, RealError> {
    let floor = -MAX_LEVEL_MAGNITUDE + 1;
    let msd = x
        .iter_msd(floor, signal)?
        .ok_or(RealError::PrecisionOverflow { level: floor })?;

    let inverse_msd = 1 - msd;
    let digits_needed = inverse_msd - p + 3;
    let level_needed = msd - digits_needed;
    let log_scale_factor = -p - level_needed;
    if log_scale_factor < 0 {
        return Ok(BigInt::zero());
    }

    let divisor = x.approx_in(check_level(level_needed)?, signal)?;
    let magnitude = divisor.abs();
    let dividend: BigInt = (BigInt::one() << log_scale_factor.unsigned_abs()) + (&magnitude >> 1u32);
    let quotient = dividend / &magnitude;
    if divisor.is_negative() {
        Ok(-quotient)
    } else {
        Ok(quotient)
    }
}
