//! Dyadic interval codes.
//!
//! A code `(k, p)` stands for the closed interval centred at `k·2^p` with
//! half-width `2^(p-1)`. Branching doubles the code, so every interval at
//! level `p` has three children at level `p-1` laid out like bricks: the
//! middle child sits inside the parent and the outer two straddle its edges.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_traits::Signed;

use crate::real::{format_scaled_decimal, Real};

/// An exact real interval `[(2k-1)·2^(p-1), (2k+1)·2^(p-1)]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DyadicInterval {
    code: BigInt,
    level: i32,
}

impl DyadicInterval {
    #[must_use]
    pub fn new(code: impl Into<BigInt>, level: i32) -> Self {
        Self {
            code: code.into(),
            level,
        }
    }

    #[must_use]
    pub fn code(&self) -> &BigInt {
        &self.code
    }

    /// Precision level `p`; larger is coarser.
    #[must_use]
    pub fn level(&self) -> i32 {
        self.level
    }

    /// The centre `k·2^p`.
    #[must_use]
    pub fn midpoint(&self) -> Real {
        Real::from_integer(self.code.clone()).shift_left(self.level)
    }

    /// `2^(p-1)`.
    #[must_use]
    pub fn half_width(&self) -> Real {
        Real::one().shift_left(self.level - 1)
    }

    /// The left end `(2k-1)·2^(p-1)`.
    #[must_use]
    pub fn lower_edge(&self) -> Real {
        self.child(-1).midpoint()
    }

    /// The right end `(2k+1)·2^(p-1)`.
    #[must_use]
    pub fn upper_edge(&self) -> Real {
        self.child(1).midpoint()
    }

    /// The code one level down at `2k + offset`.
    #[must_use]
    pub fn child(&self, offset: i32) -> Self {
        Self {
            code: (&self.code << 1u32) + offset,
            level: self.level - 1,
        }
    }

    /// The three bricks `2k-1, 2k, 2k+1` at level `p-1`.
    #[must_use]
    pub fn branch(&self) -> [Self; 3] {
        [self.child(-1), self.child(0), self.child(1)]
    }

    /// True iff every point of `self` lies in `other`.
    ///
    /// A coarser interval is never within a finer one, and at equal levels
    /// only the identical code is.
    #[must_use]
    pub fn is_within(&self, other: &Self) -> bool {
        match self.align(other) {
            Alignment::Finer => false,
            Alignment::SameLevel => self.code == other.code,
            Alignment::Coarser { centre, half } => {
                let lowest = &centre - &half + 1;
                let highest = &centre + &half - 1;
                self.code >= lowest && self.code <= highest
            }
        }
    }

    /// True iff `self` and `other` share more than an endpoint, for a finer
    /// or equally fine `self`.
    ///
    /// Children that fail this test lie entirely outside `other`, so
    /// filtering a branch with it never loses coverage of `other`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        match self.align(other) {
            Alignment::Finer => false,
            Alignment::SameLevel => self.code == other.code,
            Alignment::Coarser { centre, half } => (&self.code - &centre).abs() <= half,
        }
    }

    /// Express `other` in units of `2^self.level`.
    fn align(&self, other: &Self) -> Alignment {
        match other.level.cmp(&self.level) {
            Ordering::Less => Alignment::Finer,
            Ordering::Equal => Alignment::SameLevel,
            Ordering::Greater => {
                let gap = other.level.abs_diff(self.level);
                Alignment::Coarser {
                    centre: &other.code << gap,
                    half: BigInt::from(1) << (gap - 1),
                }
            }
        }
    }

    /// Exact `(k, p)` equality; numerically coincident intervals at
    /// different levels are not the same.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        self == other
    }

    /// Canonical bytes: big-endian level, code length, signed big-endian code.
    #[must_use]
    pub fn identity_bytes(&self) -> Vec<u8> {
        let code = self.code.to_signed_bytes_be();
        let mut bytes = Vec::with_capacity(8 + code.len());
        bytes.extend_from_slice(&self.level.to_be_bytes());
        bytes.extend_from_slice(&u32::try_from(code.len()).unwrap_or(u32::MAX).to_be_bytes());
        bytes.extend_from_slice(&code);
        bytes
    }

    /// The centre in decimal, with as many fractional digits as the level
    /// needs to be exact.
    #[must_use]
    pub fn midpoint_decimal(&self) -> String {
        exact_decimal(&self.code, self.level)
    }

    #[must_use]
    pub fn lower_edge_decimal(&self) -> String {
        self.child(-1).midpoint_decimal()
    }

    #[must_use]
    pub fn upper_edge_decimal(&self) -> String {
        self.child(1).midpoint_decimal()
    }
}

/// Where another interval sits relative to `self`'s level.
enum Alignment {
    Finer,
    SameLevel,
    /// Centre and half-width of the coarser interval at `self`'s level.
    Coarser { centre: BigInt, half: BigInt },
}

/// `code·2^level` rendered exactly.
fn exact_decimal(code: &BigInt, level: i32) -> String {
    if level >= 0 {
        return format_scaled_decimal(&(code << level.unsigned_abs()), 0);
    }
    let digits = level.unsigned_abs();
    // 2^-d · 10^d = 5^d
    let scaled = code * BigInt::from(5).pow(digits);
    format_scaled_decimal(&scaled, digits)
}

impl fmt::Display for DyadicInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.lower_edge_decimal(), self.upper_edge_decimal())
    }
}
