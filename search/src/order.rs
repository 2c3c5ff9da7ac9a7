//! Orderings and the eclipse (domination) test.
//!
//! Interval edges at different levels are compared on integer codes only:
//! the coarser code is rescaled to the finer level and compared directly,
//! which never touches the real-number engine.

use std::cmp::Ordering;

use brickwork_kernel::DyadicInterval;
use num_bigint::BigInt;

use crate::candidate::SearchCandidate;

/// Which edge of an interval is being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Lower,
    Upper,
}

impl Edge {
    fn offset(self) -> i32 {
        match self {
            Edge::Lower => -1,
            Edge::Upper => 1,
        }
    }
}

/// Order two intervals by their lower real edge.
///
/// On an exact tie after alignment the originally finer interval is the
/// smaller one.
#[must_use]
pub fn compare_lower_bound(a: &DyadicInterval, b: &DyadicInterval) -> Ordering {
    compare_edge(a, b, Edge::Lower)
}

/// Order two intervals by their upper real edge.
///
/// On an exact tie after alignment the originally finer interval is the
/// larger one.
#[must_use]
pub fn compare_upper_bound(a: &DyadicInterval, b: &DyadicInterval) -> Ordering {
    compare_edge(a, b, Edge::Upper)
}

fn compare_edge(a: &DyadicInterval, b: &DyadicInterval, edge: Edge) -> Ordering {
    if a.level() == b.level() {
        return a.code().cmp(b.code());
    }
    // The finer operand keeps its code; the coarser edge `2k±1` is doubled
    // down to the finer level.
    let a_is_finer = a.level() < b.level();
    let (fine, coarse) = if a_is_finer { (a, b) } else { (b, a) };
    let gap = coarse.level().abs_diff(fine.level());
    let scaled: BigInt = ((coarse.code() << 1u32) + edge.offset()) << (gap - 1);

    let finer_on_tie = match edge {
        Edge::Lower => Ordering::Less,
        Edge::Upper => Ordering::Greater,
    };
    let fine_vs_coarse = fine.code().cmp(&scaled).then(finer_on_tie);
    if a_is_finer {
        fine_vs_coarse
    } else {
        fine_vs_coarse.reverse()
    }
}

/// `Σ |derivative|` of a candidate.
#[must_use]
pub fn derivative_score(candidate: &SearchCandidate) -> f64 {
    candidate.derivative_score()
}

fn compare_scores(a: &SearchCandidate, b: &SearchCandidate) -> Ordering {
    a.derivative_score().total_cmp(&b.derivative_score())
}

/// Certified lower bound first, then derivative score.
#[must_use]
pub fn global_order(a: &SearchCandidate, b: &SearchCandidate) -> Ordering {
    compare_lower_bound(a.output().lower(), b.output().lower()).then_with(|| compare_scores(a, b))
}

/// Derivative score first, then certified lower bound.
#[must_use]
pub fn local_order(a: &SearchCandidate, b: &SearchCandidate) -> Ordering {
    compare_scores(a, b).then_with(|| compare_lower_bound(a.output().lower(), b.output().lower()))
}

/// True iff `a`'s certified upper edge lies strictly below `b`'s certified
/// lower edge, so `b` cannot hold the global minimum.
#[must_use]
pub fn eclipses(a: &SearchCandidate, b: &SearchCandidate) -> bool {
    upper_edge_below_lower_edge(a.output().upper(), b.output().lower())
}

/// Exact `high.upper_edge() < low.lower_edge()` on aligned integer codes.
fn upper_edge_below_lower_edge(high: &DyadicInterval, low: &DyadicInterval) -> bool {
    // Edges are (2k±1)·2^(p-1); measure both in units of 2^(min(p)-1).
    let base = high.level().min(low.level());
    let upper = edge_in_units(high, Edge::Upper, base);
    let lower = edge_in_units(low, Edge::Lower, base);
    upper < lower
}

fn edge_in_units(interval: &DyadicInterval, edge: Edge, base: i32) -> BigInt {
    let odd = (interval.code() << 1u32) + edge.offset();
    odd << interval.level().abs_diff(base)
}

/// Mark every candidate eclipsed by some other candidate.
///
/// A candidate is eclipsed by anything iff it is eclipsed by the one with
/// the smallest certified upper edge, so one pass finds that candidate and
/// a second tests everything against it.
#[must_use]
pub fn eclipsed_mask<'a, I>(candidates: I) -> Vec<bool>
where
    I: IntoIterator<Item = &'a SearchCandidate>,
    I::IntoIter: Clone,
{
    let iter = candidates.into_iter();
    let Some(best) = iter
        .clone()
        .min_by(|a, b| compare_upper_bound(a.output().upper(), b.output().upper()))
    else {
        return Vec::new();
    };
    iter.map(|candidate| eclipses(best, candidate)).collect()
}
