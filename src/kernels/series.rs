// ============================================================================
// Series Summation
// Term-recurrence lanes with a precision-relative convergence test
// ============================================================================

use crate::numeric::{Float, Precision};
use tracing::debug;

/// One running power series: the partial sum and its latest term.
///
/// A lane is advanced one term at a time so that sibling series (sine and
/// cosine, `e^r` and `e^-r`) can be stepped in lockstep. Each lane performs
/// the same arithmetic whether it runs alone or beside another.
#[derive(Debug, Clone)]
pub(crate) struct SeriesLane {
    sum: Float,
    term: Float,
    index: u64,
    done: bool,
}

impl SeriesLane {
    /// Start a series whose first term (index 0) is `first`.
    pub fn new(first: Float) -> Self {
        let done = first.is_zero();
        Self {
            sum: first.clone(),
            term: first,
            index: 0,
            done,
        }
    }

    /// Add the next term, produced by `next(index, previous_term)`.
    ///
    /// Returns `false` once the lane has converged; further calls are no-ops.
    pub fn advance<F>(&mut self, precision: Precision, next: F) -> bool
    where
        F: FnOnce(u64, &Float) -> Float,
    {
        if self.done {
            return false;
        }
        self.index += 1;
        let term = next(self.index, &self.term);
        self.sum = self.sum.add(&term, precision);
        self.done = negligible(&term, &self.sum, precision);
        self.term = term;
        !self.done
    }

    /// Check if the newest term fell below the threshold.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Number of terms added after the first.
    #[inline]
    pub fn terms(&self) -> u64 {
        self.index
    }

    /// The partial sum.
    #[inline]
    pub fn finish(self) -> Float {
        self.sum
    }
}

/// Whether `term` no longer affects `sum` at `precision`.
///
/// Zero and non-finite terms end the series; a NaN sum then propagates.
pub(crate) fn negligible(term: &Float, sum: &Float, precision: Precision) -> bool {
    match (term.exponent(), sum.exponent()) {
        (None, _) => true,
        (Some(t), Some(s)) => t < s - precision.bits() as i64,
        (Some(_), None) => !sum.is_zero(),
    }
}

/// Step `lane` until it converges or `cap` terms have been added.
pub(crate) fn run_lane<F>(lane: &mut SeriesLane, precision: Precision, cap: usize, label: &'static str, mut next: F)
where
    F: FnMut(u64, &Float) -> Float,
{
    for _ in 0..cap {
        if !lane.advance(precision, &mut next) {
            return;
        }
    }
    report_exhausted(lane, label, cap);
}

/// Log a lane that stopped at its term cap.
pub(crate) fn report_exhausted(lane: &SeriesLane, label: &'static str, cap: usize) {
    if !lane.is_done() {
        debug!(series = label, terms = lane.terms(), cap, "series hit its term cap before converging");
    }
}

/// Sum a whole series starting at `first`.
pub(crate) fn sum_series<F>(first: Float, precision: Precision, cap: usize, label: &'static str, next: F) -> Float
where
    F: FnMut(u64, &Float) -> Float,
{
    let mut lane = SeriesLane::new(first);
    run_lane(&mut lane, precision, cap, label, next);
    lane.finish()
}

/// Number of bits needed to write `n`.
#[inline]
pub(crate) fn bit_length(n: u64) -> usize {
    (u64::BITS - n.leading_zeros()) as usize
}

/// Integer square root, used to size reduction step counts.
#[inline]
pub(crate) fn isqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}
