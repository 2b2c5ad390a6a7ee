// ============================================================================
// Clenshaw Recurrence
// b0 <- 2t b1 - b2 + c[i], from the highest coefficient down
// ============================================================================

use crate::config::KernelConfig;
use crate::kernels::series::bit_length;
use crate::numeric::{Float, Precision};

/// Rolling accumulators of one Clenshaw recurrence.
#[derive(Debug, Clone)]
struct ClenshawState {
    b0: Float,
    b1: Float,
    b2: Float,
}

impl ClenshawState {
    fn new(precision: Precision) -> Self {
        let zero = Float::zero(precision);
        Self {
            b0: zero.clone(),
            b1: zero.clone(),
            b2: zero,
        }
    }

    /// One step of the recurrence with coefficient `c`.
    #[inline]
    fn step(&mut self, two_t: &Float, c: &Float, wp: Precision) {
        self.b2 = std::mem::replace(&mut self.b1, self.b0.clone());
        self.b0 = two_t.mul(&self.b1, wp).sub(&self.b2, wp).add(c, wp);
    }

    /// Series value: `(b0 - b2) / 2`.
    fn value(&self, wp: Precision) -> Float {
        self.b0.sub(&self.b2, wp).mul_pow2(-1)
    }
}

/// Working precision for an `n`-term recurrence.
fn working_precision(n: usize, precision: Precision, config: &KernelConfig) -> Precision {
    config.working_precision(precision, bit_length(n as u64))
}

/// `sum c[i] T_i(t)` under the `(b0 - b2) / 2` convention, so `[c0]`
/// evaluates to `c0 / 2`. Empty coefficients give zero.
pub(crate) fn value(coefficients: &[Float], t: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if coefficients.is_empty() {
        return Float::zero(precision);
    }
    let wp = working_precision(coefficients.len(), precision, config);
    let two_t = t.mul_pow2(1);
    let mut state = ClenshawState::new(wp);
    for c in coefficients.iter().rev() {
        state.step(&two_t, c, wp);
    }
    state.value(wp)
}

/// Derivative with respect to `t`.
///
/// Each coefficient is weighted by its index and the same recurrence returns
/// `b0` unhalved, which sums `i c[i] U_(i-1)(t)`.
pub(crate) fn derivative(coefficients: &[Float], t: &Float, precision: Precision, config: &KernelConfig) -> Float {
    let n = coefficients.len();
    if n < 2 {
        return Float::zero(precision);
    }
    let wp = working_precision(n, precision, config);
    let two_t = t.mul_pow2(1);
    let mut state = ClenshawState::new(wp);
    for i in (1..n).rev() {
        let weighted = coefficients[i].mul_u64(i as u64, wp);
        state.step(&two_t, &weighted, wp);
    }
    state.b0
}

/// One value per component, each evaluated on its own.
pub(crate) fn components(series: &[&[Float]], t: &Float, precision: Precision, config: &KernelConfig) -> Vec<Float> {
    series
        .iter()
        .map(|coefficients| value(coefficients, t, precision, config))
        .collect()
}

/// One value per component from a single pass over the coefficient index.
///
/// Components join the pass once the index drops below their length and each
/// keeps the working precision of its own length, so every result equals
/// [`components`] bit for bit.
pub(crate) fn components_interleaved(
    series: &[&[Float]],
    t: &Float,
    precision: Precision,
    config: &KernelConfig,
) -> Vec<Float> {
    let two_t = t.mul_pow2(1);
    let longest = series.iter().map(|c| c.len()).max().unwrap_or(0);
    let mut lanes: Vec<(ClenshawState, Precision)> = series
        .iter()
        .map(|c| {
            let wp = working_precision(c.len().max(1), precision, config);
            (ClenshawState::new(wp), wp)
        })
        .collect();

    for i in (0..longest).rev() {
        for (coefficients, (state, wp)) in series.iter().zip(lanes.iter_mut()) {
            if let Some(c) = coefficients.get(i) {
                state.step(&two_t, c, *wp);
            }
        }
    }

    series
        .iter()
        .zip(lanes)
        .map(|(coefficients, (state, wp))| {
            if coefficients.is_empty() {
                Float::zero(precision)
            } else {
                state.value(wp)
            }
        })
        .collect()
}
