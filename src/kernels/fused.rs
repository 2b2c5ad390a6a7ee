// ============================================================================
// Fused Kernels
// Sibling series advanced in lockstep over one shared argument reduction
// ============================================================================
//
// Each lane performs exactly the term recurrence of its reference kernel at
// the same working precision, so fused results are bit-identical to the
// reference results. Only the loop structure differs.

use super::exp::ExpReduction;
use super::hyperbolic::{self, combine_cosh, combine_sinh, HyperbolicPlan};
use super::series::report_exhausted;
use super::trig::{self, TrigReduction};
use crate::config::KernelConfig;
use crate::numeric::{Float, Precision};

/// Tangent with the sine and cosine series summed side by side.
pub(crate) fn tan(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    if let Some(value) = trig::special(x, precision, x.clone()) {
        return value;
    }
    let reduction = TrigReduction::new(x, trig::working_precision(precision, config), config);

    let cap = config.max_series_terms;
    let mut sin_lane = reduction.sin_lane();
    let mut cos_lane = reduction.cos_lane();
    for _ in 0..cap {
        let sin_running = !sin_lane.is_done() && reduction.step_sin(&mut sin_lane);
        let cos_running = !cos_lane.is_done() && reduction.step_cos(&mut cos_lane);
        if !sin_running && !cos_running {
            break;
        }
    }
    report_exhausted(&sin_lane, "sin", cap);
    report_exhausted(&cos_lane, "cos", cap);

    let sin_r = reduction.finish_sin(sin_lane);
    let cos_r = reduction.finish_cos(cos_lane);
    reduction.tan_from(&sin_r, &cos_r)
}

/// `e^x` and `e^-x` from one reduction, both series in lockstep.
fn exp_pair(reduction: &ExpReduction, config: &KernelConfig) -> (Float, Float) {
    let negated = reduction.negated();
    let cap = config.max_series_terms;
    let mut positive = reduction.lane();
    let mut negative = negated.lane();
    for _ in 0..cap {
        let positive_running = !positive.is_done() && reduction.step(&mut positive);
        let negative_running = !negative.is_done() && negated.step(&mut negative);
        if !positive_running && !negative_running {
            break;
        }
    }
    report_exhausted(&positive, "exp", cap);
    report_exhausted(&negative, "exp", cap);

    (
        reduction.reconstruct(positive.finish()),
        negated.reconstruct(negative.finish()),
    )
}

fn evaluate(plan: HyperbolicPlan, config: &KernelConfig, combine: fn(&Float, &Float, Precision) -> Float) -> Float {
    match plan {
        HyperbolicPlan::Done(value) => value,
        HyperbolicPlan::Pair { reduction, precision } => {
            let (positive, negative) = exp_pair(&reduction, config);
            combine(&positive, &negative, precision)
        },
    }
}

/// Hyperbolic sine with `e^x` and `e^-x` summed side by side.
pub(crate) fn sinh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    evaluate(hyperbolic::plan_sinh(x, precision, config), config, combine_sinh)
}

/// Hyperbolic cosine with `e^x` and `e^-x` summed side by side.
pub(crate) fn cosh(x: &Float, precision: Precision, config: &KernelConfig) -> Float {
    evaluate(hyperbolic::plan_cosh(x, precision, config), config, combine_cosh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_support::*;

    fn cfg() -> KernelConfig {
        KernelConfig::default()
    }

    #[test]
    fn test_tan_bit_identical() {
        for bits in [53, 113, 300] {
            for v in [-9.25, -1.5, -0.001, 0.7, 1.5707963, 3.0, 250.5] {
                let x = Float::from_f64(v, p(bits));
                assert_eq!(tan(&x, p(bits), &cfg()), trig::tan(&x, p(bits), &cfg()), "tan({v}) at {bits}");
            }
        }
    }

    #[test]
    fn test_sinh_cosh_bit_identical() {
        for bits in [53, 200] {
            for v in [-30.0, -2.0, -0.75, -0.1, 0.3, 0.5, 1.0, 12.5] {
                let x = Float::from_f64(v, p(bits));
                assert_eq!(sinh(&x, p(bits), &cfg()), hyperbolic::sinh(&x, p(bits), &cfg()), "sinh({v})");
                assert_eq!(cosh(&x, p(bits), &cfg()), hyperbolic::cosh(&x, p(bits), &cfg()), "cosh({v})");
            }
        }
    }

    #[test]
    fn test_identical_when_series_cap_is_hit() {
        let tight = KernelConfig::default().with_max_series_terms(3);
        let x = Float::from_f64(2.5, p(128));
        assert_eq!(tan(&x, p(128), &tight), trig::tan(&x, p(128), &tight));
        assert_eq!(cosh(&x, p(128), &tight), hyperbolic::cosh(&x, p(128), &tight));
    }

    #[test]
    fn test_special_values() {
        let d = Precision::DOUBLE;
        assert!(tan(&Float::infinity(false, d), d, &cfg()).is_nan());
        assert!(sinh(&f(0.0), d, &cfg()).is_zero());
        assert_eq!(cosh(&f(0.0), d, &cfg()), Float::one(d));
    }
}
