// ============================================================================
// Property Tests
// Identities and invariants of the public operations
// ============================================================================

use arbmath::functions;
use arbmath::prelude::*;
use proptest::prelude::*;
use quickcheck::{quickcheck, TestResult};

fn bits(n: usize) -> Precision {
    Precision::new(n).unwrap()
}

fn at(value: f64, precision: usize) -> Float {
    Float::from_f64(value, bits(precision))
}

/// `value` agrees with `reference` to `good` leading bits.
fn close(value: &Float, reference: &Float, good: i64) -> bool {
    let wide = value.precision().max(reference.precision()).widened(64);
    let diff = value.sub(reference, wide).abs();
    match (diff.exponent(), reference.exponent()) {
        (None, _) => diff.is_zero(),
        (Some(d), Some(r)) => r - d >= good,
        (Some(d), None) => -d >= good,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_pythagorean_identity(x in -1.0e6f64..1.0e6) {
        let p = bits(128);
        let x = at(x, 128);
        let s = functions::sin(&x, None);
        let c = functions::cos(&x, None);
        let one = s.mul(&s, p.widened(128)).add(&c.mul(&c, p.widened(128)), p.widened(128));
        prop_assert!(close(&one, &Float::one(p), 124));
    }

    #[test]
    fn prop_asin_inverts_sin(x in -1.4f64..1.4) {
        let x = at(x, 128);
        let back = functions::asin(&functions::sin(&x, None), None);
        prop_assert!(close(&back, &x, 118));
    }

    #[test]
    fn prop_atan_inverts_tan(x in -1.5f64..1.5) {
        let x = at(x, 128);
        let back = functions::atan(&functions::tan(&x, None), None);
        prop_assert!(close(&back, &x, 118));
    }

    #[test]
    fn prop_rounding_at_own_precision_is_exact(x in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let x = at(x, 53);
        for policy in RoundingPolicy::ALL {
            let (rounded, ternary) = functions::round_to_precision(&x, x.precision(), policy);
            prop_assert_eq!(ternary, Ternary::Exact);
            prop_assert_eq!(rounded, x.clone());
        }
    }

    #[test]
    fn prop_modulo_and_rem_signs(x in -1.0e9f64..1.0e9, y in prop_oneof![-1.0e3f64..-1.0e-3, 1.0e-3f64..1.0e3]) {
        let (x, y) = (at(x, 96), at(y, 96));
        let m = functions::modulo(&x, &y);
        let r = functions::rem(&x, &y);
        prop_assert!(m.is_zero() || m.is_negative() == y.is_negative());
        prop_assert!(r.is_zero() || r.is_negative() == x.is_negative());
        prop_assert!(m.abs() < y.abs());
        prop_assert!(r.abs() < y.abs());
    }

    #[test]
    fn prop_roots_invert_powers(x in 1.0e-6f64..1.0e6, n in 2i64..12) {
        let p = bits(128);
        let x = at(x, 128);
        let c = functions::cbrt(&x, None);
        prop_assert!(close(&c.mul(&c, p.widened(128)).mul(&c, p.widened(192)), &x, 124));
        let r = functions::root(&x, n, None);
        prop_assert!(close(&functions::powi(&r, n, Some(p.widened(64))), &x, 122));
    }

    #[test]
    fn prop_power_identities(x in 0.1f64..10.0, a in -4.0f64..4.0, b in -4.0f64..4.0) {
        let p = bits(128);
        let (x, a, b) = (at(x, 128), at(a, 128), at(b, 128));
        let whole = functions::pow(&x, &a.add(&b, p), None);
        let split = functions::pow(&x, &a, None).mul(&functions::pow(&x, &b, None), p);
        prop_assert!(close(&split, &whole, 120));

        let nested = functions::pow(&functions::pow(&x, &a, None), &b, None);
        let product = functions::pow(&x, &a.mul(&b, p), None);
        prop_assert!(close(&nested, &product, 118));
    }
}

#[test]
fn quickcheck_floor_and_ceil_bracket() {
    fn prop(v: f64) -> TestResult {
        if !v.is_finite() {
            return TestResult::discard();
        }
        let x = Float::from_f64(v, Precision::DOUBLE);
        let p = Precision::QUAD.widened(1100);
        let one = Float::one(p);
        let fl = functions::floor(&x);
        let ce = functions::ceil(&x);
        TestResult::from_bool(fl <= x && x < fl.add(&one, p) && ce.sub(&one, p) < x && x <= ce)
    }
    quickcheck(prop as fn(f64) -> TestResult);
}

#[test]
fn quickcheck_exp_ln_round_trip() {
    fn prop(v: f64) -> TestResult {
        // below 1e-3 the rounding of exp(x) near 1 dominates the relative error
        if !v.is_finite() || v.abs() > 700.0 || v.abs() < 1.0e-3 {
            return TestResult::discard();
        }
        let x = Float::from_f64(v, Precision::QUAD);
        let back = functions::ln(&functions::exp(&x, None), None);
        TestResult::from_bool(close(&back, &x, 100))
    }
    quickcheck(prop as fn(f64) -> TestResult);
}
