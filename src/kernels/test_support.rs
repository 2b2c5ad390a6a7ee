// ============================================================================
// Test Support
// Reference digits and accuracy assertions shared by kernel tests
// ============================================================================

use crate::numeric::{Float, Precision};

pub const PI_DIGITS: &str = "3.14159265358979323846264338327950288419716939937510582097494459230781640628620899862803482534211706798214808651";
pub const E_DIGITS: &str = "2.71828182845904523536028747135266249775724709369995957496696762772407663035354759457138217852516642742746";
pub const SQRT2_DIGITS: &str = "1.41421356237309504880168872420969807856967187537694807317667973799073247846210703885038753432764157";
pub const LN2_DIGITS: &str = "0.693147180559945309417232121458176568075500134360255254120680009493393621969694715605863326996418687542";
pub const LN10_DIGITS: &str = "2.30258509299404568401799145468436420760110148862877297603332790096757260967735248023599720508959829834196";

pub fn p(bits: usize) -> Precision {
    Precision::new(bits).unwrap()
}

pub fn f(value: f64) -> Float {
    Float::from_f64(value, Precision::DOUBLE)
}

pub fn parse(digits: &str, bits: usize) -> Float {
    Float::parse(digits, p(bits + 64)).unwrap()
}

/// Number of leading bits on which `value` and `reference` agree.
pub fn correct_bits(value: &Float, reference: &Float) -> i64 {
    let wide = value.precision().max(reference.precision()).widened(64);
    let diff = value.sub(reference, wide).abs();
    match (diff.exponent(), reference.exponent()) {
        (None, _) if diff.is_zero() => i64::MAX,
        (Some(d), Some(r)) => r - d,
        (Some(d), None) => -d,
        _ => i64::MIN,
    }
}

/// Assert that `value` matches `reference` to at least `bits` bits.
pub fn assert_bits(value: &Float, reference: &Float, bits: usize) {
    let good = correct_bits(value, reference);
    assert!(
        good >= bits as i64,
        "expected {} correct bits, got {} ({} vs {})",
        bits,
        good,
        value,
        reference
    );
}

/// Assert that `value` matches a decimal reference to `bits` bits.
pub fn assert_digits(value: &Float, digits: &str, bits: usize) {
    assert_bits(value, &parse(digits, bits), bits);
}

/// Assert closeness to a double to within a few double ULPs.
pub fn assert_near_f64(value: &Float, expected: f64) {
    let got = value.to_f64();
    let tolerance = expected.abs().max(f64::MIN_POSITIVE) * 8.0 * f64::EPSILON;
    assert!(
        (got - expected).abs() <= tolerance,
        "expected {}, got {}",
        expected,
        got
    );
}
