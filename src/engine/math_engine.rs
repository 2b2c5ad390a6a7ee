// ============================================================================
// Math Engine
// Public entry points: resolve precision, dispatch, round exactly once
// ============================================================================

use crate::config::KernelConfig;
use crate::dispatch::{global_table, DispatchTable, UnaryOp};
use crate::kernels::constants;
use crate::numeric::{Float, Precision};
use crate::polynomial::ChebyshevSegment;
use crate::rounding::{self, round_to_precision, RoundingPolicy, Ternary};
use std::sync::{Arc, OnceLock};

/// Generates `name(x, precision)` and `name_rounded(x, precision, policy)`
/// for each unary slot.
macro_rules! unary_operations {
    ($($name:ident, $rounded:ident => $op:ident, $doc:literal;)*) => {
        $(
            #[doc = $doc]
            ///
            /// Rounded to nearest-even at `precision`, or at the precision of
            /// `x` when `precision` is `None`.
            pub fn $name(&self, x: &Float, precision: Option<Precision>) -> Float {
                self.$rounded(x, precision, RoundingPolicy::default()).0
            }

            #[doc = $doc]
            ///
            /// Rounded under `policy`, with the rounding direction.
            pub fn $rounded(
                &self,
                x: &Float,
                precision: Option<Precision>,
                policy: RoundingPolicy,
            ) -> (Float, Ternary) {
                self.unary(UnaryOp::$op, x, precision, policy)
            }
        )*
    };
}

/// Evaluates every operation through a dispatch table.
///
/// Kernels run at working precision; the engine rounds their result to the
/// requested precision once, under the caller's policy. Engines built from
/// different capability snapshots return identical results.
#[derive(Debug, Clone)]
pub struct MathEngine {
    table: Arc<DispatchTable>,
    config: KernelConfig,
}

impl MathEngine {
    /// Engine over the process-global table with the default configuration.
    pub fn new() -> Self {
        Self::with_table(Arc::clone(global_table()), KernelConfig::default())
    }

    /// Engine over an explicit table and configuration.
    pub fn with_table(table: Arc<DispatchTable>, config: KernelConfig) -> Self {
        Self { table, config }
    }

    /// The shared process-wide engine.
    pub fn global() -> &'static MathEngine {
        static ENGINE: OnceLock<MathEngine> = OnceLock::new();
        ENGINE.get_or_init(MathEngine::new)
    }

    /// Dispatch table in use.
    #[inline]
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Kernel configuration in use.
    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    fn unary(&self, op: UnaryOp, x: &Float, precision: Option<Precision>, policy: RoundingPolicy) -> (Float, Ternary) {
        let p = Precision::resolve(precision, x);
        let raw = self.table.unary(op)(x, p, &self.config);
        round_to_precision(&raw, p, policy)
    }

    // ========================================================================
    // Unary Operations
    // ========================================================================

    unary_operations! {
        sin, sin_rounded => Sin, "Sine.";
        cos, cos_rounded => Cos, "Cosine.";
        tan, tan_rounded => Tan, "Tangent.";
        asin, asin_rounded => Asin, "Arcsine; NaN outside `[-1, 1]`.";
        acos, acos_rounded => Acos, "Arccosine; NaN outside `[-1, 1]`.";
        atan, atan_rounded => Atan, "Arctangent.";
        sinh, sinh_rounded => Sinh, "Hyperbolic sine.";
        cosh, cosh_rounded => Cosh, "Hyperbolic cosine.";
        tanh, tanh_rounded => Tanh, "Hyperbolic tangent.";
        asinh, asinh_rounded => Asinh, "Inverse hyperbolic sine.";
        acosh, acosh_rounded => Acosh, "Inverse hyperbolic cosine; NaN below 1.";
        atanh, atanh_rounded => Atanh, "Inverse hyperbolic tangent; NaN outside `[-1, 1]`.";
        exp, exp_rounded => Exp, "Exponential.";
        exp2, exp2_rounded => Exp2, "Power of two.";
        ln, ln_rounded => Ln, "Natural logarithm; NaN for negative input.";
        log2, log2_rounded => Log2, "Base-2 logarithm; NaN for negative input.";
        log10, log10_rounded => Log10, "Base-10 logarithm; NaN for negative input.";
        sqrt, sqrt_rounded => Sqrt, "Square root; NaN for negative input.";
        cbrt, cbrt_rounded => Cbrt, "Cube root.";
    }

    // ========================================================================
    // Binary and Integer Operations
    // ========================================================================

    /// `atan2(y, x)` in `(-pi, pi]`, at the precision of `y` by default.
    pub fn atan2(&self, y: &Float, x: &Float, precision: Option<Precision>) -> Float {
        self.atan2_rounded(y, x, precision, RoundingPolicy::default()).0
    }

    /// `atan2(y, x)` rounded under `policy`.
    pub fn atan2_rounded(
        &self,
        y: &Float,
        x: &Float,
        precision: Option<Precision>,
        policy: RoundingPolicy,
    ) -> (Float, Ternary) {
        let p = Precision::resolve(precision, y);
        let raw = self.table.atan2()(y, x, p, &self.config);
        round_to_precision(&raw, p, policy)
    }

    /// `x^y`; NaN for a negative `x` with non-integer `y`.
    pub fn pow(&self, x: &Float, y: &Float, precision: Option<Precision>) -> Float {
        self.pow_rounded(x, y, precision, RoundingPolicy::default()).0
    }

    /// `x^y` rounded under `policy`.
    pub fn pow_rounded(
        &self,
        x: &Float,
        y: &Float,
        precision: Option<Precision>,
        policy: RoundingPolicy,
    ) -> (Float, Ternary) {
        let p = Precision::resolve(precision, x);
        let raw = self.table.pow()(x, y, p, &self.config);
        round_to_precision(&raw, p, policy)
    }

    /// `x^n` for an integer exponent.
    pub fn powi(&self, x: &Float, n: i64, precision: Option<Precision>) -> Float {
        self.powi_rounded(x, n, precision, RoundingPolicy::default()).0
    }

    /// `x^n` rounded under `policy`.
    pub fn powi_rounded(
        &self,
        x: &Float,
        n: i64,
        precision: Option<Precision>,
        policy: RoundingPolicy,
    ) -> (Float, Ternary) {
        let p = Precision::resolve(precision, x);
        let raw = self.table.powi()(x, n, p, &self.config);
        round_to_precision(&raw, p, policy)
    }

    /// `n`-th root; NaN for `n <= 0` or an even root of a negative number.
    pub fn root(&self, x: &Float, n: i64, precision: Option<Precision>) -> Float {
        self.root_rounded(x, n, precision, RoundingPolicy::default()).0
    }

    /// `n`-th root rounded under `policy`.
    pub fn root_rounded(
        &self,
        x: &Float,
        n: i64,
        precision: Option<Precision>,
        policy: RoundingPolicy,
    ) -> (Float, Ternary) {
        let p = Precision::resolve(precision, x);
        let raw = self.table.root()(x, n, p, &self.config);
        round_to_precision(&raw, p, policy)
    }

    // ========================================================================
    // Chebyshev Series
    // ========================================================================

    /// `sum c[i] T_i(t)` with the `(b0 - b2) / 2` convention, at the precision
    /// of `t` by default. Empty coefficients give zero.
    pub fn chebyshev(&self, coefficients: &[Float], t: &Float, precision: Option<Precision>) -> Float {
        self.chebyshev_rounded(coefficients, t, precision, RoundingPolicy::default()).0
    }

    /// Chebyshev value rounded under `policy`.
    pub fn chebyshev_rounded(
        &self,
        coefficients: &[Float],
        t: &Float,
        precision: Option<Precision>,
        policy: RoundingPolicy,
    ) -> (Float, Ternary) {
        let p = Precision::resolve(precision, t);
        let raw = self.table.chebyshev()(coefficients, t, p, &self.config);
        round_to_precision(&raw, p, policy)
    }

    /// Derivative of the Chebyshev series with respect to `t`.
    pub fn chebyshev_derivative(&self, coefficients: &[Float], t: &Float, precision: Option<Precision>) -> Float {
        self.chebyshev_derivative_rounded(coefficients, t, precision, RoundingPolicy::default())
            .0
    }

    /// Chebyshev derivative rounded under `policy`.
    pub fn chebyshev_derivative_rounded(
        &self,
        coefficients: &[Float],
        t: &Float,
        precision: Option<Precision>,
        policy: RoundingPolicy,
    ) -> (Float, Ternary) {
        let p = Precision::resolve(precision, t);
        let raw = self.table.chebyshev_derivative()(coefficients, t, p, &self.config);
        round_to_precision(&raw, p, policy)
    }

    /// One Chebyshev value per component.
    pub fn chebyshev_components(&self, series: &[&[Float]], t: &Float, precision: Option<Precision>) -> Vec<Float> {
        self.chebyshev_components_rounded(series, t, precision, RoundingPolicy::default())
            .into_iter()
            .map(|(value, _)| value)
            .collect()
    }

    /// Per-component Chebyshev values rounded under `policy`.
    pub fn chebyshev_components_rounded(
        &self,
        series: &[&[Float]],
        t: &Float,
        precision: Option<Precision>,
        policy: RoundingPolicy,
    ) -> Vec<(Float, Ternary)> {
        let p = Precision::resolve(precision, t);
        self.table.chebyshev_components()(series, t, p, &self.config)
            .iter()
            .map(|raw| round_to_precision(raw, p, policy))
            .collect()
    }

    /// Every component of `segment` at `time`.
    pub fn position(&self, segment: &ChebyshevSegment, time: &Float, precision: Option<Precision>) -> Vec<Float> {
        let p = Precision::resolve(precision, time);
        let wp = self.config.working_precision(p, 8);
        let t = segment.normalize(time, wp);
        self.chebyshev_components(&segment.components(), &t, Some(p))
    }

    /// Rate of change of every component of `segment` at `time`, per unit of
    /// time.
    pub fn velocity(&self, segment: &ChebyshevSegment, time: &Float, precision: Option<Precision>) -> Vec<Float> {
        let p = Precision::resolve(precision, time);
        let wp = self.config.working_precision(p, 8);
        let t = segment.normalize(time, wp);
        let scale = segment.velocity_scale(wp);
        let derivative = self.table.chebyshev_derivative();
        segment
            .components()
            .into_iter()
            .map(|coefficients| {
                let raw = derivative(coefficients, &t, wp, &self.config).mul(&scale, wp);
                round_to_precision(&raw, p, RoundingPolicy::default()).0
            })
            .collect()
    }

    // ========================================================================
    // Constants
    // ========================================================================

    /// `pi` at `precision`.
    pub fn pi(&self, precision: Precision) -> Float {
        self.pi_rounded(precision, RoundingPolicy::default()).0
    }

    /// `pi` rounded under `policy`.
    pub fn pi_rounded(&self, precision: Precision, policy: RoundingPolicy) -> (Float, Ternary) {
        round_to_precision(&constants::pi(precision), precision, policy)
    }

    /// `ln 2` at `precision`.
    pub fn ln2(&self, precision: Precision) -> Float {
        self.ln2_rounded(precision, RoundingPolicy::default()).0
    }

    /// `ln 2` rounded under `policy`.
    pub fn ln2_rounded(&self, precision: Precision, policy: RoundingPolicy) -> (Float, Ternary) {
        round_to_precision(&constants::ln2(precision), precision, policy)
    }

    /// Euler's number at `precision`.
    pub fn e(&self, precision: Precision) -> Float {
        self.e_rounded(precision, RoundingPolicy::default()).0
    }

    /// Euler's number rounded under `policy`.
    pub fn e_rounded(&self, precision: Precision, policy: RoundingPolicy) -> (Float, Ternary) {
        round_to_precision(&constants::e(precision), precision, policy)
    }

    // ========================================================================
    // Integral Rounding
    // ========================================================================

    /// Largest integer not above `x`.
    pub fn floor(&self, x: &Float) -> Float {
        rounding::floor(x)
    }

    /// Smallest integer not below `x`.
    pub fn ceil(&self, x: &Float) -> Float {
        rounding::ceil(x)
    }

    /// `x` with its fractional part dropped.
    pub fn trunc(&self, x: &Float) -> Float {
        rounding::trunc(x)
    }

    /// Nearest integer, ties away from zero.
    pub fn round(&self, x: &Float) -> Float {
        rounding::round(x)
    }

    /// Nearest integer, ties to even.
    pub fn round_even(&self, x: &Float) -> Float {
        rounding::round_even(x)
    }

    /// `x - trunc(x)`.
    pub fn frac(&self, x: &Float) -> Float {
        rounding::frac(x)
    }

    /// Truncated remainder, sign of `x`; NaN when `y` is zero.
    pub fn rem(&self, x: &Float, y: &Float) -> Float {
        rounding::rem(x, y)
    }

    /// Floored remainder, sign of `y`; NaN when `y` is zero.
    pub fn modulo(&self, x: &Float, y: &Float) -> Float {
        rounding::modulo(x, y)
    }

    /// Round `x` to `precision` under `policy`.
    pub fn round_to_precision(&self, x: &Float, precision: Precision, policy: RoundingPolicy) -> (Float, Ternary) {
        round_to_precision(x, precision, policy)
    }
}

impl Default for MathEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::test_support::*;
    use crate::platform::{Capabilities, SimdLevel};

    fn engine() -> MathEngine {
        MathEngine::with_table(Arc::new(DispatchTable::reference()), KernelConfig::default())
    }

    #[test]
    fn test_precision_inherits_from_first_operand() {
        let x = Float::from_f64(0.5, p(100));
        assert_eq!(engine().sin(&x, None).precision(), p(100));
        assert_eq!(engine().sin(&x, Some(p(40))).precision(), p(40));
        let y = Float::from_f64(1.0, p(72));
        assert_eq!(engine().atan2(&y, &x, None).precision(), p(72));
    }

    #[test]
    fn test_exact_results_report_exact() {
        let d = Precision::DOUBLE;
        let e = engine();
        assert_eq!(e.exp_rounded(&f(0.0), None, RoundingPolicy::NearestTiesEven), (Float::one(d), Ternary::Exact));
        assert_eq!(e.ln_rounded(&f(1.0), None, RoundingPolicy::TowardZero).1, Ternary::Exact);
        assert_eq!(e.log2_rounded(&f(1024.0), None, RoundingPolicy::TowardPositive).0, f(10.0));
        assert_eq!(e.sqrt_rounded(&f(49.0), None, RoundingPolicy::TowardNegative), (f(7.0), Ternary::Exact));
    }

    #[test]
    fn test_directed_rounding_brackets_result() {
        let x = Float::from_f64(2.0, p(64));
        let e = engine();
        let (down, t_down) = e.sqrt_rounded(&x, None, RoundingPolicy::TowardNegative);
        let (up, t_up) = e.sqrt_rounded(&x, None, RoundingPolicy::TowardPositive);
        assert_eq!(t_down, Ternary::RoundedDown);
        assert_eq!(t_up, Ternary::RoundedUp);
        assert!(down < up);
        assert_eq!(rounding::ulp(&down, p(64)).map(|u| down.add(&u, p(128))), Some(up));
    }

    #[test]
    fn test_chebyshev_single_coefficient() {
        let c = [f(5.0)];
        assert_eq!(engine().chebyshev(&c, &f(0.3), None).to_f64(), 2.5);
    }

    #[test]
    fn test_segment_position_and_velocity() {
        // x(t) = c0/2 + c1 t over [10, 14]: x = 1 + 3 (time - 12) / 2
        let segment = ChebyshevSegment::new(f(10.0), f(4.0), vec![vec![f(2.0), f(3.0)]]).unwrap();
        let e = engine();
        assert_eq!(e.position(&segment, &f(13.0), None)[0].to_f64(), 2.5);
        assert_eq!(e.velocity(&segment, &f(13.0), None)[0].to_f64(), 1.5);
    }

    #[test]
    fn test_constants() {
        assert_digits(&engine().pi(p(256)), PI_DIGITS, 255);
        assert_digits(&engine().e(p(256)), E_DIGITS, 255);
        assert_digits(&engine().ln2(p(256)), LN2_DIGITS, 255);
    }

    #[test]
    fn test_integral_delegates() {
        let e = engine();
        assert_eq!(e.floor(&f(-3.7)), f(-4.0));
        assert_eq!(e.ceil(&f(-3.7)), f(-3.0));
        assert_eq!(e.trunc(&f(-3.7)), f(-3.0));
        assert_eq!(e.modulo(&f(-7.0), &f(3.0)), f(2.0));
        assert_eq!(e.rem(&f(-7.0), &f(3.0)), f(-1.0));
    }

    #[test]
    fn test_tuned_engine_matches_reference() {
        let tuned = MathEngine::with_table(
            Arc::new(DispatchTable::build(Capabilities::portable().with_simd_level(SimdLevel::Avx512))),
            KernelConfig::default(),
        );
        let x = Float::from_f64(1.25, p(192));
        assert_eq!(tuned.tan(&x, None), engine().tan(&x, None));
        assert_eq!(tuned.cosh(&x, None), engine().cosh(&x, None));
    }
}
