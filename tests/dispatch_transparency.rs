// ============================================================================
// Dispatch Transparency
// Engines built from different capability snapshots agree bit for bit
// ============================================================================

use arbmath::prelude::*;
use proptest::prelude::*;

fn bits(n: usize) -> Precision {
    Precision::new(n).unwrap()
}

fn snapshots() -> Vec<Capabilities> {
    vec![
        Capabilities::portable(),
        Capabilities::portable()
            .with_architecture(Architecture::Aarch64)
            .with_simd_level(SimdLevel::Neon)
            .with_fma(true),
        Capabilities::portable()
            .with_architecture(Architecture::X86_64)
            .with_simd_level(SimdLevel::Avx2)
            .with_fma(true),
        Capabilities::portable()
            .with_architecture(Architecture::X86_64)
            .with_simd_level(SimdLevel::Avx512)
            .with_fma(true)
            .with_extended_float(true),
    ]
}

fn engines() -> Vec<MathEngine> {
    snapshots()
        .into_iter()
        .map(|caps| MathEngineBuilder::new().with_capabilities(caps).build().unwrap())
        .collect()
}

/// Equal values, or NaN on both sides.
fn same(a: &Float, b: &Float) -> bool {
    (a.is_nan() && b.is_nan()) || (a == b && a.is_negative() == b.is_negative())
}

fn unary(engine: &MathEngine, op: UnaryOp, x: &Float, policy: RoundingPolicy) -> (Float, Ternary) {
    match op {
        UnaryOp::Sin => engine.sin_rounded(x, None, policy),
        UnaryOp::Cos => engine.cos_rounded(x, None, policy),
        UnaryOp::Tan => engine.tan_rounded(x, None, policy),
        UnaryOp::Asin => engine.asin_rounded(x, None, policy),
        UnaryOp::Acos => engine.acos_rounded(x, None, policy),
        UnaryOp::Atan => engine.atan_rounded(x, None, policy),
        UnaryOp::Sinh => engine.sinh_rounded(x, None, policy),
        UnaryOp::Cosh => engine.cosh_rounded(x, None, policy),
        UnaryOp::Tanh => engine.tanh_rounded(x, None, policy),
        UnaryOp::Asinh => engine.asinh_rounded(x, None, policy),
        UnaryOp::Acosh => engine.acosh_rounded(x, None, policy),
        UnaryOp::Atanh => engine.atanh_rounded(x, None, policy),
        UnaryOp::Exp => engine.exp_rounded(x, None, policy),
        UnaryOp::Exp2 => engine.exp2_rounded(x, None, policy),
        UnaryOp::Ln => engine.ln_rounded(x, None, policy),
        UnaryOp::Log2 => engine.log2_rounded(x, None, policy),
        UnaryOp::Log10 => engine.log10_rounded(x, None, policy),
        UnaryOp::Sqrt => engine.sqrt_rounded(x, None, policy),
        UnaryOp::Cbrt => engine.cbrt_rounded(x, None, policy),
    }
}

#[test]
fn test_tuned_snapshots_select_tuned_variants() {
    let engines = engines();
    assert_eq!(engines[0].table().variant(Operation::Unary(UnaryOp::Tan)), Variant::Reference);
    assert_eq!(engines[1].table().variant(Operation::Unary(UnaryOp::Tan)), Variant::Reference);
    assert_eq!(engines[2].table().variant(Operation::Unary(UnaryOp::Tan)), Variant::Fused);
    assert_eq!(engines[3].table().variant(Operation::ChebyshevComponents), Variant::Interleaved);
}

#[test]
fn test_every_unary_operation_agrees() {
    let engines = engines();
    let inputs = [-40.0, -2.5, -1.0, -0.3, -1.0e-12, 0.0, 1.0e-9, 0.45, 0.5, 1.0, 1.75, 3.0, 22.0, 1.0e5];
    for precision in [53, 113, 256] {
        for v in inputs {
            let x = Float::from_f64(v, bits(precision));
            for op in UnaryOp::ALL {
                for policy in [RoundingPolicy::NearestTiesEven, RoundingPolicy::TowardNegative] {
                    let (expected, ternary) = unary(&engines[0], op, &x, policy);
                    for engine in &engines[1..] {
                        let (value, t) = unary(engine, op, &x, policy);
                        assert!(same(&value, &expected), "{op}({v}) at {precision} bits");
                        assert_eq!(t, ternary, "{op}({v}) ternary at {precision} bits");
                    }
                }
            }
        }
    }
}

#[test]
fn test_binary_and_integer_operations_agree() {
    let engines = engines();
    let pairs = [(1.0, 1.0), (-2.0, 0.5), (3.5, -7.25), (0.0, -1.0), (10.0, 3.0)];
    for (a, b) in pairs {
        let (a, b) = (Float::from_f64(a, bits(160)), Float::from_f64(b, bits(160)));
        let reference = &engines[0];
        for engine in &engines[1..] {
            assert!(same(&engine.atan2(&a, &b, None), &reference.atan2(&a, &b, None)));
            assert!(same(&engine.pow(&a, &b, None), &reference.pow(&a, &b, None)));
            for n in [-3, 2, 5] {
                assert!(same(&engine.powi(&a, n, None), &reference.powi(&a, n, None)));
                assert!(same(&engine.root(&a, n, None), &reference.root(&a, n, None)));
            }
        }
    }
}

#[test]
fn test_chebyshev_operations_agree() {
    let engines = engines();
    let p = bits(128);
    let x: Vec<Float> = [0.9, -0.31, 0.047, -0.0021, 0.00013].iter().map(|&v| Float::from_f64(v, p)).collect();
    let y: Vec<Float> = [1.2, 0.5].iter().map(|&v| Float::from_f64(v, p)).collect();
    let z: Vec<Float> = (1..=13).map(|i| Float::from_f64(1.0 / i as f64, p)).collect();
    let series: Vec<&[Float]> = vec![&x, &y, &z];

    for t in [-1.0, -0.5, 0.2, 0.999] {
        let t = Float::from_f64(t, p);
        let reference = engines[0].chebyshev_components_rounded(&series, &t, None, RoundingPolicy::TowardZero);
        for engine in &engines[1..] {
            let values = engine.chebyshev_components_rounded(&series, &t, None, RoundingPolicy::TowardZero);
            assert_eq!(values, reference);
            assert_eq!(engine.chebyshev(&z, &t, None), engines[0].chebyshev(&z, &t, None));
            assert_eq!(
                engine.chebyshev_derivative(&z, &t, None),
                engines[0].chebyshev_derivative(&z, &t, None)
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_fused_kernels_agree(v in -60.0f64..60.0, precision in 24usize..400) {
        let engines = engines();
        let x = Float::from_f64(v, bits(precision.max(53)));
        for op in [UnaryOp::Tan, UnaryOp::Sinh, UnaryOp::Cosh] {
            let expected = unary(&engines[0], op, &x, RoundingPolicy::NearestTiesEven);
            let tuned = unary(&engines[3], op, &x, RoundingPolicy::NearestTiesEven);
            prop_assert!(same(&tuned.0, &expected.0));
            prop_assert_eq!(tuned.1, expected.1);
        }
    }
}
