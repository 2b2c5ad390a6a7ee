// ============================================================================
// Dispatch Table
// One slot per operation, assigned once from a capability snapshot
// ============================================================================

use super::operation::{Operation, UnaryOp, Variant};
use crate::config::KernelConfig;
use crate::kernels::{exp, fused, hyperbolic, inverse_trig, log, power, trig};
use crate::numeric::{Float, Precision};
use crate::platform::{Capabilities, CpuFeature};
use crate::polynomial::clenshaw;
use crate::solvers::newton;
use arrayvec::ArrayVec;
use std::fmt;
use tracing::debug;

/// `f(x)`.
pub(crate) type UnaryKernel = fn(&Float, Precision, &KernelConfig) -> Float;
/// `f(a, b)`.
pub(crate) type BinaryKernel = fn(&Float, &Float, Precision, &KernelConfig) -> Float;
/// `f(x, n)` with a machine integer `n`.
pub(crate) type IntegerKernel = fn(&Float, i64, Precision, &KernelConfig) -> Float;
/// `f(coefficients, t)`.
pub(crate) type SeriesKernel = fn(&[Float], &Float, Precision, &KernelConfig) -> Float;
/// `f([coefficients], t)`, one result per component.
pub(crate) type ComponentsKernel = fn(&[&[Float]], &Float, Precision, &KernelConfig) -> Vec<Float>;

/// A kernel together with the variant it implements.
#[derive(Clone, Copy)]
pub struct Slot<K> {
    variant: Variant,
    kernel: K,
}

impl<K: Copy> Slot<K> {
    fn reference(kernel: K) -> Self {
        Self {
            variant: Variant::Reference,
            kernel,
        }
    }

    fn tuned(variant: Variant, kernel: K) -> Self {
        Self { variant, kernel }
    }

    /// Variant assigned to this slot.
    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    #[inline]
    pub(crate) fn kernel(&self) -> K {
        self.kernel
    }
}

impl<K> fmt::Debug for Slot<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot").field("variant", &self.variant).finish()
    }
}

/// Portable kernel for each unary slot.
fn reference_unary(op: UnaryOp) -> UnaryKernel {
    match op {
        UnaryOp::Sin => trig::sin,
        UnaryOp::Cos => trig::cos,
        UnaryOp::Tan => trig::tan,
        UnaryOp::Asin => inverse_trig::asin,
        UnaryOp::Acos => inverse_trig::acos,
        UnaryOp::Atan => inverse_trig::atan,
        UnaryOp::Sinh => hyperbolic::sinh,
        UnaryOp::Cosh => hyperbolic::cosh,
        UnaryOp::Tanh => hyperbolic::tanh,
        UnaryOp::Asinh => hyperbolic::asinh,
        UnaryOp::Acosh => hyperbolic::acosh,
        UnaryOp::Atanh => hyperbolic::atanh,
        UnaryOp::Exp => exp::exp,
        UnaryOp::Exp2 => exp::exp2,
        UnaryOp::Ln => log::ln,
        UnaryOp::Log2 => log::log2,
        UnaryOp::Log10 => log::log10,
        UnaryOp::Sqrt => newton::sqrt,
        UnaryOp::Cbrt => newton::cbrt,
    }
}

/// Fused kernel for the unary slots that have one.
fn fused_unary(op: UnaryOp) -> Option<UnaryKernel> {
    match op {
        UnaryOp::Tan => Some(fused::tan),
        UnaryOp::Sinh => Some(fused::sinh),
        UnaryOp::Cosh => Some(fused::cosh),
        _ => None,
    }
}

/// Immutable mapping from operation to kernel.
///
/// Built once from a capability snapshot. Every variant a slot can hold is
/// bit-identical to the reference kernel; capability paths that cannot show
/// that stay on the reference kernel.
pub struct DispatchTable {
    capabilities: Capabilities,
    unary: [Slot<UnaryKernel>; UnaryOp::COUNT],
    atan2: Slot<BinaryKernel>,
    pow: Slot<BinaryKernel>,
    powi: Slot<IntegerKernel>,
    root: Slot<IntegerKernel>,
    chebyshev: Slot<SeriesKernel>,
    chebyshev_derivative: Slot<SeriesKernel>,
    chebyshev_components: Slot<ComponentsKernel>,
}

impl DispatchTable {
    /// Assign every slot for the given capabilities.
    pub fn build(capabilities: Capabilities) -> Self {
        let wide = capabilities.has(CpuFeature::WideVectors);

        if capabilities.has(CpuFeature::Fma) {
            debug!(feature = %CpuFeature::Fma, "fma-seeded root iteration is not bit-identical, keeping reference roots");
        }
        if capabilities.has(CpuFeature::ExtendedFloat) {
            debug!(feature = %CpuFeature::ExtendedFloat, "hardware extended float is not bit-identical, keeping reference kernels");
        }

        let unary = UnaryOp::ALL.map(|op| match fused_unary(op) {
            Some(kernel) if wide => Slot::tuned(Variant::Fused, kernel),
            _ => Slot::reference(reference_unary(op)),
        });

        let chebyshev_components: Slot<ComponentsKernel> = if wide {
            Slot::tuned(Variant::Interleaved, clenshaw::components_interleaved)
        } else {
            Slot::reference(clenshaw::components)
        };

        let table = Self {
            capabilities,
            unary,
            atan2: Slot::reference(inverse_trig::atan2),
            pow: Slot::reference(power::pow),
            powi: Slot::reference(power::powi),
            root: Slot::reference(newton::root),
            chebyshev: Slot::reference(clenshaw::value),
            chebyshev_derivative: Slot::reference(clenshaw::derivative),
            chebyshev_components,
        };

        for (operation, variant) in table.summary() {
            debug!(%operation, %variant, "assigned dispatch slot");
        }
        table
    }

    /// Table with every slot on its reference kernel.
    pub fn reference() -> Self {
        Self::build(Capabilities::portable())
    }

    /// Snapshot the table was built from.
    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Variant assigned to `operation`.
    pub fn variant(&self, operation: Operation) -> Variant {
        match operation {
            Operation::Unary(op) => self.unary[op.index()].variant(),
            Operation::Atan2 => self.atan2.variant(),
            Operation::Pow => self.pow.variant(),
            Operation::Powi => self.powi.variant(),
            Operation::Root => self.root.variant(),
            Operation::Chebyshev => self.chebyshev.variant(),
            Operation::ChebyshevDerivative => self.chebyshev_derivative.variant(),
            Operation::ChebyshevComponents => self.chebyshev_components.variant(),
        }
    }

    /// Every slot with its assigned variant.
    pub fn summary(&self) -> ArrayVec<(Operation, Variant), { Operation::COUNT }> {
        Operation::all().map(|op| (op, self.variant(op))).collect()
    }

    #[inline]
    pub(crate) fn unary(&self, op: UnaryOp) -> UnaryKernel {
        self.unary[op.index()].kernel()
    }

    #[inline]
    pub(crate) fn atan2(&self) -> BinaryKernel {
        self.atan2.kernel()
    }

    #[inline]
    pub(crate) fn pow(&self) -> BinaryKernel {
        self.pow.kernel()
    }

    #[inline]
    pub(crate) fn powi(&self) -> IntegerKernel {
        self.powi.kernel()
    }

    #[inline]
    pub(crate) fn root(&self) -> IntegerKernel {
        self.root.kernel()
    }

    #[inline]
    pub(crate) fn chebyshev(&self) -> SeriesKernel {
        self.chebyshev.kernel()
    }

    #[inline]
    pub(crate) fn chebyshev_derivative(&self) -> SeriesKernel {
        self.chebyshev_derivative.kernel()
    }

    #[inline]
    pub(crate) fn chebyshev_components(&self) -> ComponentsKernel {
        self.chebyshev_components.kernel()
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("capabilities", &self.capabilities)
            .field("slots", &self.summary())
            .finish()
    }
}
