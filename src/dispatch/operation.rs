// ============================================================================
// Operations and Variants
// Names of dispatched operations and of the implementations behind them
// ============================================================================

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Single-argument operations, one dispatch slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Exp,
    Exp2,
    Ln,
    Log2,
    Log10,
    Sqrt,
    Cbrt,
}

impl UnaryOp {
    /// Number of unary slots.
    pub const COUNT: usize = 19;

    /// Every unary operation, in slot order.
    pub const ALL: [UnaryOp; UnaryOp::COUNT] = [
        UnaryOp::Sin,
        UnaryOp::Cos,
        UnaryOp::Tan,
        UnaryOp::Asin,
        UnaryOp::Acos,
        UnaryOp::Atan,
        UnaryOp::Sinh,
        UnaryOp::Cosh,
        UnaryOp::Tanh,
        UnaryOp::Asinh,
        UnaryOp::Acosh,
        UnaryOp::Atanh,
        UnaryOp::Exp,
        UnaryOp::Exp2,
        UnaryOp::Ln,
        UnaryOp::Log2,
        UnaryOp::Log10,
        UnaryOp::Sqrt,
        UnaryOp::Cbrt,
    ];

    /// Slot index in the dispatch table.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase function name.
    pub const fn name(self) -> &'static str {
        match self {
            UnaryOp::Sin => "sin",
            UnaryOp::Cos => "cos",
            UnaryOp::Tan => "tan",
            UnaryOp::Asin => "asin",
            UnaryOp::Acos => "acos",
            UnaryOp::Atan => "atan",
            UnaryOp::Sinh => "sinh",
            UnaryOp::Cosh => "cosh",
            UnaryOp::Tanh => "tanh",
            UnaryOp::Asinh => "asinh",
            UnaryOp::Acosh => "acosh",
            UnaryOp::Atanh => "atanh",
            UnaryOp::Exp => "exp",
            UnaryOp::Exp2 => "exp2",
            UnaryOp::Ln => "ln",
            UnaryOp::Log2 => "log2",
            UnaryOp::Log10 => "log10",
            UnaryOp::Sqrt => "sqrt",
            UnaryOp::Cbrt => "cbrt",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Operation {
    /// One of the single-argument functions
    Unary(UnaryOp),
    /// `atan2(y, x)`
    Atan2,
    /// `x^y`
    Pow,
    /// `x^n` for an integer `n`
    Powi,
    /// `x^(1/n)` for an integer `n`
    Root,
    /// Chebyshev series value
    Chebyshev,
    /// Chebyshev series derivative
    ChebyshevDerivative,
    /// Chebyshev series value for several components
    ChebyshevComponents,
}

impl Operation {
    /// Total number of dispatch slots.
    pub const COUNT: usize = UnaryOp::COUNT + 7;

    /// Every operation, in slot order.
    pub fn all() -> impl Iterator<Item = Operation> {
        UnaryOp::ALL.into_iter().map(Operation::Unary).chain([
            Operation::Atan2,
            Operation::Pow,
            Operation::Powi,
            Operation::Root,
            Operation::Chebyshev,
            Operation::ChebyshevDerivative,
            Operation::ChebyshevComponents,
        ])
    }

    /// Lowercase operation name.
    pub const fn name(self) -> &'static str {
        match self {
            Operation::Unary(op) => op.name(),
            Operation::Atan2 => "atan2",
            Operation::Pow => "pow",
            Operation::Powi => "powi",
            Operation::Root => "root",
            Operation::Chebyshev => "chebyshev",
            Operation::ChebyshevDerivative => "chebyshev_derivative",
            Operation::ChebyshevComponents => "chebyshev_components",
        }
    }
}

impl From<UnaryOp> for Operation {
    fn from(op: UnaryOp) -> Self {
        Operation::Unary(op)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Implementation variant assigned to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Variant {
    /// Portable kernel, available everywhere
    #[default]
    Reference,
    /// Sibling series over a shared reduction, advanced in lockstep
    Fused,
    /// One recurrence per component in a single pass
    Interleaved,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Reference => write!(f, "reference"),
            Variant::Fused => write!(f, "fused"),
            Variant::Interleaved => write!(f, "interleaved"),
        }
    }
}
