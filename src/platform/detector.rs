// ============================================================================
// Capability Detection
// Runtime detection of the CPU features the dispatch table can exploit
// ============================================================================

use std::fmt;
use std::sync::OnceLock;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Architecture {
    /// x86_64 (Intel/AMD 64-bit)
    X86_64,
    /// aarch64 (ARM 64-bit, including Apple Silicon)
    Aarch64,
    /// Unknown or unsupported architecture
    Other,
}

impl Architecture {
    /// Detect the current CPU architecture.
    #[inline]
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Architecture::X86_64
        }
        #[cfg(target_arch = "aarch64")]
        {
            Architecture::Aarch64
        }
        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            Architecture::Other
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86_64 => write!(f, "x86_64"),
            Architecture::Aarch64 => write!(f, "aarch64"),
            Architecture::Other => write!(f, "other"),
        }
    }
}

/// SIMD capability level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimdLevel {
    /// No SIMD, scalar operations only
    None,
    /// ARM NEON (128-bit)
    Neon,
    /// x86 AVX2 (256-bit)
    Avx2,
    /// x86 AVX-512 (512-bit)
    Avx512,
}

impl SimdLevel {
    /// Detect the highest available SIMD level for the current CPU.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if is_x86_feature_detected!("avx512f") {
                return SimdLevel::Avx512;
            }
            if is_x86_feature_detected!("avx2") {
                return SimdLevel::Avx2;
            }
            SimdLevel::None
        }

        #[cfg(target_arch = "aarch64")]
        {
            // NEON is always available on aarch64
            SimdLevel::Neon
        }

        #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
        {
            SimdLevel::None
        }
    }

    /// Whether this level offers registers of at least 256 bits.
    #[inline]
    pub fn is_wide(self) -> bool {
        self >= SimdLevel::Avx2
    }
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdLevel::None => write!(f, "None (Scalar)"),
            SimdLevel::Neon => write!(f, "ARM NEON"),
            SimdLevel::Avx2 => write!(f, "AVX2"),
            SimdLevel::Avx512 => write!(f, "AVX-512"),
        }
    }
}

/// Named boolean feature the dispatch table can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CpuFeature {
    /// Vector registers of at least 256 bits
    WideVectors,
    /// Fused multiply-add
    Fma,
    /// Hardware extended-precision float (x87 80-bit)
    ExtendedFloat,
}

impl fmt::Display for CpuFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CpuFeature::WideVectors => write!(f, "wide-vectors"),
            CpuFeature::Fma => write!(f, "fma"),
            CpuFeature::ExtendedFloat => write!(f, "extended-float"),
        }
    }
}

/// Immutable snapshot of detected CPU capabilities.
///
/// The process-wide snapshot comes from [`capabilities`]. Other snapshots can
/// be built with [`Capabilities::portable`] and the `with_*` methods to
/// simulate different hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Capabilities {
    /// The CPU architecture
    pub architecture: Architecture,
    /// The highest available SIMD level
    pub simd_level: SimdLevel,
    /// Fused multiply-add available
    pub fma: bool,
    /// Hardware 80-bit extended float available
    pub extended_float: bool,
}

impl Capabilities {
    /// Detect CPU capabilities at runtime.
    pub fn detect() -> Self {
        Self {
            architecture: Architecture::detect(),
            simd_level: SimdLevel::detect(),
            fma: detect_fma(),
            extended_float: cfg!(target_arch = "x86_64"),
        }
    }

    /// A snapshot with no optional features, on an unknown architecture.
    pub const fn portable() -> Self {
        Self {
            architecture: Architecture::Other,
            simd_level: SimdLevel::None,
            fma: false,
            extended_float: false,
        }
    }

    /// Builder method: Set the architecture
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    /// Builder method: Set the SIMD level
    pub fn with_simd_level(mut self, level: SimdLevel) -> Self {
        self.simd_level = level;
        self
    }

    /// Builder method: Set FMA availability
    pub fn with_fma(mut self, fma: bool) -> Self {
        self.fma = fma;
        self
    }

    /// Builder method: Set hardware extended-float availability
    pub fn with_extended_float(mut self, extended: bool) -> Self {
        self.extended_float = extended;
        self
    }

    /// Query a named feature.
    pub fn has(&self, feature: CpuFeature) -> bool {
        match feature {
            CpuFeature::WideVectors => self.has_wide_vectors(),
            CpuFeature::Fma => self.fma,
            CpuFeature::ExtendedFloat => self.extended_float,
        }
    }

    /// Check if wide-vector instructions are available.
    #[inline]
    pub fn has_wide_vectors(&self) -> bool {
        self.simd_level.is_wide()
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::portable()
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU: {} with {} (fma: {}, extended float: {})",
            self.architecture, self.simd_level, self.fma, self.extended_float
        )
    }
}

fn detect_fma() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        is_x86_feature_detected!("fma")
    }
    #[cfg(target_arch = "aarch64")]
    {
        true
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        false
    }
}

static CAPABILITIES: OnceLock<Capabilities> = OnceLock::new();

/// The process-wide capability snapshot, detected on first access.
pub fn capabilities() -> &'static Capabilities {
    CAPABILITIES.get_or_init(|| {
        let caps = Capabilities::detect();
        debug!(%caps, "detected cpu capabilities");
        caps
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_architecture_detect() {
        let arch = Architecture::detect();
        assert!(matches!(
            arch,
            Architecture::X86_64 | Architecture::Aarch64 | Architecture::Other
        ));
    }

    #[test]
    fn test_capabilities_detect() {
        let caps = Capabilities::detect();
        println!("{}", caps);

        #[cfg(target_arch = "x86_64")]
        {
            assert_eq!(caps.architecture, Architecture::X86_64);
            assert!(caps.extended_float);
        }

        #[cfg(target_arch = "aarch64")]
        {
            assert_eq!(caps.architecture, Architecture::Aarch64);
            assert_eq!(caps.simd_level, SimdLevel::Neon);
            assert!(caps.fma);
        }
    }

    #[test]
    fn test_global_snapshot_is_stable() {
        let first = capabilities();
        let second = capabilities();
        assert!(std::ptr::eq(first, second));
        assert_eq!(*first, Capabilities::detect());
    }

    #[test]
    fn test_simulated_snapshots() {
        let portable = Capabilities::portable();
        assert!(!portable.has(CpuFeature::WideVectors));
        assert!(!portable.has(CpuFeature::Fma));

        let wide = portable.with_simd_level(SimdLevel::Avx512).with_fma(true);
        assert!(wide.has(CpuFeature::WideVectors));
        assert!(wide.has(CpuFeature::Fma));
        assert!(!wide.has(CpuFeature::ExtendedFloat));

        let neon = portable.with_architecture(Architecture::Aarch64).with_simd_level(SimdLevel::Neon);
        assert!(!neon.has_wide_vectors());
    }

    #[test]
    fn test_simd_level_ordering() {
        assert!(SimdLevel::None < SimdLevel::Neon);
        assert!(SimdLevel::Neon < SimdLevel::Avx2);
        assert!(SimdLevel::Avx2 < SimdLevel::Avx512);
    }
}
