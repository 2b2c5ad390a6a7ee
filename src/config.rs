// ============================================================================
// Kernel Configuration
// Guard bits and iteration caps shared by every kernel
// ============================================================================

use crate::numeric::{NumericError, NumericResult, Precision};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tuning knobs for the series, reduction and Newton loops.
///
/// Every loop in the kernels is bounded by one of these caps, so a call always
/// terminates. Hitting a cap is not an error: the partial result is returned
/// and a `debug!` event is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KernelConfig {
    /// Extra bits carried above the requested precision
    pub guard_bits: usize,

    /// Maximum number of terms summed by a power series
    pub max_series_terms: usize,

    /// Maximum number of halving / square-root reduction steps
    pub max_reduction_steps: u32,

    /// Maximum number of Newton-Raphson iterations
    pub max_newton_iterations: usize,

    /// Largest binary exponent accepted by trigonometric argument reduction
    /// before accuracy degrades
    pub max_reduction_exponent: i64,
}

impl KernelConfig {
    /// Smallest accepted guard width
    pub const MIN_GUARD_BITS: usize = 8;

    /// Largest accepted guard width
    pub const MAX_GUARD_BITS: usize = 4096;

    /// Create the default configuration
    pub const fn new() -> Self {
        Self {
            guard_bits: 32,
            max_series_terms: 1000,
            max_reduction_steps: 12,
            max_newton_iterations: 100,
            max_reduction_exponent: 1 << 20,
        }
    }

    /// Builder method: Set guard bits
    pub fn with_guard_bits(mut self, bits: usize) -> Self {
        self.guard_bits = bits;
        self
    }

    /// Builder method: Set the series term cap
    pub fn with_max_series_terms(mut self, terms: usize) -> Self {
        self.max_series_terms = terms;
        self
    }

    /// Builder method: Set the reduction step cap
    pub fn with_max_reduction_steps(mut self, steps: u32) -> Self {
        self.max_reduction_steps = steps;
        self
    }

    /// Builder method: Set the Newton iteration cap
    pub fn with_max_newton_iterations(mut self, iterations: usize) -> Self {
        self.max_newton_iterations = iterations;
        self
    }

    /// Builder method: Set the largest reducible trigonometric exponent
    pub fn with_max_reduction_exponent(mut self, exponent: i64) -> Self {
        self.max_reduction_exponent = exponent;
        self
    }

    /// Working precision for a requested precision plus per-kernel extras.
    #[inline]
    pub fn working_precision(&self, requested: Precision, extra: usize) -> Precision {
        requested.widened(self.guard_bits.saturating_add(extra))
    }

    /// Validate the configuration
    pub fn validate(&self) -> NumericResult<()> {
        if self.guard_bits < Self::MIN_GUARD_BITS || self.guard_bits > Self::MAX_GUARD_BITS {
            return Err(NumericError::InvalidConfig("guard bits out of range"));
        }
        if self.max_series_terms == 0 {
            return Err(NumericError::InvalidConfig("series term cap must be positive"));
        }
        if self.max_reduction_steps == 0 || self.max_reduction_steps > 64 {
            return Err(NumericError::InvalidConfig("reduction step cap must be between 1 and 64"));
        }
        if self.max_newton_iterations == 0 {
            return Err(NumericError::InvalidConfig("newton iteration cap must be positive"));
        }
        if self.max_reduction_exponent <= 0 {
            return Err(NumericError::InvalidConfig("reduction exponent must be positive"));
        }
        Ok(())
    }

    /// Load and validate a configuration from JSON.
    ///
    /// Missing fields take their default values.
    #[cfg(feature = "serde")]
    pub fn from_json(text: &str) -> NumericResult<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|_| NumericError::InvalidConfig("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Preset Configurations
// ============================================================================

impl KernelConfig {
    /// Wider guard and looser caps for inputs near cancellation points
    /// (arguments close to multiples of pi, logarithms near one).
    pub fn conservative() -> Self {
        Self::new()
            .with_guard_bits(64)
            .with_max_series_terms(4000)
            .with_max_reduction_steps(16)
            .with_max_newton_iterations(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = KernelConfig::default();
        assert_eq!(config.guard_bits, 32);
        assert_eq!(config.max_series_terms, 1000);
        assert_eq!(config.max_newton_iterations, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = KernelConfig::new()
            .with_guard_bits(48)
            .with_max_reduction_steps(10);
        assert_eq!(config.guard_bits, 48);
        assert_eq!(config.max_reduction_steps, 10);
        assert_eq!(
            config.working_precision(Precision::DOUBLE, 4).bits(),
            53 + 48 + 4
        );
    }

    #[test]
    fn test_validation() {
        assert!(KernelConfig::new().with_guard_bits(2).validate().is_err());
        assert!(KernelConfig::new().with_max_series_terms(0).validate().is_err());
        assert!(KernelConfig::new().with_max_reduction_steps(0).validate().is_err());
        assert_eq!(
            KernelConfig::new().with_max_newton_iterations(0).validate(),
            Err(NumericError::InvalidConfig("newton iteration cap must be positive"))
        );
    }

    #[test]
    fn test_preset_configs() {
        let conservative = KernelConfig::conservative();
        assert!(conservative.guard_bits > KernelConfig::default().guard_bits);
        assert!(conservative.validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_loading() {
        let config = KernelConfig::from_json(r#"{ "guard_bits": 40 }"#).unwrap();
        assert_eq!(config.guard_bits, 40);
        assert_eq!(config.max_series_terms, 1000);
        assert!(KernelConfig::from_json(r#"{ "guard_bits": 1 }"#).is_err());
        assert!(KernelConfig::from_json("not json").is_err());
    }
}
