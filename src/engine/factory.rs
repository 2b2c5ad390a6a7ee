// ============================================================================
// Math Engine Factory
// Builds engines with explicit capabilities and kernel configuration
// ============================================================================

use crate::config::KernelConfig;
use crate::dispatch::DispatchTable;
use crate::engine::MathEngine;
use crate::numeric::NumericResult;
use crate::platform::{capabilities, Capabilities};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates an engine for a capability snapshot and configuration
///
/// # Arguments
/// * `capabilities` - Snapshot the dispatch table is built from
/// * `config` - Kernel configuration, validated first
///
/// # Example
/// ```
/// use arbmath::prelude::*;
/// use arbmath::engine::factory::create_engine;
///
/// let engine = create_engine(Capabilities::portable(), KernelConfig::default()).unwrap();
/// assert_eq!(engine.table().variant(Operation::Unary(UnaryOp::Tan)), Variant::Reference);
/// ```
pub fn create_engine(capabilities: Capabilities, config: KernelConfig) -> NumericResult<MathEngine> {
    config.validate()?;
    let table = DispatchTable::build(capabilities);
    Ok(MathEngine::with_table(Arc::new(table), config))
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`MathEngine`]
///
/// Without an explicit snapshot the engine uses the detected capabilities of
/// the running process.
///
/// # Example
/// ```
/// use arbmath::prelude::*;
///
/// let engine = MathEngineBuilder::new()
///     .with_capabilities(Capabilities::portable().with_simd_level(SimdLevel::Avx2))
///     .with_guard_bits(64)
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.config().guard_bits, 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MathEngineBuilder {
    capabilities: Option<Capabilities>,
    config: KernelConfig,
}

impl MathEngineBuilder {
    /// Create a builder with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Capabilities
    // ========================================================================

    /// Use a simulated capability snapshot
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = Some(capabilities);
        self
    }

    /// Use the portable snapshot: every slot on its reference kernel
    pub fn portable(self) -> Self {
        self.with_capabilities(Capabilities::portable())
    }

    // ========================================================================
    // Kernel Configuration
    // ========================================================================

    /// Replace the whole kernel configuration
    pub fn with_config(mut self, config: KernelConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the guard bits added to every working precision
    pub fn with_guard_bits(mut self, bits: usize) -> Self {
        self.config = self.config.with_guard_bits(bits);
        self
    }

    /// Set the series term cap
    pub fn with_max_series_terms(mut self, terms: usize) -> Self {
        self.config = self.config.with_max_series_terms(terms);
        self
    }

    /// Set the Newton iteration cap
    pub fn with_max_newton_iterations(mut self, iterations: usize) -> Self {
        self.config = self.config.with_max_newton_iterations(iterations);
        self
    }

    /// Apply the conservative preset
    pub fn conservative(mut self) -> Self {
        self.config = KernelConfig::conservative();
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the engine
    pub fn build(self) -> NumericResult<MathEngine> {
        let caps = self.capabilities.unwrap_or_else(|| *capabilities());
        create_engine(caps, self.config)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &KernelConfig {
        &self.config
    }
}
