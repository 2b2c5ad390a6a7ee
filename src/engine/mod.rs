// ============================================================================
// Engine Module
// Public evaluation surface over the dispatch table
// ============================================================================

mod math_engine;

pub mod factory;

pub use factory::{create_engine, MathEngineBuilder};
pub use math_engine::MathEngine;
