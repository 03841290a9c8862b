//! WASM bindings for the causal tree engine
//!
//! This module provides JavaScript-friendly bindings for the replica directory.

#[cfg(feature = "wasm")]
pub mod bindings;

#[cfg(feature = "wasm")]
pub mod utils;

// Re-export main types
#[cfg(feature = "wasm")]
pub use bindings::WasmCausalTree;
