//! contract-guard
//!
//! Runtime argument contracts for dynamically typed calls. The engine lives in
//! [`guard_core`] and the value and type model in [`guard_types`]; this crate
//! adds the pieces the `contract-guard` CLI is built from:
//!
//! - [`call_spec`]: JSON documents describing a signature, a declaration, and calls to check
//! - [`demo`]: illustrative guarded callables with accepted and rejected calls
//! - [`self_test`]: a built-in run of the engine's behavioral checks

pub mod call_spec;
pub mod demo;

pub use guard_core;
pub use guard_types;
