//! The Polymath orchestrator — the façade over the expertise runtime.
//!
//! Wires the branch catalog, plugin registry, fragment store, and context
//! assembler together and exposes the external load/unload/query API. One
//! orchestrator instance owns all component state exclusively; operations
//! run to completion before the next is accepted, and no component locks
//! internally — callers wanting cross-thread access put the instance behind
//! a single-worker queue or an external mutex.

pub mod orchestrator;

pub use orchestrator::Orchestrator;
