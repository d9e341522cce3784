//! # Polymath Core
//!
//! Domain types, traits, and error definitions for the Polymath expertise
//! runtime. This crate has **zero framework dependencies** — it defines the
//! domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (source-control inspection, inference) is
//! defined as a trait here. Implementations live in their respective crates.
//! This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod branch;
pub mod error;
pub mod fragment;
pub mod infer;
pub mod plugin;

// Re-export key types at crate root for ergonomics
pub use branch::{BranchDescriptor, BranchInspector};
pub use error::{Error, Result};
pub use fragment::{Fragment, PluginStats};
pub use infer::InferenceProvider;
pub use plugin::{LoadedPlugin, PluginManifest};
