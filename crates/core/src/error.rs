//! Error types for the Polymath domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.
//!
//! Propagation policy: catalog and storage faults are advisory — the owning
//! components swallow them and degrade to empty/absent results. Registry and
//! inference faults are authoritative and propagate to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Polymath operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Plugin registry errors ---
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    // --- Fragment storage errors ---
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    // --- Branch catalog errors ---
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    // --- Inference errors ---
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Plugin not found: {name} (looked in {path})")]
    PluginNotFound { name: String, path: PathBuf },

    #[error("Manifest error in {path}: {reason}")]
    Manifest { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Fragment I/O failed: {0}")]
    Io(String),

    #[error("Fragment serialization failed: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Source-control query failed: {0}")]
    QueryFailed(String),

    #[error("Repository unavailable: {0}")]
    RepositoryUnavailable(String),
}

#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    Network(String),
}
