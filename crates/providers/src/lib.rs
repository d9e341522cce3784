//! Inference provider implementations for Polymath.

pub mod http;
pub mod stub;

pub use http::HttpProvider;
pub use stub::StubProvider;

use polymath_config::InferenceConfig;
use polymath_core::InferenceProvider;
use std::sync::Arc;

/// Build the provider selected by configuration.
pub fn from_config(config: &InferenceConfig) -> Arc<dyn InferenceProvider> {
    match config.provider.as_str() {
        "http" => Arc::new(HttpProvider::new(
            &config.base_url,
            config.api_key.as_deref().unwrap_or(""),
            &config.model,
        )),
        _ => Arc::new(StubProvider::new()),
    }
}
