//! Fragment domain types — one unit of stored domain knowledge.

use serde::{Deserialize, Serialize};

/// A knowledge fragment, addressed by `(plugin, fragment_id)`.
///
/// The payload is arbitrary structured data; the store persists it verbatim
/// and mutates it only by full overwrite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// Owning plugin namespace.
    pub plugin: String,

    /// Identifier, unique within the plugin namespace.
    pub fragment_id: String,

    /// The stored data.
    pub payload: serde_json::Value,
}

/// Storage statistics for one plugin namespace.
///
/// Derived from the current index and on-disk sizes on every call — never
/// cached, so the numbers stay trustworthy after external tampering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginStats {
    pub fragment_count: usize,
    pub total_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_serialization() {
        let fragment = Fragment {
            plugin: "security".into(),
            fragment_id: "cve-2024-0001".into(),
            payload: serde_json::json!({"severity": "high", "summary": "buffer overflow"}),
        };
        let json = serde_json::to_string(&fragment).unwrap();
        assert!(json.contains("cve-2024-0001"));
        assert!(json.contains("buffer overflow"));
    }
}
