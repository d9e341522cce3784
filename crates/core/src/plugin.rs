//! Plugin domain types — the manifest and the in-memory loaded form.
//!
//! A plugin bundle on disk looks like:
//!
//! ```text
//! <plugin>/
//!   manifest.yaml
//!   expertise/
//!     expert_ghosts/           one file per expert handle
//!     knowledge_fragments/
//!       <category>/            one file per fragment
//! ```
//!
//! `PluginManifest` is the parsed `manifest.yaml`; `LoadedPlugin` is what the
//! registry holds while the plugin is active.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// A plugin's parsed manifest. Immutable once loaded; identity = `name`.
///
/// Only `name` is required; `version` is defaulted by the parser when the
/// manifest omits it. Everything the manifest declares beyond the
/// recognized keys is carried through in `extra` as opaque metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    /// The plugin name. Unique across loaded plugins.
    pub name: String,

    /// The plugin version string (not interpreted).
    pub version: String,

    /// Declared capabilities.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub capabilities: BTreeSet<String>,

    /// Fragment categories the plugin declares it ships.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub fragment_categories: BTreeSet<String>,

    /// Unrecognized manifest keys, passed through verbatim.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An expertise plugin as held in memory by the registry.
///
/// Owned exclusively by the PluginRegistry: created on `load`, destroyed on
/// `unload`. At most one instance per plugin name exists at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadedPlugin {
    /// The parsed manifest.
    pub manifest: PluginManifest,

    /// Expert handle names, in directory-iteration order. Stable for a given
    /// filesystem state; callers must not rely on any ordering beyond that.
    pub expert_handles: Vec<String>,

    /// Fragment file counts per category, from the plugin bundle.
    pub fragment_index: BTreeMap<String, usize>,

    /// Where the plugin was loaded from.
    pub source_path: PathBuf,
}

impl LoadedPlugin {
    /// Number of expert handles this plugin contributes.
    pub fn expert_count(&self) -> usize {
        self.expert_handles.len()
    }

    /// Total fragment files across all categories in the bundle.
    pub fn fragment_count(&self) -> usize {
        self.fragment_index.values().sum()
    }

    /// One-line summary suitable for an expertise context entry.
    pub fn summary(&self) -> String {
        format!(
            "{} v{} ({} experts, {} fragments)",
            self.manifest.name,
            self.manifest.version,
            self.expert_count(),
            self.fragment_count(),
        )
    }
}
