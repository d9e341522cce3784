//! The fragment store — durable key-value persistence, one namespace per
//! plugin.

use polymath_core::error::StorageError;
use polymath_core::{Fragment, PluginStats};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Durable, namespaced key-value storage for plugin knowledge fragments.
///
/// Entries are written through to disk on every `store_fragment`; the index
/// is rebuilt from the directory tree on open, so a plugin can be unloaded
/// from memory and reloaded later without recomputing anything.
///
/// Not internally synchronized — callers must serialize mutation through a
/// single owner.
pub struct FragmentStore {
    root: PathBuf,
    index: HashMap<String, Vec<String>>,
}

impl FragmentStore {
    /// Open a store rooted at `root`, rebuilding the index from whatever is
    /// already on disk. The directory is created if missing.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        if let Err(e) = std::fs::create_dir_all(&root) {
            warn!(root = %root.display(), error = %e, "Failed to create storage root");
        }
        let index = Self::scan_index(&root);
        debug!(
            root = %root.display(),
            plugins = index.len(),
            "Fragment store opened"
        );
        Self { root, index }
    }

    /// Walk the storage root and index every `{plugin}/{id}.json` found.
    fn scan_index(root: &Path) -> HashMap<String, Vec<String>> {
        let mut index = HashMap::new();
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(_) => return index, // Root doesn't exist yet — start empty
        };

        for entry in entries.flatten() {
            let plugin_dir = entry.path();
            if !plugin_dir.is_dir() {
                continue;
            }
            let Some(plugin) = plugin_dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let mut ids = Vec::new();
            if let Ok(files) = std::fs::read_dir(&plugin_dir) {
                for file in files.flatten() {
                    let path = file.path();
                    if path.extension().is_some_and(|e| e == "json")
                        && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                    {
                        ids.push(stem.to_string());
                    }
                }
            }
            if !ids.is_empty() {
                index.insert(plugin.to_string(), ids);
            }
        }
        index
    }

    fn fragment_path(&self, plugin: &str, fragment_id: &str) -> PathBuf {
        self.root.join(plugin).join(format!("{fragment_id}.json"))
    }

    /// Store a fragment, overwriting any existing payload under the same
    /// `(plugin, fragment_id)`. Last writer wins.
    ///
    /// Returns `false` on any I/O or serialization fault, never panics or
    /// propagates.
    pub fn store_fragment(
        &mut self,
        plugin: &str,
        fragment_id: &str,
        data: &serde_json::Value,
    ) -> bool {
        match self.try_store(plugin, fragment_id, data) {
            Ok(()) => {
                debug!(plugin, fragment_id, "Stored fragment");
                true
            }
            Err(e) => {
                warn!(plugin, fragment_id, error = %e, "Failed to store fragment");
                false
            }
        }
    }

    fn try_store(
        &mut self,
        plugin: &str,
        fragment_id: &str,
        data: &serde_json::Value,
    ) -> Result<(), StorageError> {
        let plugin_dir = self.root.join(plugin);
        std::fs::create_dir_all(&plugin_dir).map_err(|e| StorageError::Io(e.to_string()))?;

        let serialized = serde_json::to_string_pretty(data)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let path = self.fragment_path(plugin, fragment_id);
        std::fs::write(&path, serialized).map_err(|e| StorageError::Io(e.to_string()))?;

        // Index the id exactly once, even when the file content is
        // overwritten.
        let ids = self.index.entry(plugin.to_string()).or_default();
        if !ids.iter().any(|id| id == fragment_id) {
            ids.push(fragment_id.to_string());
        }
        Ok(())
    }

    /// Retrieve a fragment's payload, or `None` if absent.
    ///
    /// A corrupt or truncated file reads as "not found" plus a logged
    /// warning, not a hard error.
    pub fn retrieve_fragment(&self, plugin: &str, fragment_id: &str) -> Option<serde_json::Value> {
        let path = self.fragment_path(plugin, fragment_id);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return None,
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(plugin, fragment_id, error = %e, "Skipping corrupt fragment");
                None
            }
        }
    }

    /// Find every indexed fragment of `plugin` whose stringified content
    /// contains `query`, case-insensitively. Order = index order.
    ///
    /// A naive O(n) baseline by contract, not a relevance function.
    pub fn search_fragments(&self, plugin: &str, query: &str) -> Vec<serde_json::Value> {
        let query_lower = query.to_lowercase();
        let Some(ids) = self.index.get(plugin) else {
            return Vec::new();
        };

        ids.iter()
            .filter_map(|id| self.retrieve_fragment(plugin, id))
            .filter(|fragment| fragment.to_string().to_lowercase().contains(&query_lower))
            .collect()
    }

    /// Remove the plugin's entire namespace from disk and from the index.
    ///
    /// Idempotent: deleting an already-absent plugin returns `true`.
    pub fn delete_plugin_memory(&mut self, plugin: &str) -> bool {
        let plugin_dir = self.root.join(plugin);
        if plugin_dir.exists()
            && let Err(e) = std::fs::remove_dir_all(&plugin_dir)
        {
            warn!(plugin, error = %e, "Failed to delete plugin namespace");
            return false;
        }
        self.index.remove(plugin);
        debug!(plugin, "Deleted plugin memory");
        true
    }

    /// Current statistics for a plugin namespace.
    ///
    /// Recomputed from the index and on-disk sizes on every call so the
    /// numbers stay honest even after external tampering.
    pub fn get_plugin_stats(&self, plugin: &str) -> PluginStats {
        let fragment_count = self.index.get(plugin).map_or(0, Vec::len);

        let mut total_size_bytes = 0;
        let plugin_dir = self.root.join(plugin);
        if let Ok(files) = std::fs::read_dir(&plugin_dir) {
            for file in files.flatten() {
                let path = file.path();
                if path.extension().is_some_and(|e| e == "json")
                    && let Ok(meta) = file.metadata()
                {
                    total_size_bytes += meta.len();
                }
            }
        }

        PluginStats {
            fragment_count,
            total_size_bytes,
        }
    }

    /// Fragment ids currently indexed for a plugin, in index order.
    pub fn fragment_ids(&self, plugin: &str) -> Vec<String> {
        self.index.get(plugin).cloned().unwrap_or_default()
    }

    /// Every readable fragment in a plugin namespace, in index order.
    /// Corrupt entries are skipped (and logged by the retrieval path).
    pub fn list_fragments(&self, plugin: &str) -> Vec<Fragment> {
        self.fragment_ids(plugin)
            .into_iter()
            .filter_map(|id| {
                self.retrieve_fragment(plugin, &id).map(|payload| Fragment {
                    plugin: plugin.to_string(),
                    fragment_id: id,
                    payload,
                })
            })
            .collect()
    }

    /// The storage root this store owns.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn store_and_retrieve_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = FragmentStore::open(dir.path());

        let data = serde_json::json!({"severity": "high", "cve": "CVE-2024-0001"});
        assert!(store.store_fragment("security", "cve-001", &data));

        let back = store.retrieve_fragment("security", "cve-001").unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn retrieve_missing_returns_none() {
        let dir = tempdir().unwrap();
        let store = FragmentStore::open(dir.path());
        assert!(store.retrieve_fragment("security", "nope").is_none());
    }

    #[test]
    fn overwrite_does_not_duplicate_index() {
        let dir = tempdir().unwrap();
        let mut store = FragmentStore::open(dir.path());

        store.store_fragment("security", "f1", &serde_json::json!({"v": 1}));
        store.store_fragment("security", "f1", &serde_json::json!({"v": 2}));

        assert_eq!(store.fragment_ids("security"), vec!["f1".to_string()]);
        let back = store.retrieve_fragment("security", "f1").unwrap();
        assert_eq!(back["v"], 2);
    }

    #[test]
    fn search_matches_case_insensitively() {
        let dir = tempdir().unwrap();
        let mut store = FragmentStore::open(dir.path());

        store.store_fragment(
            "security",
            "f1",
            &serde_json::json!({"summary": "Buffer Overflow in parser"}),
        );
        store.store_fragment(
            "security",
            "f2",
            &serde_json::json!({"summary": "weak cipher suite"}),
        );

        let hits = store.search_fragments("security", "buffer overflow");
        assert_eq!(hits.len(), 1);
        assert!(hits[0]["summary"].as_str().unwrap().contains("Buffer"));
    }

    #[test]
    fn search_is_isolated_per_plugin() {
        let dir = tempdir().unwrap();
        let mut store = FragmentStore::open(dir.path());

        store.store_fragment("security", "f1", &serde_json::json!({"topic": "shared term"}));
        store.store_fragment("web-dev", "f1", &serde_json::json!({"topic": "shared term"}));

        let hits = store.search_fragments("security", "shared term");
        assert_eq!(hits.len(), 1);
        assert!(store.search_fragments("missing-plugin", "shared term").is_empty());
    }

    #[test]
    fn delete_plugin_memory_is_idempotent_and_total() {
        let dir = tempdir().unwrap();
        let mut store = FragmentStore::open(dir.path());

        store.store_fragment("security", "f1", &serde_json::json!({"a": 1}));
        store.store_fragment("security", "f2", &serde_json::json!({"b": 2}));

        assert!(store.delete_plugin_memory("security"));
        assert!(store.retrieve_fragment("security", "f1").is_none());
        assert_eq!(store.get_plugin_stats("security").fragment_count, 0);

        // Deleting again (already absent) still succeeds.
        assert!(store.delete_plugin_memory("security"));
    }

    #[test]
    fn stats_reflect_disk_state() {
        let dir = tempdir().unwrap();
        let mut store = FragmentStore::open(dir.path());

        store.store_fragment("security", "f1", &serde_json::json!({"k": "value one"}));
        store.store_fragment("security", "f2", &serde_json::json!({"k": "value two"}));

        let stats = store.get_plugin_stats("security");
        assert_eq!(stats.fragment_count, 2);
        assert!(stats.total_size_bytes > 0);
    }

    #[test]
    fn index_rebuilt_on_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut store = FragmentStore::open(dir.path());
            store.store_fragment("security", "f1", &serde_json::json!({"persist": true}));
        }

        let store = FragmentStore::open(dir.path());
        assert_eq!(store.fragment_ids("security"), vec!["f1".to_string()]);
        assert!(store.retrieve_fragment("security", "f1").is_some());
        assert_eq!(store.search_fragments("security", "persist").len(), 1);
    }

    #[test]
    fn list_fragments_returns_full_records() {
        let dir = tempdir().unwrap();
        let mut store = FragmentStore::open(dir.path());

        store.store_fragment("security", "f1", &serde_json::json!({"n": 1}));
        store.store_fragment("security", "f2", &serde_json::json!({"n": 2}));

        let fragments = store.list_fragments("security");
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].plugin, "security");
        assert_eq!(fragments[0].fragment_id, "f1");
        assert_eq!(fragments[1].payload["n"], 2);
    }

    #[test]
    fn corrupt_file_reads_as_not_found() {
        let dir = tempdir().unwrap();
        let plugin_dir = dir.path().join("security");
        std::fs::create_dir_all(&plugin_dir).unwrap();
        std::fs::write(plugin_dir.join("bad.json"), "{ truncated").unwrap();

        let store = FragmentStore::open(dir.path());
        // Indexed (it is a .json on disk) but unreadable.
        assert_eq!(store.fragment_ids("security"), vec!["bad".to_string()]);
        assert!(store.retrieve_fragment("security", "bad").is_none());
        assert!(store.search_fragments("security", "truncated").is_empty());
    }
}
