//! The plugin registry — in-memory lifecycle for expertise bundles.

use crate::{
    EXCLUDED_PREFIX, EXPERT_HANDLES_DIR, EXPERTISE_DIR, FRAGMENTS_DIR, MANIFEST_FILE,
    manifest::parse_manifest,
};
use polymath_core::LoadedPlugin;
use polymath_core::error::RegistryError;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loads and unloads expertise plugins; the single source of truth for what
/// is currently active.
///
/// Per plugin name the lifecycle is `UNLOADED → LOADED → UNLOADED`; no
/// intermediate state is ever observable. Not internally synchronized.
pub struct PluginRegistry {
    cache_root: PathBuf,
    plugins: HashMap<String, LoadedPlugin>,
}

impl PluginRegistry {
    /// Create a registry whose default plugin location is `cache_root`.
    pub fn new(cache_root: impl Into<PathBuf>) -> Self {
        Self {
            cache_root: cache_root.into(),
            plugins: HashMap::new(),
        }
    }

    /// Load a plugin into memory.
    ///
    /// If already loaded this is a no-op returning `Ok(true)`. `path`
    /// defaults to `{cache_root}/{name}`. Registration is all-or-nothing: a
    /// manifest or path failure aborts the whole load and nothing is
    /// registered.
    pub fn load(&mut self, name: &str, path: Option<&Path>) -> Result<bool, RegistryError> {
        if self.plugins.contains_key(name) {
            debug!(plugin = name, "Plugin already loaded");
            return Ok(true);
        }

        let path = match path {
            Some(p) => p.to_path_buf(),
            None => self.cache_root.join(name),
        };

        if !path.exists() {
            return Err(RegistryError::PluginNotFound {
                name: name.to_string(),
                path,
            });
        }

        let manifest = parse_manifest(&path.join(MANIFEST_FILE))?;
        if manifest.name != name {
            warn!(
                plugin = name,
                manifest_name = %manifest.name,
                "Manifest declares a different plugin name"
            );
        }

        let expert_handles = Self::scan_expert_handles(&path);
        let fragment_index = Self::scan_fragment_index(&path);

        let plugin = LoadedPlugin {
            manifest,
            expert_handles,
            fragment_index,
            source_path: path,
        };

        info!(
            plugin = name,
            experts = plugin.expert_count(),
            fragments = plugin.fragment_count(),
            "Loaded plugin"
        );
        self.plugins.insert(name.to_string(), plugin);
        Ok(true)
    }

    /// Enumerate expert-handle files under `expertise/expert_ghosts/`.
    ///
    /// Handle = file stem; names starting with the excluded prefix are
    /// skipped. Order = directory iteration order — stable for a given
    /// filesystem state, nothing more.
    fn scan_expert_handles(plugin_path: &Path) -> Vec<String> {
        let handles_dir = plugin_path.join(EXPERTISE_DIR).join(EXPERT_HANDLES_DIR);
        let mut handles = Vec::new();

        if let Ok(entries) = std::fs::read_dir(&handles_dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if file_name.starts_with(EXCLUDED_PREFIX) {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    handles.push(stem.to_string());
                }
            }
        }

        handles
    }

    /// Count fragment files per category under `expertise/knowledge_fragments/`.
    fn scan_fragment_index(plugin_path: &Path) -> BTreeMap<String, usize> {
        let fragments_dir = plugin_path.join(EXPERTISE_DIR).join(FRAGMENTS_DIR);
        let mut index = BTreeMap::new();

        if let Ok(entries) = std::fs::read_dir(&fragments_dir) {
            for entry in entries.flatten() {
                let category_dir = entry.path();
                if !category_dir.is_dir() {
                    continue;
                }
                let Some(category) = category_dir.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let count = std::fs::read_dir(&category_dir)
                    .map(|files| {
                        files
                            .flatten()
                            .filter(|f| f.path().extension().is_some_and(|e| e == "json"))
                            .count()
                    })
                    .unwrap_or(0);
                index.insert(category.to_string(), count);
            }
        }

        index
    }

    /// Remove a plugin from memory. Returns `false` if it was not loaded.
    ///
    /// Persisted fragments are untouched — in-memory unload and durable
    /// deletion are independent lifecycles, so a plugin can be parked and
    /// reloaded without recomputing its fragment index.
    pub fn unload(&mut self, name: &str) -> bool {
        if self.plugins.remove(name).is_some() {
            info!(plugin = name, "Unloaded plugin");
            true
        } else {
            false
        }
    }

    /// Look up a loaded plugin.
    pub fn get_info(&self, name: &str) -> Option<&LoadedPlugin> {
        self.plugins.get(name)
    }

    /// Names of currently loaded plugins, sorted for stable output.
    pub fn list_loaded(&self) -> Vec<String> {
        let mut names: Vec<String> = self.plugins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Enumerate plugin directories under the cache root that carry a
    /// manifest, without loading them. Sorted.
    pub fn discover_cached(&self) -> Vec<String> {
        let mut available = Vec::new();
        if let Ok(entries) = std::fs::read_dir(&self.cache_root) {
            for entry in entries.flatten() {
                let dir = entry.path();
                if dir.is_dir()
                    && dir.join(MANIFEST_FILE).exists()
                    && let Some(name) = dir.file_name().and_then(|n| n.to_str())
                {
                    available.push(name.to_string());
                }
            }
        }
        available.sort();
        debug!(count = available.len(), "Discovered cached plugins");
        available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    /// Build a plugin bundle on disk: manifest + expert handles + fragments.
    fn write_plugin(root: &Path, name: &str, experts: &[&str], categories: &[(&str, usize)]) {
        let plugin = root.join(name);
        std::fs::create_dir_all(&plugin).unwrap();
        std::fs::write(
            plugin.join(MANIFEST_FILE),
            format!("name: {name}\nversion: 1.0.0\ncapabilities: [advise]\n"),
        )
        .unwrap();

        let handles = plugin.join(EXPERTISE_DIR).join(EXPERT_HANDLES_DIR);
        std::fs::create_dir_all(&handles).unwrap();
        for expert in experts {
            std::fs::write(handles.join(format!("{expert}.md")), "expert notes").unwrap();
        }

        for (category, count) in categories {
            let dir = plugin.join(EXPERTISE_DIR).join(FRAGMENTS_DIR).join(category);
            std::fs::create_dir_all(&dir).unwrap();
            for i in 0..*count {
                std::fs::write(dir.join(format!("{i:03}.json")), "{}").unwrap();
            }
        }
    }

    fn registry_with(name: &str) -> (TempDir, PluginRegistry) {
        let dir = tempdir().unwrap();
        write_plugin(dir.path(), name, &["analyst"], &[("notes", 2)]);
        let registry = PluginRegistry::new(dir.path());
        (dir, registry)
    }

    #[test]
    fn load_registers_manifest_handles_and_index() {
        let dir = tempdir().unwrap();
        write_plugin(
            dir.path(),
            "security",
            &["cve_analyst", "_template", "pentester"],
            &[("cves", 3), ("advisories", 1)],
        );

        let mut registry = PluginRegistry::new(dir.path());
        assert!(registry.load("security", None).unwrap());

        let info = registry.get_info("security").unwrap();
        assert_eq!(info.manifest.name, "security");
        assert_eq!(info.expert_count(), 2); // _template excluded
        assert!(info.expert_handles.contains(&"cve_analyst".to_string()));
        assert!(!info.expert_handles.contains(&"_template".to_string()));
        assert_eq!(info.fragment_index["cves"], 3);
        assert_eq!(info.fragment_index["advisories"], 1);
    }

    #[test]
    fn load_is_idempotent() {
        let (_dir, mut registry) = registry_with("security");
        assert!(registry.load("security", None).unwrap());
        assert!(registry.load("security", None).unwrap());
        assert_eq!(registry.list_loaded(), vec!["security".to_string()]);
    }

    #[test]
    fn load_missing_path_fails_with_not_found() {
        let dir = tempdir().unwrap();
        let mut registry = PluginRegistry::new(dir.path());
        let err = registry.load("ghost", None).unwrap_err();
        assert!(matches!(err, RegistryError::PluginNotFound { .. }));
        assert!(registry.list_loaded().is_empty());
    }

    #[test]
    fn load_without_manifest_fails_and_registers_nothing() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("bare")).unwrap();

        let mut registry = PluginRegistry::new(dir.path());
        let err = registry.load("bare", None).unwrap_err();
        assert!(matches!(err, RegistryError::Manifest { .. }));
        assert!(registry.list_loaded().is_empty());
        assert!(registry.get_info("bare").is_none());
    }

    #[test]
    fn load_with_explicit_path() {
        let dir = tempdir().unwrap();
        write_plugin(dir.path(), "web-dev", &[], &[]);
        let elsewhere = tempdir().unwrap();

        // Registry rooted somewhere else entirely; explicit path wins.
        let mut registry = PluginRegistry::new(elsewhere.path());
        let path = dir.path().join("web-dev");
        assert!(registry.load("web-dev", Some(&path)).unwrap());
        assert_eq!(
            registry.get_info("web-dev").unwrap().source_path,
            path
        );
    }

    #[test]
    fn unload_removes_and_reports_absence() {
        let (_dir, mut registry) = registry_with("security");
        registry.load("security", None).unwrap();

        assert!(registry.unload("security"));
        assert!(registry.list_loaded().is_empty());
        assert!(!registry.unload("security"));
    }

    #[test]
    fn discover_cached_lists_manifested_dirs_only() {
        let dir = tempdir().unwrap();
        write_plugin(dir.path(), "security", &[], &[]);
        write_plugin(dir.path(), "devops", &[], &[]);
        std::fs::create_dir_all(dir.path().join("not-a-plugin")).unwrap();

        let registry = PluginRegistry::new(dir.path());
        assert_eq!(
            registry.discover_cached(),
            vec!["devops".to_string(), "security".to_string()]
        );
    }
}
