//! The orchestrator façade.

use polymath_catalog::{BranchCatalog, GitInspector};
use polymath_config::AppConfig;
use polymath_context::{ContextAssembler, ContextConfig, ConversationEntry};
use polymath_core::branch::BranchDescriptor;
use polymath_core::error::{Error, Result};
use polymath_core::{Fragment, InferenceProvider, LoadedPlugin, PluginStats};
use polymath_registry::PluginRegistry;
use polymath_store::FragmentStore;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Binds the runtime components and exposes the external API.
pub struct Orchestrator {
    registry: PluginRegistry,
    assembler: ContextAssembler,
    store: FragmentStore,
    catalog: BranchCatalog,
    provider: Arc<dyn InferenceProvider>,
}

impl Orchestrator {
    /// Wire an orchestrator from explicit parts.
    pub fn new(
        registry: PluginRegistry,
        assembler: ContextAssembler,
        store: FragmentStore,
        catalog: BranchCatalog,
        provider: Arc<dyn InferenceProvider>,
    ) -> Self {
        Self {
            registry,
            assembler,
            store,
            catalog,
            provider,
        }
    }

    /// Wire an orchestrator from configuration: git inspector against the
    /// configured repository, fragment store at the storage root, plugin
    /// cache as the default load location, and the configured provider.
    pub fn from_config(config: &AppConfig) -> Self {
        let registry = PluginRegistry::new(&config.storage.plugin_cache);
        let assembler = ContextAssembler::new(ContextConfig {
            max_stack_entries: config.context.max_stack_entries,
            recency_window: config.context.recency_window,
        });
        let store = FragmentStore::open(&config.storage.root);
        let catalog = BranchCatalog::new(Box::new(GitInspector::new(&config.catalog.repo_path)));
        let provider = polymath_providers::from_config(&config.inference);

        info!(provider = provider.name(), "Orchestrator initialized");
        Self::new(registry, assembler, store, catalog, provider)
    }

    /// Load `~/.polymath/config.toml` (or defaults) and wire from it.
    pub fn from_default_config() -> Result<Self> {
        let config = AppConfig::load().map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        Ok(Self::from_config(&config))
    }

    // ── Expertise lifecycle ───────────────────────────────────────────────

    /// Load the expertise plugin at `path`. The plugin name is the bundle's
    /// directory name.
    ///
    /// On success the plugin gains an expertise context entry summarizing
    /// its manifest. On failure the system is left exactly as it was — no
    /// partial plugin, no stray context entry.
    pub fn load_expertise(&mut self, path: &Path) -> Result<bool> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::Internal(format!("unusable plugin path: {}", path.display())))?
            .to_string();

        self.registry.load(&name, Some(path))?;
        self.register_expertise_context(&name);
        Ok(true)
    }

    /// Load a plugin by name from the default cache location.
    pub fn load_cached_expertise(&mut self, name: &str) -> Result<bool> {
        self.registry.load(name, None)?;
        self.register_expertise_context(name);
        Ok(true)
    }

    fn register_expertise_context(&mut self, name: &str) {
        match self.registry.get_info(name) {
            Some(info) => {
                let summary = info.summary();
                self.assembler.add_expertise_context(name, summary);
            }
            // load() just succeeded; only reachable if the registry is
            // mutated out from under us.
            None => warn!(plugin = name, "Loaded plugin missing from registry"),
        }
    }

    /// Unload a plugin from memory and drop its expertise context entry as
    /// one logical operation. Persisted fragments are untouched.
    ///
    /// Returns `false` if the plugin was not loaded.
    pub fn unload_expertise(&mut self, name: &str) -> bool {
        if !self.registry.unload(name) {
            return false;
        }
        // In-memory map removal cannot fail, so the pair stays atomic.
        self.assembler.remove_expertise_context(name);
        true
    }

    /// Names of currently loaded plugins.
    pub fn list_loaded(&self) -> Vec<String> {
        self.registry.list_loaded()
    }

    /// Details of one loaded plugin.
    pub fn get_info(&self, name: &str) -> Option<&LoadedPlugin> {
        self.registry.get_info(name)
    }

    /// Plugin directories available in the cache without loading them.
    pub fn discover_cached(&self) -> Vec<String> {
        self.registry.discover_cached()
    }

    // ── Branch discovery ──────────────────────────────────────────────────

    /// Scan the repository for candidate expertise branches.
    pub fn scan_expertise(&self) -> Vec<BranchDescriptor> {
        self.catalog.scan()
    }

    /// Names of valid expertise branches.
    pub fn available_expertise(&self) -> Vec<String> {
        self.catalog.available_expertise()
    }

    // ── Query ─────────────────────────────────────────────────────────────

    /// Run one inference call against the assembled context.
    ///
    /// Caller-supplied one-off context is appended after the assembled
    /// context. A failed call is surfaced verbatim — no retry, no caching.
    pub async fn query(&self, prompt: &str, extra_context: Option<&str>) -> Result<String> {
        let mut context = self.assembler.get_combined_context();
        if let Some(extra) = extra_context
            && !extra.is_empty()
        {
            if !context.is_empty() {
                context.push('\n');
            }
            context.push_str(extra);
        }

        info!(prompt_len = prompt.len(), context_len = context.len(), "Dispatching query");
        Ok(self.provider.infer(prompt, &context).await?)
    }

    // ── Conversation context ──────────────────────────────────────────────

    /// Push a conversation entry onto the context stack.
    pub fn push_context(&mut self, text: impl Into<String>) {
        self.assembler.push_context(text);
    }

    /// Pop the most recent conversation entry.
    pub fn pop_context(&mut self) -> Option<ConversationEntry> {
        self.assembler.pop_context()
    }

    /// The combined context string as inference would see it.
    pub fn get_combined_context(&self) -> String {
        self.assembler.get_combined_context()
    }

    /// Session reset: empty the conversation stack and the expertise map.
    pub fn clear_context(&mut self) {
        self.assembler.clear_context();
    }

    // ── Fragment storage ──────────────────────────────────────────────────

    pub fn store_fragment(&mut self, plugin: &str, fragment_id: &str, data: &serde_json::Value) -> bool {
        self.store.store_fragment(plugin, fragment_id, data)
    }

    pub fn retrieve_fragment(&self, plugin: &str, fragment_id: &str) -> Option<serde_json::Value> {
        self.store.retrieve_fragment(plugin, fragment_id)
    }

    pub fn search_fragments(&self, plugin: &str, query: &str) -> Vec<serde_json::Value> {
        self.store.search_fragments(plugin, query)
    }

    /// Delete a plugin's persisted fragments. Independent of in-memory
    /// unload, by design.
    pub fn delete_plugin_memory(&mut self, plugin: &str) -> bool {
        self.store.delete_plugin_memory(plugin)
    }

    pub fn get_plugin_stats(&self, plugin: &str) -> PluginStats {
        self.store.get_plugin_stats(plugin)
    }

    pub fn fragment_ids(&self, plugin: &str) -> Vec<String> {
        self.store.fragment_ids(plugin)
    }

    pub fn list_fragments(&self, plugin: &str) -> Vec<Fragment> {
        self.store.list_fragments(plugin)
    }

    // ── Teardown ──────────────────────────────────────────────────────────

    /// Clean shutdown: unload every plugin and clear the context. Persisted
    /// fragments stay on disk.
    pub fn shutdown(&mut self) {
        info!("Shutting down orchestrator");
        for name in self.list_loaded() {
            self.registry.unload(&name);
        }
        self.assembler.clear_context();
    }
}
