//! `polymath status` — Configuration and storage overview.

use polymath_config::AppConfig;
use polymath_registry::PluginRegistry;
use polymath_store::FragmentStore;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🧭 Polymath Status");
    println!("==================");
    println!("  Config dir:    {}", AppConfig::config_dir().display());
    println!("  Storage root:  {}", config.storage.root.display());
    println!("  Plugin cache:  {}", config.storage.plugin_cache.display());
    println!("  Repository:    {}", config.catalog.repo_path.display());
    println!("  Provider:      {}", config.inference.provider);
    println!(
        "  Context:       stack bound {}, recency window {}",
        config.context.max_stack_entries, config.context.recency_window
    );

    let registry = PluginRegistry::new(&config.storage.plugin_cache);
    let cached = registry.discover_cached();
    println!("\n  Cached plugins: {}", cached.len());

    let store = FragmentStore::open(&config.storage.root);
    for name in &cached {
        let stats = store.get_plugin_stats(name);
        if stats.fragment_count > 0 {
            println!(
                "    {name}: {} fragments ({:.1} KB)",
                stats.fragment_count,
                stats.total_size_bytes as f64 / 1024.0
            );
        }
    }

    Ok(())
}
