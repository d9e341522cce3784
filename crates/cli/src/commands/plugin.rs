//! `polymath plugins` — Cached plugin listing.

use polymath_config::AppConfig;
use polymath_registry::PluginRegistry;

pub fn list() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let registry = PluginRegistry::new(&config.storage.plugin_cache);

    let cached = registry.discover_cached();
    println!("🔌 Plugin cache: {}", config.storage.plugin_cache.display());

    if cached.is_empty() {
        println!("   No cached plugins. Place bundles under the cache directory,");
        println!("   each with a manifest.yaml and an expertise/ tree.");
        return Ok(());
    }

    for name in &cached {
        println!("  - {name}");
    }
    println!("\n{} plugins available", cached.len());

    Ok(())
}
