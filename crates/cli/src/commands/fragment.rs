//! `polymath fragment` — Knowledge fragment management.

use polymath_config::AppConfig;
use polymath_store::FragmentStore;
use uuid::Uuid;

fn open_store() -> Result<FragmentStore, Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    Ok(FragmentStore::open(&config.storage.root))
}

pub fn store(
    plugin: &str,
    data: &str,
    id: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let payload: serde_json::Value =
        serde_json::from_str(data).map_err(|e| format!("Payload is not valid JSON: {e}"))?;
    let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut store = open_store()?;
    if store.store_fragment(plugin, &id, &payload) {
        println!("💾 Stored {plugin}/{id}");
        Ok(())
    } else {
        Err(format!("Failed to store fragment {plugin}/{id}").into())
    }
}

pub fn get(plugin: &str, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    match store.retrieve_fragment(plugin, id) {
        Some(payload) => println!("{}", serde_json::to_string_pretty(&payload)?),
        None => println!("Not found: {plugin}/{id}"),
    }
    Ok(())
}

pub fn list(plugin: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let fragments = store.list_fragments(plugin);

    if fragments.is_empty() {
        println!("No fragments stored under '{plugin}'");
        return Ok(());
    }
    for fragment in &fragments {
        println!(
            "  {} — {}",
            fragment.fragment_id,
            serde_json::to_string(&fragment.payload)?
        );
    }
    println!("\n{} fragments", fragments.len());
    Ok(())
}

pub fn search(plugin: &str, query: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let hits = store.search_fragments(plugin, query);

    if hits.is_empty() {
        println!("No fragments in '{plugin}' match \"{query}\"");
        return Ok(());
    }
    for (i, hit) in hits.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, serde_json::to_string(hit)?);
    }
    println!("\n{} matches", hits.len());
    Ok(())
}

pub fn delete(plugin: &str, confirm: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !confirm {
        println!("⚠️  This permanently deletes every fragment under '{plugin}'.");
        println!("   Run with --confirm to proceed:");
        println!("   polymath fragment delete {plugin} --confirm");
        return Ok(());
    }

    let mut store = open_store()?;
    if store.delete_plugin_memory(plugin) {
        println!("🗑️  Deleted fragment namespace '{plugin}'.");
        Ok(())
    } else {
        Err(format!("Failed to delete fragment namespace '{plugin}'").into())
    }
}

pub fn stats(plugin: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let stats = store.get_plugin_stats(plugin);
    println!("📊 Fragment stats for '{plugin}'");
    println!("  fragments:  {}", stats.fragment_count);
    println!(
        "  total size: {:.1} KB",
        stats.total_size_bytes as f64 / 1024.0
    );
    Ok(())
}
