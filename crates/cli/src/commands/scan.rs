//! `polymath scan` — Discover expertise branches.

use polymath_catalog::{BranchCatalog, GitInspector};
use polymath_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!(
        "🔎 Scanning {} for expertise branches",
        config.catalog.repo_path.display()
    );

    let catalog = BranchCatalog::new(Box::new(GitInspector::new(&config.catalog.repo_path)));
    let descriptors = catalog.scan();

    if descriptors.is_empty() {
        println!("   No expertise branches found.");
        return Ok(());
    }

    for d in &descriptors {
        let marker = if d.valid { "✅" } else { "⚠️ " };
        println!("  {marker} {} — {}", d.name, d.description);
        if !d.valid {
            let mut missing = Vec::new();
            if !d.has_manifest {
                missing.push("manifest.yaml");
            }
            if !d.has_expertise_dir {
                missing.push("expertise/");
            }
            println!("      missing: {}", missing.join(", "));
        }
    }
    println!(
        "\n{} branches, {} valid",
        descriptors.len(),
        descriptors.iter().filter(|d| d.valid).count()
    );

    Ok(())
}
