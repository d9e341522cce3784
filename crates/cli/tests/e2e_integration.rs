//! End-to-end integration tests for the Polymath expertise runtime.
//!
//! These exercise the full pipeline from branch discovery through plugin
//! loading, context assembly, fragment persistence, and query dispatch,
//! with the real git inspector and the stub inference provider.

use polymath_catalog::{BranchCatalog, GitInspector};
use polymath_context::ContextAssembler;
use polymath_core::error::{Error, RegistryError};
use polymath_orchestrator::Orchestrator;
use polymath_providers::StubProvider;
use polymath_registry::PluginRegistry;
use polymath_store::FragmentStore;
use std::path::Path;
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

/// Build an orchestrator over a temp workspace. The workspace directory is
/// not a git repository, so branch scans legitimately come back empty.
fn orchestrator(workspace: &TempDir) -> Orchestrator {
    Orchestrator::new(
        PluginRegistry::new(workspace.path().join("plugins")),
        ContextAssembler::default(),
        FragmentStore::open(workspace.path().join("fragments")),
        BranchCatalog::new(Box::new(GitInspector::new(workspace.path()))),
        Arc::new(StubProvider::with_reply("the model answers")),
    )
}

/// Write a minimal valid plugin bundle: a name-only manifest + one expert
/// handle + one knowledge fragment.
fn write_security_plugin(root: &Path) {
    let plugin = root.join("security");
    let handles = plugin.join("expertise").join("expert_ghosts");
    let cves = plugin.join("expertise").join("knowledge_fragments").join("cves");
    std::fs::create_dir_all(&handles).unwrap();
    std::fs::create_dir_all(&cves).unwrap();

    std::fs::write(plugin.join("manifest.yaml"), "name: security\n").unwrap();
    std::fs::write(handles.join("cve_analyst.md"), "analyst notes").unwrap();
    std::fs::write(cves.join("001.json"), r#"{"cve": "CVE-2024-0001"}"#).unwrap();
}

// ── E2E: discovery → failed load → successful load → context ─────────────

#[test]
fn e2e_scan_load_and_context_pipeline() {
    let workspace = tempdir().unwrap();
    let mut orch = orchestrator(&workspace);

    // 1. Scanning an empty (non-repository) source degrades to nothing.
    assert!(orch.scan_expertise().is_empty());

    // 2. Loading a manifest-less directory fails with a manifest error and
    //    registers nothing.
    let bare = workspace.path().join("plugins").join("bare");
    std::fs::create_dir_all(&bare).unwrap();
    let err = orch.load_expertise(&bare).unwrap_err();
    assert!(matches!(err, Error::Registry(RegistryError::Manifest { .. })));
    assert!(orch.list_loaded().is_empty());

    // 3. A valid bundle loads, appears in the registry, and earns an
    //    expertise line in the combined context.
    write_security_plugin(&workspace.path().join("plugins"));
    assert!(orch.load_expertise(&workspace.path().join("plugins/security")).unwrap());
    assert_eq!(orch.list_loaded(), vec!["security".to_string()]);

    let combined = orch.get_combined_context();
    assert!(combined.contains("security"));
    assert!(combined.contains("[Expertise: security]"));

    let info = orch.get_info("security").unwrap();
    assert_eq!(info.manifest.version, "0.0.0"); // defaulted, not required
    assert_eq!(info.expert_handles, vec!["cve_analyst".to_string()]);
    assert_eq!(info.fragment_index["cves"], 1);
}

// ── E2E: query dispatch ──────────────────────────────────────────────────

#[tokio::test]
async fn e2e_query_reaches_provider_with_expertise_context() {
    let workspace = tempdir().unwrap();
    let mut orch = orchestrator(&workspace);
    write_security_plugin(&workspace.path().join("plugins"));
    orch.load_expertise(&workspace.path().join("plugins/security")).unwrap();

    orch.push_context("User: what is CVE-2024-0001?");
    let answer = orch.query("summarize the CVE", None).await.unwrap();
    assert_eq!(answer, "the model answers");
}

// ── E2E: fragment persistence across orchestrator lifetimes ──────────────

#[test]
fn e2e_fragments_survive_restart_and_unload() {
    let workspace = tempdir().unwrap();

    {
        let mut orch = orchestrator(&workspace);
        write_security_plugin(&workspace.path().join("plugins"));
        orch.load_expertise(&workspace.path().join("plugins/security")).unwrap();

        assert!(orch.store_fragment(
            "security",
            "cve-2024-0001",
            &serde_json::json!({"severity": "critical", "component": "parser"}),
        ));

        // Unloading from memory does not touch storage.
        assert!(orch.unload_expertise("security"));
        assert!(orch.retrieve_fragment("security", "cve-2024-0001").is_some());

        orch.shutdown();
    }

    // A fresh orchestrator over the same workspace sees the fragment.
    let mut orch = orchestrator(&workspace);
    let payload = orch.retrieve_fragment("security", "cve-2024-0001").unwrap();
    assert_eq!(payload["severity"], "critical");

    let hits = orch.search_fragments("security", "PARSER");
    assert_eq!(hits.len(), 1);

    // Explicit durable deletion is the separate operation that removes it.
    assert!(orch.delete_plugin_memory("security"));
    assert!(orch.retrieve_fragment("security", "cve-2024-0001").is_none());
    assert_eq!(orch.get_plugin_stats("security").fragment_count, 0);
}

// ── E2E: plugin parking — unload then reload ─────────────────────────────

#[test]
fn e2e_parked_plugin_reloads_cleanly() {
    let workspace = tempdir().unwrap();
    let mut orch = orchestrator(&workspace);
    write_security_plugin(&workspace.path().join("plugins"));
    let path = workspace.path().join("plugins/security");

    orch.load_expertise(&path).unwrap();
    orch.unload_expertise("security");
    assert!(orch.get_combined_context().is_empty());

    orch.load_expertise(&path).unwrap();
    assert_eq!(orch.list_loaded(), vec!["security".to_string()]);
    assert_eq!(
        orch.get_combined_context().matches("[Expertise: security]").count(),
        1
    );
}
