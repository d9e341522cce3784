//! Branch inspection — the source-control collaborator seam.
//!
//! The catalog never talks to git directly; it goes through the
//! `BranchInspector` trait so tests can substitute a fixed branch layout.

use serde::{Deserialize, Serialize};
use crate::error::CatalogError;

/// What the catalog learned about one candidate expertise branch.
///
/// Ephemeral — recomputed on every scan, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchDescriptor {
    /// The branch name, with remote-tracking prefixes stripped.
    pub name: String,

    /// Whether the branch tree contains a `manifest.yaml`.
    pub has_manifest: bool,

    /// Whether the branch tree contains an `expertise/` directory.
    pub has_expertise_dir: bool,

    /// `has_manifest && has_expertise_dir`.
    pub valid: bool,

    /// Best-effort description inferred from the branch name. Advisory
    /// metadata only — never gates validity.
    pub description: String,
}

/// Read-only view over a repository's branches.
///
/// Implementations: git CLI, fixed in-memory layouts for tests.
pub trait BranchInspector: Send + Sync {
    /// List all branch-like sources (local and remote-tracking), with
    /// remote prefixes already stripped.
    fn list_branches(&self) -> std::result::Result<Vec<String>, CatalogError>;

    /// List the file paths present in the named branch's tree.
    fn list_branch_files(&self, branch: &str) -> std::result::Result<Vec<String>, CatalogError>;
}
