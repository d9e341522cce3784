//! The branch catalog — classification of candidate expertise branches.

use crate::{EXPERTISE_PATTERNS, RESERVED_BRANCHES};
use polymath_core::branch::{BranchDescriptor, BranchInspector};
use tracing::{debug, warn};

/// Scans a repository's branches for expertise bundles.
///
/// Each scan recomputes every descriptor from scratch; nothing is cached or
/// persisted.
pub struct BranchCatalog {
    inspector: Box<dyn BranchInspector>,
}

impl BranchCatalog {
    pub fn new(inspector: Box<dyn BranchInspector>) -> Self {
        Self { inspector }
    }

    /// Enumerate and classify all candidate expertise branches.
    ///
    /// Reserved names are excluded, a name-pattern heuristic shortlists
    /// candidates, and each candidate's file tree is inspected for
    /// `manifest.yaml` and an `expertise/` directory. A failing
    /// source-control query yields an empty result, never an error.
    pub fn scan(&self) -> Vec<BranchDescriptor> {
        let branches = match self.inspector.list_branches() {
            Ok(branches) => branches,
            Err(e) => {
                warn!(error = %e, "Branch enumeration failed; returning empty catalog");
                return Vec::new();
            }
        };

        let mut descriptors = Vec::new();
        for branch in branches {
            let branch = branch.trim();
            if branch.is_empty() || RESERVED_BRANCHES.contains(&branch) {
                continue;
            }
            if !is_expertise_candidate(branch) {
                continue;
            }
            match self.describe(branch) {
                Some(descriptor) => descriptors.push(descriptor),
                None => debug!(branch, "Skipping branch: tree inspection failed"),
            }
        }

        debug!(count = descriptors.len(), "Branch scan complete");
        descriptors
    }

    /// Names of valid expertise branches only.
    pub fn available_expertise(&self) -> Vec<String> {
        self.scan()
            .into_iter()
            .filter(|d| d.valid)
            .map(|d| d.name)
            .collect()
    }

    fn describe(&self, branch: &str) -> Option<BranchDescriptor> {
        let files = match self.inspector.list_branch_files(branch) {
            Ok(files) => files,
            Err(e) => {
                warn!(branch, error = %e, "Failed to inspect branch tree");
                return None;
            }
        };

        let has_manifest = files.iter().any(|f| f.contains("manifest.yaml"));
        let has_expertise_dir = files.iter().any(|f| f.contains("expertise/"));

        Some(BranchDescriptor {
            name: branch.to_string(),
            has_manifest,
            has_expertise_dir,
            valid: has_manifest && has_expertise_dir,
            description: infer_description(branch),
        })
    }
}

fn is_expertise_candidate(branch: &str) -> bool {
    let lower = branch.to_lowercase();
    EXPERTISE_PATTERNS.iter().any(|p| lower.contains(p))
}

/// Best-effort keyword heuristic on the branch name. Advisory only.
fn infer_description(branch: &str) -> String {
    let lower = branch.to_lowercase();
    if lower.contains("slicer") || lower.contains("3d") {
        "3D Printing & Slicing Expertise".into()
    } else if lower.contains("web") {
        "Web Development Expertise".into()
    } else if lower.contains("devops") || lower.contains("cicd") {
        "DevOps & CI/CD Expertise".into()
    } else if lower.contains("security") {
        "Security & Vulnerability Expertise".into()
    } else {
        format!("Expertise: {branch}")
    }
}
