//! Git CLI inspector — the default `BranchInspector` implementation.
//!
//! Shells out to `git branch -a` and `git ls-tree` against a configured
//! repository path. Every subprocess failure maps to a `CatalogError`,
//! which the catalog swallows into an empty scan.

use polymath_core::branch::BranchInspector;
use polymath_core::error::CatalogError;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Inspects branches through the `git` binary.
pub struct GitInspector {
    repo_path: PathBuf,
}

impl GitInspector {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, CatalogError> {
        debug!(?args, repo = %self.repo_path.display(), "Running git");
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_path)
            .output()
            .map_err(|e| CatalogError::RepositoryUnavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CatalogError::QueryFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl BranchInspector for GitInspector {
    fn list_branches(&self) -> Result<Vec<String>, CatalogError> {
        let stdout = self.run_git(&["branch", "-a"])?;
        Ok(stdout
            .lines()
            .map(|line| {
                line.trim()
                    .trim_start_matches("* ")
                    .trim_start_matches("remotes/origin/")
                    .to_string()
            })
            .filter(|name| !name.is_empty())
            .collect())
    }

    fn list_branch_files(&self, branch: &str) -> Result<Vec<String>, CatalogError> {
        let stdout = self.run_git(&["ls-tree", "-r", branch, "--name-only"])?;
        Ok(stdout
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }
}
