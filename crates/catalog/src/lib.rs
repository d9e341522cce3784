//! Branch catalog for Polymath — discovers candidate expertise sources and
//! validates their shape without loading them.
//!
//! Discovery is read-only and total: a failing source-control query degrades
//! to an empty scan plus a log line, never an error. Absence of expertise
//! branches is a valid (if degraded) system state.

pub mod catalog;
pub mod git;

pub use catalog::BranchCatalog;
pub use git::GitInspector;

/// Branch names that are never expertise candidates.
pub const RESERVED_BRANCHES: &[&str] = &["main", "master", "HEAD"];

/// Name patterns that shortlist a branch as an expertise candidate.
pub const EXPERTISE_PATTERNS: &[&str] = &[
    "-branch",
    "-expertise",
    "-plugin",
    "slicer",
    "web-dev",
    "devops",
    "security",
];
