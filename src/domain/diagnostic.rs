//! Per-module reconciliation results

use super::NormalizedVersion;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Outcome of checking one registry-declared dependency against the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DependencyFinding {
    /// The manifest pins a version satisfying the requirement
    Satisfied,
    /// The manifest does not declare the dependency
    NotFoundInManifest,
    /// The manifest's pin does not satisfy the requirement
    ConstraintViolated {
        /// The version the manifest pins
        provided_version: NormalizedVersion,
    },
}

impl DependencyFinding {
    /// Returns true if the finding is an inconsistency
    pub fn is_problem(&self) -> bool {
        !matches!(self, DependencyFinding::Satisfied)
    }
}

/// A dependency requirement together with its finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyCheck {
    /// Dependency name in Puppetfile form
    pub name: String,
    /// Requirement as published by the registry
    pub requirement: String,
    /// Result of the check
    #[serde(flatten)]
    pub finding: DependencyFinding,
}

/// Reconciliation result for one manifest module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Module name
    pub module: String,
    /// Version pinned in the manifest
    pub pinned_version: NormalizedVersion,
    /// Latest version published to the registry
    pub latest_version: NormalizedVersion,
    /// Publication time of the latest version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_released_at: Option<DateTime<Utc>>,
    /// Pinned version differs from the latest version
    pub outdated: bool,
    /// Findings in registry declaration order
    pub dependencies: Vec<DependencyCheck>,
}

impl Diagnostic {
    /// Returns true if the module is outdated or has any dependency problem
    pub fn has_problems(&self) -> bool {
        self.outdated || self.problems().next().is_some()
    }

    /// Iterates over dependency checks that are not satisfied
    pub fn problems(&self) -> impl Iterator<Item = &DependencyCheck> {
        self.dependencies.iter().filter(|d| d.finding.is_problem())
    }
}

/// Why a module was left out of the diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "message", rename_all = "snake_case")]
pub enum SkipReason {
    /// Registry has no such module or release
    NotFound,
    /// Registry reports no current release for the module
    NoCurrentRelease,
    /// Network failure, timeout or rate limiting
    Transient(String),
    /// Registry answered with something unusable
    InvalidResponse(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => write!(f, "not found on the Forge"),
            SkipReason::NoCurrentRelease => write!(f, "no current release"),
            SkipReason::Transient(msg) => write!(f, "fetch failed: {}", msg),
            SkipReason::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

/// A module that could not be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedModule {
    /// Module name
    pub module: String,
    /// Why it was skipped
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl SkippedModule {
    /// Creates a skipped module record
    pub fn new(module: impl Into<String>, reason: SkipReason) -> Self {
        Self {
            module: module.into(),
            reason,
        }
    }
}
