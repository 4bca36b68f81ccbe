//! Core domain models for puppetfile-check
//!
//! This module contains the fundamental types used throughout the application:
//! - Normalized semantic versions
//! - Manifest entries and the ordered manifest mapping
//! - Registry release metadata
//! - Per-module diagnostics and skip records

mod diagnostic;
mod manifest_entry;
mod release;
mod version;

pub use diagnostic::{DependencyCheck, DependencyFinding, Diagnostic, SkipReason, SkippedModule};
pub use manifest_entry::{InvalidTag, Manifest, ManifestEntry};
pub use release::{
    normalize_module_name, DependencyConstraint, RegistryModuleInfo, RegistryRelease,
    RegistryReleaseInfo,
};
pub use version::NormalizedVersion;
