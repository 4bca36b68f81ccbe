//! Registry metadata types shared by the gateway and the reconciler

use super::NormalizedVersion;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Separator used by the Forge in `owner/name` dependency names
const FORGE_NAME_SEPARATOR: char = '/';

/// Separator used by Puppetfile module names (`owner-name`)
const MODULE_NAME_SEPARATOR: char = '-';

/// Normalize a registry dependency name to Puppetfile form
pub fn normalize_module_name(name: &str) -> String {
    name.trim()
        .replace(FORGE_NAME_SEPARATOR, &MODULE_NAME_SEPARATOR.to_string())
}

/// A dependency declared by a published release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyConstraint {
    /// Dependency name in Puppetfile form
    pub dependency_name: String,
    /// Version requirement exactly as published
    pub requirement: String,
}

impl DependencyConstraint {
    /// Creates a constraint, normalizing the dependency name
    pub fn new(name: &str, requirement: impl Into<String>) -> Self {
        Self {
            dependency_name: normalize_module_name(name),
            requirement: requirement.into(),
        }
    }
}

/// Module endpoint data: the current release of a module
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryModuleInfo {
    /// Registry slug the module was fetched under
    pub slug: String,
    /// Latest published version
    pub latest_version: NormalizedVersion,
    /// When the latest version was published, if the registry says
    pub latest_released_at: Option<DateTime<Utc>>,
    /// Dependencies of the latest release, when included in the response
    pub dependencies: Option<Vec<DependencyConstraint>>,
}

/// Release endpoint data: one specific published release
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryReleaseInfo {
    /// Release identifier (`{slug}-{version}`)
    pub slug: String,
    /// The release's own version field
    pub version: NormalizedVersion,
    /// Dependencies declared by this release
    pub dependencies: Vec<DependencyConstraint>,
}

/// The registry's view of one manifest module, as used for reconciliation
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryRelease {
    /// Latest published version
    pub latest_version: NormalizedVersion,
    /// When the latest version was published
    pub latest_released_at: Option<DateTime<Utc>>,
    /// Dependencies declared for the pinned release
    pub dependencies: Vec<DependencyConstraint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_module_name() {
        assert_eq!(normalize_module_name("puppetlabs/stdlib"), "puppetlabs-stdlib");
        assert_eq!(normalize_module_name("puppetlabs-stdlib"), "puppetlabs-stdlib");
        assert_eq!(normalize_module_name(" puppet/systemd "), "puppet-systemd");
    }

    #[test]
    fn test_dependency_constraint_new() {
        let dep = DependencyConstraint::new("puppetlabs/concat", ">= 4.1.0 < 10.0.0");
        assert_eq!(dep.dependency_name, "puppetlabs-concat");
        assert_eq!(dep.requirement, ">= 4.1.0 < 10.0.0");
    }
}
