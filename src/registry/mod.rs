//! Registry access for fetching module release metadata
//!
//! This module provides:
//! - The `RegistryGateway` trait the reconciler depends on
//! - HTTP client shared foundation
//! - Puppet Forge v3 API adapter
//! - Name mapping and trusted-source rules applied before any query

mod client;
mod forge;

pub use client::{HttpClient, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use forge::{ForgeAdapter, FORGE_API_URL};

use crate::domain::{NormalizedVersion, RegistryModuleInfo, RegistryReleaseInfo};
use crate::error::RegistryError;
use async_trait::async_trait;

/// Only modules sourced from this host are checked against the registry
pub const TRUSTED_SOURCE_PREFIX: &str = "https://github.com/";

/// Modules published under a different account than their Puppetfile name
const RENAMED_MODULES: &[(&str, &str)] = &[("puppet-resource_tree", "jake-resource_tree")];

/// Trait for registry gateways
#[async_trait]
pub trait RegistryGateway: Send + Sync {
    /// Get the registry name
    fn registry_name(&self) -> &'static str;

    /// Fetch the current release of a module by registry slug
    async fn fetch_module(&self, slug: &str) -> Result<RegistryModuleInfo, RegistryError>;

    /// Fetch a specific release by its `{slug}-{version}` identifier
    async fn fetch_release(&self, release_id: &str) -> Result<RegistryReleaseInfo, RegistryError>;
}

/// Map a Puppetfile module name to the slug it is published under
pub fn forge_slug(module_name: &str) -> &str {
    RENAMED_MODULES
        .iter()
        .find(|(from, _)| *from == module_name)
        .map(|(_, to)| *to)
        .unwrap_or(module_name)
}

/// Map a registry slug back to the Puppetfile module name it stands for
pub fn module_name_for_slug(slug: &str) -> &str {
    RENAMED_MODULES
        .iter()
        .find(|(_, to)| *to == slug)
        .map(|(from, _)| *from)
        .unwrap_or(slug)
}

/// Release identifier for a module at a given version
pub fn release_id(module_name: &str, version: &NormalizedVersion) -> String {
    format!("{}-{}", forge_slug(module_name), version)
}

/// Returns true if the source URL is one the registry is consulted for
pub fn is_trusted_source(source_url: &str) -> bool {
    source_url.starts_with(TRUSTED_SOURCE_PREFIX)
}
