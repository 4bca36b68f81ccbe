//! Reconciliation of manifest pins against registry metadata
//!
//! This module provides:
//! - Bounded parallel registry fetches (fetch → merge)
//! - Outdated detection against the registry's current release
//! - Per-dependency constraint checks against the manifest
//! - Skip records for modules the registry could not answer for

use crate::constraint;
use crate::domain::{
    DependencyCheck, DependencyFinding, Diagnostic, Manifest, ManifestEntry, RegistryRelease,
    SkipReason, SkippedModule,
};
use crate::error::{ConfigError, RegistryError};
use crate::registry::{self, RegistryGateway};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Upper bound on concurrent registry fetches
pub const MAX_CONCURRENCY: usize = 16;

/// Default worker limit: one per CPU, capped
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(MAX_CONCURRENCY)
}

/// Configuration for the reconciler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Maximum concurrent registry fetches
    pub concurrency: usize,
}

impl ReconcileConfig {
    /// Create a configuration with an explicit worker limit
    pub fn new(concurrency: usize) -> Result<Self, ConfigError> {
        if concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency { value: concurrency });
        }
        Ok(Self { concurrency })
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// Result of reconciling a manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// One diagnostic per module the registry answered for, in manifest order
    pub diagnostics: Vec<Diagnostic>,
    /// Modules that could not be checked, in manifest order
    pub skipped: Vec<SkippedModule>,
}

/// Reconciliation engine
pub struct Reconciler {
    gateway: Arc<dyn RegistryGateway>,
    config: ReconcileConfig,
}

impl Reconciler {
    /// Create a reconciler over a registry gateway
    pub fn new(gateway: Arc<dyn RegistryGateway>, config: ReconcileConfig) -> Self {
        Self { gateway, config }
    }

    /// Reconcile every trusted manifest entry against the registry
    pub async fn run(&self, manifest: &Manifest) -> Reconciliation {
        self.run_with_progress(manifest, |_| {}).await
    }

    /// Reconcile, reporting each module name as its fetch completes
    pub async fn run_with_progress<F>(&self, manifest: &Manifest, mut on_fetched: F) -> Reconciliation
    where
        F: FnMut(&str),
    {
        let entries: Vec<&ManifestEntry> = manifest
            .iter()
            .filter(|entry| {
                let trusted = registry::is_trusted_source(&entry.source_url);
                if !trusted {
                    debug!(module = %entry.name, url = %entry.source_url, "not a trusted source, skipping");
                }
                trusted
            })
            .collect();

        debug!(
            registry = self.gateway.registry_name(),
            modules = entries.len(),
            concurrency = self.config.concurrency,
            "fetching registry metadata"
        );

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (index, entry) in entries.iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let semaphore = Arc::clone(&semaphore);
            let entry = (*entry).clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (index, fetch_registry_release(gateway.as_ref(), &entry).await)
            });
        }

        // Each task owns one slot; merge after all complete.
        let mut slots: Vec<Option<Result<RegistryRelease, RegistryError>>> =
            entries.iter().map(|_| None).collect();

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => {
                    on_fetched(&entries[index].name);
                    slots[index] = Some(result);
                }
                Err(e) => warn!("registry fetch task failed: {}", e),
            }
        }

        let mut reconciliation = Reconciliation::default();
        for (entry, slot) in entries.into_iter().zip(slots) {
            match slot {
                Some(Ok(release)) => reconciliation
                    .diagnostics
                    .push(evaluate(entry, &release, manifest)),
                Some(Err(e)) => {
                    warn!(module = %entry.name, "skipping module: {}", e);
                    reconciliation
                        .skipped
                        .push(SkippedModule::new(&entry.name, skip_reason(&e)));
                }
                None => reconciliation.skipped.push(SkippedModule::new(
                    &entry.name,
                    SkipReason::Transient("fetch task did not complete".to_string()),
                )),
            }
        }

        reconciliation
    }
}

/// Fetch the latest version and the pinned release's dependencies
async fn fetch_registry_release(
    gateway: &dyn RegistryGateway,
    entry: &ManifestEntry,
) -> Result<RegistryRelease, RegistryError> {
    let slug = registry::forge_slug(&entry.name);
    let module = gateway.fetch_module(slug).await?;

    let release_id = registry::release_id(&entry.name, &entry.pinned_version);
    let dependencies = match gateway.fetch_release(&release_id).await {
        Ok(release) => {
            if release.version != entry.pinned_version {
                warn!(
                    module = %entry.name,
                    pinned = %entry.pinned_version,
                    published = %release.version,
                    "release version differs from pinned tag"
                );
            }
            release.dependencies
        }
        Err(e) if e.is_not_found() => match module.dependencies {
            Some(dependencies) => {
                warn!(
                    module = %entry.name,
                    release = %release_id,
                    "pinned release not published, checking current release dependencies"
                );
                dependencies
            }
            None => return Err(e),
        },
        Err(e) => return Err(e),
    };

    Ok(RegistryRelease {
        latest_version: module.latest_version,
        latest_released_at: module.latest_released_at,
        dependencies,
    })
}

/// Build the diagnostic for one module from its registry data
pub fn evaluate(entry: &ManifestEntry, release: &RegistryRelease, manifest: &Manifest) -> Diagnostic {
    let dependencies = release
        .dependencies
        .iter()
        .map(|dep| {
            let declared = manifest
                .get(&dep.dependency_name)
                .or_else(|| manifest.get(registry::module_name_for_slug(&dep.dependency_name)));

            let finding = match declared {
                None => DependencyFinding::NotFoundInManifest,
                Some(found) if constraint::satisfies(&found.pinned_version, &dep.requirement) => {
                    DependencyFinding::Satisfied
                }
                Some(found) => DependencyFinding::ConstraintViolated {
                    provided_version: found.pinned_version.clone(),
                },
            };

            DependencyCheck {
                name: dep.dependency_name.clone(),
                requirement: dep.requirement.clone(),
                finding,
            }
        })
        .collect();

    Diagnostic {
        module: entry.name.clone(),
        pinned_version: entry.pinned_version.clone(),
        latest_version: release.latest_version.clone(),
        latest_released_at: release.latest_released_at,
        outdated: entry.pinned_version != release.latest_version,
        dependencies,
    }
}

fn skip_reason(error: &RegistryError) -> SkipReason {
    match error {
        RegistryError::NotFound { .. } => SkipReason::NotFound,
        RegistryError::NoCurrentRelease { .. } => SkipReason::NoCurrentRelease,
        RegistryError::InvalidResponse { message, .. } => {
            SkipReason::InvalidResponse(message.clone())
        }
        other => SkipReason::Transient(other.to_string()),
    }
}
