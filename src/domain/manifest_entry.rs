//! Puppetfile entries and the ordered manifest mapping

use super::NormalizedVersion;
use indexmap::IndexMap;
use serde::Serialize;

/// A module declaration from the Puppetfile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Module name as declared (e.g., `puppetlabs-stdlib`)
    pub name: String,
    /// Source repository URL
    pub source_url: String,
    /// Pinned tag, normalized
    pub pinned_version: NormalizedVersion,
}

impl ManifestEntry {
    /// Creates a new manifest entry
    pub fn new(
        name: impl Into<String>,
        source_url: impl Into<String>,
        pinned_version: NormalizedVersion,
    ) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
            pinned_version,
        }
    }
}

/// A declaration whose tag failed version validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidTag {
    /// Module name
    pub name: String,
    /// The tag exactly as written
    pub raw_tag: String,
    /// Why validation failed
    pub reason: String,
}

/// Module name to entry mapping, in declaration order
///
/// Re-declaring a name replaces the earlier entry but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: IndexMap<String, ManifestEntry>,
}

impl Manifest {
    /// Creates an empty manifest
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, replacing any earlier entry with the same name
    pub fn insert(&mut self, entry: ManifestEntry) -> Option<ManifestEntry> {
        self.entries.insert(entry.name.clone(), entry)
    }

    /// Removes an entry while keeping the order of the rest
    pub fn remove(&mut self, name: &str) -> Option<ManifestEntry> {
        self.entries.shift_remove(name)
    }

    /// Looks up an entry by module name
    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }

    /// Returns true if the module is declared
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Iterates entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.values()
    }

    /// Number of declared modules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no modules are declared
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ManifestEntry> for Manifest {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        let mut manifest = Manifest::new();
        for entry in iter {
            manifest.insert(entry);
        }
        manifest
    }
}
