//! Normalized semantic versions
//!
//! Puppetfile tags are frequently written as `v1.2.3`. A `NormalizedVersion`
//! is the tag with exactly one leading `v`/`V` removed, validated as semver.

use crate::error::VersionError;
use semver::Version;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A tag that has been stripped of its `v` prefix and validated as semver
#[derive(Debug, Clone)]
pub struct NormalizedVersion {
    /// Normalized text, exactly as it appeared after stripping the prefix
    text: String,
    /// Parsed form used for ordering
    parsed: Version,
}

impl NormalizedVersion {
    /// Normalize and validate a raw tag
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        let text = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

        let parsed = Version::parse(text).map_err(|e| VersionError::Invalid {
            raw: raw.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            text: text.to_string(),
            parsed,
        })
    }

    /// The normalized version text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The parsed semver value
    pub fn semver(&self) -> &Version {
        &self.parsed
    }

    /// Compare by semver precedence, ignoring build metadata
    pub fn cmp_precedence(&self, other: &Self) -> Ordering {
        self.parsed.cmp_precedence(&other.parsed)
    }
}

// Equality is textual: `1.2.0` and `1.2.0+build` are different pins.
impl PartialEq for NormalizedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for NormalizedVersion {}

impl FromStr for NormalizedVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for NormalizedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for NormalizedVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}
