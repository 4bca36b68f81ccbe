//! Puppetfile reading and parsing
//!
//! This module provides functionality to:
//! - Read the Puppetfile from disk (the only terminal failure of a run)
//! - Parse module declarations into an ordered manifest
//! - Collect declarations whose tags are not valid versions

mod puppetfile;

pub use puppetfile::{parse_puppetfile, ParsedManifest};

use crate::error::ManifestError;
use std::io::ErrorKind;
use std::path::Path;

/// Default manifest filename, looked up in the working directory
pub const DEFAULT_MANIFEST: &str = "Puppetfile";

/// Read the manifest text from disk
pub fn read_manifest(path: &Path) -> Result<String, ManifestError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ManifestError::not_found(path),
        _ => ManifestError::unreadable(path, e),
    })
}

/// Read and parse a manifest file
pub fn load_manifest(path: &Path) -> Result<ParsedManifest, ManifestError> {
    let content = read_manifest(path)?;
    Ok(parse_puppetfile(&content))
}
