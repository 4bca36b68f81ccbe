//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: the Puppetfile cannot be read (terminal)
//! - VersionError: a tag is not a valid semantic version (per entry)
//! - RegistryError: Forge communication failures (per module, never terminal)
//! - ConfigError: invalid CLI configuration

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to reading the manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("Puppetfile not found at {path}")]
    NotFound { path: PathBuf },

    /// Manifest file exists but cannot be read
    #[error("failed to read Puppetfile {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from version tag validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Tag is not a semantic version after stripping the `v` prefix
    #[error("invalid version '{raw}': {message}")]
    Invalid { raw: String, message: String },
}

/// Errors related to Forge communication
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Module or release not found
    #[error("'{slug}' not found on the Forge")]
    NotFound { slug: String },

    /// Module exists but has no current release
    #[error("no current release found for '{slug}'")]
    NoCurrentRelease { slug: String },

    /// Network request failed
    #[error("failed to fetch '{slug}' from the Forge: {message}")]
    NetworkError { slug: String, message: String },

    /// Rate limit exceeded
    #[error("Forge rate limit exceeded while fetching '{slug}'")]
    RateLimitExceeded { slug: String },

    /// Request timed out
    #[error("timeout while fetching '{slug}' from the Forge")]
    Timeout { slug: String },

    /// Response could not be interpreted
    #[error("invalid Forge response for '{slug}': {message}")]
    InvalidResponse { slug: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Worker limit must be positive
    #[error("invalid concurrency '{value}': expected a positive number")]
    InvalidConcurrency { value: usize },

    /// Forge URL could not be used
    #[error("invalid Forge URL '{url}': {message}")]
    InvalidForgeUrl { url: String, message: String },

    /// HTTP client could not be built
    #[error("failed to create HTTP client: {message}")]
    HttpClient { message: String },
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new Unreadable error
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Unreadable {
            path: path.into(),
            source,
        }
    }
}

impl RegistryError {
    /// Creates a new NotFound error
    pub fn not_found(slug: impl Into<String>) -> Self {
        RegistryError::NotFound { slug: slug.into() }
    }

    /// Creates a new NetworkError
    pub fn network_error(slug: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::NetworkError {
            slug: slug.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(slug: impl Into<String>, message: impl Into<String>) -> Self {
        RegistryError::InvalidResponse {
            slug: slug.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(slug: impl Into<String>) -> Self {
        RegistryError::Timeout { slug: slug.into() }
    }

    /// Returns true for the not-found class (as opposed to transient failures)
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound { .. })
    }

    /// Returns true for failures that might succeed on a later attempt
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RegistryError::NetworkError { .. }
                | RegistryError::RateLimitExceeded { .. }
                | RegistryError::Timeout { .. }
        )
    }
}
