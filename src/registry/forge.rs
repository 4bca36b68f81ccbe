//! Puppet Forge API adapter
//!
//! Fetches module and release metadata from the Forge v3 API.
//! API endpoints:
//! - https://forgeapi.puppet.com/v3/modules/{owner}-{name}
//! - https://forgeapi.puppet.com/v3/releases/{owner}-{name}-{version}

use crate::domain::{
    DependencyConstraint, NormalizedVersion, RegistryModuleInfo, RegistryReleaseInfo,
};
use crate::error::{ConfigError, RegistryError};
use crate::registry::{HttpClient, RegistryGateway};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Puppet Forge API base URL
pub const FORGE_API_URL: &str = "https://forgeapi.puppet.com";

/// Requirement the Forge assumes when a dependency omits one
const DEFAULT_REQUIREMENT: &str = ">= 0.0.0";

/// Forge module response
#[derive(Debug, Deserialize)]
struct ForgeModuleResponse {
    /// Latest release, absent for modules that were never released
    #[serde(default)]
    current_release: Option<ForgeRelease>,
}

/// Forge release, either nested in a module or returned on its own
#[derive(Debug, Deserialize)]
struct ForgeRelease {
    version: String,
    #[serde(default)]
    created_at: Option<String>,
    #[serde(default)]
    metadata: Option<ForgeMetadata>,
}

/// The `metadata.json` of a release
#[derive(Debug, Default, Deserialize)]
struct ForgeMetadata {
    #[serde(default)]
    dependencies: Vec<ForgeDependency>,
}

#[derive(Debug, Deserialize)]
struct ForgeDependency {
    name: String,
    #[serde(default)]
    version_requirement: Option<String>,
}

impl ForgeDependency {
    fn into_constraint(self) -> DependencyConstraint {
        let requirement = self
            .version_requirement
            .unwrap_or_else(|| DEFAULT_REQUIREMENT.to_string());
        DependencyConstraint::new(&self.name, requirement)
    }
}

fn constraints(metadata: ForgeMetadata) -> Vec<DependencyConstraint> {
    metadata
        .dependencies
        .into_iter()
        .map(ForgeDependency::into_constraint)
        .collect()
}

/// Parse a Forge timestamp such as `2024-01-15 10:25:38 -0700`
fn parse_forge_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn parse_version(slug: &str, raw: &str) -> Result<NormalizedVersion, RegistryError> {
    NormalizedVersion::parse(raw).map_err(|e| RegistryError::invalid_response(slug, e.to_string()))
}

/// Puppet Forge adapter
pub struct ForgeAdapter {
    client: HttpClient,
    base_url: String,
}

impl ForgeAdapter {
    /// Create a Forge adapter against a custom base URL
    pub fn new(client: HttpClient, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a Forge adapter after checking the base URL is absolute http(s)
    pub fn with_base_url(client: HttpClient, base_url: &str) -> Result<Self, ConfigError> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| ConfigError::InvalidForgeUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidForgeUrl {
                url: base_url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }
        Ok(Self::new(client, base_url))
    }

    /// Create a Forge adapter against the public Forge
    pub fn public(client: HttpClient) -> Self {
        Self::new(client, FORGE_API_URL)
    }

    /// Build the URL for a module
    fn module_url(&self, slug: &str) -> String {
        format!("{}/v3/modules/{}", self.base_url, slug)
    }

    /// Build the URL for a release
    fn release_url(&self, release_id: &str) -> String {
        format!("{}/v3/releases/{}", self.base_url, release_id)
    }
}

#[async_trait]
impl RegistryGateway for ForgeAdapter {
    fn registry_name(&self) -> &'static str {
        "Puppet Forge"
    }

    async fn fetch_module(&self, slug: &str) -> Result<RegistryModuleInfo, RegistryError> {
        let response: ForgeModuleResponse =
            self.client.get_json(&self.module_url(slug), slug).await?;

        let release = response
            .current_release
            .ok_or_else(|| RegistryError::NoCurrentRelease {
                slug: slug.to_string(),
            })?;

        Ok(RegistryModuleInfo {
            slug: slug.to_string(),
            latest_version: parse_version(slug, &release.version)?,
            latest_released_at: release.created_at.as_deref().and_then(parse_forge_timestamp),
            dependencies: release.metadata.map(constraints),
        })
    }

    async fn fetch_release(&self, release_id: &str) -> Result<RegistryReleaseInfo, RegistryError> {
        let release: ForgeRelease = self
            .client
            .get_json(&self.release_url(release_id), release_id)
            .await?;

        Ok(RegistryReleaseInfo {
            slug: release_id.to_string(),
            version: parse_version(release_id, &release.version)?,
            dependencies: release.metadata.map(constraints).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Server;

    fn adapter(base_url: &str) -> ForgeAdapter {
        ForgeAdapter::new(HttpClient::new().unwrap(), base_url)
    }

    #[test]
    fn test_build_urls() {
        let forge = ForgeAdapter::public(HttpClient::new().unwrap());
        assert_eq!(
            forge.module_url("puppetlabs-stdlib"),
            "https://forgeapi.puppet.com/v3/modules/puppetlabs-stdlib"
        );
        assert_eq!(
            forge.release_url("puppetlabs-stdlib-9.4.1"),
            "https://forgeapi.puppet.com/v3/releases/puppetlabs-stdlib-9.4.1"
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let forge = adapter("http://localhost:1234/");
        assert_eq!(
            forge.module_url("a-b"),
            "http://localhost:1234/v3/modules/a-b"
        );
    }

    #[test]
    fn test_with_base_url_validation() {
        let client = || HttpClient::new().unwrap();
        assert!(ForgeAdapter::with_base_url(client(), "http://127.0.0.1:8080").is_ok());
        assert!(matches!(
            ForgeAdapter::with_base_url(client(), "forgeapi.puppet.com"),
            Err(ConfigError::InvalidForgeUrl { .. })
        ));
        assert!(matches!(
            ForgeAdapter::with_base_url(client(), "ftp://forge.example.com"),
            Err(ConfigError::InvalidForgeUrl { .. })
        ));
    }

    #[test]
    fn test_parse_forge_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 15, 17, 25, 38).unwrap();
        assert_eq!(
            parse_forge_timestamp("2024-01-15 10:25:38 -0700"),
            Some(expected)
        );
        assert_eq!(
            parse_forge_timestamp("2024-01-15T17:25:38Z"),
            Some(expected)
        );
        assert_eq!(parse_forge_timestamp("yesterday"), None);
    }

    #[tokio::test]
    async fn test_fetch_module() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/v3/modules/puppetlabs-apache")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "slug": "puppetlabs-apache",
                    "current_release": {
                        "version": "12.1.0",
                        "created_at": "2024-03-01 08:00:00 -0800",
                        "metadata": {
                            "dependencies": [
                                {"name": "puppetlabs/stdlib", "version_requirement": ">= 9.0.0 < 10.0.0"},
                                {"name": "puppetlabs/concat"}
                            ]
                        }
                    }
                }"#,
            )
            .create_async()
            .await;

        let info = adapter(&server.url())
            .fetch_module("puppetlabs-apache")
            .await
            .unwrap();

        assert_eq!(info.slug, "puppetlabs-apache");
        assert_eq!(info.latest_version.as_str(), "12.1.0");
        assert!(info.latest_released_at.is_some());
        let deps = info.dependencies.unwrap();
        assert_eq!(deps.len(), 2);
        assert_eq!(deps[0].dependency_name, "puppetlabs-stdlib");
        assert_eq!(deps[0].requirement, ">= 9.0.0 < 10.0.0");
        assert_eq!(deps[1].dependency_name, "puppetlabs-concat");
        assert_eq!(deps[1].requirement, ">= 0.0.0");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_module_without_current_release() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/modules/someone-empty")
            .with_status(200)
            .with_body(r#"{"slug": "someone-empty", "current_release": null}"#)
            .create_async()
            .await;

        let err = adapter(&server.url())
            .fetch_module("someone-empty")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NoCurrentRelease { .. }));
    }

    #[tokio::test]
    async fn test_fetch_module_with_invalid_version() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/modules/someone-odd")
            .with_status(200)
            .with_body(r#"{"current_release": {"version": "1.0"}}"#)
            .create_async()
            .await;

        let err = adapter(&server.url())
            .fetch_module("someone-odd")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_module_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/modules/nobody-nothing")
            .with_status(404)
            .with_body(r#"{"message": "404 Not Found"}"#)
            .create_async()
            .await;

        let err = adapter(&server.url())
            .fetch_module("nobody-nothing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_release() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/releases/puppetlabs-apache-11.0.0")
            .with_status(200)
            .with_body(
                r#"{
                    "slug": "puppetlabs-apache-11.0.0",
                    "version": "11.0.0",
                    "metadata": {
                        "dependencies": [
                            {"name": "puppetlabs/stdlib", "version_requirement": ">= 4.13.1 < 9.0.0"}
                        ]
                    }
                }"#,
            )
            .create_async()
            .await;

        let release = adapter(&server.url())
            .fetch_release("puppetlabs-apache-11.0.0")
            .await
            .unwrap();

        assert_eq!(release.version.as_str(), "11.0.0");
        assert_eq!(release.dependencies.len(), 1);
        assert_eq!(release.dependencies[0].dependency_name, "puppetlabs-stdlib");
    }

    #[tokio::test]
    async fn test_fetch_release_without_metadata() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/v3/releases/a-b-1.0.0")
            .with_status(200)
            .with_body(r#"{"version": "1.0.0"}"#)
            .create_async()
            .await;

        let release = adapter(&server.url())
            .fetch_release("a-b-1.0.0")
            .await
            .unwrap();
        assert!(release.dependencies.is_empty());
    }
}
