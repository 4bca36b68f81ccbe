//! HTTP client shared foundation
//!
//! This module provides a shared HTTP client with:
//! - Configurable timeout and User-Agent
//! - Optional exponential backoff retry for transient failures (off by default)
//! - Status code mapping to registry errors

use crate::error::{ConfigError, RegistryError};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default User-Agent header
pub const DEFAULT_USER_AGENT: &str = concat!("puppetfile-check/", env!("CARGO_PKG_VERSION"));

/// Base delay for exponential backoff (in milliseconds)
const BASE_DELAY_MS: u64 = 100;

/// HTTP client wrapper with optional retry logic
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_retries: u32,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_config(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT)
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(timeout: Duration, user_agent: &str) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| ConfigError::HttpClient {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            max_retries: 0,
        })
    }

    /// Set the maximum number of retries for transient failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Maximum number of retries for transient failures
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Perform a GET request, mapping HTTP failures to registry errors
    pub async fn get(&self, url: &str, slug: &str) -> Result<reqwest::Response, RegistryError> {
        let mut delay = BASE_DELAY_MS;
        let mut attempt = 0;

        loop {
            debug!(url, attempt, "GET");
            let error = match self.client.get(url).send().await {
                Ok(response) => match response.status() {
                    status if status.is_success() => return Ok(response),
                    StatusCode::NOT_FOUND => RegistryError::not_found(slug),
                    StatusCode::TOO_MANY_REQUESTS => RegistryError::RateLimitExceeded {
                        slug: slug.to_string(),
                    },
                    status => RegistryError::network_error(slug, format!("HTTP {}", status)),
                },
                Err(e) if e.is_timeout() => RegistryError::timeout(slug),
                Err(e) => RegistryError::network_error(slug, e.to_string()),
            };

            if !error.is_transient() || attempt >= self.max_retries {
                return Err(error);
            }

            debug!(url, delay_ms = delay, "retrying after: {}", error);
            tokio::time::sleep(Duration::from_millis(delay)).await;
            delay *= 2;
            attempt += 1;
        }
    }

    /// Perform a GET request and parse the JSON response
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        slug: &str,
    ) -> Result<T, RegistryError> {
        let response = self.get(url, slug).await?;
        response.json::<T>().await.map_err(|e| {
            RegistryError::invalid_response(slug, format!("failed to parse JSON: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        version: String,
    }

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.max_retries(), 0);
    }

    #[test]
    fn test_http_client_with_max_retries() {
        let client = HttpClient::new().unwrap().with_max_retries(5);
        assert_eq!(client.max_retries(), 5);
    }

    #[test]
    fn test_default_constants() {
        assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
        assert!(DEFAULT_USER_AGENT.starts_with("puppetfile-check/"));
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/thing")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version":"1.2.3"}"#)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let payload: Payload = client
            .get_json(&format!("{}/thing", server.url()), "thing")
            .await
            .unwrap();

        assert_eq!(payload.version, "1.2.3");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_maps_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get(&format!("{}/missing", server.url()), "missing")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_maps_server_error_without_retry() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/flaky")
            .with_status(503)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get(&format!("{}/flaky", server.url()), "flaky")
            .await
            .unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("503"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_retries_when_configured() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/limited")
            .with_status(429)
            .expect(3)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap().with_max_retries(2);
        let err = client
            .get(&format!("{}/limited", server.url()), "limited")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::RateLimitExceeded { .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_does_not_retry_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/gone")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new().unwrap().with_max_retries(3);
        let err = client
            .get(&format!("{}/gone", server.url()), "gone")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_json_invalid_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/garbage")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpClient::new().unwrap();
        let err = client
            .get_json::<Payload>(&format!("{}/garbage", server.url()), "garbage")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidResponse { .. }));
    }
}
