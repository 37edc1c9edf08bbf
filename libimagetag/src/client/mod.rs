//! HTTP client for Docker Registry HTTP API v2 communication.
//!
//! This module provides a thin blocking HTTP client built on reqwest. It knows
//! the three requests needed to list tags: the unauthenticated probe of
//! `/v2/`, the bearer token exchange at a realm, and `/v2/<image>/tags/list`.
//! It surfaces statuses, headers and bodies and leaves every decision to the
//! caller.

use crate::auth::Credentials;
use crate::error::{ImageTagError, Result};
use reqwest::StatusCode;
use reqwest::blocking::{Client as ReqwestClient, Response};
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use serde::Deserialize;
use std::time::Duration;


/// Response from the tags list API endpoint.
///
/// Some registries answer `"tags": null` for a repository without tags.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Option<Vec<String>>,
}

/// Configuration for the HTTP client.
///
/// # Examples
///
/// ```
/// use libimagetag::client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(60)
///     .with_user_agent("my-tool/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_seconds: u64,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("imagetag/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Creates a new configuration with default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::client::ClientConfig;
    ///
    /// let config = ClientConfig::new();
    /// assert_eq!(config.timeout_seconds, 30);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request timeout in seconds.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Sets the User-Agent header value.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// HTTP client for one registry.
///
/// A client is meant to live for a single listing call: it keeps no idle
/// connections and no cookies, so dropping it tears everything down.
#[derive(Debug)]
pub struct RegistryHttpClient {
    /// The underlying HTTP client
    http_client: ReqwestClient,
    /// Base registry URL (e.g., "https://registry.example.com")
    registry_url: String,
    /// Timeout used to build the client, kept for error messages
    timeout_seconds: u64,
}

impl RegistryHttpClient {
    /// Creates a new client for the specified registry URL with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::client::RegistryHttpClient;
    ///
    /// let client = RegistryHttpClient::new("registry.example.com").unwrap();
    /// assert_eq!(client.registry_url(), "https://registry.example.com");
    /// ```
    pub fn new(registry_url: &str) -> Result<Self> {
        Self::with_config(registry_url, &ClientConfig::default())
    }

    /// Creates a new client for the specified registry URL with custom configuration.
    pub fn with_config(registry_url: &str, config: &ClientConfig) -> Result<Self> {
        let normalized_url = Self::normalize_url(registry_url)?;

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .pool_max_idle_per_host(0)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ImageTagError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            http_client,
            registry_url: normalized_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// Normalizes a registry URL by ensuring it has a scheme and removing trailing slashes.
    pub fn normalize_url(url: &str) -> Result<String> {
        let url = url.trim();

        if url.is_empty() {
            return Err(ImageTagError::validation("Registry URL cannot be empty"));
        }

        // Assume https when no scheme is given
        let (scheme, rest) = if let Some(rest) = url.strip_prefix("https://") {
            ("https://", rest)
        } else if let Some(rest) = url.strip_prefix("http://") {
            ("http://", rest)
        } else {
            ("https://", url)
        };

        let host = rest.trim_end_matches('/');
        if host.is_empty() {
            return Err(ImageTagError::validation(format!(
                "Registry URL '{}' has no host",
                url
            )));
        }

        Ok(format!("{}{}", scheme, host))
    }

    /// Returns the base registry URL.
    pub fn registry_url(&self) -> &str {
        &self.registry_url
    }

    /// Probes `GET /v2/` without credentials and returns the
    /// `WWW-Authenticate` header, if any.
    ///
    /// The status code is not judged: a registry demanding authentication
    /// answers 401, an open one 200, and both are useful answers.
    ///
    /// # Errors
    ///
    /// Returns a network error if the registry cannot be reached.
    pub fn probe(&self) -> Result<Option<String>> {
        let url = format!("{}/v2/", self.registry_url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .map_err(|e| self.translate_reqwest_error(e, &url))?;

        tracing::debug!(url = %url, status = %response.status(), "probed registry");

        Ok(response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string()))
    }

    /// Requests a pull token for `image` from a bearer `realm`.
    ///
    /// Sends `service` and `scope=repository:<image>:pull` as query
    /// parameters. Complete credentials are attached as HTTP Basic auth;
    /// otherwise the exchange is anonymous. Returns the parsed JSON body.
    ///
    /// # Errors
    ///
    /// - `TokenExchangeFailed` on a non-success status
    /// - `Validation` if the body is not JSON
    /// - `Network` if the realm is unreachable
    pub fn request_token(
        &self,
        realm: &str,
        service: &str,
        image: &str,
        credentials: &Credentials,
    ) -> Result<serde_json::Value> {
        let scope = format!("repository:{}:pull", image);

        let mut request = self
            .http_client
            .get(realm)
            .query(&[("service", service), ("scope", scope.as_str())]);

        if credentials.is_complete() {
            tracing::info!("using basic authentication to fetch token");
            request = request.basic_auth(credentials.username(), Some(credentials.password()));
        }

        let response = request
            .send()
            .map_err(|e| self.translate_reqwest_error(e, realm))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(realm = %realm, status = %status, "token request failed, token was not received");
            return Err(ImageTagError::token_exchange(
                format!("token request to {} responded with HTTP status {}", realm, status),
                Some(status.as_u16()),
            ));
        }

        response.json().map_err(|e| {
            ImageTagError::validation_with_source("Failed to parse token response", e)
        })
    }

    /// Fetches the raw tag names of `image`.
    ///
    /// `authorization` is sent verbatim as the `Authorization` header, e.g.
    /// `Bearer <token>`.
    ///
    /// # Errors
    ///
    /// - `TagFetchFailed` on a non-success status, carrying the status text
    /// - `Validation` if the body is not a tags list
    /// - `Network` if the registry is unreachable
    pub fn fetch_tags(&self, image: &str, authorization: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/{}/tags/list", self.registry_url, image);

        let response = self
            .http_client
            .get(&url)
            .header(AUTHORIZATION, authorization)
            .send()
            .map_err(|e| self.translate_reqwest_error(e, &url))?;

        let response = Self::check_tags_status(response)?;

        let tags_response: TagsResponse = response.json().map_err(|e| {
            ImageTagError::validation_with_source("Failed to parse tags response", e)
        })?;

        Ok(tags_response.tags.unwrap_or_default())
    }

    /// Translates a reqwest error into an `ImageTagError`.
    fn translate_reqwest_error(&self, error: reqwest::Error, url: &str) -> ImageTagError {
        if error.is_timeout() {
            ImageTagError::network(format!(
                "Request to {} timed out after {} seconds",
                url, self.timeout_seconds
            ))
        } else if error.is_connect() {
            ImageTagError::network_with_source(format!("Failed to connect to {}", url), error)
        } else if error.is_request() {
            ImageTagError::network_with_source(format!("Failed to send request to {}", url), error)
        } else {
            ImageTagError::network_with_source(
                format!("Network error communicating with {}", url),
                error,
            )
        }
    }

    /// Checks the status of a tags list response.
    fn check_tags_status(response: Response) -> Result<Response> {
        let status: StatusCode = response.status();

        if status.is_success() {
            tracing::info!(status = %status, "tags list received");
            return Ok(response);
        }

        tracing::warn!(url = %response.url(), status = %status, "image tags request failed");
        Err(ImageTagError::tag_fetch(
            format!("image tags request responded with HTTP status {}", status),
            status.as_u16(),
        ))
    }
}
