//! Tag listing: the full probe → authenticate → fetch → filter → order flow.
//!
//! Every listing builds its own [`RegistryHttpClient`] and drops it when done;
//! nothing is shared between calls. Steps run strictly one after another and
//! each request is attempted once.
//!
//! Failures after the filter has been compiled never escape as `Err`. They
//! end up in [`TagResult::error_message`] next to an empty tag list, except
//! for an unrecognized challenge, which yields an empty list and no message.

use crate::auth::{AuthChallenge, Credentials};
use crate::client::{ClientConfig, RegistryHttpClient};
use crate::config::{Config, DEFAULT_REGISTRY};
use crate::error::{ImageTagError, Result};
use crate::filter::TagFilter;
use crate::token::TokenProvider;
use crate::version::{TagOrder, sort_tags};
use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests;

/// What to list and how to present it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    /// Repository name, e.g. `library/alpine`
    pub image: String,
    /// Registry base URL; blank means the lister's default registry
    pub registry_url: String,
    /// Regex that a tag must match in full; empty means everything
    pub filter_pattern: String,
    /// `false` lists the newest version first, `true` the oldest
    pub reverse_order: bool,
}

impl TagQuery {
    /// Creates a query that keeps every tag, newest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::TagQuery;
    ///
    /// let query = TagQuery::new("library/alpine", "https://registry-1.docker.io")
    ///     .with_filter(r"\d+\.\d+")
    ///     .with_reverse_order(true);
    /// assert!(query.reverse_order);
    /// ```
    pub fn new(image: impl Into<String>, registry_url: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            registry_url: registry_url.into(),
            filter_pattern: String::new(),
            reverse_order: false,
        }
    }

    pub fn with_filter(mut self, pattern: impl Into<String>) -> Self {
        self.filter_pattern = pattern.into();
        self
    }

    pub fn with_reverse_order(mut self, reverse: bool) -> Self {
        self.reverse_order = reverse;
        self
    }

    pub fn with_order(self, order: TagOrder) -> Self {
        self.with_reverse_order(order.is_reversed())
    }

    pub fn order(&self) -> TagOrder {
        TagOrder::from_reverse(self.reverse_order)
    }
}

/// Outcome of a listing.
///
/// `error_message` is set when a step failed; `tags` is then empty. An empty
/// `tags` without a message means nothing matched (or the registry asked for
/// an authentication scheme that is not supported).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResult {
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TagResult {
    pub fn with_tags(tags: Vec<String>) -> Self {
        Self {
            tags,
            error_message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            tags: Vec::new(),
            error_message: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error_message
            .as_deref()
            .is_some_and(|message| !message.is_empty())
    }
}

/// Runs tag listings with a fixed client configuration.
#[derive(Debug, Clone)]
pub struct TagLister {
    client_config: ClientConfig,
    default_registry: String,
}

impl Default for TagLister {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl TagLister {
    pub fn new(client_config: ClientConfig) -> Self {
        Self {
            client_config,
            default_registry: DEFAULT_REGISTRY.to_string(),
        }
    }

    /// Builds a lister from the network and registry sections of `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.client_config()).with_default_registry(&config.registry.default_url)
    }

    pub fn with_default_registry(mut self, registry_url: impl Into<String>) -> Self {
        self.default_registry = registry_url.into();
        self
    }

    pub fn default_registry(&self) -> &str {
        &self.default_registry
    }

    /// Lists the tags of `query.image`, filtered and ordered.
    ///
    /// # Errors
    ///
    /// Only problems found before any request is sent are returned as `Err`:
    /// a malformed filter pattern or an unusable registry URL. Everything
    /// else is reported through [`TagResult::error_message`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libimagetag::{Credentials, TagLister, TagQuery};
    ///
    /// let query = TagQuery::new("library/alpine", "https://registry-1.docker.io")
    ///     .with_filter(r"\d+\.\d+\.\d+");
    /// let result = TagLister::default().list_tags(&query, &Credentials::anonymous())?;
    /// for tag in &result.tags {
    ///     println!("{}", tag);
    /// }
    /// # Ok::<(), libimagetag::ImageTagError>(())
    /// ```
    #[tracing::instrument(skip_all, fields(image = %query.image, registry = %query.registry_url))]
    pub fn list_tags(&self, query: &TagQuery, credentials: &Credentials) -> Result<TagResult> {
        let filter = TagFilter::new(&query.filter_pattern)?;
        let client = self.client_for(&query.registry_url)?;

        let result = match Self::fetch_raw_tags(&client, &query.image, credentials) {
            Ok(raw_tags) => {
                let mut tags = filter.apply(raw_tags);
                sort_tags(&mut tags, query.order());
                tracing::debug!(count = tags.len(), order = %query.order(), "tags listed");
                TagResult::with_tags(tags)
            }
            Err(e) if !e.is_fatal() => {
                tracing::debug!(reason = %e, "no usable authentication scheme, returning no tags");
                TagResult::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "tag listing failed");
                TagResult::failed(e.to_string())
            }
        };

        Ok(result)
    }

    /// Probes a registry and returns the challenge it advertises.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an unusable URL and `Network` when the
    /// registry cannot be reached.
    pub fn detect_challenge(&self, registry_url: &str) -> Result<AuthChallenge> {
        let client = self.client_for(registry_url)?;
        let header = client.probe()?;
        Ok(AuthChallenge::from_header(header.as_deref()))
    }

    fn client_for(&self, registry_url: &str) -> Result<RegistryHttpClient> {
        let registry_url = if registry_url.trim().is_empty() {
            self.default_registry.as_str()
        } else {
            registry_url
        };
        RegistryHttpClient::with_config(registry_url, &self.client_config)
    }

    /// Probe, classify, authenticate and fetch. Unfiltered and unordered.
    fn fetch_raw_tags(
        client: &RegistryHttpClient,
        image: &str,
        credentials: &Credentials,
    ) -> Result<Vec<String>> {
        let header = client.probe()?;
        let challenge = AuthChallenge::from_header(header.as_deref());

        if challenge.is_unknown() {
            return Err(ImageTagError::challenge_unrecognized(format!(
                "{} advertised no supported authentication scheme",
                client.registry_url()
            )));
        }

        let authorization = TokenProvider::new(client).obtain_token(&challenge, image, credentials)?;
        client.fetch_tags(image, &authorization.header_value())
    }
}

/// Lists tags with default client settings.
///
/// Shorthand for `TagLister::default().list_tags(query, credentials)`.
pub fn list_tags(query: &TagQuery, credentials: &Credentials) -> Result<TagResult> {
    TagLister::default().list_tags(query, credentials)
}
