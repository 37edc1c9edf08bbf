//! Library configuration.
//!
//! Defaults, then an optional YAML file, then `IMAGETAG_*` environment
//! variables (`IMAGETAG_NETWORK__TIMEOUT=60`, `IMAGETAG_REGISTRY__DEFAULT_URL=...`).

use crate::client::ClientConfig;
use crate::error::{ImageTagError, Result};
use crate::filter::MATCH_ALL;
use crate::version::TagOrder;
use config::{Config as ConfigRs, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;


/// Registry used when the caller names none.
pub const DEFAULT_REGISTRY: &str = "https://registry-1.docker.io";

/// Prefix of the environment variables read by [`Config::load`].
pub const ENV_PREFIX: &str = "IMAGETAG";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: Registry,
    #[serde(default)]
    pub network: Network,
}

impl Config {
    /// Parses a `Config` from a YAML string.
    ///
    /// This function is primarily used for testing.
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(s, FileFormat::Yaml));

        Self::from_builder(builder)
    }

    /// Loads a `Config` from an optional YAML file and the environment.
    ///
    /// A given path must exist. Without a path only defaults and environment
    /// variables apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_environment(path, Self::environment())
    }

    fn load_with_environment(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(p) = path {
            if !p.exists() {
                return Err(ImageTagError::config(
                    "Configuration file does not exist".to_string(),
                    Some(p.display().to_string()),
                ));
            }
            builder = builder.add_source(File::from(p).format(FileFormat::Yaml).required(true));
        }

        Self::from_builder(builder.add_source(environment))
    }

    fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = ConfigRs::try_from(&Config::default()).map_err(|e| {
            ImageTagError::config_with_source(
                "Failed to build default configuration",
                None::<String>,
                e,
            )
        })?;
        Ok(ConfigRs::builder().add_source(defaults))
    }

    /// Creates a `Config` from a `config::ConfigBuilder`.
    fn from_builder(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        builder
            .build()
            .and_then(|cfg| cfg.try_deserialize())
            .map_err(|e| {
                ImageTagError::config_with_source(
                    "Failed to deserialize configuration",
                    None::<String>,
                    e,
                )
            })
    }

    /// HTTP client settings derived from the network section.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new()
            .with_timeout(self.network.timeout)
            .with_user_agent(self.network.user_agent.clone())
    }
}

/// Defaults applied to tag queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registry {
    #[serde(default = "default_registry_url")]
    pub default_url: String,

    #[serde(default = "default_filter")]
    pub default_filter: String,

    #[serde(default)]
    pub default_order: TagOrder,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            default_url: default_registry_url(),
            default_filter: default_filter(),
            default_order: TagOrder::default(),
        }
    }
}

fn default_registry_url() -> String {
    DEFAULT_REGISTRY.to_string()
}

fn default_filter() -> String {
    MATCH_ALL.to_string()
}

/// Network settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Network {
    /// Per-request timeout in seconds
    #[serde(default = "default_network_timeout")]
    pub timeout: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Network {
    fn default() -> Self {
        Self {
            timeout: default_network_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_network_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("imagetag/{}", env!("CARGO_PKG_VERSION"))
}
