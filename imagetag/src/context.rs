//! Application context that holds resolved configuration
//!
//! The context is built following the precedence order:
//! 1. Default values
//! 2. Config file values
//! 3. Environment variables
//! 4. CLI flags
//!
//! Once built, the context is passed as read-only throughout the application.

use crate::format::ColorChoice;
use libimagetag::Config;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "IMAGETAG_CONFIG";

/// Environment variable overriding the color choice
pub const COLOR_ENV: &str = "IMAGETAG_COLOR";

/// Application context with resolved configuration and runtime state
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Resolved library configuration
    pub config: Config,
    /// Resolved color choice
    pub color: ColorChoice,
}

impl AppContext {
    /// Build context with precedence: defaults > config file > env vars > CLI flags
    ///
    /// Fails when an explicitly named config file is missing or invalid.
    pub fn build(cli_color: ColorChoice, cli_config: Option<&Path>) -> Result<Self, String> {
        let env_config = env::var(CONFIG_ENV).ok();
        let path = select_config_path(cli_config, env_config.as_deref(), default_config_path());
        tracing::debug!(path = ?path, "resolved config file");

        // Config::load layers defaults, the file and IMAGETAG_* variables
        let config = Config::load(path.as_deref()).map_err(|e| e.to_string())?;

        let env_color = env::var(COLOR_ENV).ok();
        let color = select_color(cli_color, env_color.as_deref());

        Ok(Self { config, color })
    }

    /// Context with default configuration, used by tests.
    #[cfg(test)]
    pub fn with_defaults(color: ColorChoice) -> Self {
        Self {
            config: Config::default(),
            color,
        }
    }
}

/// Default config location: `<config_dir>/imagetag/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("imagetag").join("config.yaml"))
}

/// Picks the config file to read.
///
/// An explicit path (flag or environment) is always returned so that a
/// missing file is reported. The default path is only used when it exists.
pub fn select_config_path(
    cli_path: Option<&Path>,
    env_path: Option<&str>,
    default_path: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|p| !p.trim().is_empty()) {
        return Some(PathBuf::from(path));
    }
    default_path.filter(|p| p.exists())
}

/// `--color` wins unless left at `auto`, then the environment, then `auto`.
pub fn select_color(cli_color: ColorChoice, env_color: Option<&str>) -> ColorChoice {
    if cli_color != ColorChoice::Auto {
        return cli_color;
    }
    env_color.map(ColorChoice::from).unwrap_or(ColorChoice::Auto)
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
