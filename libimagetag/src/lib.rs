//! imagetag - Container Image Tag Lister Library
//!
//! Lists the tags of an image held in a Docker Registry HTTP API v2
//! registry, negotiating whatever authentication the registry asks for.
//!
//! # Quick Start
//!
//! ```no_run
//! use libimagetag::{Credentials, TagQuery, list_tags};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let query = TagQuery::new("library/alpine", "https://registry-1.docker.io")
//!         .with_filter(r"\d+\.\d+\.\d+");
//!
//!     let result = list_tags(&query, &Credentials::anonymous())?;
//!     if let Some(message) = &result.error_message {
//!         eprintln!("listing failed: {}", message);
//!     }
//!     for tag in result.tags {
//!         println!("{}", tag);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - **Challenge detection**: Reads the `WWW-Authenticate` header of `/v2/`
//! - **Basic and Bearer authentication**: Including the token exchange with
//!   the realm advertised by the registry
//! - **Filtering**: Full-match regular expressions over tag names
//! - **Version ordering**: Numeric-aware ordering, newest first by default
//!
//! # Main Types
//!
//! - [`TagLister`] - Runs listings with a fixed client configuration
//! - [`TagQuery`] / [`TagResult`] - Input and outcome of one listing
//! - [`Credentials`] - Optional username and password
//! - [`AuthChallenge`] - What a registry asked the client to do
//! - [`TagOrder`] - Newest-first or oldest-first ordering

#![warn(clippy::all)]

/// Returns the libimagetag crate version.
///
/// # Examples
///
/// ```
/// let version = libimagetag::version();
/// assert!(!version.is_empty());
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub use auth::{AuthChallenge, AuthScheme, Credentials};
pub use client::{ClientConfig, RegistryHttpClient};
pub use config::Config;
pub use error::{ErrorKind, ImageTagError, Result};
pub use filter::TagFilter;
pub use lister::{TagLister, TagQuery, TagResult, list_tags};
pub use token::Authorization;
pub use version::{TagOrder, Version, compare, sort_tags};

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod lister;
pub mod token;
pub mod version;
