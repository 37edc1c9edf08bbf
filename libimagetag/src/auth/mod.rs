//! Authentication handling for Docker Registry HTTP API v2.
//!
//! A registry advertises how it wants to be authenticated through the
//! `WWW-Authenticate` header of an unauthenticated `GET /v2/`. This module
//! turns that header into an [`AuthChallenge`] and holds the caller supplied
//! [`Credentials`] that will later be traded for an authorization value.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;


static BEARER_PARAMS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Bearer realm="([^"]+)",service="([^"]+)""#)
        .expect("bearer challenge pattern is valid")
});

/// Username/password pair supplied by the caller.
///
/// Both fields may be empty, which means anonymous access. The password is
/// never printed by the `Debug` implementation.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Creates anonymous credentials (empty username and password).
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::auth::Credentials;
    ///
    /// let creds = Credentials::anonymous();
    /// assert!(creds.is_anonymous());
    /// ```
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Creates credentials from a username and password.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::auth::Credentials;
    ///
    /// let creds = Credentials::basic("username", "password");
    /// assert_eq!(creds.username(), "username");
    /// ```
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Builds credentials from optional values, treating `None` as empty.
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// True when neither a username nor a password was supplied.
    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty()
    }

    /// True when both username and password are non-empty, i.e. they can be
    /// sent as HTTP Basic auth to a token realm.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authentication scheme advertised by a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    Basic,
    Bearer,
    Unknown,
}

impl AuthScheme {
    /// The scheme name as it appears in HTTP headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "Basic",
            Self::Bearer => "Bearer",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information parsed from a `WWW-Authenticate` header.
///
/// A `Bearer` challenge always carries both its realm and service; a header
/// that announces Bearer without both parameters is classified as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthChallenge {
    /// HTTP Basic: credentials are sent directly with every request.
    Basic,
    /// Token authentication: credentials are exchanged at `realm` first.
    Bearer {
        /// Token endpoint URL
        realm: String,
        /// Service identifier passed to the token endpoint
        service: String,
    },
    /// Missing header, unsupported scheme or malformed Bearer parameters.
    Unknown,
}

impl AuthChallenge {
    /// Parses a `WWW-Authenticate` header value.
    ///
    /// The first whitespace-delimited token is the scheme. `Basic` ignores any
    /// parameters. `Bearer` requires `realm="..."` and `service="..."` in that
    /// order, comma separated, as standard registries emit them.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::auth::{AuthChallenge, AuthScheme};
    ///
    /// let header = r#"Bearer realm="https://auth.example.com/token",service="registry""#;
    /// let challenge = AuthChallenge::parse(header);
    /// assert_eq!(challenge.scheme(), AuthScheme::Bearer);
    /// assert_eq!(challenge.realm(), Some("https://auth.example.com/token"));
    ///
    /// assert_eq!(AuthChallenge::parse(""), AuthChallenge::Unknown);
    /// ```
    pub fn parse(header: &str) -> Self {
        let scheme = header.split_whitespace().next().unwrap_or_default();

        match scheme {
            "Basic" => {
                tracing::info!(scheme = "Basic", "registry requires basic authentication");
                Self::Basic
            }
            "Bearer" => match BEARER_PARAMS.captures(header) {
                Some(caps) => {
                    let realm = caps[1].to_string();
                    let service = caps[2].to_string();
                    tracing::info!(
                        scheme = "Bearer",
                        realm = %realm,
                        service = %service,
                        "registry requires token authentication"
                    );
                    Self::Bearer { realm, service }
                }
                None => {
                    tracing::warn!(
                        header = %header,
                        "bearer challenge is missing realm or service, no token service available"
                    );
                    Self::Unknown
                }
            },
            other => {
                tracing::warn!(received = %other, "unknown authorization type");
                Self::Unknown
            }
        }
    }

    /// Parses an optional header, treating `None` as an empty header.
    pub fn from_header(header: Option<&str>) -> Self {
        Self::parse(header.unwrap_or_default())
    }

    pub fn scheme(&self) -> AuthScheme {
        match self {
            Self::Basic => AuthScheme::Basic,
            Self::Bearer { .. } => AuthScheme::Bearer,
            Self::Unknown => AuthScheme::Unknown,
        }
    }

    pub fn realm(&self) -> Option<&str> {
        match self {
            Self::Bearer { realm, .. } => Some(realm),
            _ => None,
        }
    }

    pub fn service(&self) -> Option<&str> {
        match self {
            Self::Bearer { service, .. } => Some(service),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}
