//! Error types for imagetag
//!
//! Every failure the tag listing pipeline can run into is described by
//! [`ImageTagError`]. Most of them never escape [`crate::list_tags`]: they are
//! folded into the `error_message` of a [`crate::TagResult`]. Only problems
//! detectable before any network I/O (a malformed filter pattern, an unusable
//! registry URL) are returned as `Err`.

use thiserror::Error;


/// Main error type for imagetag operations
#[derive(Error, Debug)]
pub enum ImageTagError {
    /// The registry advertised an authentication challenge we cannot satisfy.
    #[error("Unrecognized authentication challenge: {message}")]
    ChallengeUnrecognized { message: String },

    /// Exchanging credentials for a bearer token failed.
    #[error("Token exchange failed (status: {status_code:?}): {message}")]
    TokenExchangeFailed {
        message: String,
        status_code: Option<u16>,
    },

    /// The tag list endpoint answered with a non-success status.
    #[error("Tag fetch failed (status: {status_code}): {message}")]
    TagFetchFailed { message: String, status_code: u16 },

    /// The caller supplied a filter that is not a valid regular expression.
    #[error("Malformed filter pattern '{pattern}'")]
    MalformedFilterPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A single tag could not be read as a version.
    #[error("Tag '{tag}' is not a version, ordering it below all versions")]
    VersionParseSkipped { tag: String },

    /// Transport-level failures (connection, timeout, TLS)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed input or response body
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors (invalid config file, bad environment override)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type alias for imagetag operations
pub type Result<T> = std::result::Result<T, ImageTagError>;

/// Discriminant of an [`ImageTagError`], handy for matching without fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ChallengeUnrecognized,
    TokenExchangeFailed,
    TagFetchFailed,
    MalformedFilterPattern,
    VersionParseSkipped,
    Network,
    Validation,
    Config,
}

impl ImageTagError {
    /// Creates a new unrecognized challenge error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::error::ImageTagError;
    ///
    /// let err = ImageTagError::challenge_unrecognized("Negotiate");
    /// assert!(!err.is_fatal());
    /// ```
    pub fn challenge_unrecognized<S: Into<String>>(message: S) -> Self {
        Self::ChallengeUnrecognized {
            message: message.into(),
        }
    }

    /// Creates a new token exchange error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::error::ImageTagError;
    ///
    /// let err = ImageTagError::token_exchange("token was not received", Some(401));
    /// assert!(matches!(err, ImageTagError::TokenExchangeFailed { .. }));
    /// ```
    pub fn token_exchange<S: Into<String>>(message: S, status_code: Option<u16>) -> Self {
        Self::TokenExchangeFailed {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new tag fetch error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::error::ImageTagError;
    ///
    /// let err = ImageTagError::tag_fetch("401 Unauthorized", 401);
    /// assert!(err.to_string().contains("401"));
    /// ```
    pub fn tag_fetch<S: Into<String>>(message: S, status_code: u16) -> Self {
        Self::TagFetchFailed {
            message: message.into(),
            status_code,
        }
    }

    /// Creates a new malformed filter error.
    pub fn malformed_filter<S: Into<String>>(pattern: S, source: regex::Error) -> Self {
        Self::MalformedFilterPattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Creates a new skipped version error.
    pub fn version_skipped<S: Into<String>>(tag: S) -> Self {
        Self::VersionParseSkipped { tag: tag.into() }
    }

    /// Creates a new network error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::error::ImageTagError;
    ///
    /// let err = ImageTagError::network("connection refused");
    /// assert!(matches!(err, ImageTagError::Network { .. }));
    /// ```
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new network error with a source error.
    pub fn network_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use libimagetag::error::ImageTagError;
    ///
    /// let err = ImageTagError::validation("Registry URL cannot be empty");
    /// assert!(matches!(err, ImageTagError::Validation { .. }));
    /// ```
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new validation error with a source error.
    pub fn validation_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Validation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S, P>(message: S, path: Option<P>) -> Self
    where
        S: Into<String>,
        P: Into<String>,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: None,
        }
    }

    /// Creates a new configuration error with a source error.
    pub fn config_with_source<S, P, E>(message: S, path: Option<P>, source: E) -> Self
    where
        S: Into<String>,
        P: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Config {
            message: message.into(),
            path: path.map(|p| p.into()),
            source: Some(Box::new(source)),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ChallengeUnrecognized { .. } => ErrorKind::ChallengeUnrecognized,
            Self::TokenExchangeFailed { .. } => ErrorKind::TokenExchangeFailed,
            Self::TagFetchFailed { .. } => ErrorKind::TagFetchFailed,
            Self::MalformedFilterPattern { .. } => ErrorKind::MalformedFilterPattern,
            Self::VersionParseSkipped { .. } => ErrorKind::VersionParseSkipped,
            Self::Network { .. } => ErrorKind::Network,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Whether this error should be reported to the user.
    ///
    /// An unrecognized challenge and an unparseable tag are expected
    /// conditions; they are logged but never surface in a result.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::ChallengeUnrecognized { .. } | Self::VersionParseSkipped { .. }
        )
    }
}
