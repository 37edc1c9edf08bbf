//! Turning an authentication challenge plus credentials into a usable
//! authorization value.
//!
//! `Basic` challenges are answered locally by encoding `username:password`.
//! `Bearer` challenges need a round trip to the token realm, which goes
//! through [`RegistryHttpClient::request_token`].

use crate::auth::{AuthChallenge, AuthScheme, Credentials};
use crate::client::RegistryHttpClient;
use crate::error::{ImageTagError, Result};
use base64::{Engine as _, engine::general_purpose};
use std::fmt;


/// Keys looked up in a token response, in order of preference.
const TOKEN_KEYS: [&str; 2] = ["token", "access_token"];

/// A ready-to-send `Authorization` header value.
///
/// `Display` renders the full header value; `Debug` hides the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Authorization {
    scheme: AuthScheme,
    token: String,
}

impl Authorization {
    pub fn new(scheme: AuthScheme, token: impl Into<String>) -> Self {
        Self {
            scheme,
            token: token.into(),
        }
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// The header value, `<scheme> <token>`.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme, self.token)
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.scheme, self.token)
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("scheme", &self.scheme)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Encodes credentials for HTTP Basic authentication.
///
/// Empty credentials still produce a value, the encoding of `":"`.
///
/// # Examples
///
/// ```
/// use libimagetag::auth::Credentials;
/// use libimagetag::token::basic_token;
///
/// assert_eq!(basic_token(&Credentials::basic("user", "pass")), "dXNlcjpwYXNz");
/// assert_eq!(basic_token(&Credentials::anonymous()), "Og==");
/// ```
pub fn basic_token(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.username(), credentials.password());
    general_purpose::STANDARD.encode(pair.as_bytes())
}

/// Picks the token out of a token endpoint response.
///
/// Prefers `token` and falls back to `access_token`. Empty or non-string
/// values count as absent.
pub fn find_token(body: &serde_json::Value) -> Option<String> {
    TOKEN_KEYS.iter().find_map(|key| {
        body.get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    })
}

/// Produces authorization values for a registry.
pub struct TokenProvider<'a> {
    client: &'a RegistryHttpClient,
}

impl<'a> TokenProvider<'a> {
    pub fn new(client: &'a RegistryHttpClient) -> Self {
        Self { client }
    }

    /// Obtains an authorization value for pulling `image`.
    ///
    /// # Errors
    ///
    /// - `ChallengeUnrecognized` for an `Unknown` challenge
    /// - `TokenExchangeFailed` when the realm rejects the request or its
    ///   response carries no token
    /// - `Network`/`Validation` errors from the exchange itself
    pub fn obtain_token(
        &self,
        challenge: &AuthChallenge,
        image: &str,
        credentials: &Credentials,
    ) -> Result<Authorization> {
        match challenge {
            AuthChallenge::Basic => Ok(Authorization::new(
                AuthScheme::Basic,
                basic_token(credentials),
            )),
            AuthChallenge::Bearer { realm, service } => {
                let body = self
                    .client
                    .request_token(realm, service, image, credentials)?;

                match find_token(&body) {
                    Some(token) => {
                        tracing::info!(realm = %realm, "token received");
                        Ok(Authorization::new(AuthScheme::Bearer, token))
                    }
                    None => {
                        tracing::warn!(
                            realm = %realm,
                            "unable to find token in response, token was not received"
                        );
                        Err(ImageTagError::token_exchange(
                            "token was not received: response has neither 'token' nor 'access_token'",
                            None,
                        ))
                    }
                }
            }
            AuthChallenge::Unknown => {
                tracing::warn!("authentication scheme is unknown, unable to fetch token");
                Err(ImageTagError::challenge_unrecognized(
                    "cannot obtain a token for an unknown authentication scheme",
                ))
            }
        }
    }
}
