//! Grant model and the token endpoint's wire format.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON body returned by the OpenID Connect token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Refresh token lifetime in seconds.
    #[serde(default)]
    pub refresh_expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// A single token with its expiry, if the provider reported one.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Token {
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// Returns true if the token will expire within the given seconds.
    /// Tokens without an expiry never expire.
    pub fn expires_within_secs(&self, secs: i64) -> bool {
        self.expires_at
            .is_some_and(|at| Utc::now() + Duration::seconds(secs) >= at)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_within_secs(0)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Access token, optional refresh token and metadata for one authenticated
/// session with the identity provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    pub access_token: Token,
    pub refresh_token: Option<Token>,
    pub id_token: Option<String>,
    pub token_type: String,
    pub scope: Option<String>,
}

impl Grant {
    /// Builds a grant from a token response issued now.
    pub fn from_response(response: TokenResponse) -> Self {
        Self::from_response_at(response, Utc::now())
    }

    /// Builds a grant from a token response issued at `issued_at`.
    pub fn from_response_at(response: TokenResponse, issued_at: DateTime<Utc>) -> Self {
        let expiry = |secs: Option<i64>| secs.map(|s| issued_at + Duration::seconds(s));

        Self {
            access_token: Token::new(response.access_token, expiry(response.expires_in)),
            refresh_token: response
                .refresh_token
                .map(|t| Token::new(t, expiry(response.refresh_expires_in))),
            id_token: response.id_token,
            token_type: response.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: response.scope,
        }
    }

    /// The raw access token value.
    pub fn access_token(&self) -> &str {
        &self.access_token.token
    }

    /// True when the refresh token exists and has not expired.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_ref().is_some_and(|t| !t.is_expired())
    }
}
