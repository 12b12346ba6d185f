//! Grant creation and freshness checks.
//!
//! `GrantManager` is the seam between the credential provider and the
//! identity provider's grant handling. `KeycloakGrantManager` talks to an
//! OpenID Connect token endpoint with reqwest.

use crate::config::RealmConfig;
use crate::error::{AuthError, AuthResult};
use crate::grant::{Grant, TokenResponse};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Access tokens expiring within this many seconds are renewed early.
pub const DEFAULT_MIN_VALIDITY_SECS: i64 = 30;

/// Turns token responses into grants and keeps grants fresh.
#[async_trait]
pub trait GrantManager: Send + Sync {
    /// Builds a grant from a token endpoint response.
    fn create_grant(&self, response: TokenResponse) -> AuthResult<Grant>;

    /// Returns a grant whose access token is usable, renewing it if needed.
    ///
    /// The returned grant may be identical to the input when no renewal
    /// was required.
    async fn ensure_freshness(&self, grant: &Grant) -> AuthResult<Grant>;
}

/// Grant manager backed by a realm's OpenID Connect token endpoint.
pub struct KeycloakGrantManager {
    client: Client,
    config: RealmConfig,
    min_validity_secs: i64,
}

impl KeycloakGrantManager {
    pub fn new(client: Client, config: RealmConfig) -> Self {
        Self {
            client,
            config,
            min_validity_secs: DEFAULT_MIN_VALIDITY_SECS,
        }
    }

    /// Overrides how early (in seconds) an access token is renewed.
    pub fn with_min_validity_secs(mut self, secs: i64) -> Self {
        self.min_validity_secs = secs;
        self
    }
}

#[async_trait]
impl GrantManager for KeycloakGrantManager {
    fn create_grant(&self, response: TokenResponse) -> AuthResult<Grant> {
        if response.access_token.trim().is_empty() {
            return Err(AuthError::InvalidTokenResponse(
                "response carries an empty access_token".to_string(),
            ));
        }
        Ok(Grant::from_response(response))
    }

    async fn ensure_freshness(&self, grant: &Grant) -> AuthResult<Grant> {
        if !grant.access_token.expires_within_secs(self.min_validity_secs) {
            return Ok(grant.clone());
        }

        let refresh_token = match grant.refresh_token.as_ref() {
            Some(token) if !token.is_expired() => token.token.clone(),
            Some(_) => {
                return Err(AuthError::RefreshRejected(
                    "refresh token has expired".to_string(),
                ));
            }
            None => {
                return Err(AuthError::RefreshRejected(
                    "grant has no refresh token".to_string(),
                ));
            }
        };

        debug!(
            "access token for realm {} expiring within {}s, refreshing",
            self.config.realm, self.min_validity_secs
        );

        let response = request_token(
            &self.client,
            &self.config,
            &[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ],
        )
        .await
        .map_err(|e| match e {
            AuthError::TokenEndpoint { status, body } => {
                AuthError::RefreshRejected(format!("{status} status: {body}"))
            }
            other => other,
        })?;

        self.create_grant(response)
    }
}

/// Posts a form to the realm's token endpoint using HTTP Basic client
/// authentication and decodes the token response.
pub(crate) async fn request_token(
    client: &Client,
    config: &RealmConfig,
    form: &[(&str, &str)],
) -> AuthResult<TokenResponse> {
    let resp = client
        .post(config.token_endpoint())
        .basic_auth(&config.resource, Some(&config.secret))
        .form(form)
        .send()
        .await?;

    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(AuthError::TokenEndpoint {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| AuthError::InvalidTokenResponse(e.to_string()))
}
