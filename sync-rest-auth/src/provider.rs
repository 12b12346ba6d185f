//! Credential provider: owns the current grant and bearer token.
//!
//! The grant and bearer token live behind one `RwLock` shared by every
//! clone of the provider. Concurrent refresh/authenticate calls are not
//! serialized; the last successful write wins and redundant token
//! exchanges are possible.

use crate::config::RealmConfig;
use crate::error::{AuthError, AuthResult};
use crate::grant::Grant;
use crate::grant_manager::{GrantManager, KeycloakGrantManager, request_token};
use reqwest::{Client, IntoUrl, Method, RequestBuilder};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Default)]
struct CredentialState {
    grant: Option<Grant>,
    bearer: Option<String>,
}

/// An HTTP client paired with the bearer token current at the time it was
/// handed out.
#[derive(Clone)]
pub struct AuthenticatedClient {
    client: Client,
    bearer: String,
}

impl AuthenticatedClient {
    pub fn bearer_token(&self) -> &str {
        &self.bearer
    }

    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer)
    }

    /// Starts a request with the bearer token already attached.
    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.client.request(method, url).bearer_auth(&self.bearer)
    }
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("bearer", &"<redacted>")
            .finish()
    }
}

/// Obtains and refreshes bearer tokens for outbound calls.
#[derive(Clone)]
pub struct CredentialProvider {
    client: Client,
    config: RealmConfig,
    grants: Arc<dyn GrantManager>,
    state: Arc<RwLock<CredentialState>>,
}

impl CredentialProvider {
    /// Creates a provider backed by [`KeycloakGrantManager`].
    pub fn new(config: RealmConfig) -> AuthResult<Self> {
        config.validate()?;
        let client = Client::builder().timeout(TOKEN_REQUEST_TIMEOUT).build()?;
        let grants = Arc::new(KeycloakGrantManager::new(client.clone(), config.clone()));
        Ok(Self::with_grant_manager(config, client, grants))
    }

    /// Creates a provider with a caller-supplied grant manager.
    pub fn with_grant_manager(
        config: RealmConfig,
        client: Client,
        grants: Arc<dyn GrantManager>,
    ) -> Self {
        Self {
            client,
            config,
            grants,
            state: Arc::new(RwLock::new(CredentialState::default())),
        }
    }

    pub fn config(&self) -> &RealmConfig {
        &self.config
    }

    /// Returns a copy of the current grant, if any.
    pub async fn grant(&self) -> Option<Grant> {
        self.state.read().await.grant.clone()
    }

    /// Returns the current bearer token, if any.
    pub async fn bearer_token(&self) -> Option<String> {
        self.state.read().await.bearer.clone()
    }

    /// Replaces the stored grant and bearer token (e.g. a restored session).
    pub async fn set_grant(&self, grant: Grant) {
        let mut state = self.state.write().await;
        state.bearer = Some(grant.access_token.token.clone());
        state.grant = Some(grant);
    }

    /// Drops the stored grant and bearer token.
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.grant = None;
        state.bearer = None;
    }

    /// Renews the stored grant through the grant manager.
    ///
    /// Fails with [`AuthError::NoGrant`] when no grant with an access token
    /// has been stored yet.
    pub async fn refresh(&self) -> AuthResult<AuthenticatedClient> {
        let current = self
            .state
            .read()
            .await
            .grant
            .clone()
            .filter(|g| !g.access_token().is_empty())
            .ok_or(AuthError::NoGrant)?;

        let fresh = self.grants.ensure_freshness(&current).await?;

        let mut state = self.state.write().await;
        // An unchanged grant is not written back: the stored one may have
        // been replaced while the freshness check was in flight.
        if fresh.access_token() != current.access_token() {
            debug!("access token renewed for realm {}", self.config.realm);
            state.bearer = Some(fresh.access_token.token.clone());
            state.grant = Some(fresh);
        }
        let bearer = state
            .bearer
            .clone()
            .unwrap_or_else(|| current.access_token.token.clone());

        Ok(self.client_with(bearer))
    }

    /// Performs a client-credentials exchange and stores the new grant.
    pub async fn authenticate(&self) -> AuthResult<AuthenticatedClient> {
        let response = request_token(
            &self.client,
            &self.config,
            &[("grant_type", "client_credentials"), ("scope", "openid")],
        )
        .await
        .map_err(|e| {
            warn!("client-credentials exchange for {} failed: {e}", self.config.resource);
            e
        })?;

        let grant = self.grants.create_grant(response)?;
        let bearer = grant.access_token.token.clone();

        {
            let mut state = self.state.write().await;
            state.grant = Some(grant);
            state.bearer = Some(bearer.clone());
        }

        info!(
            "obtained new grant for client {} in realm {}",
            self.config.resource, self.config.realm
        );
        Ok(self.client_with(bearer))
    }

    /// Returns an authenticated client, refreshing the current grant or
    /// authenticating from scratch when refresh fails.
    pub async fn get_authenticated_client(&self) -> AuthResult<AuthenticatedClient> {
        let refresh_err = match self.refresh().await {
            Ok(client) => return Ok(client),
            Err(e) => e,
        };

        debug!("grant refresh failed ({refresh_err}), authenticating");

        match self.authenticate().await {
            Ok(client) => Ok(client),
            Err(auth_err) => {
                let err = AuthError::Unavailable {
                    refresh: Box::new(refresh_err),
                    authenticate: Box::new(auth_err),
                };
                error!("{err}");
                Err(err)
            }
        }
    }

    fn client_with(&self, bearer: String) -> AuthenticatedClient {
        AuthenticatedClient {
            client: self.client.clone(),
            bearer,
        }
    }
}
