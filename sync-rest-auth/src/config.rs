//! Identity provider realm configuration.
//!
//! Field names serialize in the kebab-case used by adapter JSON files
//! (`auth-server-url`, `realm-public-key`, ...). Every field except the
//! realm public key and client secret defaults to the shared test realm;
//! deployments set the `SSO_*` environment variables.

use crate::error::{AuthError, AuthResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Optional override for the realm name.
pub const ENV_REALM: &str = "SSO_REALM";
pub const ENV_REALM_PUBLIC_KEY: &str = "SSO_REALM_PUBLIC_KEY";
pub const ENV_AUTH_SERVER_URL: &str = "SSO_SERVICE";
pub const ENV_SSL_REQUIRED: &str = "SSO_SSL_REQUIRED";
pub const ENV_RESOURCE: &str = "SSO_RESOURCE";
pub const ENV_SECRET: &str = "SSO_CREDENTIALS_SECRET";

const DEFAULT_REALM: &str = "TKE";
const DEFAULT_AUTH_SERVER_URL: &str = "https://rencrypt-sso-test.3a7a.tke.openshiftapps.com/auth";
const DEFAULT_RESOURCE: &str = "tech-connect";

/// Which requests must use TLS when talking to the identity provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslRequired {
    All,
    #[default]
    External,
    None,
}

impl FromStr for SslRequired {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "external" => Ok(Self::External),
            "none" => Ok(Self::None),
            other => Err(AuthError::Config(format!(
                "ssl-required must be one of all, external, none (got \"{other}\")"
            ))),
        }
    }
}

impl fmt::Display for SslRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::External => "external",
            Self::None => "none",
        };
        f.write_str(s)
    }
}

/// Realm settings used to reach the identity provider's token endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RealmConfig {
    /// Realm name (e.g., "TKE").
    pub realm: String,

    /// Realm public key, PEM body without header lines.
    #[serde(default)]
    pub realm_public_key: String,

    /// Base URL of the identity server, including any context path.
    pub auth_server_url: String,

    #[serde(default)]
    pub ssl_required: SslRequired,

    /// Client identifier used for the client-credentials exchange.
    pub resource: String,

    /// Client secret paired with `resource`.
    #[serde(default)]
    pub secret: String,
}

impl Default for RealmConfig {
    fn default() -> Self {
        Self {
            realm: DEFAULT_REALM.to_string(),
            realm_public_key: String::new(),
            auth_server_url: DEFAULT_AUTH_SERVER_URL.to_string(),
            ssl_required: SslRequired::External,
            resource: DEFAULT_RESOURCE.to_string(),
            secret: String::new(),
        }
    }
}

impl RealmConfig {
    /// Reads the realm configuration from the `SSO_*` environment variables.
    ///
    /// Unset or empty variables fall back to the defaults of
    /// [`RealmConfig::default`].
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let ssl_required = match get(ENV_SSL_REQUIRED) {
            Some(raw) => raw.parse()?,
            None => defaults.ssl_required,
        };

        Ok(Self {
            realm: get(ENV_REALM).unwrap_or(defaults.realm),
            realm_public_key: get(ENV_REALM_PUBLIC_KEY).unwrap_or(defaults.realm_public_key),
            auth_server_url: get(ENV_AUTH_SERVER_URL).unwrap_or(defaults.auth_server_url),
            ssl_required,
            resource: get(ENV_RESOURCE).unwrap_or(defaults.resource),
            secret: get(ENV_SECRET).unwrap_or(defaults.secret),
        })
    }

    /// Checks that the configuration can be used to request tokens.
    pub fn validate(&self) -> AuthResult<()> {
        if self.realm.trim().is_empty() {
            return Err(AuthError::Config("realm must not be empty".to_string()));
        }
        if self.resource.trim().is_empty() {
            return Err(AuthError::Config("resource must not be empty".to_string()));
        }

        let url = reqwest::Url::parse(&self.auth_server_url).map_err(|e| {
            AuthError::Config(format!(
                "auth-server-url \"{}\" is not a valid URL: {e}",
                self.auth_server_url
            ))
        })?;

        match url.scheme() {
            "https" => Ok(()),
            "http" if self.ssl_required == SslRequired::All => Err(AuthError::Config(format!(
                "ssl-required is \"all\" but auth-server-url \"{}\" is not https",
                self.auth_server_url
            ))),
            "http" => Ok(()),
            other => Err(AuthError::Config(format!(
                "auth-server-url has unsupported scheme \"{other}\""
            ))),
        }
    }

    /// OpenID Connect token endpoint for this realm.
    pub fn token_endpoint(&self) -> String {
        format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.auth_server_url.trim_end_matches('/'),
            self.realm
        )
    }
}
