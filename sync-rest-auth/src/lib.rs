//! Bearer-token lifecycle for sync REST handlers.
//!
//! Obtains access tokens from an OpenID Connect identity provider with a
//! client-credentials exchange and keeps them fresh:
//! - `refresh` asks the grant manager to renew the stored grant
//! - `authenticate` performs a new client-credentials exchange
//! - `get_authenticated_client` tries refresh first and falls back to
//!   authenticate when refresh fails for any reason

pub mod config;
pub mod error;
pub mod grant;
pub mod grant_manager;
pub mod provider;

pub use config::{RealmConfig, SslRequired};
pub use error::{AuthError, AuthResult};
pub use grant::{Grant, Token, TokenResponse};
pub use grant_manager::{GrantManager, KeycloakGrantManager};
pub use provider::{AuthenticatedClient, CredentialProvider};
