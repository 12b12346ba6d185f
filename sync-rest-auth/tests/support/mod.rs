//! Shared fixtures for credential provider tests.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use sync_rest_auth::{AuthError, AuthResult, Grant, GrantManager, RealmConfig, Token, TokenResponse};
use wiremock::MockServer;

pub const TOKEN_PATH: &str = "/auth/realms/sync/protocol/openid-connect/token";

/// Routes `tracing` output to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Realm config pointing at the mock identity server.
pub fn realm_config(server: &MockServer) -> RealmConfig {
    RealmConfig {
        realm: "sync".into(),
        realm_public_key: String::new(),
        auth_server_url: format!("{}/auth", server.uri()),
        ssl_required: Default::default(),
        resource: "sync-client".into(),
        secret: "sync-secret".into(),
    }
}

pub fn token_body(access_token: &str) -> serde_json::Value {
    serde_json::json!({
        "access_token": access_token,
        "refresh_token": format!("{access_token}-refresh"),
        "expires_in": 300,
        "refresh_expires_in": 1800,
        "token_type": "Bearer",
        "scope": "openid"
    })
}

/// A grant whose access token expires `expires_in_secs` from now.
pub fn make_grant(access_token: &str, expires_in_secs: i64) -> Grant {
    Grant {
        access_token: Token::new(access_token, Some(Utc::now() + Duration::seconds(expires_in_secs))),
        refresh_token: Some(Token::new(
            format!("{access_token}-refresh"),
            Some(Utc::now() + Duration::seconds(1800)),
        )),
        id_token: None,
        token_type: "Bearer".into(),
        scope: Some("openid".into()),
    }
}

/// What the recording grant manager does on `ensure_freshness`.
pub enum Freshness {
    Return(Grant),
    Reject(String),
}

/// Grant manager that counts calls and returns scripted results.
pub struct RecordingGrantManager {
    freshness: Mutex<Freshness>,
    pub ensure_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

impl RecordingGrantManager {
    pub fn new(freshness: Freshness) -> Self {
        Self {
            freshness: Mutex::new(freshness),
            ensure_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }

    pub fn ensure_count(&self) -> usize {
        self.ensure_calls.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GrantManager for RecordingGrantManager {
    fn create_grant(&self, response: TokenResponse) -> AuthResult<Grant> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Grant::from_response(response))
    }

    async fn ensure_freshness(&self, _grant: &Grant) -> AuthResult<Grant> {
        self.ensure_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.freshness.lock().unwrap() {
            Freshness::Return(grant) => Ok(grant.clone()),
            Freshness::Reject(reason) => Err(AuthError::RefreshRejected(reason.clone())),
        }
    }
}

/// Grant manager that parks `ensure_freshness` until released, then hands
/// back the grant it was given.
#[derive(Default)]
pub struct GatedGrantManager {
    pub entered: tokio::sync::Notify,
    pub release: tokio::sync::Notify,
}

#[async_trait]
impl GrantManager for GatedGrantManager {
    fn create_grant(&self, response: TokenResponse) -> AuthResult<Grant> {
        Ok(Grant::from_response(response))
    }

    async fn ensure_freshness(&self, grant: &Grant) -> AuthResult<Grant> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(grant.clone())
    }
}
