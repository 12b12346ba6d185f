//! Shared fakes for handler and registrar tests.

#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::sync::Mutex;
use sync_rest_handlers::engine::{
    CreateHandler, DeleteHandler, EngineError, ListHandler, ReadHandler, UpdateHandler,
};
use sync_rest_handlers::error::BoxError;
use sync_rest_handlers::{HeaderInjector, SyncEngine, SyncRestOptions};
use wiremock::MockServer;

pub const DATASET: &str = "dataset";

/// Routes `tracing` output to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn options(server: &MockServer) -> SyncRestOptions {
    SyncRestOptions::new(server.uri())
}

/// Sync engine fake recording every call in order.
#[derive(Default)]
pub struct RecordingEngine {
    fail_init_with: Option<String>,
    pub calls: Mutex<Vec<String>>,
    pub init_options: Mutex<Option<Value>>,
    pub list: Mutex<Option<ListHandler>>,
    pub read: Mutex<Option<ReadHandler>>,
    pub update: Mutex<Option<UpdateHandler>>,
    pub delete: Mutex<Option<DeleteHandler>>,
    pub create: Mutex<Option<CreateHandler>>,
}

impl RecordingEngine {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_init_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str, dataset: &str) {
        self.calls.lock().unwrap().push(format!("{call}:{dataset}"));
    }
}

#[async_trait]
impl SyncEngine for RecordingEngine {
    async fn init(&self, dataset: &str, options: &Value) -> Result<(), EngineError> {
        self.record("init", dataset);
        *self.init_options.lock().unwrap() = Some(options.clone());
        match &self.fail_init_with {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }

    fn handle_list(&self, dataset: &str, handler: ListHandler) {
        self.record("handle_list", dataset);
        *self.list.lock().unwrap() = Some(handler);
    }

    fn handle_read(&self, dataset: &str, handler: ReadHandler) {
        self.record("handle_read", dataset);
        *self.read.lock().unwrap() = Some(handler);
    }

    fn handle_update(&self, dataset: &str, handler: UpdateHandler) {
        self.record("handle_update", dataset);
        *self.update.lock().unwrap() = Some(handler);
    }

    fn handle_delete(&self, dataset: &str, handler: DeleteHandler) {
        self.record("handle_delete", dataset);
        *self.delete.lock().unwrap() = Some(handler);
    }

    fn handle_create(&self, dataset: &str, handler: CreateHandler) {
        self.record("handle_create", dataset);
        *self.create.lock().unwrap() = Some(handler);
    }
}

/// Injects a fixed header.
pub struct StaticHeader(pub &'static str, pub &'static str);

#[async_trait]
impl HeaderInjector for StaticHeader {
    async fn inject(&self, headers: &mut HeaderMap) -> Result<(), BoxError> {
        headers.insert(
            HeaderName::from_static(self.0),
            HeaderValue::from_static(self.1),
        );
        Ok(())
    }
}

/// Always fails header preparation.
pub struct FailingInjector(pub &'static str);

#[async_trait]
impl HeaderInjector for FailingInjector {
    async fn inject(&self, _headers: &mut HeaderMap) -> Result<(), BoxError> {
        Err(self.0.into())
    }
}
