//! Contract with the external sync engine.
//!
//! The engine initialises a dataset once and then calls the bound handlers
//! whenever it needs to reconcile records with the backing service.

use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Error type reported by the sync engine.
pub type EngineError = Box<dyn std::error::Error + Send + Sync>;

/// Failure shape handed back to the engine by every handler.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{msg}")]
pub struct SyncFailure {
    pub msg: String,
}

/// What a handler resolves to: the raw service result, or a failure.
pub type HandlerResult = Result<Value, SyncFailure>;

pub type HandlerFuture = BoxFuture<'static, HandlerResult>;

/// `(dataset, query_params, meta_data)`
pub type ListHandler = Arc<dyn Fn(String, Value, Value) -> HandlerFuture + Send + Sync>;
/// `(dataset, id, meta_data)`
pub type ReadHandler = Arc<dyn Fn(String, String, Value) -> HandlerFuture + Send + Sync>;
/// `(dataset, id, data, meta_data)`
pub type UpdateHandler = Arc<dyn Fn(String, String, Value, Value) -> HandlerFuture + Send + Sync>;
/// `(dataset, id, meta_data)`
pub type DeleteHandler = Arc<dyn Fn(String, String, Value) -> HandlerFuture + Send + Sync>;
/// `(dataset, data, meta_data)`
pub type CreateHandler = Arc<dyn Fn(String, Value, Value) -> HandlerFuture + Send + Sync>;

/// The five handlers bound to one dataset.
#[derive(Clone)]
pub struct HandlerSet {
    pub list: ListHandler,
    pub read: ReadHandler,
    pub update: UpdateHandler,
    pub delete: DeleteHandler,
    pub create: CreateHandler,
}

/// CRUD operation a handler performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Read,
    Update,
    Delete,
    Create,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Create => "create",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration API of the sync engine.
#[async_trait]
pub trait SyncEngine: Send + Sync {
    /// Initialises `dataset` with engine-specific options.
    async fn init(&self, dataset: &str, options: &Value) -> Result<(), EngineError>;

    fn handle_list(&self, dataset: &str, handler: ListHandler);

    fn handle_read(&self, dataset: &str, handler: ReadHandler);

    fn handle_update(&self, dataset: &str, handler: UpdateHandler);

    fn handle_delete(&self, dataset: &str, handler: DeleteHandler);

    fn handle_create(&self, dataset: &str, handler: CreateHandler);
}
