//! REST-backed dataset handlers for a mobile sync engine.
//!
//! For each dataset this crate builds the five CRUD handlers the sync
//! engine expects (list, read, update, delete, create), forwards every
//! call to a remote REST service and translates the HTTP outcome back
//! into the engine's result shape:
//! - `route` resolves a dataset to its request path
//! - `http` issues one request per call and classifies the outcome
//! - `handlers` builds the per-dataset handler set
//! - `registrar` initialises a dataset and binds its handlers
//! - `credentials` injects bearer tokens from `sync-rest-auth`

pub mod config;
pub mod credentials;
pub mod engine;
pub mod error;
pub mod handlers;
pub mod http;
pub mod registrar;
pub mod route;

pub use config::{DEFAULT_TIMEOUT, SyncRestOptions};
pub use engine::{HandlerResult, HandlerSet, Operation, SyncEngine, SyncFailure};
pub use error::{ServiceError, SyncRestError, SyncRestResult};
pub use handlers::DatasetHandlers;
pub use http::{HeaderInjector, Payload, ServiceCaller, ServiceRequest};
pub use registrar::SyncRestAdapter;
pub use route::{build_route, join_path};
