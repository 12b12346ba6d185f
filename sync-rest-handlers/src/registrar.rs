//! Dataset registration with the sync engine.

use crate::config::SyncRestOptions;
use crate::engine::SyncEngine;
use crate::error::{SyncRestError, SyncRestResult};
use crate::handlers::DatasetHandlers;
use crate::http::ServiceCaller;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Binds REST-backed handlers to datasets of a sync engine.
pub struct SyncRestAdapter<E: SyncEngine + ?Sized> {
    engine: Arc<E>,
    options: Arc<SyncRestOptions>,
    caller: ServiceCaller,
}

impl<E: SyncEngine + ?Sized> SyncRestAdapter<E> {
    pub fn new(engine: Arc<E>, options: SyncRestOptions) -> SyncRestResult<Self> {
        Self::with_caller(engine, options, ServiceCaller::default())
    }

    /// Uses `caller` for every handler call, e.g. one with bearer-token
    /// injection.
    pub fn with_caller(
        engine: Arc<E>,
        options: SyncRestOptions,
        caller: ServiceCaller,
    ) -> SyncRestResult<Self> {
        options.validate()?;
        Ok(Self {
            engine,
            options: Arc::new(options),
            caller,
        })
    }

    pub fn options(&self) -> &SyncRestOptions {
        &self.options
    }

    /// Builds the handlers for `dataset` without registering them.
    pub fn handlers(&self, dataset: &str) -> DatasetHandlers {
        DatasetHandlers::new(dataset, Arc::clone(&self.options), self.caller.clone())
    }

    /// Initialises `dataset` in the engine, then binds its five handlers.
    ///
    /// Handlers are not bound if initialisation fails. Completion is
    /// reported after yielding to the scheduler once.
    pub async fn init_dataset(&self, dataset: &str, sync_options: &Value) -> SyncRestResult<()> {
        let handlers = self.handlers(dataset).into_handler_set();

        if let Err(source) = self.engine.init(dataset, sync_options).await {
            let err = SyncRestError::DatasetInit {
                dataset: dataset.to_string(),
                source,
            };
            warn!("{err}");
            return Err(err);
        }

        self.engine.handle_list(dataset, handlers.list);
        self.engine.handle_update(dataset, handlers.update);
        self.engine.handle_read(dataset, handlers.read);
        self.engine.handle_delete(dataset, handlers.delete);
        self.engine.handle_create(dataset, handlers.create);

        info!("dataset {dataset} bound to REST handlers at {}", self.options.url);

        tokio::task::yield_now().await;
        Ok(())
    }
}
