//! Per-dataset CRUD handlers.
//!
//! Each handler forwards to the REST service:
//! - list: `GET route` with the params as query string
//! - read: `GET route/id`
//! - update: `PUT route/id` with the data as JSON body
//! - delete: `DELETE route/id`
//! - create: `POST route` with the data as JSON body

use crate::config::SyncRestOptions;
use crate::engine::{
    CreateHandler, DeleteHandler, HandlerFuture, HandlerResult, HandlerSet, ListHandler, Operation, ReadHandler,
    SyncFailure, UpdateHandler,
};
use crate::error::{ServiceError, SyncRestError};
use crate::http::{ServiceCaller, ServiceRequest};
use crate::route::{build_route, join_path};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// The five handlers for one dataset.
#[derive(Clone)]
pub struct DatasetHandlers {
    dataset: String,
    endpoint: String,
    options: Arc<SyncRestOptions>,
    caller: ServiceCaller,
}

impl DatasetHandlers {
    pub fn new(dataset: impl Into<String>, options: Arc<SyncRestOptions>, caller: ServiceCaller) -> Self {
        let dataset = dataset.into();
        let endpoint = build_route(&options, &dataset);

        debug!(
            "creating sync proxy for dataset \"{dataset}\" with guid \"{}\" using endpoint \"{endpoint}\"",
            options.guid.as_deref().unwrap_or_default()
        );

        Self {
            dataset,
            endpoint,
            options,
            caller,
        }
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Route the handlers were created for.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn list(&self, dataset: &str, params: Value, meta_data: &Value) -> HandlerResult {
        debug!("performing \"list\" for dataset \"{dataset}\" with params {params} meta {meta_data}");
        let request = self
            .request(Method::GET, build_route(&self.options, dataset))
            .with_query(params);
        self.complete(Operation::List, self.caller.call(request).await)
    }

    pub async fn read(&self, dataset: &str, id: &str, meta_data: &Value) -> HandlerResult {
        debug!("performing \"read\" for dataset \"{dataset}\" for id \"{id}\" meta {meta_data}");
        let request = self.request(Method::GET, self.item_route(dataset, id));
        self.complete(Operation::Read, self.caller.call(request).await)
    }

    pub async fn update(&self, dataset: &str, id: &str, data: Value, meta_data: &Value) -> HandlerResult {
        debug!("performing \"update\" for dataset \"{dataset}\" for id \"{id}\" with data {data} meta {meta_data}");
        let request = self
            .request(Method::PUT, self.item_route(dataset, id))
            .with_body(data);
        self.complete(Operation::Update, self.caller.call(request).await)
    }

    pub async fn delete(&self, dataset: &str, id: &str, meta_data: &Value) -> HandlerResult {
        debug!("performing \"delete\" for dataset \"{dataset}\" for id \"{id}\" meta {meta_data}");
        let request = self.request(Method::DELETE, self.item_route(dataset, id));
        self.complete(Operation::Delete, self.caller.call(request).await)
    }

    pub async fn create(&self, dataset: &str, data: Value, meta_data: &Value) -> HandlerResult {
        debug!("performing \"create\" for dataset \"{dataset}\" with data {data} meta {meta_data}");
        let request = self
            .request(Method::POST, build_route(&self.options, dataset))
            .with_body(data);
        self.complete(Operation::Create, self.caller.call(request).await)
    }

    /// Wraps the handlers into the function shapes the engine binds.
    pub fn into_handler_set(self) -> HandlerSet {
        let this = Arc::new(self);

        let list: ListHandler = {
            let h = Arc::clone(&this);
            Arc::new(move |dataset: String, params: Value, meta: Value| -> HandlerFuture {
                let h = Arc::clone(&h);
                Box::pin(async move { h.list(&dataset, params, &meta).await })
            })
        };
        let read: ReadHandler = {
            let h = Arc::clone(&this);
            Arc::new(move |dataset: String, id: String, meta: Value| -> HandlerFuture {
                let h = Arc::clone(&h);
                Box::pin(async move { h.read(&dataset, &id, &meta).await })
            })
        };
        let update: UpdateHandler = {
            let h = Arc::clone(&this);
            Arc::new(move |dataset: String, id: String, data: Value, meta: Value| -> HandlerFuture {
                let h = Arc::clone(&h);
                Box::pin(async move { h.update(&dataset, &id, data, &meta).await })
            })
        };
        let delete: DeleteHandler = {
            let h = Arc::clone(&this);
            Arc::new(move |dataset: String, id: String, meta: Value| -> HandlerFuture {
                let h = Arc::clone(&h);
                Box::pin(async move { h.delete(&dataset, &id, &meta).await })
            })
        };
        let create: CreateHandler = {
            let h = Arc::clone(&this);
            Arc::new(move |dataset: String, data: Value, meta: Value| -> HandlerFuture {
                let h = Arc::clone(&h);
                Box::pin(async move { h.create(&dataset, data, &meta).await })
            })
        };

        HandlerSet {
            list,
            read,
            update,
            delete,
            create,
        }
    }

    fn request(&self, method: Method, path: String) -> ServiceRequest {
        ServiceRequest::new(method, self.options.url.clone(), path, self.options.timeout())
            .with_guid(self.options.guid.clone())
    }

    fn item_route(&self, dataset: &str, id: &str) -> String {
        join_path(&build_route(&self.options, dataset), id)
    }

    fn complete(&self, operation: Operation, outcome: Result<Value, ServiceError>) -> HandlerResult {
        match outcome {
            Ok(data) => {
                debug!(
                    "sync call \"{operation}\" for dataset \"{}\" was successful to guid \"{}\" using endpoint \"{}\"",
                    self.dataset,
                    self.options.guid.as_deref().unwrap_or_default(),
                    self.endpoint
                );
                Ok(data)
            }
            Err(source) => {
                let failure_message = source.failure_message().map(str::to_owned);
                let err = SyncRestError::Handler {
                    operation,
                    dataset: self.dataset.clone(),
                    endpoint: self.endpoint.clone(),
                    source,
                };
                warn!("{err}");
                Err(SyncFailure {
                    msg: failure_message.unwrap_or_else(|| err.to_string()),
                })
            }
        }
    }
}
