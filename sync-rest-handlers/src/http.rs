//! Outbound service calls.
//!
//! One request per invocation, no retries. The outcome is classified as
//! a header injection failure, a transport failure, a non-200 status, or
//! success with the parsed body.

use crate::error::{BoxError, ServiceError};
use crate::route::join_path;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Prepares headers (typically authorization) before a request is sent.
#[async_trait]
pub trait HeaderInjector: Send + Sync {
    async fn inject(&self, headers: &mut HeaderMap) -> Result<(), BoxError>;
}

/// Data carried by a request.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Payload {
    #[default]
    None,
    /// Serialized into the query string; nested values use bracket
    /// notation (`eq[status]=open`, `ids[0]=a`).
    Query(Value),
    /// Sent as a JSON body.
    Body(Value),
}

/// Describes a single outbound call.
#[derive(Clone, Debug)]
pub struct ServiceRequest {
    /// Identifier of the target service, if known.
    pub guid: Option<String>,
    /// Base URL of the service.
    pub url: String,
    /// Path appended to `url`.
    pub path: String,
    pub method: Method,
    pub payload: Payload,
    pub timeout: Duration,
    pub headers: HeaderMap,
}

impl ServiceRequest {
    pub fn new(method: Method, url: impl Into<String>, path: impl Into<String>, timeout: Duration) -> Self {
        Self {
            guid: None,
            url: url.into(),
            path: path.into(),
            method,
            payload: Payload::None,
            timeout,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_guid(mut self, guid: Option<String>) -> Self {
        self.guid = guid;
        self
    }

    pub fn with_query(mut self, params: Value) -> Self {
        self.payload = Payload::Query(params);
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.payload = Payload::Body(body);
        self
    }

    /// Name used for the service in errors: the guid, else the full URL.
    pub fn target(&self) -> String {
        self.guid.clone().unwrap_or_else(|| self.full_url())
    }

    pub fn full_url(&self) -> String {
        join_path(&self.url, &self.path)
    }
}

/// Issues service requests with an optional header injection step.
#[derive(Clone)]
pub struct ServiceCaller {
    client: Client,
    injector: Option<Arc<dyn HeaderInjector>>,
}

impl Default for ServiceCaller {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl ServiceCaller {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            injector: None,
        }
    }

    /// Runs `injector` before every request.
    pub fn with_header_injector(mut self, injector: Arc<dyn HeaderInjector>) -> Self {
        self.injector = Some(injector);
        self
    }

    /// Performs the request and returns the body of a 200 response.
    ///
    /// If header injection fails, no request is sent.
    pub async fn call(&self, request: ServiceRequest) -> Result<Value, ServiceError> {
        let target = request.target();
        let mut headers = request.headers.clone();

        if let Some(injector) = &self.injector {
            if let Err(source) = injector.inject(&mut headers).await {
                warn!("header injection for service {target} failed: {source}");
                return Err(ServiceError::HeaderInjection { target, source });
            }
        }

        let url = request.full_url();
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .timeout(request.timeout)
            .headers(headers);

        builder = match &request.payload {
            Payload::None | Payload::Query(Value::Null) => builder,
            Payload::Query(params) => builder.query(&query_pairs(params)),
            Payload::Body(body) => builder.json(body),
        };

        let resp = builder
            .send()
            .await
            .map_err(|e| ServiceError::transport(target.clone(), e))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| ServiceError::transport(target.clone(), e))?;
        let body = parse_body(&text);

        debug!(
            "service call {} {url} to {target} complete with status {}",
            request.method,
            status.as_u16()
        );

        if status != StatusCode::OK {
            return Err(ServiceError::status(target, status.as_u16(), body));
        }

        Ok(body)
    }
}

/// Flattens query parameters into `key[sub]=value` and `key[0]=value`
/// pairs. `null` leaves are sent with an empty value.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    match params {
        Value::Object(map) => {
            for (key, value) in map {
                flatten_query(key.clone(), value, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                flatten_query(index.to_string(), value, &mut pairs);
            }
        }
        _ => {}
    }
    pairs
}

fn flatten_query(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (sub, nested) in map {
                flatten_query(format!("{key}[{sub}]"), nested, pairs);
            }
        }
        Value::Array(items) => {
            for (index, nested) in items.iter().enumerate() {
                flatten_query(format!("{key}[{index}]"), nested, pairs);
            }
        }
        Value::Null => pairs.push((key, String::new())),
        Value::String(s) => pairs.push((key, s.clone())),
        other => pairs.push((key, other.to_string())),
    }
}

/// JSON bodies are parsed, an empty body becomes `null` and anything else
/// is kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
