//! Error types for REST-backed sync handlers.

use crate::engine::{EngineError, Operation};
use serde_json::Value;
use thiserror::Error;

/// Result type for adapter operations.
pub type SyncRestResult<T> = Result<T, SyncRestError>;

/// Boxed error returned by header injection steps.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a failed service call. Exactly one of these is produced for
/// a call that does not succeed.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Header preparation failed; no request was sent.
    #[error("failed to prepare headers for service \"{target}\": {source}")]
    HeaderInjection {
        target: String,
        #[source]
        source: BoxError,
    },

    /// The request never produced a response (connect, timeout, reset).
    #[error("failed to perform call to service \"{target}\": {cause}")]
    Transport {
        target: String,
        /// The transport error and its full source chain, rendered.
        cause: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with anything other than 200.
    #[error(
        "service call to \"{target}\" returned {status} status. error: {}",
        render_detail(.failure_message, .body)
    )]
    Status {
        target: String,
        status: u16,
        body: Value,
        /// The body's `msg` field, when it has one.
        failure_message: Option<String>,
    },
}

impl ServiceError {
    pub(crate) fn transport(target: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            target: target.into(),
            cause: error_chain(&source),
            source,
        }
    }

    pub(crate) fn status(target: impl Into<String>, status: u16, body: Value) -> Self {
        let failure_message = body
            .get("msg")
            .filter(|msg| !msg.is_null())
            .map(|msg| match msg {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .filter(|msg| !msg.is_empty());
        Self::Status {
            target: target.into(),
            status,
            body,
            failure_message,
        }
    }

    /// The service-supplied failure message, if the body carried one.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                failure_message, ..
            } => failure_message.as_deref(),
            _ => None,
        }
    }

    /// HTTP status code, for non-success responses.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::HeaderInjection { target, .. }
            | Self::Transport { target, .. }
            | Self::Status { target, .. } => target,
        }
    }
}

/// Errors surfaced by the adapter to its callers.
#[derive(Debug, Error)]
pub enum SyncRestError {
    #[error("failed to init dataset {dataset}: {source}")]
    DatasetInit {
        dataset: String,
        #[source]
        source: EngineError,
    },

    #[error("failed to perform \"{operation}\" for dataset \"{dataset}\" using endpoint \"{endpoint}\": {source}")]
    Handler {
        operation: Operation,
        dataset: String,
        endpoint: String,
        #[source]
        source: ServiceError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

fn render_detail(failure_message: &Option<String>, body: &Value) -> String {
    match (failure_message, body) {
        (Some(msg), _) => msg.to_string(),
        (None, Value::String(s)) => s.clone(),
        (None, other) => other.to_string(),
    }
}

fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !rendered.contains(&text) {
            rendered.push_str(": ");
            rendered.push_str(&text);
        }
        source = cause.source();
    }
    rendered
}
