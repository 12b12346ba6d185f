//! Per-adapter endpoint configuration.

use crate::error::{SyncRestError, SyncRestResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-call timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(25_000);

/// Where and how dataset calls are forwarded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRestOptions {
    /// Base URL of the REST service (e.g., "https://service.example.com").
    pub url: String,

    /// Identifier of the target service, used in error messages and logs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,

    /// Path segment(s) placed in front of every dataset route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_to_prepend: Option<String>,

    /// Per-call timeout in milliseconds. Unset or zero means [`DEFAULT_TIMEOUT`].
    #[serde(default, rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl SyncRestOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_guid(mut self, guid: impl Into<String>) -> Self {
        self.guid = Some(guid.into());
        self
    }

    pub fn with_path_to_prepend(mut self, path: impl Into<String>) -> Self {
        self.path_to_prepend = Some(path.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Effective per-call timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout_ms
            .filter(|ms| *ms > 0)
            .map_or(DEFAULT_TIMEOUT, Duration::from_millis)
    }

    /// Checks that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> SyncRestResult<()> {
        let url = reqwest::Url::parse(&self.url).map_err(|e| {
            SyncRestError::Config(format!("url \"{}\" is not a valid URL: {e}", self.url))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(SyncRestError::Config(format!(
                "url has unsupported scheme \"{other}\""
            ))),
        }
    }
}
