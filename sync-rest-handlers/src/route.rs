//! Dataset route resolution.

use crate::config::SyncRestOptions;
use tracing::debug;

/// Joins two path segments with exactly one `/` between them.
pub fn join_path(base: &str, segment: &str) -> String {
    let head = base.trim_end_matches('/');
    let tail = segment.trim_start_matches('/');

    if tail.is_empty() {
        return base.to_string();
    }
    if head.is_empty() {
        return if base.starts_with('/') {
            format!("/{tail}")
        } else {
            tail.to_string()
        };
    }
    format!("{head}/{tail}")
}

/// Resolves the request path for a dataset.
///
/// With a non-empty `path_to_prepend` the result is that prefix joined to
/// the dataset name; otherwise the dataset name is returned unchanged.
pub fn build_route(options: &SyncRestOptions, dataset: &str) -> String {
    let route = match options.path_to_prepend.as_deref().filter(|p| !p.is_empty()) {
        Some(prefix) => join_path(prefix, dataset),
        None => dataset.to_string(),
    };
    debug!("resolved route {route} for dataset {dataset}");
    route
}
