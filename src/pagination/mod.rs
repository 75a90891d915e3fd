//! Paginated aggregation
//!
//! Drives repeated Request Executor calls through the continuation-token
//! protocol and yields one merged, order-preserving collection once
//! exhaustion is detected.
//!
//! # Guarantees
//!
//! - Items from all rounds are concatenated in request order; within-response
//!   order is preserved verbatim. Nothing is dropped or reordered.
//! - A continuation state seen twice, or a page count past the configured
//!   cap, fails with [`Error::PaginationExhausted`] instead of looping.
//! - Executor failures propagate unchanged; retry policy lives below, in the
//!   Executor, never here.

mod continuation;

pub use continuation::{extract_continuation, Continuation};

use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::types::ParamMap;
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Configuration for pagination behavior
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// Hard cap on round-trips for a single listing. Generous but finite;
    /// listings that legitimately exceed it should raise it explicitly.
    pub max_pages: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { max_pages: 10_000 }
    }
}

impl PaginationConfig {
    /// Create a config with a custom page cap
    pub fn with_max_pages(max_pages: u32) -> Self {
        Self { max_pages }
    }
}

/// Collect every item of a paginated listing.
///
/// `extract_items` pulls the page's items out of one response body; it is
/// also the seam where callers capture response-level context (such as the
/// canonical title) via a mutable closure.
pub async fn paginate<T, F>(
    client: &ApiClient,
    endpoint: &str,
    base_params: ParamMap,
    extract_items: F,
    config: &PaginationConfig,
) -> Result<Vec<T>>
where
    F: FnMut(&Value) -> Result<Vec<T>>,
{
    paginate_while(client, endpoint, base_params, extract_items, |_| true, config).await
}

/// Collect items while `keep` accepts them.
///
/// The first rejected item ends the collection: it is not included, later
/// items on the same page are discarded, and no further request is made.
/// Date-bounded listings use this to stop asking for pages that can only
/// contain out-of-window records.
pub async fn paginate_while<T, F, K>(
    client: &ApiClient,
    endpoint: &str,
    base_params: ParamMap,
    mut extract_items: F,
    keep: K,
    config: &PaginationConfig,
) -> Result<Vec<T>>
where
    F: FnMut(&Value) -> Result<Vec<T>>,
    K: Fn(&T) -> bool,
{
    let mut items = Vec::new();
    let mut params = base_params;
    let mut seen_tokens: HashSet<String> = HashSet::new();
    let mut pages: u32 = 0;

    loop {
        let body = client.execute(endpoint, &params).await?;
        pages += 1;

        let page_items = extract_items(&body)?;
        debug!(page = pages, count = page_items.len(), "pagination round");

        let mut bounded = false;
        for item in page_items {
            if keep(&item) {
                items.push(item);
            } else {
                bounded = true;
                break;
            }
        }
        if bounded {
            break;
        }

        let Some(continuation) = extract_continuation(&body) else {
            break;
        };

        if pages >= config.max_pages {
            return Err(Error::pagination_exhausted("iteration cap reached", pages));
        }
        if !seen_tokens.insert(continuation.fingerprint()) {
            return Err(Error::pagination_exhausted(
                "continuation token repeated",
                pages,
            ));
        }

        continuation.merge_into(&mut params);
    }

    Ok(items)
}
