//! Request Executor: one API call in, parsed JSON or a typed failure out
//!
//! Owns everything transport-shaped: URL construction from endpoint
//! strings, the identifying User-Agent header, retries with backoff, and
//! token-bucket rate limiting. Layers above (pagination, resolvers,
//! aggregation functions) never retry; they propagate executor failures
//! unchanged.

mod client;
mod rate_limit;

pub use client::{build_api_url, ApiClient, ApiClientConfig, ApiClientConfigBuilder, BackoffType};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

use crate::types::ParamMap;

/// Base parameters shared by every action-API call
pub fn action_params(action: &str) -> ParamMap {
    let mut params = ParamMap::new();
    params.insert("action".to_string(), action.to_string());
    params.insert("format".to_string(), "json".to_string());
    params.insert("formatversion".to_string(), "2".to_string());
    params
}
