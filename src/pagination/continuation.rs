//! Continuation-token extraction
//!
//! The MediaWiki API signals "more results" with a set of named tokens.
//! Modern servers put them in a top-level `continue` object; older servers
//! use a `query-continue` object nested per query module. Either way the
//! protocol is the same: merge exactly the returned keys into the next
//! request's parameters, and treat the absence of all keys as exhaustion.

use crate::types::ParamMap;
use serde_json::Value;
use std::collections::BTreeMap;

/// The named continuation tokens from one response.
///
/// Tokens are kept sorted so that two states with the same keys and values
/// have the same fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Continuation {
    tokens: BTreeMap<String, String>,
}

impl Continuation {
    /// Merge the tokens over the base parameters for the next round-trip
    pub fn merge_into(&self, params: &mut ParamMap) {
        for (key, value) in &self.tokens {
            params.insert(key.clone(), value.clone());
        }
    }

    /// Stable identity of this continuation state, used to detect servers
    /// that hand back the same token forever
    pub fn fingerprint(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.tokens {
            if !out.is_empty() {
                out.push('&');
            }
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Extract the continuation state from a response body, if any
pub fn extract_continuation(body: &Value) -> Option<Continuation> {
    let mut tokens = BTreeMap::new();

    if let Some(cont) = body.get("continue").and_then(Value::as_object) {
        for (key, value) in cont {
            tokens.insert(key.clone(), value_to_token(value));
        }
    } else if let Some(legacy) = body.get("query-continue").and_then(Value::as_object) {
        // Legacy form nests tokens one level deeper, per query module
        for inner in legacy.values() {
            if let Some(obj) = inner.as_object() {
                for (key, value) in obj {
                    tokens.insert(key.clone(), value_to_token(value));
                }
            }
        }
    }

    if tokens.is_empty() {
        None
    } else {
        Some(Continuation { tokens })
    }
}

/// Tokens are usually strings but legacy servers return numeric ids
fn value_to_token(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
