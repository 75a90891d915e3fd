//! Redirect resolution
//!
//! Reconciles alternate page titles so data collected under different titles
//! can be attributed to one canonical entity. Resolution is one-hop only:
//! the resolver records exactly the target the API reports and never chases
//! redirect chains, matching the API's own non-recursive behavior. Callers
//! that want full chains compose [`resolve_redirects`] on its own output.

use crate::error::{Error, Result};
use crate::http::{action_params, ApiClient};
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{RedirectMap, Title};
use serde_json::Value;
use tracing::debug;

/// The API caps `titles=` batches at 50 for anonymous clients
const BATCH_SIZE: usize = 50;

/// Resolve each input title to its canonical target.
///
/// Titles that are not redirects map to themselves. The returned map is
/// built fresh for this call and never cached.
pub async fn resolve_redirects(
    client: &ApiClient,
    endpoint: &str,
    titles: &[Title],
) -> Result<RedirectMap> {
    let mut map = RedirectMap::new();

    for chunk in titles.chunks(BATCH_SIZE) {
        let mut params = action_params("query");
        params.insert("prop".to_string(), "info".to_string());
        params.insert("titles".to_string(), chunk.join("|"));
        params.insert("redirects".to_string(), "1".to_string());

        let body = client.execute(endpoint, &params).await?;
        let query = body.get("query").ok_or_else(|| {
            Error::resolution(
                chunk.first().cloned().unwrap_or_default(),
                "response missing 'query'",
            )
        })?;

        if let Some(redirects) = query.get("redirects").and_then(Value::as_array) {
            for entry in redirects {
                let from = entry.get("from").and_then(Value::as_str);
                let to = entry.get("to").and_then(Value::as_str);
                match (from, to) {
                    (Some(from), Some(to)) => {
                        map.insert(from.to_string(), to.to_string());
                    }
                    _ => {
                        return Err(Error::resolution(
                            chunk.first().cloned().unwrap_or_default(),
                            "redirect entry missing 'from' or 'to'",
                        ));
                    }
                }
            }
        }
    }

    // Non-redirects resolve to themselves
    for title in titles {
        if !map.contains_key(title) {
            map.insert(title.clone(), title.clone());
        }
    }

    debug!(titles = titles.len(), resolved = map.len(), "resolved redirects");
    Ok(map)
}

/// Find every title whose redirect target is `title` (the inverse relation).
///
/// Pageview aggregation depends on this: the pageview service counts views
/// per literal title, so every alias has to be queried separately and the
/// series summed. A title with zero redirects yields an empty vec.
pub async fn redirects_linking_here(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
) -> Result<Vec<Title>> {
    let mut params = action_params("query");
    params.insert("titles".to_string(), title.to_string());
    params.insert("prop".to_string(), "linkshere".to_string());
    params.insert("lhprop".to_string(), "title|redirect".to_string());
    params.insert("lhnamespace".to_string(), "0".to_string());
    params.insert("lhshow".to_string(), "redirect".to_string());
    params.insert("lhlimit".to_string(), "500".to_string());

    paginate(
        client,
        endpoint,
        params,
        extract_linkshere,
        &PaginationConfig::default(),
    )
    .await
}

fn extract_linkshere(body: &Value) -> Result<Vec<Title>> {
    let pages = body["query"]["pages"]
        .as_array()
        .ok_or_else(|| Error::decode("linkshere response missing 'query.pages'"))?;
    let Some(page) = pages.first() else {
        return Ok(Vec::new());
    };
    let Some(links) = page.get("linkshere").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    Ok(links
        .iter()
        .filter_map(|l| l.get("title").and_then(Value::as_str).map(String::from))
        .collect())
}
