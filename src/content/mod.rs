//! Rendered content and link lists
//!
//! Page and revision bodies come from `action=parse`, which renders
//! wikitext to HTML server-side. This crate stops at the HTML: turning it
//! into plain text or anchor lists is the consumer's concern. Structured
//! outlinks come from the `prop=links` listing instead, which reflects the
//! wikitext link table rather than the rendered page.

use crate::error::{Error, Result};
use crate::http::{action_params, ApiClient};
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{ParamMap, Title};
use serde_json::Value;
use tracing::debug;

/// Rendered HTML for one page or revision
#[derive(Debug, Clone, PartialEq)]
pub struct PageContent {
    pub title: Title,
    pub html: String,
}

fn parse_params() -> ParamMap {
    let mut params = action_params("parse");
    params.insert("prop".to_string(), "text".to_string());
    params.insert("disableeditsection".to_string(), "1".to_string());
    params.insert("disabletoc".to_string(), "1".to_string());
    params
}

/// Pull title and HTML out of a parse response. A response without a
/// `parse` key (deleted or invalid page) yields empty content under the
/// input title.
fn extract_parsed(body: &Value, fallback_title: &str) -> PageContent {
    let Some(parse) = body.get("parse") else {
        return PageContent {
            title: fallback_title.to_string(),
            html: String::new(),
        };
    };
    let title = parse
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or(fallback_title)
        .to_string();
    // formatversion=2 returns text as a plain string
    let html = parse
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    PageContent { title, html }
}

/// Fetch the rendered HTML of a page's current revision.
pub async fn page_content_html(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
) -> Result<PageContent> {
    let mut params = parse_params();
    params.insert("page".to_string(), title.to_string());
    params.insert("redirects".to_string(), "1".to_string());

    let body = client.execute(endpoint, &params).await?;
    let content = extract_parsed(&body, title);
    debug!(title = %content.title, bytes = content.html.len(), "fetched page html");
    Ok(content)
}

/// Fetch the rendered HTML of one specific revision.
pub async fn revision_content_html(
    client: &ApiClient,
    endpoint: &str,
    revid: u64,
) -> Result<PageContent> {
    let mut params = parse_params();
    params.insert("oldid".to_string(), revid.to_string());

    let body = client.execute(endpoint, &params).await?;
    Ok(extract_parsed(&body, ""))
}

fn extract_external_links(body: &Value) -> Vec<String> {
    let Some(links) = body
        .get("parse")
        .and_then(|p| p.get("externallinks"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };
    links
        .iter()
        .filter_map(|l| l.as_str().map(String::from))
        .collect()
}

/// External URLs referenced by a page's current revision.
pub async fn page_external_links(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
) -> Result<Vec<String>> {
    let mut params = action_params("parse");
    params.insert("prop".to_string(), "externallinks".to_string());
    params.insert("page".to_string(), title.to_string());
    params.insert("redirects".to_string(), "1".to_string());

    let body = client.execute(endpoint, &params).await?;
    Ok(extract_external_links(&body))
}

/// External URLs referenced by one specific revision.
pub async fn revision_external_links(
    client: &ApiClient,
    endpoint: &str,
    revid: u64,
) -> Result<Vec<String>> {
    let mut params = action_params("parse");
    params.insert("prop".to_string(), "externallinks".to_string());
    params.insert("oldid".to_string(), revid.to_string());

    let body = client.execute(endpoint, &params).await?;
    Ok(extract_external_links(&body))
}

/// Main-namespace pages a page links to, in link-table order.
///
/// Duplicates are left in place; order carries meaning to callers that
/// want it, and deduplication is one `collect` away for those that don't.
pub async fn page_outlinks(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
) -> Result<Vec<Title>> {
    let mut params = action_params("query");
    params.insert("prop".to_string(), "links".to_string());
    params.insert("titles".to_string(), title.to_string());
    params.insert("plnamespace".to_string(), "0".to_string());
    params.insert("pllimit".to_string(), "500".to_string());
    params.insert("redirects".to_string(), "1".to_string());

    paginate(
        client,
        endpoint,
        params,
        |body| {
            let pages = body["query"]["pages"]
                .as_array()
                .ok_or_else(|| Error::decode("links response missing 'query.pages'"))?;
            let Some(links) = pages
                .first()
                .and_then(|p| p.get("links"))
                .and_then(Value::as_array)
            else {
                return Ok(Vec::new());
            };
            Ok(links
                .iter()
                .filter_map(|l| l.get("title").and_then(Value::as_str).map(String::from))
                .collect())
        },
        &PaginationConfig::default(),
    )
    .await
}
