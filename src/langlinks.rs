//! Interlanguage link aggregation
//!
//! Maps a page to its counterparts on other-language wikis via the
//! paginated `prop=langlinks` listing. The API never lists the source
//! wiki's own language, so the result seeds it explicitly: the language
//! code is derived from the endpoint host's first label and mapped to the
//! canonical title the response resolved the request to.

use crate::error::{Error, Result};
use crate::http::{action_params, build_api_url, ApiClient};
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{LangLink, Title};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;
use url::Url;

/// Language code of the wiki an endpoint points at (`en.wikipedia.org`
/// yields `en`)
fn endpoint_language(endpoint: &str) -> Result<String> {
    let url = Url::parse(&build_api_url(endpoint)?)?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::decode(format!("endpoint has no host: '{endpoint}'")))?;
    let lang = host.split('.').next().unwrap_or(host);
    Ok(lang.to_string())
}

fn extract_langlinks(body: &Value) -> Result<Vec<LangLink>> {
    let pages = body["query"]["pages"]
        .as_array()
        .ok_or_else(|| Error::decode("langlinks response missing 'query.pages'"))?;
    let Some(links) = pages
        .first()
        .and_then(|p| p.get("langlinks"))
        .and_then(Value::as_array)
    else {
        return Ok(Vec::new());
    };
    links
        .iter()
        .map(|l| serde_json::from_value(l.clone()).map_err(Error::from))
        .collect()
}

/// Titles of a page's counterparts on every language wiki that has one,
/// keyed by language code. Includes the source wiki's own language.
pub async fn interlanguage_links(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
) -> Result<BTreeMap<String, Title>> {
    let mut params = action_params("query");
    params.insert("prop".to_string(), "langlinks".to_string());
    params.insert("titles".to_string(), title.to_string());
    params.insert("llprop".to_string(), "autonym|langname".to_string());
    params.insert("lllimit".to_string(), "500".to_string());
    params.insert("redirects".to_string(), "1".to_string());

    let mut canonical: Option<String> = None;
    let links = paginate(
        client,
        endpoint,
        params,
        |body| {
            if canonical.is_none() {
                canonical = body["query"]["pages"]
                    .as_array()
                    .and_then(|pages| pages.first())
                    .and_then(|p| p.get("title"))
                    .and_then(Value::as_str)
                    .map(String::from);
            }
            extract_langlinks(body)
        },
        &PaginationConfig::default(),
    )
    .await?;

    let mut map: BTreeMap<String, Title> = links
        .into_iter()
        .map(|l: LangLink| (l.lang, l.title))
        .collect();

    let source_lang = endpoint_language(endpoint)?;
    let source_title = canonical.unwrap_or_else(|| title.to_string());
    map.insert(source_lang, source_title);

    debug!(%title, languages = map.len(), "fetched interlanguage links");
    Ok(map)
}
