//! Pageview aggregation over the Wikimedia REST API
//!
//! Pageviews live on a different service than the action API: the REST
//! metrics endpoint counts views per literal title, so views landing on a
//! redirect are credited to the redirect's own title, never the target.
//! [`page_views_with_redirects`] reunifies them by discovering the aliases
//! through the action API and summing one series per alias.

use crate::error::{Error, Result};
use crate::http::ApiClient;
use crate::redirect::redirects_linking_here;
use crate::types::PageViewItem;
use chrono::NaiveDate;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Base URL of the Wikimedia pageviews metrics service
pub const PAGEVIEWS_ENDPOINT: &str = "https://wikimedia.org/api/rest_v1/metrics/pageviews";

/// Daily per-article views keyed by calendar date
pub type PageViewSeries = BTreeMap<NaiveDate, u64>;

/// Build the per-article REST URL. The title is percent-encoded with no
/// safe characters, so `/` and `?` inside titles cannot break the path.
fn pageviews_url(
    base: &str,
    project: &str,
    title: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> String {
    format!(
        "{base}/per-article/{project}/all-access/user/{title}/daily/{from}/{to}",
        title = urlencoding::encode(title),
        from = from.format("%Y%m%d"),
        to = to.format("%Y%m%d"),
    )
}

fn extract_series(body: &Value) -> Result<PageViewSeries> {
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| Error::decode("pageviews response missing 'items'"))?;

    let mut series = PageViewSeries::new();
    for item in items {
        let item: PageViewItem = serde_json::from_value(item.clone())?;
        series.insert(item.date()?, item.views);
    }
    Ok(series)
}

async fn page_views_at(
    client: &ApiClient,
    base: &str,
    project: &str,
    title: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PageViewSeries> {
    let url = pageviews_url(base, project, title, from, to);
    let body = client.get_json(&url).await?;
    extract_series(&body)
}

/// Daily views for one literal title.
///
/// `project` is the host only (`en.wikipedia.org`); views landing on
/// redirects to this title are not included.
pub async fn page_views(
    client: &ApiClient,
    project: &str,
    title: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PageViewSeries> {
    page_views_at(client, PAGEVIEWS_ENDPOINT, project, title, from, to).await
}

async fn page_views_with_redirects_at(
    client: &ApiClient,
    base: &str,
    api_endpoint: &str,
    project: &str,
    title: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PageViewSeries> {
    // The title's own series must exist; failure here is a real failure
    let mut total = page_views_at(client, base, project, title, from, to).await?;

    let aliases = redirects_linking_here(client, api_endpoint, title).await?;
    debug!(%title, aliases = aliases.len(), "summing pageviews across redirects");

    for alias in &aliases {
        let series = match page_views_at(client, base, project, alias, from, to).await {
            Ok(series) => series,
            // An alias nobody has ever viewed has no series at all
            Err(Error::HttpStatus { status: 404, .. }) => PageViewSeries::new(),
            Err(e) => return Err(e),
        };
        for (date, views) in series {
            *total.entry(date).or_insert(0) += views;
        }
    }

    Ok(total)
}

/// Daily views for a title summed with every redirect pointing at it.
///
/// Alias discovery runs against the project's action API
/// (`{project}/w/api.php`). A date missing from one series counts as zero;
/// an alias with no pageview data at all contributes an empty series.
pub async fn page_views_with_redirects(
    client: &ApiClient,
    project: &str,
    title: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PageViewSeries> {
    let api_endpoint = format!("{project}/w/api.php");
    page_views_with_redirects_at(
        client,
        PAGEVIEWS_ENDPOINT,
        &api_endpoint,
        project,
        title,
        from,
        to,
    )
    .await
}

#[cfg(test)]
mod tests;
