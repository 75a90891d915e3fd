//! User account metadata and contribution listings

use crate::error::{Error, Result};
use crate::http::{action_params, ApiClient};
use crate::pagination::{paginate_while, PaginationConfig};
use crate::types::{ContributionRecord, UserRecord};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

/// The API caps `ususers=` batches at 50 for anonymous clients
const BATCH_SIZE: usize = 50;

const USER_PROPS: &str = "blockinfo|groups|editcount|registration|gender";
const CONTRIB_PROPS: &str = "ids|title|comment|timestamp|flags|size|sizediff";

const TIMESTAMP_FMT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Fetch account metadata for a batch of usernames.
///
/// Results come back in API order, 50 names per request. Nonexistent
/// accounts are returned with `missing` set rather than dropped, so the
/// output length matches the input.
pub async fn user_info(
    client: &ApiClient,
    endpoint: &str,
    usernames: &[String],
) -> Result<Vec<UserRecord>> {
    let mut records = Vec::with_capacity(usernames.len());

    for chunk in usernames.chunks(BATCH_SIZE) {
        let mut params = action_params("query");
        params.insert("list".to_string(), "users".to_string());
        params.insert("ususers".to_string(), chunk.join("|"));
        params.insert("usprop".to_string(), USER_PROPS.to_string());

        let body = client.execute(endpoint, &params).await?;
        let users = body["query"]["users"]
            .as_array()
            .ok_or_else(|| Error::decode("users response missing 'query.users'"))?;
        for user in users {
            records.push(serde_json::from_value(user.clone())?);
        }
    }

    debug!(requested = usernames.len(), returned = records.len(), "fetched user info");
    Ok(records)
}

fn extract_contributions(body: &Value) -> Result<Vec<ContributionRecord>> {
    let Some(contribs) = body["query"]["usercontribs"].as_array() else {
        return Ok(Vec::new());
    };
    contribs
        .iter()
        .map(|c| serde_json::from_value(c.clone()).map_err(Error::from))
        .collect()
}

/// Fetch a user's edits within `[start, stop]`, oldest first.
///
/// The window bounds the listing on the server via `ucstart`/`ucend` and is
/// re-applied locally; collection stops requesting further pages at the
/// first out-of-window record.
pub async fn user_contributions(
    client: &ApiClient,
    endpoint: &str,
    user: &str,
    start: DateTime<Utc>,
    stop: DateTime<Utc>,
) -> Result<Vec<ContributionRecord>> {
    let mut params = action_params("query");
    params.insert("list".to_string(), "usercontribs".to_string());
    params.insert("ucuser".to_string(), user.to_string());
    params.insert("ucprop".to_string(), CONTRIB_PROPS.to_string());
    params.insert("uclimit".to_string(), "500".to_string());
    params.insert("ucdir".to_string(), "newer".to_string());
    params.insert(
        "ucstart".to_string(),
        start.format(TIMESTAMP_FMT).to_string(),
    );
    params.insert("ucend".to_string(), stop.format(TIMESTAMP_FMT).to_string());

    let mut contributions = paginate_while(
        client,
        endpoint,
        params,
        extract_contributions,
        |c: &ContributionRecord| c.timestamp <= stop,
        &PaginationConfig::default(),
    )
    .await?;

    contributions.retain(|c| c.timestamp >= start && c.timestamp <= stop);
    debug!(%user, edits = contributions.len(), "fetched user contributions");
    Ok(contributions)
}
