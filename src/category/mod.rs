//! Category graph traversal
//!
//! The category graph is a directed graph, not a tree: cycles between
//! categories exist in the wild and the same page is frequently reachable
//! through several paths. [`walk_category`] therefore keeps an explicit
//! visited set keyed by normalized category title, marked before a category
//! is expanded, and deduplicates the final member set by title identity.
//! Recursion depth bounds alone would not prevent revisiting a node via a
//! different path.

use crate::error::{Error, Result};
use crate::http::{action_params, ApiClient};
use crate::pagination::{paginate, PaginationConfig};
use crate::types::{CategoryNode, ParamMap, Title};
use serde_json::Value;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

/// Normalize a category title: spaces to underscores, `Category:` prefix
/// added when missing
pub fn normalize_category_title(title: &str) -> Title {
    let title = title.replace(' ', "_");
    if title.starts_with("Category:") {
        title
    } else {
        format!("Category:{title}")
    }
}

fn member_params(title: &str) -> ParamMap {
    let mut params = action_params("query");
    params.insert("list".to_string(), "categorymembers".to_string());
    params.insert(
        "cmtitle".to_string(),
        normalize_category_title(title),
    );
    params.insert("cmprop".to_string(), "title".to_string());
    params.insert("cmlimit".to_string(), "500".to_string());
    params
}

fn extract_member_titles(body: &Value) -> Result<Vec<Title>> {
    let Some(members) = body["query"]["categorymembers"].as_array() else {
        return Ok(Vec::new());
    };
    Ok(members
        .iter()
        .filter_map(|m| m.get("title").and_then(Value::as_str).map(String::from))
        .collect())
}

/// Direct page members of a category (no recursion), in the main namespace
pub async fn direct_members(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
) -> Result<Vec<Title>> {
    let mut params = member_params(title);
    params.insert("cmnamespace".to_string(), "0".to_string());
    paginate(
        client,
        endpoint,
        params,
        extract_member_titles,
        &PaginationConfig::default(),
    )
    .await
}

/// Direct subcategory titles of a category
pub async fn subcategories(client: &ApiClient, endpoint: &str, title: &str) -> Result<Vec<Title>> {
    let mut params = member_params(title);
    params.insert("cmtype".to_string(), "subcat".to_string());
    paginate(
        client,
        endpoint,
        params,
        extract_member_titles,
        &PaginationConfig::default(),
    )
    .await
}

/// One category with its direct members and subcategories
pub async fn category_node(client: &ApiClient, endpoint: &str, title: &str) -> Result<CategoryNode> {
    let title = normalize_category_title(title);
    let pages = direct_members(client, endpoint, &title).await?;
    let subcategories = subcategories(client, endpoint, &title).await?;
    Ok(CategoryNode {
        title,
        pages,
        subcategories,
    })
}

/// Non-hidden categories a page is a member of
pub async fn page_categories(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
) -> Result<Vec<Title>> {
    let mut params = action_params("query");
    params.insert("prop".to_string(), "categories".to_string());
    params.insert("titles".to_string(), title.to_string());
    params.insert("clshow".to_string(), "!hidden".to_string());
    params.insert("cllimit".to_string(), "500".to_string());

    paginate(
        client,
        endpoint,
        params,
        |body| {
            let pages = body["query"]["pages"]
                .as_array()
                .ok_or_else(|| Error::decode("categories response missing 'query.pages'"))?;
            let Some(categories) = pages
                .first()
                .and_then(|p| p.get("categories"))
                .and_then(Value::as_array)
            else {
                return Ok(Vec::new());
            };
            Ok(categories
                .iter()
                .filter_map(|c| c.get("title").and_then(Value::as_str).map(String::from))
                .collect())
        },
        &PaginationConfig::default(),
    )
    .await
}

/// Collect the page members of a category and its subcategories down to
/// `depth` levels.
///
/// Depth 0 returns only the category's direct page members. Subcategory
/// titles are intermediate structure, never part of the returned set. A
/// failure fetching any subcategory aborts the whole walk with
/// [`Error::CategoryWalk`] carrying the path at which it occurred; there are
/// no partial trees.
pub async fn walk_category(
    client: &ApiClient,
    endpoint: &str,
    title: &str,
    depth: u32,
) -> Result<BTreeSet<Title>> {
    let root = normalize_category_title(title);

    let mut visited: HashSet<Title> = HashSet::new();
    visited.insert(root.clone());

    let mut members: BTreeSet<Title> = BTreeSet::new();
    // (category, remaining depth, path from the root for diagnostics)
    let mut worklist: Vec<(Title, u32, String)> = vec![(root.clone(), depth, root)];

    while let Some((category, remaining, path)) = worklist.pop() {
        debug!(%category, remaining, "expanding category");

        let pages = direct_members(client, endpoint, &category)
            .await
            .map_err(|e| Error::category_walk(&path, e))?;
        members.extend(pages);

        if remaining == 0 {
            continue;
        }

        let subs = subcategories(client, endpoint, &category)
            .await
            .map_err(|e| Error::category_walk(&path, e))?;
        for sub in subs {
            let sub = normalize_category_title(&sub);
            // Mark before expanding; cycles and diamonds revisit otherwise
            if visited.insert(sub.clone()) {
                let sub_path = format!("{path} > {sub}");
                worklist.push((sub, remaining - 1, sub_path));
            }
        }
    }

    Ok(members)
}
