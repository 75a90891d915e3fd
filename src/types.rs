//! Common types used throughout wikiharvest
//!
//! Shared type aliases and the record structs the aggregation functions
//! produce. The record structs deserialize directly from the JSON shapes
//! the MediaWiki action API returns with `formatversion=2`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// A normalized page or category title
pub type Title = String;

/// Query parameters for a single API call
pub type ParamMap = HashMap<String, String>;

/// Mapping from alias title to canonical title, built once per resolution
/// call and never cached across calls
pub type RedirectMap = HashMap<Title, Title>;

// ============================================================================
// Revisions
// ============================================================================

/// Ordering of a revision listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevisionOrder {
    /// Ascending by timestamp (the API's `rvdir=newer`)
    #[default]
    OldestFirst,
    /// Descending by timestamp (the API's `rvdir=older`)
    NewestFirst,
}

impl RevisionOrder {
    /// The `rvdir`/`ucdir` value this ordering maps to
    pub fn dir(self) -> &'static str {
        match self {
            RevisionOrder::OldestFirst => "newer",
            RevisionOrder::NewestFirst => "older",
        }
    }
}

/// One revision of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevisionRecord {
    pub revid: u64,
    #[serde(default)]
    pub parentid: u64,
    pub timestamp: DateTime<Utc>,
    /// Absent when the username was revision-deleted
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub userid: u64,
    /// Absent when the edit summary was revision-deleted
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub minor: bool,
    #[serde(default)]
    pub anon: bool,
    /// Byte-size change against the chronologically previous revision.
    /// Computed after the full listing is merged, not part of the API payload.
    #[serde(skip_deserializing, default)]
    pub size_delta: i64,
}

/// A page's complete (or date-bounded) revision listing, keyed by the
/// canonical title the API resolved the request to
#[derive(Debug, Clone, PartialEq)]
pub struct PageHistory {
    pub title: Title,
    pub revisions: Vec<RevisionRecord>,
}

// ============================================================================
// Users
// ============================================================================

/// Account metadata for one user, from `list=users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    #[serde(default)]
    pub userid: Option<u64>,
    #[serde(default)]
    pub editcount: Option<u64>,
    #[serde(default)]
    pub registration: Option<DateTime<Utc>>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub blockedby: Option<String>,
    #[serde(default)]
    pub blockreason: Option<String>,
    /// Set when the account does not exist
    #[serde(default)]
    pub missing: bool,
}

/// One edit attributed to a user, from `list=usercontribs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub revid: u64,
    #[serde(default)]
    pub parentid: u64,
    pub user: String,
    #[serde(default)]
    pub userid: u64,
    #[serde(default)]
    pub pageid: u64,
    #[serde(default)]
    pub ns: i32,
    pub title: Title,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub sizediff: i64,
    #[serde(default)]
    pub minor: bool,
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub top: bool,
}

// ============================================================================
// Categories
// ============================================================================

/// One category with its direct page members and direct subcategories.
/// The category graph is directed and may contain cycles.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryNode {
    pub title: Title,
    pub pages: Vec<Title>,
    pub subcategories: Vec<Title>,
}

// ============================================================================
// Language links
// ============================================================================

/// One interlanguage link, from `prop=langlinks`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LangLink {
    pub lang: String,
    pub title: Title,
    #[serde(default)]
    pub autonym: Option<String>,
    #[serde(default)]
    pub langname: Option<String>,
}

// ============================================================================
// Pageviews
// ============================================================================

/// One row of the Wikimedia pageviews REST API `items` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageViewItem {
    pub article: String,
    /// `YYYYMMDDHH` as returned by the REST API
    pub timestamp: String,
    pub views: u64,
}

impl PageViewItem {
    /// Parse the `YYYYMMDDHH` timestamp down to its calendar date
    pub fn date(&self) -> crate::error::Result<NaiveDate> {
        let day = self.timestamp.get(..8).ok_or_else(|| {
            crate::error::Error::decode(format!(
                "pageview timestamp too short: '{}'",
                self.timestamp
            ))
        })?;
        NaiveDate::parse_from_str(day, "%Y%m%d").map_err(|e| {
            crate::error::Error::decode(format!(
                "bad pageview timestamp '{}': {e}",
                self.timestamp
            ))
        })
    }
}
