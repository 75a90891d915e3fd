// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]

//! # wikiharvest
//!
//! A read-only aggregation client for MediaWiki sites.
//!
//! Wraps the paginated, continuation-token-driven action API (and the
//! Wikimedia pageviews REST API) behind functions that return whole,
//! merged results: complete revision histories, recursively collected
//! category members, redirect-reconciled pageview series.
//!
//! ## Features
//!
//! - **Paginated aggregation**: continuation tokens followed to exhaustion,
//!   with loop and runaway protection
//! - **Redirect resolution**: alias titles reconciled to canonical pages,
//!   in both directions
//! - **Category walking**: cycle-safe recursive traversal of the category
//!   graph with bounded depth
//! - **Revision, user, content and pageview aggregation** over one retrying,
//!   rate-limited HTTP client
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wikiharvest::{ApiClient, RevisionOrder, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = ApiClient::new();
//!     let endpoint = wikiharvest::DEFAULT_ENDPOINT;
//!
//!     // Full revision history under the canonical title
//!     let history = wikiharvest::revisions::page_revisions(
//!         &client, endpoint, "Arithmetic logic unit", RevisionOrder::OldestFirst,
//!     ).await?;
//!     println!("{} revisions of {}", history.revisions.len(), history.title);
//!
//!     // Every page in a category tree, three levels deep
//!     let members = wikiharvest::category::walk_category(
//!         &client, endpoint, "Computer arithmetic", 3,
//!     ).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// HTTP client with retry and rate limiting
pub mod http;

/// Continuation-token pagination
pub mod pagination;

/// Redirect resolution, forward and inverse
pub mod redirect;

/// Recursive category traversal
pub mod category;

/// Revision history aggregation
pub mod revisions;

/// User metadata and contribution listings
pub mod users;

/// Rendered content and link lists
pub mod content;

/// Interlanguage links
pub mod langlinks;

/// Pageview series over the Wikimedia REST API
pub mod pageviews;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used entry points
pub use http::{ApiClient, ApiClientConfig, ApiClientConfigBuilder};
pub use pagination::{paginate, paginate_while, PaginationConfig};

/// Action API endpoint of English Wikipedia, the most common target
pub const DEFAULT_ENDPOINT: &str = "en.wikipedia.org/w/api.php";

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
