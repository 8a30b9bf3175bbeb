#![allow(unused)]

//! # contract: collaborator interfaces for the sync pipeline
//!
//! This module defines the traits the orchestrator depends on, together with
//! the plain record types that cross them:
//!
//! - [`DivisionSource`]: one chamber's division feed, already normalised into [`Division`]s
//! - [`BillSource`]: bill search and full bill fetch
//! - [`Publisher`]: creates a post on the blog
//! - [`CursorStore`]: reads and writes the per-chamber sync cursor
//! - [`MemberDirectory`]: current member totals per chamber
//!
//! ## Mocking & Testing
//! - Every trait is annotated for `mockall` so tests can build deterministic mocks
//!   (`MockDivisionSource`, `MockPublisher`, ...). The mocks are exported under the
//!   `test-export-mocks` feature, enabled by default.
//!
//! ## Errors
//! - All methods return [`ClientError`], a boxed error. Implementors convert their
//!   transport and decode errors into it; the orchestrator wraps them with the
//!   stage that failed.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::chamber::Chamber;
use crate::report::{ContentBlock, RowsLayout};

/// Error type shared by all collaborator traits.
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

/// One member who voted in a division.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BallotCaster {
    /// Display form of the member's name.
    pub name: String,
    /// Form used for alphabetical ordering.
    pub sort_name: String,
    /// Full party name, used to group the individual vote listing.
    pub party: String,
    /// Short party code, used to group the percentage tally.
    pub party_abbreviation: String,
}

/// One recorded vote, normalised from a chamber feed.
///
/// `yes_count`/`no_count` are the authoritative totals and may exceed the
/// number of listed voters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Division {
    pub id: i64,
    pub title_prefix: String,
    pub title: String,
    pub description: Option<String>,
    pub yes_voters: Vec<BallotCaster>,
    pub yes_count: i64,
    pub no_voters: Vec<BallotCaster>,
    pub no_count: i64,
}

/// Stage a bill is currently at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillStage {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub house: Option<String>,
}

/// Bill as returned by the bill search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSummary {
    pub bill_id: i64,
    pub short_title: String,
    #[serde(default)]
    pub current_house: Option<String>,
    #[serde(default)]
    pub originating_house: Option<String>,
}

/// Full bill record, including the long title and stage metadata.
///
/// Everything past the title may be missing or `null` in the Bills API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub bill_id: i64,
    pub short_title: String,
    #[serde(default)]
    pub long_title: Option<String>,
    #[serde(default)]
    pub originating_house: Option<String>,
    #[serde(default)]
    pub current_house: Option<String>,
    #[serde(default)]
    pub current_stage: Option<BillStage>,
}

/// A post ready to hand to the [`Publisher`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPost {
    pub content: Vec<ContentBlock>,
    pub tags: Vec<String>,
    pub layout: Vec<RowsLayout>,
}

/// One chamber's division feed, normalised into the common [`Division`] model.
///
/// Pages are newest-first. Implementations exist per chamber (see
/// [`crate::commons::CommonsSource`] and [`crate::lords::LordsSource`]).
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DivisionSource: Send + Sync {
    /// Which chamber this feed belongs to.
    fn chamber(&self) -> Chamber;

    /// Fetch `take` divisions starting `skip` entries from the newest.
    async fn division_page(&self, take: usize, skip: usize) -> Result<Vec<Division>, ClientError>;

    /// Number of current members of the chamber.
    async fn total_members(&self) -> Result<i64, ClientError>;

    /// Public page for a division.
    fn vote_url(&self, division_id: i64) -> String;
}

/// Current member totals, per chamber.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn total_current_members(&self, chamber: Chamber) -> Result<i64, ClientError>;
}

/// Search and fetch bills.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait BillSource: Send + Sync {
    /// Title search, returning at most `take` results ranked by the source.
    async fn search(&self, term: &str, take: usize) -> Result<Vec<BillSummary>, ClientError>;

    /// Fetch the full record for a bill found by [`BillSource::search`].
    async fn get(&self, bill_id: i64) -> Result<Bill, ClientError>;
}

/// Publishes compiled reports to the blog.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Create a post and return its identifier.
    async fn create_post(&self, post: &NewPost) -> Result<String, ClientError>;
}

/// Durable per-chamber sync cursor.
///
/// `write_cursor` must not return before the value is persisted.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CursorStore: Send + Sync {
    async fn read_cursor(&self, chamber: Chamber) -> Result<i64, ClientError>;

    async fn write_cursor(&self, chamber: Chamber, division_id: i64) -> Result<(), ClientError>;
}
