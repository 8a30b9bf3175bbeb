//! House of Lords division feed.
//!
//! The Lords Votes API search already carries the full member lists, so a
//! page maps straight onto [`Division`]s. Motion notes arrive as HTML.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;
use tracing::debug;

use crate::chamber::Chamber;
use crate::contract::{BallotCaster, ClientError, Division, DivisionSource, MemberDirectory};
use crate::html::strip_html;

pub const VOTE_URL_BASE: &str = "https://votes.parliament.uk/votes/lords/division/";
pub const TITLE_PREFIX: &str = "On: ";

/// Member record as it appears in a Lords division.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LordsMember {
    pub member_id: i64,
    pub name: String,
    pub list_as: String,
    #[serde(default)]
    pub party: String,
    #[serde(default)]
    pub party_abbreviation: String,
}

/// Lords division as returned by the search endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LordsDivision {
    pub division_id: i64,
    pub title: String,
    #[serde(default)]
    pub amendment_motion_notes: Option<String>,
    pub authoritative_content_count: i64,
    pub authoritative_not_content_count: i64,
    #[serde(default)]
    pub contents: Vec<LordsMember>,
    #[serde(default)]
    pub not_contents: Vec<LordsMember>,
}

/// Raw Lords Votes API.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait LordsVotesApi: Send + Sync {
    /// Full divisions, newest first.
    async fn search(&self, take: usize, skip: usize) -> Result<Vec<LordsDivision>, ClientError>;
}

fn parse_member(member: LordsMember) -> BallotCaster {
    BallotCaster {
        name: member.list_as.clone(),
        sort_name: member.list_as,
        party: member.party,
        party_abbreviation: member.party_abbreviation,
    }
}

/// Map a Lords record onto the common [`Division`] model.
pub fn parse_division(division: LordsDivision) -> Division {
    let description = division
        .amendment_motion_notes
        .as_deref()
        .map(strip_html)
        .filter(|notes| !notes.is_empty());

    Division {
        id: division.division_id,
        title_prefix: TITLE_PREFIX.to_string(),
        title: division.title,
        description,
        yes_voters: division.contents.into_iter().map(parse_member).collect(),
        yes_count: division.authoritative_content_count,
        no_voters: division.not_contents.into_iter().map(parse_member).collect(),
        no_count: division.authoritative_not_content_count,
    }
}

/// [`DivisionSource`] for the House of Lords.
pub struct LordsSource<A, M> {
    api: A,
    members: M,
}

impl<A, M> LordsSource<A, M>
where
    A: LordsVotesApi,
    M: MemberDirectory,
{
    pub fn new(api: A, members: M) -> Self {
        Self { api, members }
    }
}

#[async_trait]
impl<A, M> DivisionSource for LordsSource<A, M>
where
    A: LordsVotesApi,
    M: MemberDirectory,
{
    fn chamber(&self) -> Chamber {
        Chamber::Lords
    }

    async fn division_page(&self, take: usize, skip: usize) -> Result<Vec<Division>, ClientError> {
        let page = self.api.search(take, skip).await?;
        debug!(take, skip, count = page.len(), "Fetched Lords divisions");
        Ok(page.into_iter().map(parse_division).collect())
    }

    async fn total_members(&self) -> Result<i64, ClientError> {
        self.members.total_current_members(Chamber::Lords).await
    }

    fn vote_url(&self, division_id: i64) -> String {
        format!("{VOTE_URL_BASE}{division_id}")
    }
}
