//! House of Commons division feed.
//!
//! The Commons Votes API search returns summaries without ballots, so each
//! summary on a page is re-fetched in full before normalisation.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Deserialize;
use tracing::debug;

use crate::chamber::Chamber;
use crate::contract::{BallotCaster, ClientError, Division, DivisionSource, MemberDirectory};

pub const VOTE_URL_BASE: &str = "https://votes.parliament.uk/votes/commons/division/";
pub const TITLE_PREFIX: &str = "On: ";

/// Member record as it appears in a Commons division.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommonsMember {
    pub member_id: i64,
    pub name: String,
    #[serde(default)]
    pub party: String,
    #[serde(default)]
    pub party_abbreviation: String,
}

/// Commons division, either a search summary or a full record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CommonsDivision {
    pub division_id: i64,
    pub title: String,
    pub aye_count: i64,
    pub no_count: i64,
    #[serde(default)]
    pub ayes: Vec<CommonsMember>,
    #[serde(default)]
    pub noes: Vec<CommonsMember>,
}

/// Raw Commons Votes API.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CommonsVotesApi: Send + Sync {
    /// Division summaries, newest first.
    async fn search(&self, take: usize, skip: usize) -> Result<Vec<CommonsDivision>, ClientError>;

    /// Full division record including ballots.
    async fn get(&self, division_id: i64) -> Result<CommonsDivision, ClientError>;
}

fn parse_member(member: CommonsMember) -> BallotCaster {
    BallotCaster {
        sort_name: member.name.clone(),
        name: member.name,
        party: member.party,
        party_abbreviation: member.party_abbreviation,
    }
}

/// Map a full Commons record onto the common [`Division`] model.
pub fn parse_division(division: CommonsDivision) -> Division {
    Division {
        id: division.division_id,
        title_prefix: TITLE_PREFIX.to_string(),
        title: division.title,
        description: None,
        yes_voters: division.ayes.into_iter().map(parse_member).collect(),
        yes_count: division.aye_count,
        no_voters: division.noes.into_iter().map(parse_member).collect(),
        no_count: division.no_count,
    }
}

/// [`DivisionSource`] for the House of Commons.
pub struct CommonsSource<A, M> {
    api: A,
    members: M,
}

impl<A, M> CommonsSource<A, M>
where
    A: CommonsVotesApi,
    M: MemberDirectory,
{
    pub fn new(api: A, members: M) -> Self {
        Self { api, members }
    }
}

#[async_trait]
impl<A, M> DivisionSource for CommonsSource<A, M>
where
    A: CommonsVotesApi,
    M: MemberDirectory,
{
    fn chamber(&self) -> Chamber {
        Chamber::Commons
    }

    async fn division_page(&self, take: usize, skip: usize) -> Result<Vec<Division>, ClientError> {
        let summaries = self.api.search(take, skip).await?;
        debug!(take, skip, count = summaries.len(), "Fetched Commons division summaries");

        let mut page = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let full = self.api.get(summary.division_id).await?;
            page.push(parse_division(full));
        }
        Ok(page)
    }

    async fn total_members(&self) -> Result<i64, ClientError> {
        self.members.total_current_members(Chamber::Commons).await
    }

    fn vote_url(&self, division_id: i64) -> String {
        format!("{VOTE_URL_BASE}{division_id}")
    }
}
