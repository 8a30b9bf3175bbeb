//! # Parliament API clients
//!
//! HTTP implementations of the core collaborator traits against the public
//! UK Parliament APIs:
//!
//! - [`CommonsVotesClient`]: Commons Votes API ([`CommonsVotesApi`])
//! - [`LordsVotesClient`]: Lords Votes API ([`LordsVotesApi`])
//! - [`MembersClient`]: Members API head counts ([`MemberDirectory`])
//! - [`BillsClient`]: Bills API search and fetch ([`BillSource`])
//!
//! Every request goes through [`fetch_json`], so a non-2xx status is an error
//! just like a transport or decode failure. Nothing is retried.

use async_trait::async_trait;
use division_bot_core::commons::{CommonsDivision, CommonsVotesApi};
use division_bot_core::contract::{Bill, BillSource, BillSummary, ClientError, MemberDirectory};
use division_bot_core::lords::{LordsDivision, LordsVotesApi};
use division_bot_core::Chamber;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};

/// Send a request and decode its JSON body, treating non-2xx statuses as errors.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    what: &str,
) -> Result<T, ClientError> {
    let response = request.send().await.map_err(|e| {
        error!(error = ?e, what, "Request failed");
        e
    })?;
    let status = response.status();
    let response = response.error_for_status().map_err(|e| {
        error!(%status, what, "API returned error status");
        e
    })?;
    let body = response.json::<T>().await.map_err(|e| {
        error!(error = ?e, what, "Failed to decode response body");
        e
    })?;
    debug!(%status, what, "Request succeeded");
    Ok(body)
}

pub(crate) fn http_client(timeout: Option<Duration>) -> Result<Client, ClientError> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

fn base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

pub struct CommonsVotesClient {
    http: Client,
    base_url: String,
}

impl CommonsVotesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: http_client(Some(timeout))?,
            base_url: base(base_url),
        })
    }
}

#[async_trait]
impl CommonsVotesApi for CommonsVotesClient {
    async fn search(&self, take: usize, skip: usize) -> Result<Vec<CommonsDivision>, ClientError> {
        let url = format!("{}/data/divisions.json/search", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("take", take), ("skip", skip)]);
        fetch_json(request, "commons division search").await
    }

    async fn get(&self, division_id: i64) -> Result<CommonsDivision, ClientError> {
        let url = format!("{}/data/division/{}.json", self.base_url, division_id);
        fetch_json(self.http.get(&url), "commons division").await
    }
}

pub struct LordsVotesClient {
    http: Client,
    base_url: String,
}

impl LordsVotesClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: http_client(Some(timeout))?,
            base_url: base(base_url),
        })
    }
}

#[async_trait]
impl LordsVotesApi for LordsVotesClient {
    async fn search(&self, take: usize, skip: usize) -> Result<Vec<LordsDivision>, ClientError> {
        let url = format!("{}/data/Divisions/search", self.base_url);
        let request = self
            .http
            .get(&url)
            .query(&[("take", take), ("skip", skip)]);
        fetch_json(request, "lords division search").await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberSearchResult {
    total_results: i64,
}

/// Counts current members through the Members API search.
#[derive(Clone)]
pub struct MembersClient {
    http: Client,
    base_url: String,
}

impl MembersClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self {
            http: http_client(Some(timeout))?,
            base_url: base(base_url),
        })
    }
}

#[async_trait]
impl MemberDirectory for MembersClient {
    async fn total_current_members(&self, chamber: Chamber) -> Result<i64, ClientError> {
        let url = format!("{}/api/Members/Search", self.base_url);
        let house = chamber.house_number().to_string();
        // Only the total is needed, so ask for a single item.
        let request = self.http.get(&url).query(&[
            ("House", house.as_str()),
            ("IsCurrentMember", "true"),
            ("skip", "0"),
            ("take", "1"),
        ]);
        let result: MemberSearchResult = fetch_json(request, "member search").await?;
        debug!(%chamber, total = result.total_results, "Fetched current member total");
        Ok(result.total_results)
    }
}

#[derive(Debug, Deserialize)]
struct BillSearchResult {
    #[serde(default)]
    items: Vec<BillSummary>,
}

/// Bills API client. Requests carry no timeout.
pub struct BillsClient {
    http: Client,
    base_url: String,
}

impl BillsClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http: http_client(None)?,
            base_url: base(base_url),
        })
    }
}

#[async_trait]
impl BillSource for BillsClient {
    async fn search(&self, term: &str, take: usize) -> Result<Vec<BillSummary>, ClientError> {
        let url = format!("{}/api/v1/Bills", self.base_url);
        let take = take.to_string();
        let request = self
            .http
            .get(&url)
            .query(&[("SearchTerm", term), ("Take", take.as_str())]);
        let result: BillSearchResult = fetch_json(request, "bill search").await?;
        Ok(result.items)
    }

    async fn get(&self, bill_id: i64) -> Result<Bill, ClientError> {
        let url = format!("{}/api/v1/Bills/{}", self.base_url, bill_id);
        fetch_json(self.http.get(&url), "bill").await
    }
}
