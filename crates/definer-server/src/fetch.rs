use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, USER_AGENT};
use thiserror::Error;
use tracing::debug;

use crate::user_agents::UserAgentPool;

pub const DEFAULT_SEARCH_URL: &str = "https://www.google.com/search";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream rate limited the request")]
    RateLimited,
    #[error("upstream answered with status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Supplies the raw HTML of a "define <word>" results page.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_definition_page(&self, word: &str) -> Result<String, FetchError>;
}

/// Fetches results pages from the search engine, rotating user agents.
pub struct GoogleSource {
    client: reqwest::Client,
    search_url: String,
    user_agents: Arc<UserAgentPool>,
}

impl GoogleSource {
    pub fn new(
        search_url: impl Into<String>,
        user_agents: Arc<UserAgentPool>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            search_url: search_url.into(),
            user_agents,
        })
    }
}

#[async_trait]
impl PageSource for GoogleSource {
    async fn fetch_definition_page(&self, word: &str) -> Result<String, FetchError> {
        let user_agent = self.user_agents.choose();
        let query = format!("define {word}");
        debug!(word, user_agent, "fetching definition page");

        let resp = self
            .client
            .get(&self.search_url)
            .query(&[("hl", "en"), ("q", query.as_str())])
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, "text/html")
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(resp.text().await?)
    }
}
