//! Browser user agents rotated across outbound page fetches.
//!
//! The list is downloaded once at startup and then shared read-only through
//! [`crate::AppState`] and the page source. A failed download is not fatal:
//! the pool falls back to a single built-in agent.

use rand::seq::SliceRandom;
use tracing::{info, warn};

use crate::fetch::FetchError;

pub const DEFAULT_USER_AGENTS_URL: &str = "https://jnrbsn.github.io/user-agents/user-agents.json";
pub const FALLBACK_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/110.0";

#[derive(Debug, Clone)]
pub struct UserAgentPool {
    agents: Vec<String>,
}

impl UserAgentPool {
    /// Build a pool from `agents`, dropping blank entries. An empty result
    /// falls back to [`FALLBACK_USER_AGENT`].
    pub fn new(agents: Vec<String>) -> Self {
        let agents: Vec<String> = agents
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if agents.is_empty() {
            return Self::builtin();
        }
        Self { agents }
    }

    pub fn builtin() -> Self {
        Self {
            agents: vec![FALLBACK_USER_AGENT.to_string()],
        }
    }

    /// Download a JSON array of user-agent strings from `url`.
    pub async fn load(client: &reqwest::Client, url: &str) -> Result<Self, FetchError> {
        let resp = client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let agents: Vec<String> = resp.json().await?;
        Ok(Self::new(agents))
    }

    /// Like [`UserAgentPool::load`], but logs and falls back to the built-in
    /// agent on any failure.
    pub async fn load_or_builtin(client: &reqwest::Client, url: &str) -> Self {
        match Self::load(client, url).await {
            Ok(pool) => {
                info!("loaded {} user agents from {url}", pool.len());
                pool
            }
            Err(err) => {
                warn!("failed to load user agents from {url}: {err}; using built-in agent");
                Self::builtin()
            }
        }
    }

    /// A uniformly random agent from the pool.
    pub fn choose(&self) -> &str {
        self.agents
            .choose(&mut rand::thread_rng())
            .map(String::as_str)
            .unwrap_or(FALLBACK_USER_AGENT)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}

impl Default for UserAgentPool {
    fn default() -> Self {
        Self::builtin()
    }
}
