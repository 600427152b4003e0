//! Web search via the Serper API.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tools::ToolError;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    q: &'a str,
    num: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct SearchTool {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl SearchTool {
    pub fn new(api_key: String, endpoint: String) -> Result<Self, ToolError> {
        let client = Client::builder()
            .timeout(SEARCH_TIMEOUT)
            .build()
            .map_err(|e| ToolError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            endpoint,
        })
    }

    /// Returns up to `limit` organic results. An empty result set is `NotFound`.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>, ToolError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&SearchRequest { q: query, num: limit })
            .send()
            .await
            .map_err(|e| ToolError::Network(e.to_string()))?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(ToolError::RateLimited(format!("search API returned {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ToolError::Network(format!("search API returned {status}: {body}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| ToolError::Network(format!("invalid search response: {e}")))?;

        debug!("Search '{}' returned {} hits", query, parsed.organic.len());

        if parsed.organic.is_empty() {
            return Err(ToolError::NotFound(format!("no results for '{query}'")));
        }

        Ok(parsed.organic.into_iter().take(limit).collect())
    }
}
