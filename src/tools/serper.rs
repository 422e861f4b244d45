//! Serper web search
//!
//! Web search using the Serper API (Google results). Requires a Serper
//! API key. A shared `SerperClient` backs both the general web search
//! tool and the jurisdiction-scoped filing search tools.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::traits::{Tool, ToolResult};
use crate::config::SearchConfig;
use crate::{Error, Result};

/// A single search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Serper API response structures
#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganicResult>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganicResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: String,
}

/// Shared client for the Serper search API
pub struct SerperClient {
    client: Client,
    config: SearchConfig,
}

impl SerperClient {
    /// Create a new Serper client
    pub fn new(config: SearchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(SerperClient { client, config })
    }

    /// Default result cap for a single call
    pub fn result_count(&self) -> u8 {
        self.config.result_count
    }

    /// Perform a web search
    pub async fn search(&self, query: &str, count: u8) -> Result<Vec<SearchResult>> {
        let url = format!("{}/search", self.config.base_url);
        let body = serde_json::json!({
            "q": query,
            "num": count.min(10),
        });

        debug!("Serper search: {}", query);

        let response = self
            .client
            .post(&url)
            .header("X-API-KEY", self.config.api_key.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Search(format!("Serper request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "Serper search failed with status {}: {}",
                status, text
            )));
        }

        let serper_response: SerperResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("Failed to parse Serper response: {}", e)))?;

        Ok(serper_response
            .organic
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
            })
            .collect())
    }

    /// Perform a search scoped to a single site (e.g. "sec.gov")
    pub async fn site_search(&self, query: &str, site: &str, count: u8) -> Result<Vec<SearchResult>> {
        self.search(&format!("site:{} {}", site, query), count).await
    }
}

/// General web search tool - the fallback when the jurisdiction-specific
/// indexes return nothing useful.
pub struct GeneralWebSearchTool {
    serper: Arc<SerperClient>,
}

impl GeneralWebSearchTool {
    pub fn new(serper: Arc<SerperClient>) -> Self {
        Self { serper }
    }
}

#[async_trait]
impl Tool for GeneralWebSearchTool {
    fn name(&self) -> &str {
        "general_web_search"
    }

    fn description(&self) -> &str {
        "Use this as a fallback for general research or if you cannot find the document in the official filing databases. Returns web pages with titles, URLs, and snippets."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let query = args
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidInput("Missing 'query' parameter".to_string()))?;

        match self.serper.search(query, self.serper.result_count()).await {
            Ok(results) => {
                if results.is_empty() {
                    Ok(ToolResult::success(format!(
                        "No results found for '{}'. Try rephrasing your query.",
                        query
                    )))
                } else {
                    Ok(ToolResult::success(super::format_search_results(&results)))
                }
            }
            Err(e) => Ok(ToolResult::failure(format!("Search failed: {}", e))),
        }
    }
}
