//! Jurisdiction-specific filing search tools
//!
//! Three near-identical tools, one per jurisdiction, each a site-scoped
//! Serper search over the official filing index. The US tool additionally
//! falls back to the SEC submissions API (a small built-in company-to-CIK
//! table) when the scoped search is unavailable.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::serper::SerperClient;
use super::traits::{Tool, ToolResult};
use crate::{Error, Result};

/// Default base URL for the SEC submissions API
const SEC_API_BASE_URL: &str = "https://data.sec.gov";

/// Timeout for the SEC submissions fallback request
const SEC_API_TIMEOUT_SECS: u64 = 10;

/// CIK numbers for commonly queried US companies, used when the scoped
/// search API is unreachable.
const CIK_TABLE: &[(&str, &str)] = &[
    ("microsoft", "0000789019"),
    ("apple", "0000320193"),
    ("amazon", "0001018724"),
    ("google", "0001652044"),
    ("alphabet", "0001652044"),
    ("tesla", "0001318605"),
    ("netflix", "0001065280"),
    ("meta", "0001326801"),
    ("facebook", "0001326801"),
];

/// A filing jurisdiction and its official index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Jurisdiction {
    UnitedStates,
    Canada,
    Brazil,
}

impl Jurisdiction {
    /// Domain of the official filing index
    pub fn site(&self) -> &'static str {
        match self {
            Jurisdiction::UnitedStates => "sec.gov",
            Jurisdiction::Canada => "sedarplus.ca",
            Jurisdiction::Brazil => "cvm.gov.br",
        }
    }

    /// Human-readable name of the index
    pub fn index_name(&self) -> &'static str {
        match self {
            Jurisdiction::UnitedStates => "SEC EDGAR",
            Jurisdiction::Canada => "SEDAR+",
            Jurisdiction::Brazil => "CVM Empresas.NET",
        }
    }

    /// Name the LLM uses to request this tool
    pub fn tool_name(&self) -> &'static str {
        match self {
            Jurisdiction::UnitedStates => "search_sec_edgar",
            Jurisdiction::Canada => "search_sedar_plus",
            Jurisdiction::Brazil => "search_cvm_empresas_net",
        }
    }

    fn tool_description(&self) -> &'static str {
        match self {
            Jurisdiction::UnitedStates => {
                "Use this to search for US company filings on the SEC EDGAR database. Input should be a company name and the form type, e.g., 'Microsoft 10-K'."
            }
            Jurisdiction::Canada => {
                "Use this to search for Canadian company filings on the SEDAR+ database. Input should be a company name and the form type."
            }
            Jurisdiction::Brazil => {
                "Use this to search for Brazilian company filings on the CVM Empresas.NET database. Input should be a company name and the form type, e.g., 'Petrobras Formulário de Referência'."
            }
        }
    }
}

/// SEC submissions API response (only the field we use)
#[derive(Debug, Deserialize)]
struct SecSubmissions {
    #[serde(rename = "entityName")]
    entity_name: Option<String>,
}

/// Filing search tool for one jurisdiction
pub struct FilingSearchTool {
    jurisdiction: Jurisdiction,
    serper: Arc<SerperClient>,
    client: Client,
    sec_api_base: String,
}

impl FilingSearchTool {
    /// Create a search tool for the given jurisdiction
    pub fn new(jurisdiction: Jurisdiction, serper: Arc<SerperClient>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(SEC_API_TIMEOUT_SECS))
            .user_agent("FilingAgent/1.0")
            .build()?;

        Ok(Self {
            jurisdiction,
            serper,
            client,
            sec_api_base: SEC_API_BASE_URL.to_string(),
        })
    }

    /// Override the SEC submissions API base URL (used by tests)
    pub fn with_sec_api_base(mut self, base: impl Into<String>) -> Self {
        self.sec_api_base = base.into();
        self
    }

    /// Look up a CIK from the built-in table by scanning query words
    fn lookup_cik(query: &str) -> Option<(&'static str, &'static str)> {
        let lower = query.to_lowercase();
        CIK_TABLE
            .iter()
            .find(|(company, _)| lower.contains(company))
            .copied()
    }

    /// Direct SEC EDGAR fallback when the scoped search is unreachable.
    /// Returns a text blurb with the filings browse URL so the LLM can
    /// follow up with a document fetch.
    async fn sec_direct_search(&self, query: &str) -> Result<String> {
        let (company, cik) = Self::lookup_cik(query).ok_or_else(|| {
            Error::Search(format!(
                "No known CIK for query '{}'. Visit https://www.sec.gov/edgar/searchedgar/companysearch for manual search.",
                query
            ))
        })?;

        let filings_url = format!(
            "https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK={}&type=10-K&dateb=&owner=exclude&count=10",
            cik
        );

        // Best-effort entity name lookup; the blurb is still useful without it
        let company_url = format!("{}/submissions/CIK{}.json", self.sec_api_base, cik);
        let entity_name = match self.client.get(&company_url).send().await {
            Ok(resp) if resp.status().is_success() => resp
                .json::<SecSubmissions>()
                .await
                .ok()
                .and_then(|s| s.entity_name),
            Ok(resp) => {
                warn!("SEC submissions API returned status {}", resp.status());
                None
            }
            Err(e) => {
                warn!("SEC submissions API unreachable: {}", e);
                None
            }
        };

        let title = entity_name.unwrap_or_else(|| {
            let mut c = company.chars();
            match c.next() {
                Some(first) => first.to_uppercase().collect::<String>() + c.as_str(),
                None => company.to_string(),
            }
        });

        Ok(format!(
            "Found SEC EDGAR filings for {} (CIK {}). Filings URL: {}",
            title, cik, filings_url
        ))
    }
}

#[async_trait]
impl Tool for FilingSearchTool {
    fn name(&self) -> &str {
        self.jurisdiction.tool_name()
    }

    fn description(&self) -> &str {
        self.jurisdiction.tool_description()
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Company name and form type, e.g. 'Microsoft 10-K'"
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

        debug!(
            "Filing search on {}: {}",
            self.jurisdiction.index_name(),
            query
        );

        match self
            .serper
            .site_search(query, self.jurisdiction.site(), self.serper.result_count())
            .await
        {
            Ok(results) if !results.is_empty() => {
                Ok(ToolResult::success(super::format_search_results(&results)))
            }
            Ok(_) => Ok(ToolResult::success(format!(
                "No results found on {} for '{}'. Try a different form type or the general web search.",
                self.jurisdiction.index_name(),
                query
            ))),
            Err(e) => {
                warn!(
                    "Scoped search on {} failed: {}",
                    self.jurisdiction.site(),
                    e
                );
                if self.jurisdiction == Jurisdiction::UnitedStates {
                    match self.sec_direct_search(query).await {
                        Ok(blurb) => Ok(ToolResult::success(blurb)),
                        Err(fallback_err) => Ok(ToolResult::failure(format!(
                            "Search failed: {}. Fallback: {}",
                            e, fallback_err
                        ))),
                    }
                } else {
                    Ok(ToolResult::failure(format!("Search failed: {}", e)))
                }
            }
        }
    }
}
