//! Tools module - the fixed tool set available to the agent
//!
//! Each tool is a self-contained module that implements the `Tool` trait.
//! Tools are registered into a `ToolRegistry` and offered to the LLM for
//! function calling; the LLM requests them by name and the registry
//! dispatches.
//!
//! ## Built-in Tools
//!
//! - **search_sec_edgar**: US filings on SEC EDGAR
//! - **search_sedar_plus**: Canadian filings on SEDAR+
//! - **search_cvm_empresas_net**: Brazilian filings on CVM Empresas.NET
//! - **general_web_search**: unscoped web search, used as fallback
//! - **read_document_from_url**: fetch a URL and extract its visible text

mod filing_search;
mod read_document;
mod registry;
mod serper;
mod traits;

// Core trait and types
pub use traits::{Tool, ToolCall, ToolResult};

// Registry
pub use registry::ToolRegistry;

// Built-in tools
pub use filing_search::{FilingSearchTool, Jurisdiction};
pub use read_document::ReadDocumentTool;
pub use serper::{GeneralWebSearchTool, SearchResult, SerperClient};

/// Format search results for the LLM
pub(crate) fn format_search_results(results: &[SearchResult]) -> String {
    let mut output = String::new();

    for (i, result) in results.iter().enumerate() {
        output.push_str(&format!(
            "{}. **{}**\n   URL: {}\n   {}\n\n",
            i + 1,
            result.title,
            result.url,
            result.snippet
        ));
    }

    output
}
