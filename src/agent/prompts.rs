//! Prompt templates for the filing agent

use crate::error::{Error, Result};
use chrono::Utc;
use handlebars::Handlebars;
use serde::Serialize;

/// A prompt template using Handlebars syntax
pub struct PromptTemplate {
    /// Template name
    name: String,
    /// Handlebars registry
    registry: Handlebars<'static>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(name: impl Into<String>, template: &str) -> Result<Self> {
        let name = name.into();
        let mut registry = Handlebars::new();

        registry
            .register_template_string(&name, template)
            .map_err(|e| Error::Internal(format!("Invalid template: {}", e)))?;

        Ok(PromptTemplate { name, registry })
    }

    /// Render the template with given data
    pub fn render<T: Serialize>(&self, data: &T) -> Result<String> {
        self.registry
            .render(&self.name, data)
            .map_err(|e| Error::Internal(format!("Template render error: {}", e)))
    }
}

/// System prompt for the filing agent
const FILING_SYSTEM_PROMPT: &str = r#"You are a highly specialized legal assistant. Your purpose is to find official company filings and extract specific information. Today's date is {{today}}.

Follow these steps:
1. Analyze the user's request to identify the company, the document type, and the jurisdiction (USA, Canada, or Brazil).
2. Use the specialized search tool for that jurisdiction: `search_sec_edgar` for a US 10-K, `search_sedar_plus` for Canadian filings, `search_cvm_empresas_net` for a Brazilian DFP or Formulário de Referência.
3. Execute the search and analyze the results. The search results will be text containing links.
4. If the specialized search tools return errors or nothing useful, use `general_web_search` as a fallback.
5. From the search results, identify the most promising URL to the actual filing document.
6. Use the `read_document_from_url` tool with the identified URL to get the document's content.
7. Finally, after you have the document's content, DO NOT call any more tools. Provide your final answer by analyzing the text and structuring it ONLY as a JSON object in the `CompanyFiling` format below. Fill every field.
8. If you cannot find any plausible filing after exhausting the tools, say so in plain text instead of inventing a record.

CRITICAL: you MUST use these EXACT field names in your JSON response:
{{#each fields}}- `{{this}}`
{{/each}}

Example JSON structure:
```json
{
  "contract_name": "Form 10-K",
  "company_name": "Microsoft Corporation",
  "description": "Annual report for fiscal year ending June 30, 2024...",
  "filing_date": "2024-07-25",
  "source_of_information": "SEC EDGAR",
  "country": "United States",
  "language": "English",
  "applicable_law": "Securities Exchange Act of 1934",
  "relevant_clause": "Item 1A. Risk Factors",
  "document_url": "https://www.sec.gov/..."
}
```"#;

/// Field names of the `CompanyFiling` record, in prompt order
const FILING_FIELDS: &[&str] = &[
    "contract_name",
    "company_name",
    "description",
    "filing_date",
    "source_of_information",
    "country",
    "language",
    "applicable_law",
    "relevant_clause",
    "document_url",
];

#[derive(Serialize)]
struct FilingPromptData {
    today: String,
    fields: Vec<&'static str>,
}

/// Render the system prompt seeding every filing conversation
pub fn filing_system_prompt() -> Result<String> {
    let template = PromptTemplate::new("filing_system", FILING_SYSTEM_PROMPT)?;
    template.render(&FilingPromptData {
        today: Utc::now().format("%Y-%m-%d").to_string(),
        fields: FILING_FIELDS.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_render() {
        let template = PromptTemplate::new("test", "Hello, {{name}}!").unwrap();
        let rendered = template
            .render(&serde_json::json!({"name": "World"}))
            .unwrap();
        assert_eq!(rendered, "Hello, World!");
    }

    #[test]
    fn test_invalid_template() {
        assert!(PromptTemplate::new("bad", "{{#each}").is_err());
    }

    #[test]
    fn test_filing_system_prompt_mentions_tools_and_fields() {
        let prompt = filing_system_prompt().unwrap();
        assert!(prompt.contains("search_sec_edgar"));
        assert!(prompt.contains("search_sedar_plus"));
        assert!(prompt.contains("search_cvm_empresas_net"));
        assert!(prompt.contains("general_web_search"));
        assert!(prompt.contains("read_document_from_url"));
        for field in FILING_FIELDS {
            assert!(prompt.contains(field), "missing field {}", field);
        }
    }
}
