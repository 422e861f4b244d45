//! Wire-level data models for filing queries and results.

use serde::{Deserialize, Serialize};

/// A company's securities filing, as extracted by the agent.
///
/// Every field is best-effort: the reasoning service fills them from the
/// documents it read, and nothing beyond "valid JSON of this shape" is
/// enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFiling {
    /// Official name of the form (e.g., "Form 10-K", "Formulário de Referência")
    pub contract_name: String,
    /// Full name of the company
    pub company_name: String,
    /// Concise summary of the document's purpose and key findings
    pub description: String,
    /// Filing date in YYYY-MM-DD format
    pub filing_date: String,
    /// Official source platform (e.g., "SEC EDGAR", "SEDAR+", "CVM Empresas.NET")
    pub source_of_information: String,
    /// Country of the filing's jurisdiction
    pub country: String,
    /// Primary language of the document
    pub language: String,
    /// Main law or regulation governing the filing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable_law: Option<String>,
    /// Specific clause or section title relevant to the query
    #[serde(default = "default_relevant_clause")]
    pub relevant_clause: Option<String>,
    /// Direct URL to the complete source document
    pub document_url: String,
}

fn default_relevant_clause() -> Option<String> {
    Some("N/A".to_string())
}

/// Request body for filing queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingRequest {
    /// Natural language query describing the filing to search for
    pub query: String,
}

/// Response body for filing queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CompanyFiling>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FilingResponse {
    /// Create a successful response carrying a filing record
    pub fn ok(data: CompanyFiling) -> Self {
        FilingResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create a failed response with an error message
    pub fn fail(error: impl Into<String>) -> Self {
        FilingResponse {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_filing() -> CompanyFiling {
        CompanyFiling {
            contract_name: "Form 10-K".into(),
            company_name: "Microsoft Corporation".into(),
            description: "Annual report for fiscal year 2024".into(),
            filing_date: "2024-07-25".into(),
            source_of_information: "SEC EDGAR".into(),
            country: "United States".into(),
            language: "English".into(),
            applicable_law: Some("Securities Exchange Act of 1934".into()),
            relevant_clause: Some("Item 1A. Risk Factors".into()),
            document_url: "https://www.sec.gov/Archives/edgar/data/789019/msft-20240630.htm".into(),
        }
    }

    #[test]
    fn test_filing_round_trip() {
        let filing = sample_filing();
        let json = serde_json::to_string(&filing).unwrap();
        let back: CompanyFiling = serde_json::from_str(&json).unwrap();
        assert_eq!(filing, back);
    }

    #[test]
    fn test_filing_round_trip_empty_strings() {
        let mut filing = sample_filing();
        filing.description = String::new();
        filing.filing_date = String::new();
        let json = serde_json::to_string(&filing).unwrap();
        let back: CompanyFiling = serde_json::from_str(&json).unwrap();
        assert_eq!(filing, back);
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{
            "contract_name": "Form 10-K",
            "company_name": "Apple Inc.",
            "description": "Annual report",
            "filing_date": "2024-10-28",
            "source_of_information": "SEC EDGAR",
            "country": "United States",
            "language": "English",
            "document_url": "https://www.sec.gov/example.htm"
        }"#;
        let filing: CompanyFiling = serde_json::from_str(json).unwrap();
        assert_eq!(filing.applicable_law, None);
        assert_eq!(filing.relevant_clause.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_response_shapes() {
        let ok = FilingResponse::ok(sample_filing());
        assert!(ok.success);
        assert!(ok.data.is_some());
        assert!(ok.error.is_none());

        let fail = FilingResponse::fail("no filing found");
        assert!(!fail.success);
        assert!(fail.data.is_none());
        assert_eq!(fail.error.as_deref(), Some("no filing found"));
    }
}
