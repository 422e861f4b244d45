//! Structured output coercion
//!
//! Turns the reasoning service's terminal reply into a `CompanyFiling`.
//! A strict serde pass is tried first; a lenient second pass accepts
//! common alias keys and infers source/country from the document URL.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::CompanyFiling;

/// Index metadata keyed on the document URL host suffix
const HOST_HINTS: &[(&str, &str, &str, Option<&str>, &str)] = &[
    (
        "sec.gov",
        "SEC EDGAR",
        "United States",
        Some("Securities Exchange Act of 1934"),
        "English",
    ),
    ("sedarplus.ca", "SEDAR+", "Canada", None, "English"),
    (
        "cvm.gov.br",
        "CVM Empresas.NET",
        "Brazil",
        Some("Lei 6.404/76"),
        "Portuguese",
    ),
];

/// Parse the LLM's terminal reply into a `CompanyFiling`.
///
/// Returns `Error::StructuredOutput` when no JSON object can be
/// recovered from the text.
pub fn parse_company_filing(text: &str) -> Result<CompanyFiling> {
    let json_text = extract_json(text).ok_or_else(|| {
        Error::StructuredOutput(format!(
            "No JSON object found in response: {}",
            snippet(text)
        ))
    })?;

    // Strict pass: the reply matches the record exactly
    match serde_json::from_str::<CompanyFiling>(json_text) {
        Ok(filing) => Ok(filing),
        Err(strict_err) => {
            debug!("Strict filing parse failed: {}", strict_err);
            let value: Value = serde_json::from_str(json_text).map_err(|e| {
                Error::StructuredOutput(format!(
                    "Response is not valid JSON ({}): {}",
                    e,
                    snippet(text)
                ))
            })?;
            lenient_parse(&value).ok_or_else(|| {
                Error::StructuredOutput(format!(
                    "JSON does not match the CompanyFiling shape ({}): {}",
                    strict_err,
                    snippet(text)
                ))
            })
        }
    }
}

/// Locate the JSON object inside the reply, stripping markdown fences.
fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();

    // ```json ... ``` fences
    let inner = if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        match after.find("```") {
            Some(end) => &after[..end],
            None => after,
        }
    } else {
        trimmed
    };

    let open = inner.find('{')?;
    let close = inner.rfind('}')?;
    if close < open {
        return None;
    }
    Some(inner[open..=close].trim())
}

/// Lenient field mapping: alias keys, URL-derived inference, defaults.
fn lenient_parse(value: &Value) -> Option<CompanyFiling> {
    let obj = value.as_object()?;

    let get = |keys: &[&str]| -> Option<String> {
        keys.iter()
            .find_map(|k| obj.get(*k).and_then(|v| v.as_str()))
            .map(|s| s.to_string())
    };

    let document_url = get(&["document_url", "url"]).unwrap_or_default();
    let hint = host_hint(&document_url);

    Some(CompanyFiling {
        contract_name: get(&["contract_name", "filing_type", "form_type"])
            .unwrap_or_else(|| "Unknown".to_string()),
        company_name: get(&["company_name", "company"]).unwrap_or_else(|| "Unknown".to_string()),
        description: get(&["description", "summary"])
            .unwrap_or_else(|| "No description available".to_string()),
        filing_date: get(&["filing_date", "date"]).unwrap_or_else(|| "Unknown".to_string()),
        source_of_information: get(&["source_of_information", "source"])
            .or_else(|| hint.map(|h| h.1.to_string()))
            .unwrap_or_else(|| "Unknown".to_string()),
        country: get(&["country"])
            .or_else(|| hint.map(|h| h.2.to_string()))
            .unwrap_or_else(|| "Unknown".to_string()),
        language: get(&["language"])
            .or_else(|| hint.map(|h| h.4.to_string()))
            .unwrap_or_else(|| "English".to_string()),
        applicable_law: get(&["applicable_law", "governing_law"])
            .or_else(|| hint.and_then(|h| h.3.map(|l| l.to_string()))),
        relevant_clause: get(&["relevant_clause", "relevant_section"])
            .or(Some("N/A".to_string())),
        document_url,
    })
}

/// Look up index metadata from the document URL host
fn host_hint(document_url: &str) -> Option<&'static (&'static str, &'static str, &'static str, Option<&'static str>, &'static str)> {
    let host = url::Url::parse(document_url).ok()?.host_str()?.to_string();
    HOST_HINTS
        .iter()
        .find(|(suffix, ..)| host == *suffix || host.ends_with(&format!(".{}", suffix)))
}

fn snippet(s: &str) -> String {
    s.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_JSON: &str = r#"{
        "contract_name": "Form 10-K",
        "company_name": "Microsoft Corporation",
        "description": "Annual report for fiscal year ending June 30, 2024.",
        "filing_date": "2024-07-25",
        "source_of_information": "SEC EDGAR",
        "country": "United States",
        "language": "English",
        "applicable_law": "Securities Exchange Act of 1934",
        "relevant_clause": "Item 1A. Risk Factors",
        "document_url": "https://www.sec.gov/Archives/edgar/data/789019/msft-20240630.htm"
    }"#;

    #[test]
    fn test_strict_parse() {
        let filing = parse_company_filing(FULL_JSON).unwrap();
        assert_eq!(filing.company_name, "Microsoft Corporation");
        assert_eq!(filing.country, "United States");
    }

    #[test]
    fn test_parse_with_markdown_fences() {
        let text = format!("Here is the filing:\n```json\n{}\n```", FULL_JSON);
        let filing = parse_company_filing(&text).unwrap();
        assert_eq!(filing.contract_name, "Form 10-K");
    }

    #[test]
    fn test_parse_with_surrounding_prose() {
        let text = format!("I found the document. {} Let me know if you need more.", FULL_JSON);
        let filing = parse_company_filing(&text).unwrap();
        assert_eq!(filing.filing_date, "2024-07-25");
    }

    #[test]
    fn test_lenient_alias_keys_and_url_inference() {
        let text = r#"{
            "filing_type": "10-K",
            "company_name": "Microsoft Corporation",
            "summary": "Annual report.",
            "filing_date": "2024-07-25",
            "document_url": "https://www.sec.gov/Archives/edgar/data/789019/msft.htm"
        }"#;
        let filing = parse_company_filing(text).unwrap();
        assert_eq!(filing.contract_name, "10-K");
        assert_eq!(filing.description, "Annual report.");
        assert_eq!(filing.source_of_information, "SEC EDGAR");
        assert_eq!(filing.country, "United States");
        assert_eq!(filing.language, "English");
        assert_eq!(
            filing.applicable_law.as_deref(),
            Some("Securities Exchange Act of 1934")
        );
        assert_eq!(filing.relevant_clause.as_deref(), Some("N/A"));
    }

    #[test]
    fn test_lenient_brazil_inference() {
        let text = r#"{
            "contract_name": "Formulário de Referência",
            "company_name": "Petrobras",
            "document_url": "https://www.cvm.gov.br/empresas/doc.htm"
        }"#;
        let filing = parse_company_filing(text).unwrap();
        assert_eq!(filing.source_of_information, "CVM Empresas.NET");
        assert_eq!(filing.country, "Brazil");
        assert_eq!(filing.language, "Portuguese");
    }

    #[test]
    fn test_no_json_is_structured_output_error() {
        let err = parse_company_filing("I could not find any filing for that company.").unwrap_err();
        assert!(matches!(err, Error::StructuredOutput(_)));
    }

    #[test]
    fn test_invalid_json_is_structured_output_error() {
        let err = parse_company_filing("{ not json").unwrap_err();
        assert!(matches!(err, Error::StructuredOutput(_)));
    }

    #[test]
    fn test_host_hint_rejects_lookalike_hosts() {
        assert!(host_hint("https://evil-sec.gov.example.com/a").is_none());
        assert!(host_hint("https://www.sec.gov/a").is_some());
    }
}
