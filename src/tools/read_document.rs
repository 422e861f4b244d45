//! Document fetch tool
//!
//! Fetches a URL with a single GET and extracts the visible text from
//! HTML payloads (no JS rendering, no retry). Non-HTML text payloads are
//! passed through as-is. Extracted text is capped to keep the LLM
//! context manageable.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::traits::{Tool, ToolResult};
use crate::config::FetchConfig;
use crate::{Error, Result};

/// Elements whose content never carries filing text
const STRIPPED_TAGS: &[&str] = &["script", "style", "nav", "footer", "header"];

/// Document fetch-and-extract tool
pub struct ReadDocumentTool {
    client: Client,
    max_chars: usize,
}

impl ReadDocumentTool {
    /// Create a new document fetch tool
    pub fn new(config: FetchConfig) -> Result<Self> {
        // Some filing hosts (sec.gov included) reject requests without a
        // browser-like user agent.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            max_chars: config.max_chars,
        })
    }

    /// Fetch a URL and return extracted text
    async fn read(&self, url: &str) -> Result<String> {
        debug!("Fetching document: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Http(e))?;

        if !response.status().is_success() {
            return Err(Error::Internal(format!(
                "Could not retrieve URL, status {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.text().await?;

        let text = if content_type.contains("text/html") {
            extract_visible_text(&body)
        } else if content_type.starts_with("text/") || content_type.contains("json") {
            body
        } else {
            return Err(Error::Internal(format!(
                "Content type is not text: {}. Cannot process.",
                content_type
            )));
        };

        Ok(truncate_chars(&text, self.max_chars))
    }
}

#[async_trait]
impl Tool for ReadDocumentTool {
    fn name(&self) -> &str {
        "read_document_from_url"
    }

    fn description(&self) -> &str {
        "Use this to read the full text content of a document from a specific URL. The input MUST be a valid URL."
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "The URL of the document to read"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let url = args
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::InvalidInput("Missing 'url' parameter".to_string()))?;

        if url::Url::parse(url).is_err() {
            return Ok(ToolResult::failure(format!("Not a valid URL: {}", url)));
        }

        match self.read(url).await {
            Ok(text) => Ok(ToolResult::success(text)),
            Err(e) => Ok(ToolResult::failure(format!(
                "Could not retrieve URL. Reason: {}",
                e
            ))),
        }
    }
}

/// Extract visible text from an HTML document: drop script/style/nav/
/// header/footer blocks, strip remaining tags, decode entities, collapse
/// whitespace.
fn extract_visible_text(html: &str) -> String {
    let mut doc = html.to_string();
    for tag in STRIPPED_TAGS {
        doc = remove_tag_blocks(&doc, tag);
    }

    // Strip remaining markup
    let mut text = String::with_capacity(doc.len() / 2);
    let mut in_tag = false;
    for c in doc.chars() {
        match c {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = html_decode(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove `<tag ...>...</tag>` blocks, case-insensitively
fn remove_tag_blocks(html: &str, tag: &str) -> String {
    let open = format!("<{}", tag);
    let close = format!("</{}>", tag);
    let lower = html.to_ascii_lowercase();
    let mut output = String::with_capacity(html.len());
    let mut pos = 0;

    while let Some(start) = lower[pos..].find(&open) {
        let start = pos + start;
        output.push_str(&html[pos..start]);
        match lower[start..].find(&close) {
            Some(end) => pos = start + end + close.len(),
            None => {
                // Unterminated block, drop the rest
                return output;
            }
        }
    }
    output.push_str(&html[pos..]);
    output
}

/// Simple HTML entity decoder
fn html_decode(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
}

/// Truncate on a character boundary
fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}
