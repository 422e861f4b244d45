//! Configuration management for FilingAgent
//!
//! Loads configuration from environment variables. Missing credentials
//! are a startup-time fatal error, never a per-request one.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};

/// Reasoning service (LLM) configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API key for the OpenRouter-compatible chat completions endpoint
    pub api_key: SecretString,
    /// Default model to use
    pub default_model: String,
    /// Base URL for the API (overridable for tests)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Serper web search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// API key for the Serper search API
    pub api_key: SecretString,
    /// Base URL for the API (overridable for tests)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum results per search call
    pub result_count: u8,
}

/// Document fetch configuration
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum characters of extracted text returned to the LLM
    pub max_chars: usize,
}

/// Agent loop limits
#[derive(Debug, Clone)]
pub struct LoopLimits {
    /// Maximum LLM round-trips per request
    pub max_iterations: u32,
    /// Maximum total tool calls per request
    pub max_tool_calls: u32,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter
    pub level: String,
    /// Log format (pretty, json)
    pub format: String,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Reasoning service settings
    pub llm: LlmConfig,
    /// Web search settings
    pub search: SearchConfig,
    /// Document fetch settings
    pub fetch: FetchConfig,
    /// Agent loop limits
    pub limits: LoopLimits,
    /// Logging settings
    pub log: LogConfig,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Ok(Config {
            llm: LlmConfig {
                api_key: SecretString::from(
                    std::env::var("OPENROUTER_API_KEY").unwrap_or_default(),
                ),
                default_model: std::env::var("DEFAULT_MODEL")
                    .unwrap_or_else(|_| "google/gemini-2.5-pro".to_string()),
                base_url: std::env::var("OPENROUTER_BASE_URL")
                    .unwrap_or_else(|_| "https://openrouter.ai/api/v1".to_string()),
                timeout_secs: env_parse("LLM_TIMEOUT_SECS", 120),
            },
            search: SearchConfig {
                api_key: SecretString::from(std::env::var("SERPER_API_KEY").unwrap_or_default()),
                base_url: std::env::var("SERPER_BASE_URL")
                    .unwrap_or_else(|_| "https://google.serper.dev".to_string()),
                timeout_secs: env_parse("SEARCH_TIMEOUT_SECS", 30),
                result_count: env_parse("SEARCH_RESULT_COUNT", 5u8),
            },
            fetch: FetchConfig {
                timeout_secs: env_parse("FETCH_TIMEOUT_SECS", 30),
                max_chars: env_parse("FETCH_MAX_CHARS", 8000usize),
            },
            limits: LoopLimits {
                max_iterations: env_parse("MAX_ITERATIONS", 15),
                max_tool_calls: env_parse("MAX_TOOL_CALLS", 10),
            },
            log: LogConfig {
                level: std::env::var("RUST_LOG")
                    .unwrap_or_else(|_| "info,filingagent=debug".to_string()),
                format: std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            },
        })
    }

    /// Create a minimal config for testing
    pub fn minimal() -> Self {
        Config {
            llm: LlmConfig {
                api_key: SecretString::from(""),
                default_model: "google/gemini-2.5-pro".to_string(),
                base_url: "https://openrouter.ai/api/v1".to_string(),
                timeout_secs: 120,
            },
            search: SearchConfig {
                api_key: SecretString::from(""),
                base_url: "https://google.serper.dev".to_string(),
                timeout_secs: 30,
                result_count: 5,
            },
            fetch: FetchConfig {
                timeout_secs: 30,
                max_chars: 8000,
            },
            limits: LoopLimits {
                max_iterations: 15,
                max_tool_calls: 10,
            },
            log: LogConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }

    /// Validate that all required configuration is present
    pub fn validate(&self) -> Result<()> {
        if self.llm.api_key.expose_secret().is_empty() {
            return Err(Error::Config("OPENROUTER_API_KEY is required".to_string()));
        }
        if self.search.api_key.expose_secret().is_empty() {
            return Err(Error::Config("SERPER_API_KEY is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_fails_validation() {
        let config = Config::minimal();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_passes_with_keys() {
        let mut config = Config::minimal();
        config.llm.api_key = SecretString::from("llm-key");
        config.search.api_key = SecretString::from("search-key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = Config::minimal();
        assert_eq!(config.limits.max_iterations, 15);
        assert_eq!(config.limits.max_tool_calls, 10);
        assert_eq!(config.fetch.max_chars, 8000);
    }
}
