//! # FilingAgent
//!
//! An AI agent service that finds official company filings and returns
//! structured records.
//!
//! ## Features
//!
//! - **LLM-driven tool loop:** the reasoning service picks search and
//!   fetch tools per turn until it produces a final answer
//! - **Three jurisdictions:** SEC EDGAR (US), SEDAR+ (Canada),
//!   CVM Empresas.NET (Brazil), plus general web search as fallback
//! - **Structured output:** terminal answers are coerced into a fixed
//!   `CompanyFiling` record
//! - **HTTP API:** a small axum service exposing `/search`

pub mod agent;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod tools;

pub use config::Config;
pub use error::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
