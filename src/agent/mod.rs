//! Agent module - reasoning-service client and the tool-calling loop
//!
//! This module handles all LLM-related functionality:
//! - Chat-completions client for the reasoning service
//! - The filing agent loop (call LLM, dispatch tools, repeat)
//! - System prompt template
//! - Coercion of terminal replies into `CompanyFiling` records

mod agentic_loop;
mod client;
mod loop_guard;
mod output;
pub mod prompts;
pub mod types;

pub use agentic_loop::{
    run_filing_loop, AgentLoopInput, AgentLoopOutput, LoopConfig, LoopOutcome, LoopStep,
    LoopTrace, ToolAction, ToolObservation,
};
pub use client::LlmClient;
pub use loop_guard::LoopGuard;
pub use output::parse_company_filing;
