//! The filing agent loop.
//!
//! The only component with decision logic: call the reasoning service,
//! dispatch any requested tool calls through the registry, feed results
//! back as conversation turns, and repeat until the service stops
//! requesting tools or an explicit limit is hit.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::agent::loop_guard::LoopGuard;
use crate::agent::types::*;
use crate::agent::LlmClient;
use crate::config::LoopLimits;
use crate::error::Result;
use crate::tools::{ToolCall, ToolRegistry};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configurable limits for the agent loop. Both bounds are explicit and
/// always enforced; there is no unbounded mode.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Maximum LLM round-trips before the loop is forcefully stopped.
    pub max_iterations: u32,
    /// Maximum total tool calls across all iterations.
    pub max_tool_calls: u32,
    /// LLM generation options (temperature, max_tokens, etc.).
    pub generation_options: GenerationOptions,
    /// Fallback text returned when the loop exits without a final response.
    pub fallback_message: String,
}

impl LoopConfig {
    /// Configuration for the HTTP service, limits taken from config.
    pub fn server(limits: &LoopLimits) -> Self {
        Self {
            max_iterations: limits.max_iterations,
            max_tool_calls: limits.max_tool_calls,
            generation_options: GenerationOptions::precise(),
            fallback_message:
                "I searched the filing databases but could not find a matching document. \
                 Please try a more specific query."
                    .into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Structured trace types
// ---------------------------------------------------------------------------

/// A recorded action (tool call) and its observation (result).
#[derive(Debug, Clone)]
pub struct ToolAction {
    pub tool_name: String,
    pub arguments: String,
    pub observation: ToolObservation,
}

/// The result of executing a single tool call.
#[derive(Debug, Clone)]
pub struct ToolObservation {
    pub success: bool,
    pub content: String,
    pub duration_ms: u64,
}

/// One iteration of the agent loop.
#[derive(Debug, Clone)]
pub struct LoopStep {
    pub iteration: u32,
    /// Text content produced by the LLM in this iteration (may be empty).
    pub thought: String,
    /// Tool calls executed in this iteration.
    pub actions: Vec<ToolAction>,
    /// The LLM's finish_reason for this iteration.
    pub finish_reason: String,
}

/// Full trace of a loop execution.
#[derive(Debug, Clone)]
pub struct LoopTrace {
    pub steps: Vec<LoopStep>,
    pub outcome: LoopOutcome,
    pub total_duration_ms: u64,
}

/// How the loop finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    /// LLM produced a final answer without requesting tools.
    Completed,
    /// Hit `max_iterations` without a final answer.
    MaxIterationsExceeded,
    /// Hit `max_tool_calls`; final response taken from a tool-less call.
    ToolLimitReached,
    /// LLM returned an empty response without tool calls.
    EmptyResponse,
    /// LLM API returned an error.
    LlmError(String),
}

impl LoopOutcome {
    /// Whether the loop's response text is a genuine final answer
    pub fn is_answer(&self) -> bool {
        matches!(self, LoopOutcome::Completed | LoopOutcome::ToolLimitReached)
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Everything the loop needs to run.
pub struct AgentLoopInput<'a> {
    /// The conversation messages (system + user query).
    pub messages: Vec<Message>,
    /// LLM client to call.
    pub llm_client: &'a LlmClient,
    /// Tool registry to execute tools against.
    pub tools: &'a ToolRegistry,
    /// Loop configuration.
    pub config: LoopConfig,
}

/// The result of running the agent loop.
pub struct AgentLoopOutput {
    /// The final assistant response text.
    pub response: String,
    /// Structured trace of the full execution.
    pub trace: LoopTrace,
    /// The full messages vector at the end (including tool results etc.).
    pub final_messages: Vec<Message>,
    /// Accumulated token usage across all iterations.
    pub total_usage: Usage,
}

// ---------------------------------------------------------------------------
// Core loop implementation
// ---------------------------------------------------------------------------

/// Run the filing agent loop.
///
/// Calls the LLM, executes tool calls, feeds results back, and repeats
/// until the LLM stops requesting tools or limits are hit. Tool-dispatch
/// failures never abort the loop; they become error turns the LLM can
/// react to.
pub async fn run_filing_loop(input: AgentLoopInput<'_>) -> Result<AgentLoopOutput> {
    let AgentLoopInput {
        mut messages,
        llm_client,
        tools,
        config,
    } = input;

    let tool_definitions = tools.definitions();
    let loop_start = Instant::now();

    let mut iteration: u32 = 0;
    let mut tool_calls_made: u32 = 0;
    let mut final_response = String::new();
    let mut loop_guard = LoopGuard::default();
    let mut steps: Vec<LoopStep> = Vec::new();
    let mut total_usage = Usage::default();
    let outcome;

    loop {
        iteration += 1;
        info!("Agent loop iteration {}/{}", iteration, config.max_iterations);

        if iteration > config.max_iterations {
            warn!("Agent loop exceeded max iterations");
            final_response = config.fallback_message.clone();
            outcome = LoopOutcome::MaxIterationsExceeded;
            break;
        }

        // Stop offering tools once the call budget is spent so the LLM is
        // forced to produce its final answer.
        let use_tools = tool_calls_made < config.max_tool_calls && !tool_definitions.is_empty();

        let response = if use_tools {
            llm_client
                .chat_with_tools(
                    messages.clone(),
                    tool_definitions.clone(),
                    config.generation_options.clone(),
                )
                .await
        } else {
            llm_client
                .chat(messages.clone(), config.generation_options.clone())
                .await
        };

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                outcome = LoopOutcome::LlmError(e.to_string());
                break;
            }
        };

        if let Some(ref usage) = response.usage {
            accumulate_usage(&mut total_usage, usage);
        }

        let choice = match response.choices.first() {
            Some(c) => c,
            None => {
                final_response = config.fallback_message.clone();
                outcome = LoopOutcome::EmptyResponse;
                break;
            }
        };

        let finish_reason = choice
            .finish_reason
            .as_deref()
            .unwrap_or("unknown")
            .to_string();

        debug!(
            "LLM finish_reason: {}, has_content: {}, has_tool_calls: {}",
            finish_reason,
            !choice.message.text().is_empty(),
            choice.message.tool_calls.is_some()
        );

        // --- Tool calls ------------------------------------------------
        let tool_calls_list = choice
            .message
            .tool_calls
            .clone()
            .filter(|list| use_tools && !list.is_empty());

        if let Some(tool_calls_list) = tool_calls_list {
            info!(
                "LLM requested {} tool calls (total so far: {})",
                tool_calls_list.len(),
                tool_calls_made
            );

            // The assistant message carrying the tool_calls must precede
            // the tool turns in the conversation.
            messages.push(choice.message.clone());

            let mut actions = Vec::new();

            for tc in tool_calls_list.iter() {
                tool_calls_made += 1;

                let tool_name = &tc.function.name;

                let args: serde_json::Value = match serde_json::from_str(&tc.function.arguments) {
                    Ok(v) => v,
                    Err(e) => {
                        warn!("Failed to parse tool arguments for {}: {}", tool_name, e);
                        serde_json::json!({})
                    }
                };

                info!(
                    "Executing tool: {} (call #{}/{})",
                    tool_name, tool_calls_made, config.max_tool_calls
                );

                let call = ToolCall {
                    id: tc.id.clone(),
                    name: tool_name.clone(),
                    arguments: args,
                };

                let tool_start = Instant::now();
                let result = tools.execute(&call).await;
                let duration_ms = tool_start.elapsed().as_millis() as u64;

                // Dispatch failures become an error turn for the LLM, the
                // only retry semantics in the system.
                let (success, result_content) = match result {
                    Ok(r) => {
                        let success = r.success;
                        let content = r.into_turn();
                        debug!(
                            "Tool {} finished, success={}, result length: {} chars",
                            tool_name,
                            success,
                            content.len()
                        );
                        (success, content)
                    }
                    Err(e) => {
                        let err = format!("Tool error: {}", e);
                        warn!("Tool {} failed: {}", tool_name, err);
                        (false, err)
                    }
                };

                messages.push(Message::tool(&tc.id, &result_content));

                if let Some(hint) = loop_guard.record(tool_name, &result_content) {
                    warn!("Loop guard triggered for tool '{}'", tool_name);
                    messages.push(Message::user(&hint));
                }

                actions.push(ToolAction {
                    tool_name: tool_name.clone(),
                    arguments: tc.function.arguments.clone(),
                    observation: ToolObservation {
                        success,
                        content: result_content,
                        duration_ms,
                    },
                });
            }

            steps.push(LoopStep {
                iteration,
                thought: choice.message.text().to_string(),
                actions,
                finish_reason,
            });

            // LLM processes the tool results next iteration
            continue;
        }

        // --- No tool calls: content is the terminal output --------------
        let content = choice.message.text().to_string();

        steps.push(LoopStep {
            iteration,
            thought: content.clone(),
            actions: vec![],
            finish_reason,
        });

        if content.is_empty() {
            warn!("LLM returned empty response without tool calls");
            final_response = config.fallback_message.clone();
            outcome = LoopOutcome::EmptyResponse;
        } else {
            final_response = content;
            outcome = if tool_calls_made >= config.max_tool_calls {
                LoopOutcome::ToolLimitReached
            } else {
                LoopOutcome::Completed
            };
        }
        break;
    }

    let total_duration_ms = loop_start.elapsed().as_millis() as u64;

    let trace = LoopTrace {
        steps,
        outcome: outcome.clone(),
        total_duration_ms,
    };

    info!(
        "Agent loop finished: outcome={:?}, iterations={}, tool_calls={}, duration={}ms",
        outcome,
        iteration.min(config.max_iterations),
        tool_calls_made,
        total_duration_ms,
    );

    Ok(AgentLoopOutput {
        response: final_response,
        trace,
        final_messages: messages,
        total_usage,
    })
}

/// Sum token usage from one response into an accumulator.
fn accumulate_usage(total: &mut Usage, delta: &Usage) {
    total.prompt_tokens += delta.prompt_tokens;
    total.completion_tokens += delta.completion_tokens;
    total.total_tokens += delta.total_tokens;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoopLimits;

    #[test]
    fn test_server_loop_config() {
        let config = LoopConfig::server(&LoopLimits {
            max_iterations: 15,
            max_tool_calls: 10,
        });
        assert_eq!(config.max_iterations, 15);
        assert_eq!(config.max_tool_calls, 10);
        assert!(!config.fallback_message.is_empty());
    }

    #[test]
    fn test_outcome_is_answer() {
        assert!(LoopOutcome::Completed.is_answer());
        assert!(LoopOutcome::ToolLimitReached.is_answer());
        assert!(!LoopOutcome::MaxIterationsExceeded.is_answer());
        assert!(!LoopOutcome::LlmError("boom".into()).is_answer());
    }

    #[test]
    fn test_accumulate_usage() {
        let mut total = Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        };
        let delta = Usage {
            prompt_tokens: 20,
            completion_tokens: 10,
            total_tokens: 30,
        };
        accumulate_usage(&mut total, &delta);
        assert_eq!(total.prompt_tokens, 30);
        assert_eq!(total.completion_tokens, 15);
        assert_eq!(total.total_tokens, 45);
    }
}
