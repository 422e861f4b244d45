//! Loop guard for the tool-calling loop.
//!
//! Detects when the LLM is stuck calling the same tool repeatedly with
//! the same outcome (typically a failing search retried verbatim) and
//! injects a hint to force a different approach.

use std::collections::VecDeque;

/// Tracks recent tool calls and detects stuck loops.
pub struct LoopGuard {
    /// Recent (tool_name, result_snippet) entries.
    recent: VecDeque<(String, String)>,
    /// How many consecutive same-tool-same-result calls trigger intervention.
    threshold: usize,
}

impl LoopGuard {
    /// Create a new guard. `threshold` is how many consecutive identical
    /// results from the same tool trigger a hint (default: 3).
    pub fn new(threshold: usize) -> Self {
        Self {
            recent: VecDeque::with_capacity(threshold + 1),
            threshold,
        }
    }

    /// Record a tool call and its result. Returns `Some(hint)` if the LLM
    /// appears stuck and should be told to stop retrying.
    pub fn record(&mut self, tool_name: &str, result: &str) -> Option<String> {
        let result_snippet = Self::snippet(result);

        self.recent
            .push_back((tool_name.to_string(), result_snippet.clone()));

        while self.recent.len() > self.threshold {
            self.recent.pop_front();
        }

        if self.recent.len() >= self.threshold {
            let all_same = self
                .recent
                .iter()
                .all(|(name, snip)| name == tool_name && *snip == result_snippet);

            if all_same {
                self.recent.clear(); // Reset so we don't keep firing
                return Some(format!(
                    "[SYSTEM] The tool '{}' has returned the same result {} times in a row. \
                     Do NOT call this tool again with a similar query. \
                     Try a different search tool, or if you have a document URL already, \
                     read it; otherwise give your final answer with what you know.",
                    tool_name, self.threshold
                ));
            }
        }

        None
    }

    /// Take the first 200 chars of a result for comparison.
    fn snippet(s: &str) -> String {
        s.chars().take(200).collect()
    }
}

impl Default for LoopGuard {
    fn default() -> Self {
        Self::new(3)
    }
}
