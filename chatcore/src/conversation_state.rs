//! `ConversationState`: the agent's working memory for a single
//! `process_message` run, threaded through every iteration of the loop.

use serde::Serialize;

use crate::message::MessageEntry;
use crate::plan::Plan;
use crate::status::Status;
use crate::tool_use::ToolUse;

/// Outcome of one dispatched tool call, folded back into state. Exactly one
/// of `result`/`error` is set; a tool failure is non-fatal to the run.
#[derive(Clone, Debug, Serialize)]
pub struct ToolResult {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ConversationState {
    pub system_prompt: String,
    pub user_input: String,
    pub history: Vec<MessageEntry>,
    pub summary: String,
    pub current_plan: Option<Plan>,
    pub reasoning_history: Vec<String>,
    pub tool_queue: Vec<ToolUse>,
    pub tool_results: Vec<ToolResult>,
    pub latest_summary: Option<String>,
    pub status: Option<Status>,
    pub max_iterations: u32,
}

impl ConversationState {
    pub fn new(
        system_prompt: String,
        user_input: String,
        history: Vec<MessageEntry>,
        summary: String,
        max_iterations: u32,
    ) -> Self {
        Self {
            system_prompt,
            user_input,
            history,
            summary,
            current_plan: None,
            reasoning_history: Vec::new(),
            tool_queue: Vec::new(),
            tool_results: Vec::new(),
            latest_summary: None,
            status: None,
            max_iterations: max_iterations.max(1),
        }
    }

    /// Clears the per-iteration tool queue and results, keeping everything
    /// else (plan, reasoning history, summary) intact across iterations.
    pub fn begin_iteration(&mut self) {
        self.tool_queue.clear();
        self.tool_results.clear();
        self.status = None;
    }
}
