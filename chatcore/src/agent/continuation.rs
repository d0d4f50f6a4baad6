//! Builds the deterministic continuation message appended to history between
//! iterations.

use crate::conversation_state::ToolResult;
use crate::plan::Plan;

/// Advisory suffix fed back to the model so it does not retry a failed tool
/// call verbatim.
fn render_tool_result(result: &ToolResult) -> String {
    match (&result.result, &result.error) {
        (Some(ok), _) => format!("{}: {}", result.name, ok),
        (None, Some(err)) => format!(
            "{} failed: {}. Do not retry this exact call; try a different approach.",
            result.name, err
        ),
        (None, None) => format!("{}: (no result)", result.name),
    }
}

pub fn build_continuation_message(
    plan: Option<&Plan>,
    reasoning_history: &[String],
    tool_results: &[ToolResult],
) -> String {
    let progress = match plan {
        Some(p) => format!("Current progress: Step {} of {}.", p.current_step, p.total_steps),
        None => "Current progress: no plan declared yet.".to_string(),
    };

    let plan_json = plan
        .map(|p| serde_json::to_string(p).unwrap_or_default())
        .unwrap_or_else(|| "null".to_string());

    let reasoning_joined = if reasoning_history.is_empty() {
        "(none)".to_string()
    } else {
        reasoning_history.join(" | ")
    };

    let results_joined = if tool_results.is_empty() {
        "(none)".to_string()
    } else {
        tool_results
            .iter()
            .map(render_tool_result)
            .collect::<Vec<_>>()
            .join(" | ")
    };

    format!(
        "{progress} Current plan: {plan_json}. Previous reasoning: {reasoning_joined}. \
         Recent tool results: {results_joined}."
    )
}
