//! Assembles the outbound LLM prompt from a [`ConversationState`] — system
//! prompt, running summary, a bounded window of recent history, the latest
//! user input, and the tag-grammar format instructions.

use crate::conversation_state::ConversationState;
use crate::tools::ToolSpec;

/// One message as sent to the LLM transport. Deliberately distinct from
/// [`crate::message::MessageEntry`]: this is the wire shape the transport
/// speaks (`role` as a plain string), not the conversation's own record
/// type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

/// Builds the full message list sent to the LLM for one iteration.
///
/// History is truncated to the last `max_history_messages` entries
/// (configurable via `ChatConfig::max_history_messages`, default 10) before
/// the current user input is appended.
pub fn prepare_messages(
    state: &ConversationState,
    tools: &[ToolSpec],
    max_history_messages: usize,
) -> Vec<ChatMessage> {
    let mut messages = Vec::new();

    let mut system_prompt = state.system_prompt.clone();
    system_prompt.push_str("\n\n");
    system_prompt.push_str(&format_instructions(tools));
    messages.push(ChatMessage {
        role: "system",
        content: system_prompt,
    });

    if !state.summary.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: format!("Conversation summary so far:\n{}", state.summary),
        });
    }

    let start = state.history.len().saturating_sub(max_history_messages);
    for entry in &state.history[start..] {
        messages.push(ChatMessage {
            role: entry.role.as_wire_role(),
            content: entry.content.clone(),
        });
    }

    messages.push(ChatMessage {
        role: "user",
        content: state.user_input.clone(),
    });

    messages
}

/// Renders the static tag-grammar instructions plus the dynamic tool list.
pub fn format_instructions(tools: &[ToolSpec]) -> String {
    let mut out = String::new();
    out.push_str(
        "Respond using bracketed tags: [REASONING]...[/REASONING], \
         [PLAN]...[/PLAN], [TOOL]...[/TOOL], [TEXT]...[/TEXT], \
         [SUMMARY]...[/SUMMARY], and [STATUS]...[/STATUS]. \
         Every response must end with a STATUS tag whose JSON body has a \
         \"status\" field of \"continue\", \"clarify\", or \"complete\".\n",
    );
    if tools.is_empty() {
        out.push_str("No tools are available.");
        return out;
    }
    out.push_str("Available tools:\n");
    for tool in tools {
        out.push_str(&format!(
            "- {}: {} / Arguments: {}\n",
            tool.name,
            tool.description,
            render_argument_schema(tool)
        ));
    }
    out
}

fn render_argument_schema(tool: &ToolSpec) -> String {
    if tool.argument_schema.is_empty() {
        return "none".to_string();
    }
    tool.argument_schema
        .iter()
        .map(|(name, arg)| format!("{name}: {}", arg.description))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{MessageEntry, Role};

    fn state_with_history(n: usize) -> ConversationState {
        let mut state = ConversationState::new(
            "You are a helpful assistant.".into(),
            "what's the weather?".into(),
            (0..n)
                .map(|i| MessageEntry::human(format!("msg {i}")))
                .collect(),
            String::new(),
            3,
        );
        state.summary = String::new();
        state
    }

    #[test]
    fn truncates_history_to_max_messages() {
        let state = state_with_history(15);
        let messages = prepare_messages(&state, &[], 10);
        // system + 10 history + user
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[1].content, "msg 5");
    }

    #[test]
    fn includes_summary_when_present() {
        let mut state = state_with_history(0);
        state.summary = "user wants weather updates".into();
        let messages = prepare_messages(&state, &[], 10);
        assert!(messages[1].content.contains("user wants weather updates"));
    }

    #[test]
    fn format_instructions_lists_tools() {
        let tools = vec![ToolSpec {
            name: "current_time".into(),
            description: "returns current UTC time".into(),
            argument_schema: std::collections::BTreeMap::new(),
        }];
        let rendered = format_instructions(&tools);
        assert!(rendered.contains("current_time"));
        assert!(rendered.contains("STATUS"));
    }

    #[test]
    fn format_instructions_renders_no_arguments_as_none() {
        let tools = vec![ToolSpec {
            name: "current_time".into(),
            description: "returns current UTC time".into(),
            argument_schema: std::collections::BTreeMap::new(),
        }];
        let rendered = format_instructions(&tools);
        assert!(rendered.contains("current_time: returns current UTC time / Arguments: none"));
    }

    #[test]
    fn format_instructions_renders_argument_schema() {
        use crate::tools::ArgSpec;
        let tools = vec![ToolSpec {
            name: "web_search".into(),
            description: "searches the web".into(),
            argument_schema: std::collections::BTreeMap::from([(
                "query".to_string(),
                ArgSpec::new("search query", "string"),
            )]),
        }];
        let rendered = format_instructions(&tools);
        assert!(rendered.contains("web_search: searches the web / Arguments: query: search query"));
    }
}
