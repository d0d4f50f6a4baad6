//! Outbound event types: wire shape for one event in the `/openai/chat` stream.
//!
//! Each variant's payload becomes the `content` field; the envelope is just
//! `{type, content}`.

use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, Serialize)]
pub struct ToolStart {
    pub id: String,
    pub name: String,
    pub description: String,
    pub user_notification: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ToolEnd {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One event in the outbound stream. Serializes as `{"type": ..., "content": ...}`.
#[derive(Clone, Debug)]
pub enum OutboundEvent {
    Reasoning(String),
    Text(String),
    ToolStart(ToolStart),
    ToolEnd(ToolEnd),
    UpdatedContext(Value),
    Error(String),
}

impl OutboundEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            OutboundEvent::Reasoning(_) => "reasoning",
            OutboundEvent::Text(_) => "text",
            OutboundEvent::ToolStart(_) => "tool_start",
            OutboundEvent::ToolEnd(_) => "tool_end",
            OutboundEvent::UpdatedContext(_) => "updated_context",
            OutboundEvent::Error(_) => "error",
        }
    }

    /// Serializes this event to the `{"type", "content"}` JSON envelope.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        let content = match self {
            OutboundEvent::Reasoning(s) => Value::String(s.clone()),
            OutboundEvent::Text(s) => Value::String(s.clone()),
            OutboundEvent::ToolStart(t) => serde_json::to_value(t)?,
            OutboundEvent::ToolEnd(t) => serde_json::to_value(t)?,
            OutboundEvent::UpdatedContext(v) => v.clone(),
            OutboundEvent::Error(s) => Value::String(s.clone()),
        };
        Ok(serde_json::json!({ "type": self.type_name(), "content": content }))
    }

    /// Renders this event as one SSE `data: <json>\n\n` line.
    pub fn to_sse_line(&self) -> Result<String, serde_json::Error> {
        let value = self.to_value()?;
        Ok(format!("data: {}\n\n", value))
    }
}

/// The literal terminator line sent after the last real event.
pub const DONE_LINE: &str = "data: [DONE]\n\n";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasoning_serializes_as_type_and_string_content() {
        let ev = OutboundEvent::Reasoning("searching the web".to_string());
        let v = ev.to_value().unwrap();
        assert_eq!(v["type"], "reasoning");
        assert_eq!(v["content"], "searching the web");
    }

    #[test]
    fn tool_end_error_omits_result_field() {
        let ev = OutboundEvent::ToolEnd(ToolEnd {
            id: "t1".into(),
            name: "web_search".into(),
            result: None,
            error: Some("Tool 'web_search' timed out.".into()),
        });
        let v = ev.to_value().unwrap();
        assert_eq!(v["type"], "tool_end");
        assert!(v["content"].get("result").is_none());
        assert_eq!(v["content"]["error"], "Tool 'web_search' timed out.");
    }

    #[test]
    fn sse_line_ends_with_double_newline() {
        let ev = OutboundEvent::Text("h".to_string());
        let line = ev.to_sse_line().unwrap();
        assert!(line.starts_with("data: "));
        assert!(line.ends_with("\n\n"));
    }

    #[test]
    fn done_line_is_literal() {
        assert_eq!(DONE_LINE, "data: [DONE]\n\n");
    }
}
