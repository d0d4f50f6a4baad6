//! Integration tests for the six concrete scenarios.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chat_event::OutboundEvent;
use chatcore::{
    ArgSpec, ConversationAgent, ConversationContext, MockLlmClient, Tool, ToolError, ToolRegistry,
    ToolSpec,
};
use chatconfig::ChatConfig;
use serde_json::Value;

struct StubWebSearch;

#[async_trait]
impl Tool for StubWebSearch {
    fn name(&self) -> &str {
        "web_search"
    }
    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "web_search".into(),
            description: "stub web search".into(),
            argument_schema: BTreeMap::from([(
                "query".to_string(),
                ArgSpec::new("search query", "string"),
            )]),
        }
    }
    async fn call(&self, _arguments: &BTreeMap<String, Value>) -> Result<String, ToolError> {
        Ok("Rust is a systems programming language.".into())
    }
}

async fn collect(mut rx: tokio::sync::mpsc::Receiver<OutboundEvent>) -> Vec<OutboundEvent> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

fn text_of(events: &[OutboundEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            OutboundEvent::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect()
}

fn agent_with(llm: MockLlmClient, registry: ToolRegistry) -> Arc<ConversationAgent> {
    let config = ChatConfig::default();
    Arc::new(ConversationAgent::new(Arc::new(llm), Arc::new(registry), &config))
}

#[tokio::test]
async fn scenario_1_immediate_complete() {
    let response = concat!(
        r#"[PLAN]{"steps":[{"description":"answer","status":"completed","tools":[]}],"current_step":1,"total_steps":1}[/PLAN]"#,
        r#"[REASONING]{"thought":"just answer directly","user_notification":"Thinking"}[/REASONING]"#,
        "[TEXT]hello[/TEXT]",
        r#"[STATUS]{"status":"complete"}[/STATUS]"#,
        "[SUMMARY]Said hello[/SUMMARY]",
    );
    let agent = agent_with(MockLlmClient::single(response), ToolRegistry::new());
    let rx = agent.process_message("hi".into(), "You are helpful.".into(), ConversationContext::default());
    let events = collect(rx).await;

    assert!(matches!(events.first(), Some(OutboundEvent::Reasoning(n)) if n == "Thinking"));
    assert_eq!(text_of(&events), "hello");

    let last = events.last().expect("at least one event");
    let context = match last {
        OutboundEvent::UpdatedContext(v) => v.clone(),
        other => panic!("expected updated_context as last event, got {other:?}"),
    };
    let history = context["history"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "human");
    assert_eq!(history[0]["content"], "hi");
    assert_eq!(history[1]["role"], "ai");
    assert_eq!(history[1]["content"], "hello");
}

#[tokio::test]
async fn scenario_2_single_tool_then_complete() {
    let iteration1 = concat!(
        r#"[PLAN]{"steps":[{"description":"search","status":"in_progress","tools":["web_search"]},{"description":"answer","status":"pending","tools":[]}],"current_step":1,"total_steps":2}[/PLAN]"#,
        r#"[REASONING]{"thought":"need to search","user_notification":"Searching"}[/REASONING]"#,
        r#"[TOOL]{"id":"call-1","name":"web_search","arguments":{"query":"what is rust"}}[/TOOL]"#,
        r#"[STATUS]{"status":"continue"}[/STATUS]"#,
    );
    let iteration2 = concat!(
        r#"[PLAN]{"steps":[{"description":"search","status":"completed","tools":["web_search"]},{"description":"answer","status":"completed","tools":[]}],"current_step":2,"total_steps":2}[/PLAN]"#,
        r#"[REASONING]{"thought":"summarize findings","user_notification":"Answering"}[/REASONING]"#,
        "[TEXT]Rust is great[/TEXT]",
        r#"[STATUS]{"status":"complete"}[/STATUS]"#,
        "[SUMMARY]Explained Rust via web_search[/SUMMARY]",
    );
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(StubWebSearch));
    let agent = agent_with(
        MockLlmClient::new(vec![iteration1.to_string(), iteration2.to_string()]),
        registry,
    );
    let rx = agent.process_message(
        "tell me about rust".into(),
        "You are helpful.".into(),
        ConversationContext::default(),
    );
    let events = collect(rx).await;

    let tool_starts = events.iter().filter(|e| matches!(e, OutboundEvent::ToolStart(_))).count();
    let tool_ends = events.iter().filter(|e| matches!(e, OutboundEvent::ToolEnd(_))).count();
    assert_eq!(tool_starts, 1);
    assert_eq!(tool_ends, 1);

    let start_id = events.iter().find_map(|e| match e {
        OutboundEvent::ToolStart(s) => Some(s.id.clone()),
        _ => None,
    });
    let end_id = events.iter().find_map(|e| match e {
        OutboundEvent::ToolEnd(s) => Some(s.id.clone()),
        _ => None,
    });
    assert_eq!(start_id, end_id);

    assert!(matches!(events.last(), Some(OutboundEvent::UpdatedContext(_))));
}

#[tokio::test]
async fn scenario_3_tool_not_available() {
    let iteration1 = concat!(
        r#"[PLAN]{"steps":[{"description":"try a tool","status":"in_progress","tools":["nonexistent"]}],"current_step":1,"total_steps":1}[/PLAN]"#,
        r#"[REASONING]{"thought":"try it","user_notification":"Trying"}[/REASONING]"#,
        r#"[TOOL]{"id":"call-1","name":"nonexistent","arguments":{}}[/TOOL]"#,
        r#"[STATUS]{"status":"continue"}[/STATUS]"#,
    );
    let iteration2 = concat!(
        r#"[REASONING]{"thought":"give up on the tool","user_notification":"Responding"}[/REASONING]"#,
        "[TEXT]done[/TEXT]",
        r#"[STATUS]{"status":"complete"}[/STATUS]"#,
    );
    let agent = agent_with(
        MockLlmClient::new(vec![iteration1.to_string(), iteration2.to_string()]),
        ToolRegistry::new(),
    );
    let rx = agent.process_message("use a tool".into(), "You are helpful.".into(), ConversationContext::default());
    let events = collect(rx).await;

    let error = events.iter().find_map(|e| match e {
        OutboundEvent::ToolEnd(end) => end.error.clone(),
        _ => None,
    });
    assert_eq!(error.as_deref(), Some("Tool 'nonexistent' is not available."));
    assert!(matches!(events.last(), Some(OutboundEvent::UpdatedContext(_))));
}

#[tokio::test]
async fn scenario_4_iteration_overrun() {
    let always_continue = || {
        concat!(
            r#"[PLAN]{"steps":[{"description":"loop","status":"in_progress","tools":["current_time"]}],"current_step":1,"total_steps":1}[/PLAN]"#,
            r#"[REASONING]{"thought":"keep going","user_notification":"Working"}[/REASONING]"#,
            r#"[TOOL]{"id":"call-1","name":"current_time","arguments":{}}[/TOOL]"#,
            r#"[STATUS]{"status":"continue"}[/STATUS]"#,
        )
        .to_string()
    };
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(chatcore::CurrentTimeTool));
    let agent = agent_with(
        MockLlmClient::new(vec![always_continue(), always_continue(), always_continue()]),
        registry,
    );
    let rx = agent.process_message("keep going".into(), "You are helpful.".into(), ConversationContext::default());
    let events = collect(rx).await;

    match events.last() {
        Some(OutboundEvent::Error(message)) => assert!(message.contains("maximum number of iterations (3)")),
        other => panic!("expected iteration overrun error, got {other:?}"),
    }
    assert!(!events.iter().any(|e| matches!(e, OutboundEvent::UpdatedContext(_))));
}

#[tokio::test]
async fn scenario_5_missing_status() {
    let response = concat!(
        r#"[PLAN]{"steps":[{"description":"answer","status":"in_progress","tools":[]}],"current_step":1,"total_steps":1}[/PLAN]"#,
        r#"[REASONING]{"thought":"forgot status","user_notification":"Thinking"}[/REASONING]"#,
        "[TEXT]partial answer[/TEXT]",
    );
    let agent = agent_with(MockLlmClient::single(response), ToolRegistry::new());
    let rx = agent.process_message("hi".into(), "You are helpful.".into(), ConversationContext::default());
    let events = collect(rx).await;

    match events.last() {
        Some(OutboundEvent::Error(message)) => {
            assert_eq!(message, "No STATUS set after processing LLM response.")
        }
        other => panic!("expected missing-status error, got {other:?}"),
    }
}
