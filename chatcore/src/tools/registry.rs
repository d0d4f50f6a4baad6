use std::collections::HashMap;

use chat_event::{OutboundEvent, ToolEnd, ToolStart};
use tokio::sync::mpsc::Sender;

use crate::conversation_state::ToolResult;
use crate::tool_use::ToolUse;

use super::{Tool, ToolError, ToolSpec};

/// Name-keyed tool lookup backed by a `HashMap<String, Box<dyn Tool>>`.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    /// Dispatches every queued tool call concurrently, emitting a
    /// `tool_start`/`tool_end` pair on `tx` around each one. Tool-level
    /// failures (unknown name, validation, transport) are non-fatal: they
    /// become an `error`-bearing [`ToolResult`] rather than aborting the
    /// batch.
    pub async fn dispatch(
        &self,
        queue: &[ToolUse],
        tx: &Sender<OutboundEvent>,
    ) -> Vec<ToolResult> {
        let futures = queue.iter().map(|call| self.run_one(call, tx));
        futures::future::join_all(futures).await
    }

    async fn run_one(&self, call: &ToolUse, tx: &Sender<OutboundEvent>) -> ToolResult {
        let _ = tx
            .send(OutboundEvent::ToolStart(ToolStart {
                id: call.id.clone(),
                name: call.name.clone(),
                description: self
                    .tools
                    .get(&call.name)
                    .map(|t| t.spec().description)
                    .unwrap_or_default(),
                user_notification: call.user_notification.clone(),
            }))
            .await;

        let outcome = match self.tools.get(&call.name) {
            Some(tool) => match tool.spec().validate_arguments(&call.arguments) {
                Ok(()) => tool.call(&call.arguments).await,
                Err(e) => Err(e),
            },
            None => Err(ToolError::NotFound(call.name.clone())),
        };

        let result = match outcome {
            Ok(text) => ToolResult {
                id: call.id.clone(),
                name: call.name.clone(),
                result: Some(text),
                error: None,
            },
            Err(e) => {
                tracing::warn!(tool = %call.name, error = %e, "tool call failed");
                ToolResult {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    result: None,
                    error: Some(e.to_string()),
                }
            }
        };

        let _ = tx
            .send(OutboundEvent::ToolEnd(ToolEnd {
                id: result.id.clone(),
                name: result.name.clone(),
                result: result.result.clone(),
                error: result.error.clone(),
            }))
            .await;

        result
    }
}
