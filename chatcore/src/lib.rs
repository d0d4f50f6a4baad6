//! Core of the streaming, tool-augmented, plan-driven conversation agent:
//! tag stream processor, message preparer, tool registry and dispatcher,
//! conversation state, and the agent loop tying them together.
//!
//! The HTTP surface, LLM provider wiring, and process bootstrap live outside
//! this crate; see `chat-server`.

pub mod agent;
pub mod conversation_state;
pub mod error;
pub mod llm;
pub mod message;
pub mod message_preparer;
pub mod plan;
pub mod reasoning;
pub mod status;
pub mod tag_stream;
pub mod tool_use;
pub mod tools;

pub use agent::ConversationAgent;
pub use conversation_state::{ConversationState, ToolResult};
pub use error::{AgentError, ValidationError};
pub use llm::{LlmClient, MockLlmClient, OpenAiClient};
pub use message::{ConversationContext, MessageEntry, Role};
pub use plan::{Plan, Step, StepStatus};
pub use reasoning::Reasoning;
pub use status::{Status, StatusKind};
pub use tool_use::ToolUse;
pub use tools::{
    ArgSpec, ArithmeticTool, CurrentTimeTool, Tool, ToolError, ToolRegistry, ToolSpec, WebPageTool,
    WebSearchTool,
};
