//! Tool registry and dispatcher.

mod arithmetic;
mod current_time;
mod registry;
mod web_page;
mod web_search;

pub use arithmetic::ArithmeticTool;
pub use current_time::CurrentTimeTool;
pub use registry::ToolRegistry;
pub use web_page::WebPageTool;
pub use web_search::WebSearchTool;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// One entry of a tool's `argument_schema`: the argument's purpose, and
/// optionally the JSON type it must take (`"string"`, `"number"`, …).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgSpec {
    pub description: String,
    pub arg_type: Option<String>,
}

impl ArgSpec {
    pub fn new(description: impl Into<String>, arg_type: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            arg_type: Some(arg_type.into()),
        }
    }
}

/// Description of a tool surfaced to the LLM in format instructions and
/// used by the dispatcher to validate `ToolUse.arguments` before `call`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub argument_schema: BTreeMap<String, ArgSpec>,
}

impl ToolSpec {
    /// Checks every declared argument is present and, when a type is
    /// declared, that the supplied value matches it. Returns the first
    /// violation found; declaration order is the iteration order of the
    /// schema map (lexicographic by argument name).
    pub fn validate_arguments(&self, arguments: &BTreeMap<String, Value>) -> Result<(), ToolError> {
        for (name, arg_spec) in &self.argument_schema {
            match arguments.get(name) {
                None => {
                    return Err(ToolError::SchemaValidation(format!(
                        "missing required argument `{name}` ({})",
                        arg_spec.description
                    )))
                }
                Some(value) => {
                    if let Some(expected) = &arg_spec.arg_type {
                        if !value_matches_type(value, expected) {
                            return Err(ToolError::SchemaValidation(format!(
                                "argument `{name}` must be of type {expected}, got {value}"
                            )));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

/// Non-fatal failure of a single tool invocation. Folded into
/// `tool_results` by the dispatcher — never propagated as a fatal
/// `AgentError`.
#[derive(Debug, Error, Clone)]
pub enum ToolError {
    #[error("Tool '{0}' is not available.")]
    NotFound(String),
    #[error("{0}")]
    SchemaValidation(String),
    #[error("missing required argument `{0}`")]
    MissingArgument(&'static str),
    #[error("invalid argument `{0}`: {1}")]
    InvalidArgument(&'static str, String),
    #[error("tool timed out after {0:?}")]
    Timeout(std::time::Duration),
    #[error("transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn spec(&self) -> ToolSpec;
    async fn call(&self, arguments: &BTreeMap<String, Value>) -> Result<String, ToolError>;
}

/// Shared timeout/retry policy for network tools: a 10s per-attempt
/// timeout, retried up to 3 times with exponential backoff on transport
/// errors. Non-transport failures (e.g. a non-2xx response the caller has
/// already turned into a `ToolError`) are not retried.
pub(crate) async fn with_retry<F, Fut>(mut attempt: F) -> Result<String, ToolError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<String, ToolError>>,
{
    const MAX_ATTEMPTS: u32 = 3;
    const TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

    let mut last_err = None;
    for n in 0..MAX_ATTEMPTS {
        match tokio::time::timeout(TIMEOUT, attempt()).await {
            Ok(Ok(text)) => return Ok(text),
            Ok(Err(ToolError::Transport(msg))) => last_err = Some(ToolError::Transport(msg)),
            Ok(Err(other)) => return Err(other),
            Err(_) => last_err = Some(ToolError::Timeout(TIMEOUT)),
        }
        if n + 1 < MAX_ATTEMPTS {
            let backoff = std::time::Duration::from_millis(200 * 2u64.pow(n));
            tokio::time::sleep(backoff).await;
        }
    }
    Err(last_err.unwrap_or(ToolError::Transport("retry loop exhausted".into())))
}
