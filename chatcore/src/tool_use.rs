//! `ToolUse`: one tool invocation requested by the model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ValidationError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolUse {
    #[serde(default = "new_tool_use_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: BTreeMap<String, Value>,
    #[serde(default)]
    pub user_notification: String,
}

fn new_tool_use_id() -> String {
    Uuid::new_v4().to_string()
}

impl ToolUse {
    /// Parses a buffered `tool` tag's JSON body. Generates a fresh `id` when
    /// the model omits one.
    pub fn parse(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed {
            tag: "tool",
            reason: e.to_string(),
        })
    }
}
