use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{Tool, ToolError, ToolSpec};

/// Returns the current UTC time. Takes no arguments, never fails.
pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "current_time"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "current_time".into(),
            description: "Returns the current UTC time in RFC 3339 format. Takes no arguments."
                .into(),
            argument_schema: std::collections::BTreeMap::new(),
        }
    }

    async fn call(&self, _arguments: &BTreeMap<String, Value>) -> Result<String, ToolError> {
        Ok(Utc::now().to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_rfc3339_timestamp() {
        let tool = CurrentTimeTool;
        let result = tool.call(&BTreeMap::new()).await.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&result).is_ok());
    }
}
