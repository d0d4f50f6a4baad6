use async_trait::async_trait;
use evalexpr::eval;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{ArgSpec, Tool, ToolError, ToolSpec};

/// Evaluates a restricted arithmetic expression. `evalexpr` alone, with no
/// context/functions bound, has no access to I/O or the environment —
/// purely a calculator.
pub struct ArithmeticTool;

#[async_trait]
impl Tool for ArithmeticTool {
    fn name(&self) -> &str {
        "arithmetic"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "arithmetic".into(),
            description: "Evaluates an arithmetic expression.".into(),
            argument_schema: BTreeMap::from([(
                "expression".to_string(),
                ArgSpec::new("Arithmetic expression to evaluate", "string"),
            )]),
        }
    }

    async fn call(&self, arguments: &BTreeMap<String, Value>) -> Result<String, ToolError> {
        let expression = arguments
            .get("expression")
            .and_then(Value::as_str)
            .ok_or(ToolError::MissingArgument("expression"))?;

        eval(expression)
            .map(|v| v.to_string())
            .map_err(|e| ToolError::InvalidArgument("expression", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(expression: &str) -> BTreeMap<String, Value> {
        BTreeMap::from([("expression".to_string(), json!(expression))])
    }

    #[tokio::test]
    async fn evaluates_simple_expression() {
        let tool = ArithmeticTool;
        let result = tool.call(&args("2 + 3 * 4")).await.unwrap();
        assert_eq!(result, "14");
    }

    #[tokio::test]
    async fn rejects_malformed_expression() {
        let tool = ArithmeticTool;
        assert!(tool.call(&args("2 +")).await.is_err());
    }

    #[tokio::test]
    async fn requires_expression_argument() {
        let tool = ArithmeticTool;
        assert!(matches!(
            tool.call(&BTreeMap::new()).await,
            Err(ToolError::MissingArgument("expression"))
        ));
    }
}
