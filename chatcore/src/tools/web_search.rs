use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{with_retry, ArgSpec, Tool, ToolError, ToolSpec};

const DEFAULT_SEARCH_URL: &str = "https://api.search.example.com/search";

fn search_url() -> String {
    std::env::var("WEB_SEARCH_URL").unwrap_or_else(|_| DEFAULT_SEARCH_URL.to_string())
}

/// Issues a search query against a configurable HTTP endpoint and returns a
/// formatted result list.
pub struct WebSearchTool {
    client: reqwest::Client,
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WebSearchTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn search_once(&self, query: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(search_url())
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ToolError::InvalidArgument(
                "query",
                format!("search endpoint returned {status}"),
            ));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))?;
        Ok(format_results(&body))
    }
}

fn format_results(body: &Value) -> String {
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);
    if results.is_empty() {
        return "No results found.".to_string();
    }
    let mut out = String::new();
    for (i, r) in results.iter().enumerate() {
        let title = r.get("title").and_then(Value::as_str).unwrap_or("(no title)");
        let url = r.get("url").and_then(Value::as_str).unwrap_or("");
        out.push_str(&format!("[{}] {}\n  {}\n", i + 1, title, url));
    }
    out
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "web_search".into(),
            description: "Searches the web and returns a list of relevant results.".into(),
            argument_schema: BTreeMap::from([(
                "query".to_string(),
                ArgSpec::new("Search query in the user's language", "string"),
            )]),
        }
    }

    async fn call(&self, arguments: &BTreeMap<String, Value>) -> Result<String, ToolError> {
        let query = arguments
            .get("query")
            .and_then(Value::as_str)
            .ok_or(ToolError::MissingArgument("query"))?
            .to_string();

        with_retry(|| self.search_once(&query)).await
    }
}
