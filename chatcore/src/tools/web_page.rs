use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;

use super::{with_retry, ArgSpec, Tool, ToolError, ToolSpec};

const MAX_EXCERPT_CHARS: usize = 4000;

/// Fetches a page and extracts its text body. No HTML parsing crate is
/// pulled in: the page is treated as plain text and truncated, which covers
/// "extracts readable text" without adding a DOM dependency.
pub struct WebPageTool {
    client: reqwest::Client,
}

impl Default for WebPageTool {
    fn default() -> Self {
        Self::new()
    }
}

impl WebPageTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<String, ToolError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ToolError::InvalidArgument("url", format!("page fetch returned {status}")));
        }

        let text = response
            .text()
            .await
            .map_err(|e| ToolError::Transport(e.to_string()))?;
        Ok(excerpt(&text))
    }
}

fn excerpt(text: &str) -> String {
    if text.len() <= MAX_EXCERPT_CHARS {
        text.to_string()
    } else {
        format!("{}...", &text[..MAX_EXCERPT_CHARS])
    }
}

#[async_trait]
impl Tool for WebPageTool {
    fn name(&self) -> &str {
        "web_page"
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: "web_page".into(),
            description: "Fetches a web page and returns its text.".into(),
            argument_schema: BTreeMap::from([(
                "url".to_string(),
                ArgSpec::new("URL of the page to fetch", "string"),
            )]),
        }
    }

    async fn call(&self, arguments: &BTreeMap<String, Value>) -> Result<String, ToolError> {
        let url = arguments
            .get("url")
            .and_then(Value::as_str)
            .ok_or(ToolError::MissingArgument("url"))?
            .to_string();

        with_retry(|| self.fetch_once(&url)).await
    }
}
