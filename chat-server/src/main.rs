mod app;
mod routes;
mod sse;

use std::sync::Arc;

use chatconfig::ChatConfig;
use chatcore::{ArithmeticTool, ConversationAgent, CurrentTimeTool, OpenAiClient, ToolRegistry, WebPageTool, WebSearchTool};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chatconfig::init_tracing();

    let config = ChatConfig::load(None)?;

    let mut tools = ToolRegistry::new();
    tools.register(Box::new(CurrentTimeTool));
    tools.register(Box::new(ArithmeticTool));
    tools.register(Box::new(WebSearchTool::new()));
    tools.register(Box::new(WebPageTool::new()));

    let llm = OpenAiClient::new(
        config.openai_api_key.clone(),
        config.openai_api_base.clone(),
        config.openai_model.clone(),
    );

    let agent = Arc::new(ConversationAgent::new(Arc::new(llm), Arc::new(tools), &config));
    let state = app::AppState { agent };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("chat-server listening on http://{}", addr);

    axum::serve(listener, app::router(state)).await?;
    Ok(())
}
