//! LLM transport abstraction: the conversation agent depends on this trait,
//! never on a concrete provider, so tests run entirely against
//! [`MockLlmClient`].

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use crate::error::AgentError;
use crate::message_preparer::ChatMessage;

/// An LLM transport: given a prepared message list, streams raw text tokens
/// through `tx` as they arrive and returns once the model has finished its
/// turn. Tag parsing happens downstream, in [`crate::tag_stream`]; this
/// trait only ever deals in plain text.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke_stream(
        &self,
        messages: &[ChatMessage],
        tx: mpsc::Sender<String>,
    ) -> Result<(), AgentError>;
}

/// Fixed-script test double: each call to `invoke_stream` consumes the next
/// scripted response, split into token-sized chunks and sent one at a time
/// so tests can exercise the tag stream processor's incremental parsing.
pub struct MockLlmClient {
    responses: std::sync::Mutex<std::collections::VecDeque<String>>,
}

impl MockLlmClient {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into_iter().collect()),
        }
    }

    /// Convenience for a single-iteration run: one scripted response.
    pub fn single(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn invoke_stream(
        &self,
        _messages: &[ChatMessage],
        tx: mpsc::Sender<String>,
    ) -> Result<(), AgentError> {
        let response = self
            .responses
            .lock()
            .expect("mock response queue poisoned")
            .pop_front()
            .ok_or_else(|| AgentError::Transport("MockLlmClient: no scripted response left".into()))?;

        // Split on char boundaries to simulate realistic multi-token delivery,
        // exercising the tag processor's carry buffer.
        for ch in response.chars() {
            if tx.send(ch.to_string()).await.is_err() {
                // Consumer dropped the channel (client disconnect); stop feeding.
                return Ok(());
            }
        }
        Ok(())
    }
}

/// OpenAI-compatible chat completions client, built from `ChatConfig`. Not
/// exercised by `chatcore`'s own test suite, which uses [`MockLlmClient`]
/// exclusively — this is the implementation `chat-server` constructs for
/// real traffic.
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, api_base: Option<String>, model: String) -> Self {
        let mut config = OpenAIConfig::new();
        if let Some(key) = api_key {
            config = config.with_api_key(key);
        }
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    fn to_request_messages(messages: &[ChatMessage]) -> Vec<ChatCompletionRequestMessage> {
        messages
            .iter()
            .map(|m| match m.role {
                "system" => ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(m.content.as_str()),
                ),
                "assistant" => ChatCompletionRequestMessage::Assistant(m.content.as_str().into()),
                _ => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                    m.content.as_str(),
                )),
            })
            .collect()
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn invoke_stream(
        &self,
        messages: &[ChatMessage],
        tx: mpsc::Sender<String>,
    ) -> Result<(), AgentError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.clone())
            .messages(Self::to_request_messages(messages))
            .build()
            .map_err(|e| AgentError::Transport(format!("OpenAI request build failed: {e}")))?;

        let mut stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(|e| AgentError::Transport(format!("OpenAI stream error: {e}")))?;

        while let Some(result) = stream.next().await {
            let response = result.map_err(|e| AgentError::Transport(format!("OpenAI stream error: {e}")))?;
            for choice in response.choices {
                if let Some(content) = choice.delta.content {
                    if !content.is_empty() && tx.send(content).await.is_err() {
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_streams_scripted_response_char_by_char() {
        let client = MockLlmClient::single("[TEXT]hi[/TEXT]");
        let (tx, mut rx) = mpsc::channel(64);
        client.invoke_stream(&[], tx).await.unwrap();
        let mut collected = String::new();
        while let Some(chunk) = rx.recv().await {
            collected.push_str(&chunk);
        }
        assert_eq!(collected, "[TEXT]hi[/TEXT]");
    }

    #[tokio::test]
    async fn exhausted_mock_queue_is_a_transport_error() {
        let client = MockLlmClient::new(vec![]);
        let (tx, _rx) = mpsc::channel(8);
        assert!(client.invoke_stream(&[], tx).await.is_err());
    }
}
