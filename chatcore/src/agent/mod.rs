//! Conversation Agent: the outer loop tying together the message preparer,
//! tag stream processor, and tool dispatcher.

mod continuation;

use std::sync::Arc;

use chat_event::OutboundEvent;
use chatconfig::ChatConfig;
use tokio::sync::mpsc;

use crate::conversation_state::ConversationState;
use crate::error::AgentError;
use crate::llm::LlmClient;
use crate::message::{ConversationContext, MessageEntry};
use crate::message_preparer::prepare_messages;
use crate::plan::Plan;
use crate::reasoning::Reasoning;
use crate::status::{Status, StatusKind};
use crate::tag_stream::{TagEvent, TagKind, TagStreamProcessor};
use crate::tool_use::ToolUse;
use crate::tools::ToolRegistry;

use continuation::build_continuation_message;

/// Outbound channel capacity. Generous enough that a fast producer never
/// blocks on a slow consumer for a single text token, small enough that a
/// stalled consumer creates backpressure quickly.
const CHANNEL_CAPACITY: usize = 256;

pub struct ConversationAgent {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    max_history_messages: usize,
    default_max_iterations: u32,
    extra_iterations_on_plan: u32,
}

impl ConversationAgent {
    pub fn new(llm: Arc<dyn LlmClient>, tools: Arc<ToolRegistry>, config: &ChatConfig) -> Self {
        Self {
            llm,
            tools,
            max_history_messages: config.max_history_messages,
            default_max_iterations: config.default_max_iterations,
            extra_iterations_on_plan: config.extra_iterations_on_plan,
        }
    }

    /// Starts a new request. Spawns the producer task and returns the
    /// receiving half of its outbound channel; dropping the receiver
    /// cancels the producer.
    pub fn process_message(
        self: Arc<Self>,
        message: String,
        system_prompt: String,
        context: ConversationContext,
    ) -> mpsc::Receiver<OutboundEvent> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(async move {
            self.run(message, system_prompt, context, tx).await;
        });
        rx
    }

    async fn run(
        &self,
        message: String,
        system_prompt: String,
        context: ConversationContext,
        tx: mpsc::Sender<OutboundEvent>,
    ) {
        let mut history = context.history;
        history.push(MessageEntry::human(message.clone()));

        let mut state =
            ConversationState::new(system_prompt, message, history, context.summary, self.default_max_iterations);

        let mut iteration_count: u32 = 0;
        loop {
            if iteration_count >= state.max_iterations {
                let _ = tx
                    .send(OutboundEvent::Error(
                        AgentError::IterationOverrun(state.max_iterations).to_string(),
                    ))
                    .await;
                return;
            }

            state.begin_iteration();

            match self.run_iteration(&mut state, &tx).await {
                Ok(true) => {
                    iteration_count += 1;
                    continue;
                }
                Ok(false) => break, // clarify/complete: fall through to finalize
                Err(e) => {
                    let _ = tx.send(OutboundEvent::Error(e.to_string())).await;
                    return;
                }
            }
        }

        self.finalize(&state, &tx).await;
    }

    /// Runs one full iteration: prompt assembly, LLM stream, tag parsing,
    /// state update. Returns `Ok(true)` to continue looping, `Ok(false)` to
    /// terminate normally (clarify/complete), or a fatal `AgentError`.
    async fn run_iteration(
        &self,
        state: &mut ConversationState,
        tx: &mpsc::Sender<OutboundEvent>,
    ) -> Result<bool, AgentError> {
        let tool_specs = self.tools.specs();
        let messages = prepare_messages(state, &tool_specs, self.max_history_messages);

        let (token_tx, mut token_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
        let llm = Arc::clone(&self.llm);
        let llm_task = tokio::spawn(async move { llm.invoke_stream(&messages, token_tx).await });

        let mut processor = TagStreamProcessor::new();
        while let Some(token) = token_rx.recv().await {
            let events = processor.feed(&token);
            self.handle_events(state, events, tx).await?;
        }

        match llm_task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(join_err) => return Err(AgentError::Transport(join_err.to_string())),
        }

        let trailing = processor.finish();
        self.handle_events(state, trailing, tx).await?;

        let status = state
            .status
            .as_ref()
            .ok_or(AgentError::MissingStatus)?
            .clone();

        if let Some(plan) = &state.current_plan {
            let needed = plan.total_steps + self.extra_iterations_on_plan;
            if needed > state.max_iterations {
                state.max_iterations = needed;
            }
        }

        if status.status == StatusKind::Complete && !state.tool_queue.is_empty() {
            tracing::warn!(
                queued = state.tool_queue.len(),
                "status complete with a non-empty tool queue; discarding queued tools"
            );
            state.tool_queue.clear();
        }

        if matches!(status.status, StatusKind::Clarify | StatusKind::Complete) {
            return Ok(false);
        }

        if !state.tool_queue.is_empty() {
            let results = self.tools.dispatch(&state.tool_queue, tx).await;
            state.tool_results = results;
        }

        let continuation = build_continuation_message(
            state.current_plan.as_ref(),
            &state.reasoning_history,
            &state.tool_results,
        );
        state.history.push(MessageEntry::system(continuation));
        state.tool_queue.clear();
        state.tool_results.clear();
        state.status = None;

        Ok(true)
    }

    async fn handle_events(
        &self,
        state: &mut ConversationState,
        events: Vec<TagEvent>,
        tx: &mpsc::Sender<OutboundEvent>,
    ) -> Result<(), AgentError> {
        for event in events {
            match event.tag {
                TagKind::Plan => {
                    let plan = Plan::parse(&event.content)?;
                    state.current_plan = Some(plan);
                }
                TagKind::Reasoning => {
                    let reasoning = Reasoning::parse(&event.content)?;
                    state.reasoning_history.push(reasoning.thought);
                    let _ = tx.send(OutboundEvent::Reasoning(reasoning.user_notification)).await;
                }
                TagKind::Text => {
                    let _ = tx.send(OutboundEvent::Text(event.content)).await;
                }
                TagKind::FullText => {
                    if !event.content.is_empty() {
                        state.history.push(MessageEntry::ai(event.content));
                    }
                }
                TagKind::Tool => {
                    let tool_use = ToolUse::parse(&event.content)?;
                    state.tool_queue.push(tool_use);
                }
                TagKind::Status => {
                    let status = Status::parse(&event.content)?;
                    state.status = Some(status);
                }
                TagKind::Summary => {
                    state.latest_summary = Some(event.content.clone());
                    state.summary.push_str(&event.content);
                }
                TagKind::Debug => {
                    tracing::debug!(raw = %event.content, "raw LLM output");
                }
            }
        }
        Ok(())
    }

    async fn finalize(&self, state: &ConversationState, tx: &mpsc::Sender<OutboundEvent>) {
        let summary = state.latest_summary.clone().unwrap_or_else(|| state.summary.clone());
        let context = ConversationContext::from_history(&state.history, summary);
        match serde_json::to_value(&context) {
            Ok(value) => {
                let _ = tx.send(OutboundEvent::UpdatedContext(value)).await;
            }
            Err(e) => {
                let _ = tx.send(OutboundEvent::Error(format!("failed to serialize updated context: {e}"))).await;
            }
        }
    }
}
