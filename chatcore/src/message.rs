//! Conversation message types: roles, individual history entries, and the
//! durable context shape exchanged with clients.

use serde::{Deserialize, Serialize};

/// Speaker of a [`MessageEntry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Ai,
    System,
}

/// One turn in the conversation history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEntry {
    pub role: Role,
    pub content: String,
}

impl Role {
    /// Maps to the role string an LLM chat-completions transport expects.
    pub fn as_wire_role(self) -> &'static str {
        match self {
            Role::Human => "user",
            Role::Ai => "assistant",
            Role::System => "system",
        }
    }
}

impl MessageEntry {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: Role::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// The durable shape clients send in and receive back.
///
/// Invariant: entries of role `system` are internal bookkeeping and must
/// never appear here. [`ConversationContext::from_history`] enforces this by
/// filtering at construction time rather than trusting every call site.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    pub history: Vec<MessageEntry>,
    pub summary: String,
}

impl ConversationContext {
    /// Builds the outgoing context, dropping any `system`-role entries.
    pub fn from_history(history: &[MessageEntry], summary: String) -> Self {
        let history = history
            .iter()
            .filter(|m| m.role != Role::System)
            .cloned()
            .collect();
        Self { history, summary }
    }
}
