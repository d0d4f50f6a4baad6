//! Outbound event protocol for the chat backend: the wire shape of one
//! `/openai/chat` stream event, plus SSE line framing.

pub mod event;

pub use event::{OutboundEvent, ToolEnd, ToolStart, DONE_LINE};
