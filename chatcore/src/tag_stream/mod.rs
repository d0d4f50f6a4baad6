//! Tag stream processor: demultiplexes a live LLM token stream into typed,
//! tagged events.
//!
//! Grammar: bracketed form, `[NAME]...content...[/NAME]`. `NAME` is matched
//! case-insensitively against a closed [`TagKind`] enumeration rather than an
//! open-ended handler registry, so an unrecognized marker is never a runtime
//! surprise — it just falls through as literal text.

mod grammar;
mod state_machine;

pub use grammar::TagKind;
pub use state_machine::TagStreamProcessor;

/// One event emitted by the processor: a tag plus its content (a single
/// streamed token for `STREAM` tags, or the whole section for `BUFFER`/
/// `STREAM_AND_BUFFER` tags).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagEvent {
    pub tag: TagKind,
    pub content: String,
}
