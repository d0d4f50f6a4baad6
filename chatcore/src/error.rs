//! Error taxonomy for the conversation agent.

use thiserror::Error;

/// A buffered tag's JSON did not parse into its declared schema, or failed a
/// field-level invariant (e.g. `Plan::current_step` out of range).
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid {tag} payload: {reason}")]
    Malformed { tag: &'static str, reason: String },
}

/// Fatal-to-the-request errors surfaced as a single `error` event.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No STATUS set after processing LLM response.")]
    MissingStatus,

    #[error("did not complete within the maximum number of iterations ({0}).")]
    IterationOverrun(u32),

    #[error("LLM transport error: {0}")]
    Transport(String),
}
