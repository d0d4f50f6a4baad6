//! `Reasoning`. Only `user_notification` is ever emitted outward.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reasoning {
    pub thought: String,
    pub user_notification: String,
}

impl Reasoning {
    pub fn parse(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed {
            tag: "reasoning",
            reason: e.to_string(),
        })
    }
}
