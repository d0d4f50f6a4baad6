//! `Status`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Continue,
    Clarify,
    Complete,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Status {
    pub status: StatusKind,
    #[serde(default)]
    pub reason: Option<String>,
}

impl Status {
    pub fn parse(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json).map_err(|e| ValidationError::Malformed {
            tag: "status",
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_status() {
        let s = Status::parse(r#"{"status":"complete"}"#).unwrap();
        assert_eq!(s.status, StatusKind::Complete);
        assert!(s.reason.is_none());
    }

    #[test]
    fn rejects_unknown_status_kind() {
        assert!(Status::parse(r#"{"status":"done"}"#).is_err());
    }
}
