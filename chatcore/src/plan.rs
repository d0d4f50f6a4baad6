//! `Plan` and `Step`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Step {
    pub description: String,
    pub status: StepStatus,
    #[serde(default)]
    pub tools: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    pub steps: Vec<Step>,
    pub current_step: u32,
    pub total_steps: u32,
}

impl Plan {
    /// Parses and validates a buffered `plan` tag's JSON body.
    ///
    /// Invariant: `1 <= current_step <= total_steps == steps.len()`.
    pub fn parse(json: &str) -> Result<Self, ValidationError> {
        let plan: Plan = serde_json::from_str(json).map_err(|e| ValidationError::Malformed {
            tag: "plan",
            reason: e.to_string(),
        })?;
        plan.validate()?;
        Ok(plan)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let total = self.steps.len() as u32;
        if total != self.total_steps {
            return Err(ValidationError::Malformed {
                tag: "plan",
                reason: format!(
                    "total_steps ({}) does not match steps.len() ({})",
                    self.total_steps, total
                ),
            });
        }
        if self.current_step < 1 || self.current_step > self.total_steps {
            return Err(ValidationError::Malformed {
                tag: "plan",
                reason: format!(
                    "current_step ({}) out of range [1, {}]",
                    self.current_step, self.total_steps
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_plan() {
        let json = r#"{"steps":[{"description":"search","status":"pending","tools":[]}],"current_step":1,"total_steps":1}"#;
        let plan = Plan::parse(json).unwrap();
        assert_eq!(plan.total_steps, 1);
        assert_eq!(plan.current_step, 1);
    }

    #[test]
    fn rejects_current_step_out_of_range() {
        let json = r#"{"steps":[{"description":"search","status":"pending","tools":[]}],"current_step":2,"total_steps":1}"#;
        assert!(Plan::parse(json).is_err());
    }

    #[test]
    fn rejects_total_steps_mismatch() {
        let json = r#"{"steps":[],"current_step":1,"total_steps":1}"#;
        assert!(Plan::parse(json).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Plan::parse("not json").is_err());
    }
}
