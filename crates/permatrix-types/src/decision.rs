use crate::Requirement;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable schema identifier for decision payloads.
pub const SCHEMA_DECISION_V1: &str = "permatrix.decision.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Allow,
    Deny,
}

/// What was evaluated when a request was denied.
///
/// Only emitted in diagnostic mode; production denials carry no detail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DenialDetail {
    pub role: String,
    pub requirement: Requirement,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Serializable result of a request gate evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Decision {
    pub schema: String,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Canonical role of the caller; present on allow only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<DenialDetail>,
}

impl Decision {
    pub fn allow(role: impl Into<String>, subject_id: Option<String>) -> Self {
        Self {
            schema: SCHEMA_DECISION_V1.to_string(),
            outcome: Outcome::Allow,
            code: None,
            role: Some(role.into()),
            subject_id,
            detail: None,
        }
    }

    pub fn deny(code: &str, detail: Option<DenialDetail>) -> Self {
        Self {
            schema: SCHEMA_DECISION_V1.to_string(),
            outcome: Outcome::Deny,
            code: Some(code.to_string()),
            role: None,
            subject_id: None,
            detail,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allow
    }
}
