//! Submission payload and acknowledgment
//!
//! Wizard → Sink: `POST` with body `{"timestamp": "...", "responses": {"q1_usage_level": "daily"}}`.
//! Sink → Wizard: `{"status": "success" | "error", "message": "..."}`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Answer set: field key → value
///
/// Multi-select answers are already flattened to a delimited string.
pub type Responses = BTreeMap<String, String>;

/// One survey submission
///
/// `timestamp` is optional on the wire; the sink substitutes its own
/// generation time when it is missing or empty. `responses` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub responses: Responses,
}

impl Submission {
    pub fn new(timestamp: impl Into<String>, responses: Responses) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            responses,
        }
    }
}

/// Acknowledgment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckStatus {
    Success,
    Error,
}

/// Structured sink response
///
/// # Examples
///
/// ```
/// use survey_common::api::types::{Ack, AckStatus};
///
/// let ack = Ack::error("bad payload");
/// assert_eq!(ack.status, AckStatus::Error);
/// assert_eq!(
///     serde_json::to_string(&ack).unwrap(),
///     r#"{"status":"error","message":"bad payload"}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            status: AckStatus::Success,
            message: Some("Data saved successfully".to_string()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: AckStatus::Error,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AckStatus::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_without_timestamp_parses() {
        let parsed: Submission =
            serde_json::from_str(r#"{"responses":{"q1_usage_level":"daily"}}"#).unwrap();
        assert_eq!(parsed.timestamp, None);
        assert_eq!(parsed.responses["q1_usage_level"], "daily");
    }

    #[test]
    fn test_submission_requires_responses() {
        let parsed = serde_json::from_str::<Submission>(r#"{"timestamp":"T1"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_non_string_response_value_rejected() {
        let parsed = serde_json::from_str::<Submission>(r#"{"responses":{"q12_confidence":3}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_success_ack_wire_format() {
        let json = serde_json::to_value(Ack::success()).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Data saved successfully");
    }

    #[test]
    fn test_ack_message_optional_on_read() {
        let ack: Ack = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(ack.is_success());
        assert_eq!(ack.message, None);
    }
}
