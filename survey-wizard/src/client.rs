//! Delivery of submissions to the sink
//!
//! One POST per submission, no retry. The outcome is reported back so the
//! caller can decide whether the local draft is still needed.

use survey_common::{Ack, AckStatus, Submission};
use tracing::{debug, info, warn};

use crate::error::{Result, WizardError};

const USER_AGENT: &str = concat!("survey-wizard/", env!("CARGO_PKG_VERSION"));

/// Outcome of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Sink acknowledged the row
    Confirmed(Ack),
    /// Sink answered with an error acknowledgement
    Rejected(String),
    /// Transport failure or unreadable response
    Unconfirmed(String),
    /// No sink URL configured; the payload was only logged
    NotConfigured,
}

impl Delivery {
    /// Whether the local draft can be dropped
    pub fn should_clear_draft(&self) -> bool {
        matches!(self, Delivery::Confirmed(_) | Delivery::NotConfigured)
    }
}

/// HTTP client for the sink's submit endpoint
#[derive(Debug, Clone)]
pub struct SinkClient {
    url: Option<String>,
    http: reqwest::Client,
}

impl SinkClient {
    /// `url` is the full submit endpoint, e.g. `http://127.0.0.1:5780/submit`
    pub fn new(url: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WizardError::Delivery(e.to_string()))?;

        // Blank URL behaves like no URL
        let url = url.filter(|u| !u.trim().is_empty());
        Ok(Self { url, http })
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// POST the submission and classify the answer
    pub async fn deliver(&self, submission: &Submission) -> Delivery {
        let Some(url) = &self.url else {
            match serde_json::to_string(submission) {
                Ok(json) => info!("No sink configured, submission payload: {}", json),
                Err(e) => warn!("No sink configured and payload not serializable: {}", e),
            }
            return Delivery::NotConfigured;
        };

        debug!(url = %url, fields = submission.responses.len(), "Delivering submission");

        let response = match self.http.post(url).json(submission).send().await {
            Ok(response) => response,
            Err(e) => return Delivery::Unconfirmed(format!("Request failed: {}", e)),
        };

        let status = response.status();
        let ack: Ack = match response.json().await {
            Ok(ack) => ack,
            Err(e) => {
                return Delivery::Unconfirmed(format!(
                    "Unreadable response (HTTP {}): {}",
                    status.as_u16(),
                    e
                ))
            }
        };

        match ack.status {
            AckStatus::Success => Delivery::Confirmed(ack),
            AckStatus::Error => Delivery::Rejected(
                ack.message.unwrap_or_else(|| "Sink reported an error".to_string()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_cleared_only_when_safe() {
        assert!(Delivery::Confirmed(Ack::success()).should_clear_draft());
        assert!(Delivery::NotConfigured.should_clear_draft());
        assert!(!Delivery::Rejected("x".to_string()).should_clear_draft());
        assert!(!Delivery::Unconfirmed("x".to_string()).should_clear_draft());
    }

    #[test]
    fn test_blank_url_is_not_configured() {
        let client = SinkClient::new(Some("  ".to_string())).unwrap();
        assert_eq!(client.url(), None);
    }

    #[tokio::test]
    async fn test_deliver_without_url() {
        let client = SinkClient::new(None).unwrap();
        let submission = Submission::new("T1", Default::default());
        assert_eq!(client.deliver(&submission).await, Delivery::NotConfigured);
    }
}
