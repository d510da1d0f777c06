//! Outcome model: result of one webhook delivery.
//!
//! Delivery is best-effort. Every attempt ends in exactly one of these
//! outcomes and none of them is an error for the caller of `emit_event`.

use serde::{Deserialize, Serialize};

/// Classification of a delivery, serialized as DELIVERED / REJECTED / FAILED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    Delivered,
    Rejected,
    Failed,
}

/// What the receiving endpoint answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResponse {
    pub status: u16,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub body: String,
}

impl DeliveryResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// - `Delivered`: endpoint answered 2xx.
/// - `Rejected`: endpoint answered, but not 2xx.
/// - `Failed`: no usable response (connect error, timeout, bad header, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryOutcome {
    Delivered { response: DeliveryResponse },
    Rejected { response: DeliveryResponse },
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn from_response(response: DeliveryResponse) -> Self {
        if response.is_success() {
            DeliveryOutcome::Delivered { response }
        } else {
            DeliveryOutcome::Rejected { response }
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        DeliveryOutcome::Failed {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            DeliveryOutcome::Delivered { .. } => OutcomeKind::Delivered,
            DeliveryOutcome::Rejected { .. } => OutcomeKind::Rejected,
            DeliveryOutcome::Failed { .. } => OutcomeKind::Failed,
        }
    }

    /// The endpoint's response, if one was received.
    pub fn response(&self) -> Option<&DeliveryResponse> {
        match self {
            DeliveryOutcome::Delivered { response } | DeliveryOutcome::Rejected { response } => {
                Some(response)
            }
            DeliveryOutcome::Failed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(200, OutcomeKind::Delivered)]
    #[case(204, OutcomeKind::Delivered)]
    #[case(301, OutcomeKind::Rejected)]
    #[case(404, OutcomeKind::Rejected)]
    #[case(503, OutcomeKind::Rejected)]
    fn status_decides_delivered_or_rejected(#[case] status: u16, #[case] expected: OutcomeKind) {
        let outcome = DeliveryOutcome::from_response(DeliveryResponse {
            status,
            body: String::new(),
        });
        assert_eq!(outcome.kind(), expected);
        assert_eq!(outcome.response().map(|r| r.status), Some(status));
    }

    #[test]
    fn failure_has_no_response() {
        let outcome = DeliveryOutcome::failed("connection refused");
        assert_eq!(outcome.kind(), OutcomeKind::Failed);
        assert!(outcome.response().is_none());
    }

    #[test]
    fn outcome_is_tagged_by_kind() {
        let v = serde_json::to_value(DeliveryOutcome::failed("timeout")).unwrap();
        assert_eq!(v["kind"], "FAILED");
        assert_eq!(v["reason"], "timeout");
    }
}
