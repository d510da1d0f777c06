use serde::{Deserialize, Serialize};

use crate::domain::{DeliveryOutcome, OutcomeKind};

/// Per-emission tally of delivery outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryCounts {
    pub selected: usize,
    pub delivered: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl DeliveryCounts {
    pub fn record(&mut self, outcome: &DeliveryOutcome) {
        match outcome.kind() {
            OutcomeKind::Delivered => self.delivered += 1,
            OutcomeKind::Rejected => self.rejected += 1,
            OutcomeKind::Failed => self.failed += 1,
        }
    }
}
