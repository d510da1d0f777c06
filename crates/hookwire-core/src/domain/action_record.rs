use serde::{Deserialize, Serialize};

use super::action::WebhookActionKind;
use super::ids::{WebhookActionId, WebhookId};

/// One subscription row (`webhook_action` table).
///
/// (webhook, action) is unique; the store rejects duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookActionRecord {
    pub id: WebhookActionId,
    pub webhook: WebhookId,
    pub action: WebhookActionKind,
}

impl WebhookActionRecord {
    pub fn new(id: WebhookActionId, webhook: WebhookId, action: WebhookActionKind) -> Self {
        Self {
            id,
            webhook,
            action,
        }
    }
}
