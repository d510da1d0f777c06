//! Dispatcher - イベント発生時の webhook 呼び出し
//!
//! # 方針
//! - 対象 webhook を 1 件ずつ順番に呼ぶ（並列化しない）
//! - 失敗はログに残して捨てる。リトライしない
//! - `emit_event` は呼び出し元にエラーを返さない

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::{
    DeliveryOutcome, OrganizationId, Payload, Webhook, WebhookActionKind, WebhookId,
};
use crate::observability::DeliveryCounts;
use crate::ports::{DeliveryRequest, WebhookStore, WebhookTransport};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    pub webhook: WebhookId,
    pub outcome: DeliveryOutcome,
}

/// What one `emit_event` call did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmissionReport {
    pub organization: OrganizationId,
    pub action: WebhookActionKind,
    pub deliveries: Vec<Delivery>,
    pub counts: DeliveryCounts,
}

impl EmissionReport {
    fn new(organization: OrganizationId, action: WebhookActionKind) -> Self {
        Self {
            organization,
            action,
            deliveries: Vec::new(),
            counts: DeliveryCounts::default(),
        }
    }

    pub fn outcome_for(&self, webhook: WebhookId) -> Option<&DeliveryOutcome> {
        self.deliveries
            .iter()
            .find(|d| d.webhook == webhook)
            .map(|d| &d.outcome)
    }
}

pub struct Dispatcher {
    store: Arc<dyn WebhookStore>,
    transport: Arc<dyn WebhookTransport>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn WebhookStore>, transport: Arc<dyn WebhookTransport>) -> Self {
        Self { store, transport }
    }

    /// POST one event to one webhook. Never fails; the outcome says what happened.
    pub async fn run_webhook(
        &self,
        webhook: &Webhook,
        action: WebhookActionKind,
        payload: Option<&Payload>,
    ) -> DeliveryOutcome {
        let request = DeliveryRequest {
            url: webhook.url.clone(),
            headers: webhook.headers.clone(),
            body: webhook.request_body(action, payload),
        };

        let outcome = match self.transport.post(&request).await {
            Ok(response) => DeliveryOutcome::from_response(response),
            Err(e) => DeliveryOutcome::failed(e.to_string()),
        };

        match &outcome {
            DeliveryOutcome::Delivered { response } => info!(
                webhook_id = %webhook.id,
                %action,
                status = response.status,
                "webhook delivered"
            ),
            DeliveryOutcome::Rejected { response } => warn!(
                webhook_id = %webhook.id,
                %action,
                url = %webhook.url,
                status = response.status,
                "webhook endpoint rejected delivery"
            ),
            DeliveryOutcome::Failed { reason } => error!(
                webhook_id = %webhook.id,
                %action,
                url = %webhook.url,
                error = %reason,
                "webhook delivery failed"
            ),
        }

        outcome
    }

    /// Fire `action` at every matching webhook of `organization`, one after another.
    ///
    /// Selection: active AND (send_for_all_actions OR subscribed to `action`).
    pub async fn emit_event(
        &self,
        organization: OrganizationId,
        action: WebhookActionKind,
        payload: Option<Payload>,
    ) -> EmissionReport {
        let mut report = EmissionReport::new(organization, action);

        let webhooks = match self.store.select_for_event(organization, action).await {
            Ok(webhooks) => webhooks,
            Err(e) => {
                error!(
                    organization_id = %organization,
                    %action,
                    error = %e,
                    "failed to select webhooks for event"
                );
                return report;
            }
        };
        report.counts.selected = webhooks.len();

        for webhook in &webhooks {
            let outcome = self.run_webhook(webhook, action, payload.as_ref()).await;
            report.counts.record(&outcome);
            report.deliveries.push(Delivery {
                webhook: webhook.id,
                outcome,
            });
        }

        report
    }
}
