//! InMemoryWebhookStore - 開発用・テスト用の WebhookStore
//!
//! 2 つのテーブルを BTreeMap で持ち、cascade は明示的に実装する。
//! ID は ULID なので BTreeMap の走査順は作成順になる。

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    OrganizationId, Webhook, WebhookActionId, WebhookActionKind, WebhookActionRecord, WebhookId,
};
use crate::ports::{StoreError, WebhookStore};

/// In-memory tables.
#[derive(Default)]
struct InMemoryStoreState {
    /// `webhook` table.
    webhooks: BTreeMap<WebhookId, Webhook>,

    /// `webhook_action` table.
    actions: BTreeMap<WebhookActionId, WebhookActionRecord>,
}

impl InMemoryStoreState {
    fn is_subscribed(&self, webhook: WebhookId, action: WebhookActionKind) -> bool {
        self.actions
            .values()
            .any(|row| row.webhook == webhook && row.action == action)
    }

    /// Remove every action row owned by `webhook`.
    fn cascade_actions(&mut self, webhook: WebhookId) -> usize {
        let before = self.actions.len();
        self.actions.retain(|_, row| row.webhook != webhook);
        before - self.actions.len()
    }
}

#[derive(Clone, Default)]
pub struct InMemoryWebhookStore {
    state: Arc<Mutex<InMemoryStoreState>>,
}

impl InMemoryWebhookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `webhook_action` rows (for testing).
    #[cfg(test)]
    pub async fn action_row_count(&self) -> usize {
        self.state.lock().await.actions.len()
    }
}

#[async_trait]
impl WebhookStore for InMemoryWebhookStore {
    async fn insert_webhook(&self, webhook: Webhook) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if state.webhooks.contains_key(&webhook.id) {
            return Err(StoreError::DuplicateWebhook(webhook.id));
        }
        state.webhooks.insert(webhook.id, webhook);
        Ok(())
    }

    async fn get_webhook(&self, id: WebhookId) -> Result<Option<Webhook>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.webhooks.get(&id).cloned())
    }

    async fn update_webhook(&self, webhook: Webhook) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let Some(row) = state.webhooks.get_mut(&webhook.id) else {
            return Err(StoreError::WebhookNotFound(webhook.id));
        };
        *row = webhook;
        Ok(())
    }

    async fn delete_webhook(&self, id: WebhookId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        if state.webhooks.remove(&id).is_none() {
            return Ok(false);
        }
        state.cascade_actions(id);
        Ok(true)
    }

    async fn list_webhooks(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Webhook>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .webhooks
            .values()
            .filter(|wh| wh.organization == organization)
            .cloned()
            .collect())
    }

    async fn delete_organization(&self, organization: OrganizationId) -> Result<usize, StoreError> {
        let mut state = self.state.lock().await;
        let owned: Vec<WebhookId> = state
            .webhooks
            .values()
            .filter(|wh| wh.organization == organization)
            .map(|wh| wh.id)
            .collect();

        for id in &owned {
            state.webhooks.remove(id);
            state.cascade_actions(*id);
        }
        Ok(owned.len())
    }

    async fn list_actions(
        &self,
        webhook: WebhookId,
    ) -> Result<Vec<WebhookActionRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .actions
            .values()
            .filter(|row| row.webhook == webhook)
            .cloned()
            .collect())
    }

    async fn insert_action(&self, record: WebhookActionRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        if !state.webhooks.contains_key(&record.webhook) {
            return Err(StoreError::WebhookNotFound(record.webhook));
        }
        if state.is_subscribed(record.webhook, record.action) {
            return Err(StoreError::DuplicateAction {
                webhook: record.webhook,
                action: record.action,
            });
        }
        state.actions.insert(record.id, record);
        Ok(())
    }

    async fn delete_actions(
        &self,
        webhook: WebhookId,
        actions: &BTreeSet<WebhookActionKind>,
    ) -> Result<usize, StoreError> {
        if actions.is_empty() {
            return Ok(0);
        }
        let mut state = self.state.lock().await;
        let before = state.actions.len();
        state
            .actions
            .retain(|_, row| !(row.webhook == webhook && actions.contains(&row.action)));
        Ok(before - state.actions.len())
    }

    async fn select_for_event(
        &self,
        organization: OrganizationId,
        action: WebhookActionKind,
    ) -> Result<Vec<Webhook>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .webhooks
            .values()
            .filter(|wh| wh.organization == organization && wh.is_active)
            .filter(|wh| wh.send_for_all_actions || state.is_subscribed(wh.id, action))
            .cloned()
            .collect())
    }
}
