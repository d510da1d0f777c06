//! WebhookStore port - `webhook` / `webhook_action` テーブルの正本
//!
//! # 所有関係と cascade
//! - Organization → Webhook → WebhookAction
//! - `delete_webhook` はその webhook の action 行も削除する
//! - `delete_organization` はその組織の webhook と action 行をすべて削除する
//!
//! # 原子性
//! 各メソッドは単独で原子的だが、複数呼び出しをまたぐトランザクションは提供しない。

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::{
    OrganizationId, Webhook, WebhookActionKind, WebhookActionRecord, WebhookId,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("webhook not found: {0}")]
    WebhookNotFound(WebhookId),

    #[error("webhook already exists: {0}")]
    DuplicateWebhook(WebhookId),

    #[error("webhook {webhook} is already subscribed to {action}")]
    DuplicateAction {
        webhook: WebhookId,
        action: WebhookActionKind,
    },

    #[error("store operation failed: {0}")]
    OperationFailed(String),
}

#[async_trait]
pub trait WebhookStore: Send + Sync {
    async fn insert_webhook(&self, webhook: Webhook) -> Result<(), StoreError>;

    async fn get_webhook(&self, id: WebhookId) -> Result<Option<Webhook>, StoreError>;

    /// Replace an existing row; `WebhookNotFound` if it is gone.
    async fn update_webhook(&self, webhook: Webhook) -> Result<(), StoreError>;

    /// Delete a webhook and its action rows. Returns whether it existed.
    async fn delete_webhook(&self, id: WebhookId) -> Result<bool, StoreError>;

    async fn list_webhooks(&self, organization: OrganizationId)
        -> Result<Vec<Webhook>, StoreError>;

    /// Cascade delete of everything an organization owns.
    /// Returns the number of webhooks removed.
    async fn delete_organization(&self, organization: OrganizationId)
        -> Result<usize, StoreError>;

    async fn list_actions(&self, webhook: WebhookId)
        -> Result<Vec<WebhookActionRecord>, StoreError>;

    /// Insert one subscription row; rejects a duplicate (webhook, action).
    async fn insert_action(&self, record: WebhookActionRecord) -> Result<(), StoreError>;

    /// Delete the rows of `webhook` whose action is in `actions`.
    /// Returns the number of rows removed.
    async fn delete_actions(
        &self,
        webhook: WebhookId,
        actions: &BTreeSet<WebhookActionKind>,
    ) -> Result<usize, StoreError>;

    /// Webhooks that should fire for `action` in `organization`:
    /// active AND (send_for_all_actions OR subscribed to `action`).
    async fn select_for_event(
        &self,
        organization: OrganizationId,
        action: WebhookActionKind,
    ) -> Result<Vec<Webhook>, StoreError>;
}
