//! WebhookService - webhook の CRUD、購読 action の調整、権限確認
//!
//! 書き込み前に URL と headers を検証し、違反があれば store には触れない。

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    HookError, NewWebhook, OrganizationId, UserId, Webhook, WebhookActionKind,
    WebhookActionRecord, WebhookHeaders, WebhookId, WebhookPatch,
};
use crate::ports::{Clock, IdGenerator, OrganizationMembers, WebhookStore};

/// Rows written by one `set_actions` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActionDiff {
    pub added: BTreeSet<WebhookActionKind>,
    pub removed: BTreeSet<WebhookActionKind>,
}

impl ActionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

pub struct WebhookService {
    store: Arc<dyn WebhookStore>,
    members: Arc<dyn OrganizationMembers>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl WebhookService {
    pub fn new(
        store: Arc<dyn WebhookStore>,
        members: Arc<dyn OrganizationMembers>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            store,
            members,
            clock,
            ids,
        }
    }

    /// Insert a webhook and, when `input.actions` is given, its subscriptions.
    ///
    /// If writing the subscriptions fails, the freshly inserted row is
    /// deleted again before the error is returned.
    pub async fn create_webhook(
        &self,
        organization: OrganizationId,
        input: NewWebhook,
    ) -> Result<Webhook, HookError> {
        let url = Webhook::parse_url(&input.url)?;
        let headers = WebhookHeaders::try_from(input.headers)?;

        let now = self.clock.now();
        let webhook = Webhook {
            id: self.ids.generate_webhook_id(),
            organization,
            url,
            send_payload: input.send_payload,
            send_for_all_actions: input.send_for_all_actions,
            headers,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        };

        self.store.insert_webhook(webhook.clone()).await?;
        if let Some(actions) = input.actions
            && let Err(err) = self.set_actions(webhook.id, Some(actions)).await
        {
            if let Err(cleanup) = self.store.delete_webhook(webhook.id).await {
                warn!(webhook_id = %webhook.id, error = %cleanup, "failed to roll back webhook");
            }
            return Err(err);
        }

        info!(
            webhook_id = %webhook.id,
            organization_id = %organization,
            url = %webhook.url,
            "webhook created"
        );
        Ok(webhook)
    }

    pub async fn get_webhook(&self, id: WebhookId) -> Result<Webhook, HookError> {
        self.store
            .get_webhook(id)
            .await?
            .ok_or(HookError::NotFound(id))
    }

    pub async fn list_webhooks(
        &self,
        organization: OrganizationId,
    ) -> Result<Vec<Webhook>, HookError> {
        Ok(self.store.list_webhooks(organization).await?)
    }

    /// Apply a partial update. Every touched field is validated before the
    /// row is written; `updated_at` is refreshed.
    pub async fn update_webhook(
        &self,
        id: WebhookId,
        patch: WebhookPatch,
    ) -> Result<Webhook, HookError> {
        let mut webhook = self.get_webhook(id).await?;

        let url = patch.url.as_deref().map(Webhook::parse_url).transpose()?;
        let headers = patch.headers.map(WebhookHeaders::try_from).transpose()?;

        if let Some(url) = url {
            webhook.url = url;
        }
        if let Some(headers) = headers {
            webhook.headers = headers;
        }
        if let Some(send_payload) = patch.send_payload {
            webhook.send_payload = send_payload;
        }
        if let Some(for_all) = patch.send_for_all_actions {
            webhook.send_for_all_actions = for_all;
        }
        if let Some(is_active) = patch.is_active {
            webhook.is_active = is_active;
        }
        webhook.updated_at = self.clock.now();

        self.store.update_webhook(webhook.clone()).await?;
        debug!(webhook_id = %id, "webhook updated");
        Ok(webhook)
    }

    /// Delete a webhook together with its subscriptions.
    pub async fn delete_webhook(&self, id: WebhookId) -> Result<(), HookError> {
        if !self.store.delete_webhook(id).await? {
            return Err(HookError::NotFound(id));
        }
        info!(webhook_id = %id, "webhook deleted");
        Ok(())
    }

    /// Cascade for an organization being removed. Returns how many webhooks went with it.
    pub async fn delete_organization(
        &self,
        organization: OrganizationId,
    ) -> Result<usize, HookError> {
        let removed = self.store.delete_organization(organization).await?;
        info!(organization_id = %organization, removed, "organization webhooks deleted");
        Ok(removed)
    }

    pub async fn get_actions(
        &self,
        id: WebhookId,
    ) -> Result<BTreeSet<WebhookActionKind>, HookError> {
        let rows = self.store.list_actions(id).await?;
        Ok(rows.into_iter().map(|row| row.action).collect())
    }

    /// Reconcile the subscriptions of `id` with `desired`.
    ///
    /// `None` means "no actions". Inserts the missing rows, then deletes the
    /// extra ones. The two steps are separate store calls, so a failure in
    /// between leaves a partially applied set.
    pub async fn set_actions(
        &self,
        id: WebhookId,
        desired: Option<BTreeSet<WebhookActionKind>>,
    ) -> Result<ActionDiff, HookError> {
        if self.store.get_webhook(id).await?.is_none() {
            return Err(HookError::NotFound(id));
        }

        let desired = desired.unwrap_or_default();
        let current = self.get_actions(id).await?;

        let diff = ActionDiff {
            added: desired.difference(&current).copied().collect(),
            removed: current.difference(&desired).copied().collect(),
        };

        for action in &diff.added {
            let record = WebhookActionRecord::new(self.ids.generate_action_id(), id, *action);
            self.store.insert_action(record).await?;
        }
        if !diff.removed.is_empty() {
            self.store.delete_actions(id, &diff.removed).await?;
        }

        if !diff.is_empty() {
            debug!(
                webhook_id = %id,
                added = ?diff.added,
                removed = ?diff.removed,
                "webhook actions reconciled"
            );
        }
        Ok(diff)
    }

    /// True iff `user` belongs to the organization owning the webhook.
    pub async fn has_permission(&self, id: WebhookId, user: UserId) -> Result<bool, HookError> {
        let webhook = self.get_webhook(id).await?;
        Ok(self.members.has_user(webhook.organization, user).await?)
    }
}
