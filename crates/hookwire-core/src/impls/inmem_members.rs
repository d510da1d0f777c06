//! InMemoryMembers - 開発用の組織メンバー表

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{OrganizationId, UserId};
use crate::ports::{OrganizationMembers, StoreError};

#[derive(Clone, Default)]
pub struct InMemoryMembers {
    members: Arc<RwLock<HashMap<OrganizationId, BTreeSet<UserId>>>>,
}

impl InMemoryMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, organization: OrganizationId, user: UserId) {
        let mut members = self.members.write().await;
        members.entry(organization).or_default().insert(user);
    }

    pub async fn remove(&self, organization: OrganizationId, user: UserId) {
        let mut members = self.members.write().await;
        if let Some(users) = members.get_mut(&organization) {
            users.remove(&user);
        }
    }
}

#[async_trait]
impl OrganizationMembers for InMemoryMembers {
    async fn has_user(
        &self,
        organization: OrganizationId,
        user: UserId,
    ) -> Result<bool, StoreError> {
        let members = self.members.read().await;
        Ok(members
            .get(&organization)
            .is_some_and(|users| users.contains(&user)))
    }
}
