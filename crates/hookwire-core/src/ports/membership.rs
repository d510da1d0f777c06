//! OrganizationMembers port - 組織メンバーシップの問い合わせ
//!
//! メンバー管理そのものは外部の責務。ここでは「属しているか」だけを聞く。

use async_trait::async_trait;

use crate::domain::{OrganizationId, UserId};
use crate::ports::StoreError;

#[async_trait]
pub trait OrganizationMembers: Send + Sync {
    async fn has_user(
        &self,
        organization: OrganizationId,
        user: UserId,
    ) -> Result<bool, StoreError>;
}
