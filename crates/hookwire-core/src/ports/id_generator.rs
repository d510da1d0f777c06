//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use crate::domain::ids::{WebhookActionId, WebhookId};
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は webhook / webhook_action の ID を生成
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数スレッドから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_webhook_id(&self) -> WebhookId;

    fn generate_action_id(&self) -> WebhookActionId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// FixedClock を渡すと timestamp 部分が固定されます。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_webhook_id(&self) -> WebhookId {
        WebhookId::from(self.next_ulid())
    }

    fn generate_action_id(&self) -> WebhookActionId {
        WebhookActionId::from(self.next_ulid())
    }
}
