//! Domain identifiers (strongly-typed IDs).
//!
//! ULID ベースの ID を Phantom type パターンで型付けしています。
//! `WebhookId` と `OrganizationId` は同じ 128-bit 表現ですが、
//! コンパイル時に混同できません。
//!
//! - 生成順でソート可能（in-memory store の走査順が作成順になる）
//! - JSON では `"01HV..."` のような文字列として直列化

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"wh-", "org-" など）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
///
/// # 例
/// ```ignore
/// let webhook_id: WebhookId = Id::from(Ulid::new());
/// let org_id: OrganizationId = Id::from(Ulid::new());
/// // webhook_id と org_id は異なる型なので、混同できない
/// ```
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// ランダムな ID を作成（テストや fixture 用）
    ///
    /// 本番コードでは `IdGenerator` を使ってください。
    pub fn random() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// `"wh-01HV..."` と `"01HV..."` の両方を受け付ける
impl<T: IdMarker> FromStr for Id<T> {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw).map(Self::from_ulid)
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Organization {}

impl IdMarker for Organization {
    fn prefix() -> &'static str {
        "org-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum User {}

impl IdMarker for User {
    fn prefix() -> &'static str {
        "user-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Webhook {}

impl IdMarker for Webhook {
    fn prefix() -> &'static str {
        "wh-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WebhookAction {}

impl IdMarker for WebhookAction {
    fn prefix() -> &'static str {
        "wha-"
    }
}

// ========================================
// Type Alias
// ========================================

/// Identifier of an Organization (owner of webhooks).
pub type OrganizationId = Id<Organization>;

/// Identifier of a User (only used for membership checks).
pub type UserId = Id<User>;

/// Identifier of a Webhook.
pub type WebhookId = Id<Webhook>;

/// Identifier of a WebhookAction row.
pub type WebhookActionId = Id<WebhookAction>;
