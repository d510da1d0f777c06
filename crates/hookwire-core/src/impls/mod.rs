//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryWebhookStore**: 開発用・テスト用の正本
//! - **InMemoryMembers**: 開発用の組織メンバー表
//! - **ReqwestTransport**: 本番用の HTTP 送信
//!
//! RDB 版の WebhookStore はこのクレートの外に置く想定。

pub mod http_transport;
pub mod inmem_members;
pub mod inmem_store;

pub use self::http_transport::ReqwestTransport;
pub use self::inmem_members::InMemoryMembers;
pub use self::inmem_store::InMemoryWebhookStore;
