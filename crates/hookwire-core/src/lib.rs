//! hookwire-core
//!
//! 組織ごとの webhook 設定と、ドメインイベント発生時の送信。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, action kinds, headers, webhook, outcome, errors）
//! - **ports**: 抽象化レイヤー（WebhookStore, WebhookTransport, OrganizationMembers, Clock, IdGenerator）
//! - **impls**: 実装（InMemoryWebhookStore, InMemoryMembers, ReqwestTransport）
//! - **app**: アプリケーションロジック（builder, WebhookService, Dispatcher）
//! - **config**: 環境変数からの Settings
//! - **observability**: 送信結果の集計
//!
//! 送信は best-effort です。リトライ、outbox、署名はありません。

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod observability;
pub mod ports;

pub use app::{App, AppBuilder, Dispatcher, EmissionReport, WebhookService};
pub use config::Settings;
pub use domain::{HookError, WebhookActionKind};
