//! WebhookTransport port - 送信の抽象化
//!
//! 本番は `ReqwestTransport`、テストでは記録用の fake を差し込む。
//! タイムアウトはプロセス全体で 1 つ（実装の構築時に決める）。

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::domain::{DeliveryResponse, WebhookHeaders};

/// One outbound POST.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRequest {
    pub url: Url,
    pub headers: WebhookHeaders,
    pub body: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("request failed: {0}")]
    Request(String),
}

/// Sends one request and returns whatever the endpoint answered.
///
/// Non-2xx answers are `Ok`; classification happens in the dispatcher.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, request: &DeliveryRequest) -> Result<DeliveryResponse, TransportError>;
}
