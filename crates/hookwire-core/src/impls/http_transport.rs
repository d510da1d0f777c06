//! ReqwestTransport - reqwest による WebhookTransport 実装
//!
//! Client は 1 つを使い回し、タイムアウトは構築時に設定する。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::domain::{DeliveryResponse, WebhookHeaders};
use crate::ports::{DeliveryRequest, TransportError, WebhookTransport};

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("hookwire/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { client })
    }
}

/// Schema-valid names can still carry values HTTP refuses (e.g. newlines).
fn to_header_map(headers: &WebhookHeaders) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers.iter() {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value =
            HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

#[async_trait]
impl WebhookTransport for ReqwestTransport {
    async fn post(&self, request: &DeliveryRequest) -> Result<DeliveryResponse, TransportError> {
        let headers = to_header_map(&request.headers)?;

        let response = self
            .client
            .post(request.url.clone())
            .headers(headers)
            .json(&request.body)
            .send()
            .await?;

        // タイムアウトは本文の受信完了までを含む
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(DeliveryResponse { status, body })
    }
}
