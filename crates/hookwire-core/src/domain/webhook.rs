//! Webhook - 組織ごとの送信先設定とその入力モデル
//!
//! - `Webhook`: 永続化されたレコード（`webhook` テーブル）
//! - `NewWebhook`: 作成時の入力（未検証）
//! - `WebhookPatch`: 部分更新の入力（未検証）
//!
//! 未検証の入力から `Webhook` への変換は `WebhookService` が行う。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use url::Url;

use super::action::WebhookActionKind;
use super::errors::ValidationError;
use super::headers::WebhookHeaders;
use super::ids::{OrganizationId, WebhookId};

pub const MAX_URL_LENGTH: usize = 2048;

/// Event-specific data merged into the outbound body.
pub type Payload = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub id: WebhookId,
    pub organization: OrganizationId,
    pub url: Url,
    pub send_payload: bool,
    pub send_for_all_actions: bool,
    pub headers: WebhookHeaders,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Webhook {
    /// Parse and check a webhook URL.
    ///
    /// Accepts absolute `http`/`https` URLs of at most 2048 characters,
    /// both as written and after normalization (percent-encoding, punycode).
    pub fn parse_url(raw: &str) -> Result<Url, ValidationError> {
        let len = raw.chars().count();
        if len > MAX_URL_LENGTH {
            return Err(ValidationError::UrlTooLong {
                len,
                max: MAX_URL_LENGTH,
            });
        }

        let url = Url::parse(raw).map_err(|e| ValidationError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let stored = url.as_str().len();
        if stored > MAX_URL_LENGTH {
            return Err(ValidationError::UrlTooLong {
                len: stored,
                max: MAX_URL_LENGTH,
            });
        }
        Ok(url)
    }

    /// Build the JSON body for one delivery.
    ///
    /// `{"action": <kind>}` plus the payload fields when `send_payload` is on
    /// and the payload is non-empty. Payload keys are applied last.
    pub fn request_body(&self, action: WebhookActionKind, payload: Option<&Payload>) -> Value {
        let mut body = Map::new();
        body.insert("action".to_string(), Value::String(action.as_str().to_string()));

        if self.send_payload
            && let Some(payload) = payload
        {
            for (key, value) in payload {
                body.insert(key.clone(), value.clone());
            }
        }

        Value::Object(body)
    }
}

fn default_true() -> bool {
    true
}

fn default_headers() -> Value {
    Value::Object(Map::new())
}

/// Input for creating a webhook.
///
/// Flags default to `true` and headers to `{}`; `headers` stays a raw JSON
/// value so the schema check can see non-string values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWebhook {
    pub url: String,
    #[serde(default = "default_true")]
    pub send_payload: bool,
    #[serde(default = "default_true")]
    pub send_for_all_actions: bool,
    #[serde(default = "default_headers")]
    pub headers: Value,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<BTreeSet<WebhookActionKind>>,
}

impl NewWebhook {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            send_payload: true,
            send_for_all_actions: true,
            headers: default_headers(),
            is_active: true,
            actions: None,
        }
    }

    pub fn with_headers(mut self, headers: Value) -> Self {
        self.headers = headers;
        self
    }

    pub fn send_payload(mut self, enabled: bool) -> Self {
        self.send_payload = enabled;
        self
    }

    pub fn active(mut self, enabled: bool) -> Self {
        self.is_active = enabled;
        self
    }

    /// Subscribe to the given actions only (turns `send_for_all_actions` off).
    pub fn only_for(mut self, actions: impl IntoIterator<Item = WebhookActionKind>) -> Self {
        self.send_for_all_actions = false;
        self.actions = Some(actions.into_iter().collect());
        self
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookPatch {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub send_payload: Option<bool>,
    #[serde(default)]
    pub send_for_all_actions: Option<bool>,
    #[serde(default)]
    pub headers: Option<Value>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl WebhookPatch {
    pub fn is_empty(&self) -> bool {
        self == &WebhookPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn sample(send_payload: bool) -> Webhook {
        let now = Utc::now();
        Webhook {
            id: WebhookId::random(),
            organization: OrganizationId::random(),
            url: Url::parse("https://hooks.example.com/in").unwrap(),
            send_payload,
            send_for_all_actions: true,
            headers: WebhookHeaders::empty(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn body_merges_payload_when_enabled() {
        let payload = json!({"id": 5, "project": {"title": "p"}});
        let body = sample(true).request_body(
            WebhookActionKind::TaskCreated,
            payload.as_object(),
        );
        assert_eq!(
            body,
            json!({"action": "TASK_CREATED", "id": 5, "project": {"title": "p"}})
        );
    }

    #[test]
    fn body_is_action_only_when_payload_disabled() {
        let payload = json!({"id": 5});
        let body = sample(false).request_body(
            WebhookActionKind::TaskCreated,
            payload.as_object(),
        );
        assert_eq!(body, json!({"action": "TASK_CREATED"}));
    }

    #[test]
    fn body_is_action_only_without_payload() {
        let body = sample(true).request_body(WebhookActionKind::ProjectDeleted, None);
        assert_eq!(body, json!({"action": "PROJECT_DELETED"}));
    }

    #[test]
    fn payload_keys_are_applied_after_action() {
        let payload = json!({"action": "custom"});
        let body = sample(true).request_body(
            WebhookActionKind::TaskCreated,
            payload.as_object(),
        );
        assert_eq!(body, json!({"action": "custom"}));
    }

    #[rstest]
    #[case::https("https://example.com/hook")]
    #[case::http_with_port("http://127.0.0.1:8080/hook?x=1")]
    fn valid_urls_are_accepted(#[case] raw: &str) {
        assert!(Webhook::parse_url(raw).is_ok());
    }

    #[rstest]
    #[case::relative("/hook")]
    #[case::garbage("not a url")]
    #[case::ftp("ftp://example.com/file")]
    #[case::mailto("mailto:ops@example.com")]
    fn invalid_urls_are_rejected(#[case] raw: &str) {
        assert!(matches!(
            Webhook::parse_url(raw),
            Err(ValidationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn url_length_is_bounded() {
        let base = "https://example.com/";
        let at_limit = format!("{base}{}", "a".repeat(MAX_URL_LENGTH - base.len()));
        assert!(Webhook::parse_url(&at_limit).is_ok());

        let too_long = format!("{at_limit}a");
        assert_eq!(
            Webhook::parse_url(&too_long),
            Err(ValidationError::UrlTooLong {
                len: MAX_URL_LENGTH + 1,
                max: MAX_URL_LENGTH
            })
        );
    }

    #[test]
    fn url_length_is_checked_after_normalization() {
        // 1000 文字の "é" は percent-encoding で 6000 バイトになる
        let raw = format!("https://example.com/{}", "é".repeat(1000));
        assert!(raw.chars().count() <= MAX_URL_LENGTH);

        assert_eq!(
            Webhook::parse_url(&raw),
            Err(ValidationError::UrlTooLong {
                len: "https://example.com/".len() + 6000,
                max: MAX_URL_LENGTH
            })
        );
    }

    #[test]
    fn new_webhook_defaults_match_the_model() {
        let input: NewWebhook = serde_json::from_value(json!({"url": "https://x.test"})).unwrap();
        assert_eq!(input, NewWebhook::new("https://x.test"));
        assert!(input.send_payload && input.send_for_all_actions && input.is_active);
        assert_eq!(input.headers, json!({}));
    }

    #[test]
    fn patch_without_fields_is_empty() {
        assert!(WebhookPatch::default().is_empty());

        let patch: WebhookPatch = serde_json::from_value(json!({"is_active": false})).unwrap();
        assert!(!patch.is_empty());
    }
}
