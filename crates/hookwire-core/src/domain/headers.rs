//! Headers - webhook の追加 HTTP ヘッダーとそのスキーマ検証
//!
//! スキーマ（JSON Schema 相当）:
//! ```json
//! {
//!   "type": "object",
//!   "patternProperties": { "^[a-zA-Z0-9-_]+$": { "type": "string" } },
//!   "maxProperties": 10,
//!   "additionalProperties": false
//! }
//! ```
//! `additionalProperties: false` なので、パターンに一致しないキーは即エラー。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

pub const MAX_HEADERS: usize = 10;

static HEADER_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("header key pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("headers must be a JSON object")]
    NotAnObject,

    #[error("too many headers: {count} (max {max})")]
    TooManyHeaders { count: usize, max: usize },

    #[error("header name '{0}' does not match ^[a-zA-Z0-9-_]+$")]
    InvalidKey(String),

    #[error("header '{key}' must have a string value")]
    NonStringValue { key: String },
}

/// HeaderValidator は headers フィールドの書き込み前検証
pub struct HeaderValidator;

impl HeaderValidator {
    pub fn validate(headers: &Value) -> Result<(), SchemaViolation> {
        let Value::Object(map) = headers else {
            return Err(SchemaViolation::NotAnObject);
        };

        if map.len() > MAX_HEADERS {
            return Err(SchemaViolation::TooManyHeaders {
                count: map.len(),
                max: MAX_HEADERS,
            });
        }

        for (key, value) in map {
            if !HEADER_KEY.is_match(key) {
                return Err(SchemaViolation::InvalidKey(key.clone()));
            }
            if !value.is_string() {
                return Err(SchemaViolation::NonStringValue { key: key.clone() });
            }
        }

        Ok(())
    }
}

/// 検証済みの headers
///
/// 構築経路は `TryFrom<Value>` と `Deserialize` のみで、どちらも
/// `HeaderValidator` を通るため、保持している値は常にスキーマを満たす。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "BTreeMap<String, String>")]
pub struct WebhookHeaders(BTreeMap<String, String>);

impl WebhookHeaders {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for WebhookHeaders {
    type Error = SchemaViolation;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        HeaderValidator::validate(&value)?;
        let Value::Object(map) = value else {
            return Err(SchemaViolation::NotAnObject);
        };
        let headers = map
            .into_iter()
            .filter_map(|(k, v)| match v {
                Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();
        Ok(Self(headers))
    }
}

impl TryFrom<BTreeMap<String, String>> for WebhookHeaders {
    type Error = SchemaViolation;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let value = Value::Object(map.into_iter().map(|(k, v)| (k, Value::String(v))).collect());
        Self::try_from(value)
    }
}

impl From<WebhookHeaders> for BTreeMap<String, String> {
    fn from(headers: WebhookHeaders) -> Self {
        headers.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn headers_with(count: usize) -> Value {
        let map: serde_json::Map<String, Value> = (0..count)
            .map(|i| (format!("X-Header-{i}"), Value::String(format!("v{i}"))))
            .collect();
        Value::Object(map)
    }

    #[test]
    fn empty_object_is_valid() {
        assert_eq!(HeaderValidator::validate(&json!({})), Ok(()));
    }

    #[test]
    fn ten_headers_are_allowed() {
        assert_eq!(HeaderValidator::validate(&headers_with(MAX_HEADERS)), Ok(()));
    }

    #[test]
    fn eleven_headers_are_rejected() {
        let err = HeaderValidator::validate(&headers_with(MAX_HEADERS + 1)).unwrap_err();
        assert_eq!(err, SchemaViolation::TooManyHeaders { count: 11, max: 10 });
    }

    #[rstest]
    #[case::space("X Token")]
    #[case::colon("X-Token:")]
    #[case::dot("x.token")]
    #[case::empty("")]
    #[case::non_ascii("X-Tökén")]
    fn keys_outside_the_pattern_are_rejected(#[case] key: &str) {
        let mut map = serde_json::Map::new();
        map.insert(key.to_string(), json!("value"));
        let err = HeaderValidator::validate(&Value::Object(map)).unwrap_err();
        assert_eq!(err, SchemaViolation::InvalidKey(key.to_string()));
    }

    #[rstest]
    #[case::number(json!(42))]
    #[case::boolean(json!(true))]
    #[case::null(json!(null))]
    #[case::nested(json!({"a": "b"}))]
    #[case::list(json!(["a"]))]
    fn non_string_values_are_rejected(#[case] value: Value) {
        let err = HeaderValidator::validate(&json!({ "X-Token": value })).unwrap_err();
        assert_eq!(
            err,
            SchemaViolation::NonStringValue {
                key: "X-Token".to_string()
            }
        );
    }

    #[rstest]
    #[case::list(json!([]))]
    #[case::string(json!("Authorization: x"))]
    #[case::null(json!(null))]
    fn non_objects_are_rejected(#[case] value: Value) {
        assert_eq!(
            HeaderValidator::validate(&value),
            Err(SchemaViolation::NotAnObject)
        );
    }

    #[test]
    fn underscores_and_dashes_are_allowed_in_keys() {
        let headers =
            WebhookHeaders::try_from(json!({"X_Api-Key": "secret", "Authorization": "Bearer t"}))
                .unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("X_Api-Key"), Some("secret"));
    }

    #[test]
    fn deserialization_enforces_the_schema() {
        let ok: WebhookHeaders = serde_json::from_value(json!({"X-Token": "abc"})).unwrap();
        assert_eq!(ok.get("X-Token"), Some("abc"));

        let bad = serde_json::from_value::<WebhookHeaders>(json!({"X-Token": 1}));
        assert!(bad.is_err());
    }

    #[test]
    fn serializes_as_a_flat_object() {
        let headers = WebhookHeaders::try_from(json!({"X-Token": "abc"})).unwrap();
        assert_eq!(serde_json::to_value(&headers).unwrap(), json!({"X-Token": "abc"}));
    }
}
