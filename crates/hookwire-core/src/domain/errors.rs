//! Errors - エラー型と分類
//!
//! - `ValidationError`: 書き込み前の検証エラー（書き込みは行われない）
//! - `HookError`: `WebhookService` の操作エラー
//!
//! 配送失敗はエラーではなく `DeliveryOutcome` として扱う。

use thiserror::Error;

use super::headers::SchemaViolation;
use super::ids::WebhookId;
use crate::ports::StoreError;

/// 書き込み時の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid headers: {0}")]
    Headers(#[from] SchemaViolation),

    #[error("url is {len} characters long (max {max})")]
    UrlTooLong { len: usize, max: usize },

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("webhook not found: {0}")]
    NotFound(WebhookId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SchemaViolation> for HookError {
    fn from(violation: SchemaViolation) -> Self {
        HookError::Validation(ValidationError::Headers(violation))
    }
}

impl HookError {
    pub fn is_validation(&self) -> bool {
        matches!(self, HookError::Validation(_))
    }
}
