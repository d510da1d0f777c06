//! WebhookActionKind - webhook が購読できるイベント種別
//!
//! 種別は閉じた集合です。追加するにはコード変更が必要で、設定では増やせません。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle event that can trigger a webhook.
///
/// Serialized as SCREAMING_SNAKE_CASE (`"TASK_CREATED"`), which is also the
/// value of the `action` field in every outbound body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookActionKind {
    ProjectCreated,
    ProjectUpdated,
    ProjectDeleted,
    TaskCreated,
    TaskUpdated,
    TaskDeleted,
    AnnotationCreated,
    AnnotationUpdated,
    AnnotationDeleted,
}

impl WebhookActionKind {
    pub const ALL: [WebhookActionKind; 9] = [
        WebhookActionKind::ProjectCreated,
        WebhookActionKind::ProjectUpdated,
        WebhookActionKind::ProjectDeleted,
        WebhookActionKind::TaskCreated,
        WebhookActionKind::TaskUpdated,
        WebhookActionKind::TaskDeleted,
        WebhookActionKind::AnnotationCreated,
        WebhookActionKind::AnnotationUpdated,
        WebhookActionKind::AnnotationDeleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookActionKind::ProjectCreated => "PROJECT_CREATED",
            WebhookActionKind::ProjectUpdated => "PROJECT_UPDATED",
            WebhookActionKind::ProjectDeleted => "PROJECT_DELETED",
            WebhookActionKind::TaskCreated => "TASK_CREATED",
            WebhookActionKind::TaskUpdated => "TASK_UPDATED",
            WebhookActionKind::TaskDeleted => "TASK_DELETED",
            WebhookActionKind::AnnotationCreated => "ANNOTATION_CREATED",
            WebhookActionKind::AnnotationUpdated => "ANNOTATION_UPDATED",
            WebhookActionKind::AnnotationDeleted => "ANNOTATION_DELETED",
        }
    }

    /// Human-readable label shown in admin UIs.
    pub fn name(&self) -> &'static str {
        match self {
            WebhookActionKind::ProjectCreated => "Project created",
            WebhookActionKind::ProjectUpdated => "Project updated",
            WebhookActionKind::ProjectDeleted => "Project deleted",
            WebhookActionKind::TaskCreated => "Task created",
            WebhookActionKind::TaskUpdated => "Task updated",
            WebhookActionKind::TaskDeleted => "Task deleted",
            WebhookActionKind::AnnotationCreated => "Annotation created",
            WebhookActionKind::AnnotationUpdated => "Annotation updated",
            WebhookActionKind::AnnotationDeleted => "Annotation deleted",
        }
    }

    // 現状どの種別も説明文は空
    pub fn description(&self) -> &'static str {
        ""
    }
}

impl fmt::Display for WebhookActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown webhook action: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for WebhookActionKind {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WebhookActionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}
