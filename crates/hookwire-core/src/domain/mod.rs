//! Domain model (IDs, action kinds, headers, webhook records, outcomes, errors).

pub mod action;
pub mod action_record;
pub mod errors;
pub mod headers;
pub mod ids;
pub mod outcome;
pub mod webhook;

pub use action::{UnknownAction, WebhookActionKind};
pub use action_record::WebhookActionRecord;
pub use errors::{HookError, ValidationError};
pub use headers::{HeaderValidator, MAX_HEADERS, SchemaViolation, WebhookHeaders};
pub use ids::{OrganizationId, UserId, WebhookActionId, WebhookId};
pub use outcome::{DeliveryOutcome, DeliveryResponse, OutcomeKind};
pub use webhook::{MAX_URL_LENGTH, NewWebhook, Payload, Webhook, WebhookPatch};
