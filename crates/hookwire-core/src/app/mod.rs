//! App - アプリケーション層
//!
//! - **builder**: port のワイヤリング（AppBuilder / App）
//! - **webhooks**: WebhookService（CRUD、購読 action、権限）
//! - **dispatcher**: Dispatcher（run_webhook / emit_event）

pub mod builder;
pub mod dispatcher;
pub mod webhooks;

pub use self::builder::{App, AppBuilder, BuildError};
pub use self::dispatcher::{Delivery, Dispatcher, EmissionReport};
pub use self::webhooks::{ActionDiff, WebhookService};
