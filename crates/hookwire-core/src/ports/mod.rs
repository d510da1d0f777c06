//! Ports - 抽象化レイヤー
//!
//! Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（DB、HTTP、組織管理）へのインターフェースで、
//! 実装は `impls` か、このクレートの外に置きます。

pub mod clock;
pub mod id_generator;
pub mod membership;
pub mod transport;
pub mod webhook_store;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::membership::OrganizationMembers;
pub use self::transport::{DeliveryRequest, TransportError, WebhookTransport};
pub use self::webhook_store::{StoreError, WebhookStore};
