//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! 差し替えなかった port には開発用の既定実装を入れる。
//!
//! | port | 既定 |
//! |------|------|
//! | WebhookStore | InMemoryWebhookStore |
//! | OrganizationMembers | InMemoryMembers |
//! | WebhookTransport | ReqwestTransport（Settings のタイムアウト） |
//! | Clock | SystemClock |
//! | IdGenerator | UlidGenerator |
//!
//! # Fail-fast 設計
//! 不正なタイムアウト設定と HTTP client の構築失敗は `build()` 時点で
//! BuildError として返す。

use std::sync::Arc;

use crate::app::{Dispatcher, WebhookService};
use crate::config::{ConfigError, Settings};
use crate::impls::{InMemoryMembers, InMemoryWebhookStore, ReqwestTransport};
use crate::ports::{
    Clock, IdGenerator, OrganizationMembers, SystemClock, TransportError, UlidGenerator,
    WebhookStore, WebhookTransport,
};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid settings: {0}")]
    Settings(#[from] ConfigError),

    #[error("failed to build HTTP transport: {0}")]
    Transport(#[from] TransportError),
}

/// # 使用例
/// ```ignore
/// let app = AppBuilder::new()
///     .settings(Settings::from_env()?)
///     .store(Arc::new(my_store))
///     .build()?;
/// app.dispatcher.emit_event(org, WebhookActionKind::TaskCreated, Some(payload)).await;
/// ```
#[derive(Default)]
pub struct AppBuilder {
    settings: Settings,
    store: Option<Arc<dyn WebhookStore>>,
    members: Option<Arc<dyn OrganizationMembers>>,
    transport: Option<Arc<dyn WebhookTransport>>,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn store(mut self, store: Arc<dyn WebhookStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn members(mut self, members: Arc<dyn OrganizationMembers>) -> Self {
        self.members = Some(members);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn WebhookTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        let transport: Arc<dyn WebhookTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(self.settings.timeout()?)?),
        };
        let store: Arc<dyn WebhookStore> = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryWebhookStore::new()));
        let members: Arc<dyn OrganizationMembers> = self
            .members
            .unwrap_or_else(|| Arc::new(InMemoryMembers::new()));
        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids: Arc<dyn IdGenerator> = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(clock.clone())));

        Ok(App {
            webhooks: WebhookService::new(store.clone(), members, clock, ids),
            dispatcher: Dispatcher::new(store, transport),
            settings: self.settings,
        })
    }
}

/// App は組み立て済みのサービス一式
pub struct App {
    pub webhooks: WebhookService,
    pub dispatcher: Dispatcher,
    pub settings: Settings,
}
