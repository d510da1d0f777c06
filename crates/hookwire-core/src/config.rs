//! Settings - 環境変数からの設定読み込み
//!
//! | 変数 | 意味 | 既定値 |
//! |------|------|--------|
//! | `WEBHOOK_TIMEOUT` | 1 回の送信のタイムアウト（秒, 小数可） | `1.0` |

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings from environment: {0}")]
    Env(#[from] envy::Error),

    #[error("WEBHOOK_TIMEOUT must be a positive, representable number of seconds, got {0}")]
    InvalidTimeout(f64),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default = "default_webhook_timeout")]
    pub webhook_timeout: f64,
}

fn default_webhook_timeout() -> f64 {
    1.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            webhook_timeout: default_webhook_timeout(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        envy::from_env::<Settings>()?.validated()
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Settings>(vars)?.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        self.timeout()?;
        Ok(self)
    }

    /// `webhook_timeout` を Duration に変換する。
    ///
    /// フィールドは pub なので、直接組み立てた Settings もここで検査される。
    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        let secs = self.webhook_timeout;
        if secs <= 0.0 {
            return Err(ConfigError::InvalidTimeout(secs));
        }
        Duration::try_from_secs_f64(secs).map_err(|_| ConfigError::InvalidTimeout(secs))
    }
}
