//! Runtime settings resolved from the environment, then overridden by CLI flags.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{H4aError, Result};
use crate::h4a::{DEFAULT_NULL_SENTINELS, FEDERATION_API_URL};
use crate::update::UpdaterConfig;
use crate::{
    API_URL_ENV_VAR, CONCURRENCY_ENV_VAR, DB_PATH_ENV_VAR, HTTP_TIMEOUT_ENV_VAR,
    TABLE_PREFIX_ENV_VAR,
};

const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub api_url: String,
    pub table_prefix: String,
    pub concurrency: usize,
    pub http_timeout_secs: u64,
}

/// Path: ~/.cache/h4a-sync/h4a.db
pub fn default_db_path() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("h4a-sync").join("h4a.db")
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            api_url: FEDERATION_API_URL.to_string(),
            table_prefix: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source. Unset or blank
    /// variables keep their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        if let Some(path) = get(DB_PATH_ENV_VAR) {
            settings.db_path = PathBuf::from(path);
        }
        if let Some(url) = get(API_URL_ENV_VAR) {
            settings.api_url = url;
        }
        if let Some(prefix) = get(TABLE_PREFIX_ENV_VAR) {
            settings.table_prefix = prefix;
        }
        if let Some(raw) = get(CONCURRENCY_ENV_VAR) {
            settings.concurrency = parse_number(CONCURRENCY_ENV_VAR, &raw)?;
        }
        if let Some(raw) = get(HTTP_TIMEOUT_ENV_VAR) {
            settings.http_timeout_secs = parse_number(HTTP_TIMEOUT_ENV_VAR, &raw)?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Apply a CLI `--concurrency` override.
    pub fn with_concurrency(mut self, concurrency: Option<usize>) -> Result<Self> {
        if let Some(n) = concurrency {
            self.concurrency = n;
        }
        self.validate()?;
        Ok(self)
    }

    /// Apply a CLI `--db` override.
    pub fn with_db_path(mut self, db_path: Option<PathBuf>) -> Self {
        if let Some(path) = db_path {
            self.db_path = path;
        }
        self
    }

    fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(H4aError::Config {
                message: "concurrency must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn updater_config(&self) -> UpdaterConfig {
        UpdaterConfig {
            api_url: self.api_url.clone(),
            concurrency: self.concurrency,
            null_sentinels: DEFAULT_NULL_SENTINELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| H4aError::Config {
        message: format!("{} must be a non-negative integer, got '{}'", key, raw),
    })
}
