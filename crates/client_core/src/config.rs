use std::{path::Path, time::Duration};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{
    ordering::{EmptyOrderingField, OrderingKey},
    state::DEFAULT_PER_PAGE,
};

pub const DEFAULT_CONFIG_FILE: &str = "courses";
pub const ENV_PREFIX: &str = "APP";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub per_page: u32,
    pub ordering: String,
    pub request_timeout_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub session_cookie: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/figures/api/courses/general/".into(),
            per_page: DEFAULT_PER_PAGE,
            ordering: "display_name".into(),
            request_timeout_ms: 10_000,
            max_retries: 2,
            retry_backoff_ms: 250,
            session_cookie: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid base_url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("per_page must be greater than zero")]
    ZeroPageSize,
    #[error("request_timeout_ms must be greater than zero")]
    ZeroTimeout,
    #[error(transparent)]
    InvalidOrdering(#[from] EmptyOrderingField),
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.parsed_base_url()?;
        self.parsed_ordering()?;
        if self.per_page == 0 {
            return Err(SettingsError::ZeroPageSize);
        }
        if self.request_timeout_ms == 0 {
            return Err(SettingsError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn parsed_base_url(&self) -> Result<Url, SettingsError> {
        Url::parse(self.base_url.trim()).map_err(|source| SettingsError::InvalidBaseUrl {
            url: self.base_url.clone(),
            source,
        })
    }

    pub fn parsed_ordering(&self) -> Result<OrderingKey, SettingsError> {
        Ok(self.ordering.parse()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Layers built-in defaults, then `courses.toml` (or `path` when given, which
/// must exist), then `APP__*` environment variables.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let mut builder = Config::builder()
        .set_default("base_url", defaults.base_url)?
        .set_default("per_page", i64::from(defaults.per_page))?
        .set_default("ordering", defaults.ordering)?
        .set_default("request_timeout_ms", defaults.request_timeout_ms as i64)?
        .set_default("max_retries", i64::from(defaults.max_retries))?
        .set_default("retry_backoff_ms", defaults.retry_backoff_ms as i64)?;

    builder = match path {
        Some(path) => builder.add_source(File::from(path).required(true)),
        None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
    };

    let settings: Settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read course browser settings")?
        .try_deserialize()
        .context("failed to decode course browser settings")?;

    settings.validate()?;
    Ok(settings)
}
