use std::{fs, time::Duration};

use client_core::{ConfigError, RetryPolicy};
use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "viewer.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub max_attempts: u32,
    pub backoff_base: f64,
    pub backoff_unit_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.example.com".into(),
            request_timeout_secs: 15,
            max_attempts: 3,
            backoff_base: 2.0,
            backoff_unit_ms: 1000,
        }
    }
}

impl Settings {
    pub fn retry_policy(&self) -> Result<RetryPolicy, ConfigError> {
        RetryPolicy::new(
            self.max_attempts,
            self.backoff_base,
            Duration::from_millis(self.backoff_unit_ms),
        )
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        let timeout = Duration::from_secs(self.request_timeout_secs);
        if timeout.is_zero() {
            return Err(ConfigError::NonPositiveTimeout(timeout));
        }
        Ok(timeout)
    }
}

/// Keys accepted in `viewer.toml`; anything else in the file is ignored.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
    backoff_base: Option<f64>,
    backoff_unit_ms: Option<u64>,
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    resolve_settings(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment overrides.
fn resolve_settings(file: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.api_base_url {
                    settings.api_base_url = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
                if let Some(v) = file_cfg.max_attempts {
                    settings.max_attempts = v;
                }
                if let Some(v) = file_cfg.backoff_base {
                    settings.backoff_base = v;
                }
                if let Some(v) = file_cfg.backoff_unit_ms {
                    settings.backoff_unit_ms = v;
                }
            }
            Err(err) => warn!(file = SETTINGS_FILE, error = %err, "config: ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("VIEWER_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = env("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        settings.request_timeout_secs = v;
    }
    if let Some(v) = env("APP__MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
        settings.max_attempts = v;
    }
    if let Some(v) = env("APP__BACKOFF_BASE").and_then(|v| v.parse().ok()) {
        settings.backoff_base = v;
    }
    if let Some(v) = env("APP__BACKOFF_UNIT_MS").and_then(|v| v.parse().ok()) {
        settings.backoff_unit_ms = v;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
