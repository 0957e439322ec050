use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::proxy::{ProxySettings, DEFAULT_CURRENCY};
use crate::upstream::DEFAULT_BASE_URL;

/// Optional dotenv file read before the process environment.
pub const ENV_FILE: &str = "crates/server/.env.server";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub http_host: String,
    pub http_port: u16,
    pub upstream_base_url: String,
    pub upstream_api_key: Option<String>,
    pub upstream_timeout_seconds: u64,
    pub catalog_ttl_seconds: u64,
    pub detail_ttl_seconds: u64,
    pub history_ttl_seconds: u64,
    pub purge_interval_seconds: u64,
    pub reference_currency: String,
    pub log_level: String,
}

/// Loads `ENV_FILE` into the environment if it exists. Variables already set win.
pub fn load_env_file() -> Result<PathBuf, dotenv::Error> {
    dotenv::from_filename(ENV_FILE)
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid value '{}' for {}: {}", raw, key, e)),
        _ => Ok(default),
    }
}

fn text_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ServerConfig {
    pub fn load() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ServerConfig {
            http_host: text_or(&lookup, "HTTP_HOST", "127.0.0.1"),
            http_port: parse_or(&lookup, "HTTP_PORT", 5000)?,
            upstream_base_url: text_or(&lookup, "UPSTREAM_BASE_URL", DEFAULT_BASE_URL),
            upstream_api_key: lookup("UPSTREAM_API_KEY").filter(|key| !key.trim().is_empty()),
            upstream_timeout_seconds: parse_or(&lookup, "UPSTREAM_TIMEOUT_SECONDS", 10)?,
            catalog_ttl_seconds: parse_or(&lookup, "CATALOG_TTL_SECONDS", 600)?,
            detail_ttl_seconds: parse_or(&lookup, "DETAIL_TTL_SECONDS", 120)?,
            history_ttl_seconds: parse_or(&lookup, "HISTORY_TTL_SECONDS", 600)?,
            purge_interval_seconds: parse_or(&lookup, "PURGE_INTERVAL_SECONDS", 300)?,
            reference_currency: text_or(&lookup, "REFERENCE_CURRENCY", DEFAULT_CURRENCY).to_lowercase(),
            log_level: text_or(&lookup, "LOG_LEVEL", "INFO"),
        };

        if config.upstream_timeout_seconds == 0 {
            return Err("UPSTREAM_TIMEOUT_SECONDS must be greater than zero".to_string());
        }
        if config.purge_interval_seconds == 0 {
            return Err("PURGE_INTERVAL_SECONDS must be greater than zero".to_string());
        }

        Ok(config)
    }

    pub fn setup_logging(&self) {
        shared::init_logging(&self.log_level);
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_seconds)
    }

    pub fn proxy_settings(&self) -> ProxySettings {
        ProxySettings {
            catalog_ttl: Duration::from_secs(self.catalog_ttl_seconds),
            detail_ttl: Duration::from_secs(self.detail_ttl_seconds),
            history_ttl: Duration::from_secs(self.history_ttl_seconds),
            reference_currency: self.reference_currency.clone(),
            ..ProxySettings::default()
        }
    }
}
