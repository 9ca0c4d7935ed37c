//! Configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SLACK_TOKEN` - Slack bot or user OAuth token (xoxb-... / xoxp-...)
//!
//! ## Optional
//! - `SLACK_API_BASE` - Web API root (default: https://slack.com/api)
//! - `SLACK_PROFILE_BATCH_SIZE` - Concurrent profile lookups per batch (default: 20)
//! - `SLACK_BATCH_DELAY_MS` - Pause between profile batches (default: 100)
//! - `SLACK_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)

use crate::slack::SLACK_API_BASE;
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BATCH_SIZE: usize = 20;
pub const DEFAULT_BATCH_DELAY_MS: u64 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Batching and pacing for profile lookups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: Duration::from_millis(DEFAULT_BATCH_DELAY_MS),
        }
    }
}

/// Page sizes for channel and membership listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchSettings {
    pub channel_page_size: u32,
    pub member_page_size: u32,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            channel_page_size: DEFAULT_PAGE_SIZE,
            member_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub token: SecretString,
    pub api_base: String,
    pub http_timeout: Duration,
    pub resolver: ResolverSettings,
    pub fetch: FetchSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = get("SLACK_TOKEN")
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingEnvVar("SLACK_TOKEN".to_string()))?;

        let api_base = get("SLACK_API_BASE").unwrap_or_else(|| SLACK_API_BASE.to_string());

        let batch_size = parse_or(
            "SLACK_PROFILE_BATCH_SIZE",
            get("SLACK_PROFILE_BATCH_SIZE"),
            DEFAULT_BATCH_SIZE,
        )?;
        if batch_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SLACK_PROFILE_BATCH_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let delay_ms = parse_or(
            "SLACK_BATCH_DELAY_MS",
            get("SLACK_BATCH_DELAY_MS"),
            DEFAULT_BATCH_DELAY_MS,
        )?;
        let timeout_secs = parse_or(
            "SLACK_HTTP_TIMEOUT_SECS",
            get("SLACK_HTTP_TIMEOUT_SECS"),
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;

        Ok(Self {
            token,
            api_base,
            http_timeout: Duration::from_secs(timeout_secs),
            resolver: ResolverSettings {
                batch_size,
                batch_delay: Duration::from_millis(delay_ms),
            },
            fetch: FetchSettings::default(),
        })
    }
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
