//! Configuration management for cookieport

use std::time::Duration;

use serde::Serialize;

/// Default remote debugging endpoint of a locally started browser.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:9222";

/// Output configuration
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub verbose: bool,
    pub silent: bool,
    pub format_json: bool,
}

/// Tab-load wait and in-page polling tunables
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Deadline for the opened tab to reach the loaded state.
    pub load_timeout: Duration,
    /// Number of in-page lookups for the three form elements.
    pub attempts: u32,
    /// Pause between in-page lookups.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            load_timeout: Duration::from_secs(15),
            attempts: 20,
            interval: Duration::from_millis(500),
        }
    }
}

/// Auto-copy retry tunables
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries beyond the first copy attempt after login.
    pub attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            attempts: 3,
            delay: Duration::from_millis(700),
        }
    }
}

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    pub endpoint: String,
    pub output: OutputConfig,
    pub poll: PollConfig,
    pub retry: RetryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            output: OutputConfig {
                verbose: false,
                silent: false,
                format_json: false,
            },
            poll: PollConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Parameters of a copy request
#[derive(Debug, Clone, Serialize)]
pub struct CopyRequest {
    pub source_url: String,
    pub destination_url: String,
    pub copy_all: bool,
    /// Raw comma-separated cookie names, ignored when `copy_all` is set.
    pub keys: String,
}

/// Parameters of a clear request
#[derive(Debug, Clone, Serialize)]
pub struct ClearRequest {
    pub url: String,
}

/// CSS selectors locating the three login form elements
#[derive(Debug, Clone, Serialize)]
pub struct Selectors {
    pub username: String,
    pub password: String,
    pub submit: String,
}

/// Parameters of a login automation request
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub url: String,
    pub username: String,
    pub password: String,
    pub selectors: Selectors,
}
