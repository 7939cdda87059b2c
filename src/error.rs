//! Error handling for cookieport

use thiserror::Error;

/// Main error type for cookieport operations
#[derive(Error, Debug)]
pub enum CookieportError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cookie lookup failed: {0}")]
    Lookup(String),

    #[error("Incompatible cookie: {0}")]
    IncompatibleCookie(String),

    #[error("Cookie write failed: {0}")]
    Write(String),

    #[error("Cookie removal failed: {0}")]
    Removal(String),

    #[error("Cookie not found: {0}")]
    NotFound(String),

    #[error("Tab error: {0}")]
    Tab(String),

    #[error("Tab closed: {0}")]
    TabClosed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Login automation failed: {message}")]
    Automation {
        message: String,
        missing: Vec<String>,
    },

    #[error("DevTools protocol error: {0}")]
    Cdp(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cookieport operations
pub type Result<T> = std::result::Result<T, CookieportError>;
