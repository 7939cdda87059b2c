//! Utility functions and helpers

use std::collections::HashSet;

use url::Url;

use crate::error::{CookieportError, Result};

/// URL validation and parsing utilities
pub struct UrlUtils;

impl UrlUtils {
    /// Validate that the input is a non-empty http or https URL.
    pub fn require_http_url(input: &str, label: &str) -> Result<Url> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CookieportError::Validation(format!("{} is not set", label)));
        }

        let url = Url::parse(trimmed).map_err(|e| {
            CookieportError::Validation(format!("{} is invalid: {}", label, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CookieportError::Validation(format!(
                "{} must use http or https, got {}",
                label, other
            ))),
        }
    }

    /// The origin string (scheme://host[:port]) used to scope cookie queries.
    pub fn origin(url: &Url) -> String {
        url.origin().ascii_serialization()
    }

    /// Hostname for user feedback, empty for URLs without one.
    pub fn host(url: &Url) -> String {
        url.host_str().unwrap_or_default().to_string()
    }
}

/// Cookie key list parsing
pub struct StringUtils;

impl StringUtils {
    /// Split a comma-separated key list, trimming tokens and dropping
    /// empties and duplicates.
    pub fn parse_keys(input: &str) -> HashSet<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Form selector validation
pub struct SelectorUtils;

impl SelectorUtils {
    /// Selectors must target an id or class (start with '#' or '.'); bare
    /// tag selectors are rejected before any tab is opened.
    pub fn validate(selector: &str, label: &str) -> Result<()> {
        let trimmed = selector.trim();
        if trimmed.is_empty() {
            return Err(CookieportError::Validation(format!(
                "{} selector is not set",
                label
            )));
        }
        if !trimmed.starts_with('#') && !trimmed.starts_with('.') {
            return Err(CookieportError::Validation(format!(
                "{} selector must start with '#' or '.', got '{}'",
                label, trimmed
            )));
        }
        Ok(())
    }
}
