//! Cookie model and transfer pipeline
//!
//! The types here mirror the DevTools `Network.Cookie` shape on the read
//! side and the `Network.setCookie` parameter shape on the write side.

use serde::{Deserialize, Serialize};

pub mod filter;
pub mod mapper;
pub mod store;

pub use filter::KeyFilter;
pub use mapper::map_for_destination;
pub use store::{CdpCookieStore, CookieOps};

/// SameSite policy attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// A cookie as read from the browser's cookie store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    #[serde(default)]
    pub same_site: Option<SameSite>,
    /// True when the browsing session ends the cookie's life.
    #[serde(default)]
    pub session: bool,
    /// Absolute expiration in epoch seconds; the protocol reports -1 for
    /// session cookies.
    #[serde(default)]
    pub expires: Option<f64>,
    /// Present on extension-API dumps; the protocol encodes host-only
    /// scoping in the domain's leading dot instead.
    #[serde(default)]
    pub host_only: Option<bool>,
    /// Cookie jar partition identifier, passed through opaquely.
    #[serde(default)]
    pub partition_key: Option<serde_json::Value>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub same_party: Option<bool>,
}

impl Cookie {
    /// Host-only cookies are scoped to the exact host that set them. The
    /// wire format encodes this as a domain without a leading dot when the
    /// explicit flag is absent.
    pub fn is_host_only(&self) -> bool {
        match self.host_only {
            Some(flag) => flag,
            None => !self.domain.starts_with('.'),
        }
    }

    /// The meaningful expiration, if any: session cookies and sentinel
    /// values have none.
    pub fn expiration(&self) -> Option<f64> {
        if self.session {
            return None;
        }
        self.expires.filter(|v| *v >= 0.0)
    }

    /// Write path, defaulting to "/" when the cookie has none.
    pub fn write_path(&self) -> &str {
        if self.path.is_empty() {
            "/"
        } else {
            &self.path
        }
    }

    /// URL the cookie was scoped to, used when removing it. Strips the
    /// leading dot the store uses for subdomain-inclusive cookies.
    pub fn scope_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        let host = self.domain.strip_prefix('.').unwrap_or(&self.domain);
        format!("{}://{}{}", scheme, host, self.write_path())
    }
}

/// Parameters of a cookie write against the destination origin. Optional
/// attributes are omitted from the wire entirely when the source cookie
/// had no meaningful value for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieParams {
    pub url: String,
    pub name: String,
    pub value: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<SameSite>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_party: Option<bool>,
}

#[cfg(test)]
pub(crate) fn test_cookie(name: &str) -> Cookie {
    Cookie {
        name: name.to_string(),
        value: "value".to_string(),
        domain: "example.com".to_string(),
        path: "/".to_string(),
        secure: false,
        http_only: false,
        same_site: None,
        session: true,
        expires: None,
        host_only: None,
        partition_key: None,
        priority: None,
        same_party: None,
    }
}
