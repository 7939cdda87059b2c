//! Cookie store access

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::cdp::PageSession;
use crate::cookies::{Cookie, SetCookieParams};
use crate::error::{CookieportError, Result};

/// Read, write, and remove cookies in the browser's store. The
/// orchestrators only see this trait, so tests run them against an
/// in-memory store.
#[async_trait]
pub trait CookieOps {
    /// All cookies the browser holds for the origin, across paths and
    /// same-site policies.
    async fn cookies_for_origin(&self, origin: &str) -> Result<Vec<Cookie>>;

    /// Store one cookie.
    async fn set_cookie(&self, params: &SetCookieParams) -> Result<()>;

    /// Delete one cookie, scoped by the URL derived from its own
    /// attributes.
    async fn remove_cookie(&self, cookie: &Cookie) -> Result<()>;
}

/// The DevTools-backed cookie store.
pub struct CdpCookieStore {
    session: PageSession,
}

impl CdpCookieStore {
    pub fn new(session: PageSession) -> Self {
        CdpCookieStore { session }
    }

    async fn cookies_at(&self, url: &str) -> Result<Vec<Cookie>> {
        let result = self
            .session
            .call("Network.getCookies", json!({ "urls": [url] }))
            .await
            .map_err(|err| {
                CookieportError::Lookup(format!("could not query cookies for {}: {}", url, err))
            })?;
        let cookies = result.get("cookies").cloned().unwrap_or_else(|| json!([]));
        serde_json::from_value(cookies).map_err(|err| {
            CookieportError::Lookup(format!("undecodable cookie payload: {}", err))
        })
    }
}

#[async_trait]
impl CookieOps for CdpCookieStore {
    async fn cookies_for_origin(&self, origin: &str) -> Result<Vec<Cookie>> {
        self.cookies_at(origin).await
    }

    async fn set_cookie(&self, params: &SetCookieParams) -> Result<()> {
        let payload = serde_json::to_value(params)
            .map_err(|err| CookieportError::Write(err.to_string()))?;
        let result = self
            .session
            .call("Network.setCookie", payload)
            .await
            .map_err(|err| CookieportError::Write(err.to_string()))?;

        // The protocol reports rejection both as a command error and as
        // success=false, depending on the browser version.
        if result.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(CookieportError::Write(format!(
                "browser rejected cookie \"{}\"",
                params.name
            )));
        }
        Ok(())
    }

    async fn remove_cookie(&self, cookie: &Cookie) -> Result<()> {
        let url = cookie.scope_url();

        let before = self.cookies_at(&url).await?;
        if !before.iter().any(|c| c.name == cookie.name) {
            return Err(CookieportError::NotFound(format!(
                "cookie \"{}\" was not found at {}",
                cookie.name, url
            )));
        }

        self.session
            .call(
                "Network.deleteCookies",
                json!({ "name": cookie.name, "url": url }),
            )
            .await
            .map_err(|err| CookieportError::Removal(err.to_string()))?;

        // deleteCookies reports nothing per cookie; read back to tell.
        let after = self.cookies_at(&url).await?;
        if after.iter().any(|c| c.name == cookie.name) {
            return Err(CookieportError::Removal(format!(
                "cookie \"{}\" survived deletion at {}",
                cookie.name, url
            )));
        }
        Ok(())
    }
}
