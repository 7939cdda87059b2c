//! Browser endpoint discovery and tab control

use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::cdp::{CdpConnection, PageSession};
use crate::error::{CookieportError, Result};

/// Payload of `GET <endpoint>/json/version`.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    #[serde(rename = "Browser", default)]
    pub browser: Option<String>,
    #[serde(rename = "webSocketDebuggerUrl")]
    pub web_socket_debugger_url: String,
}

/// Resolve the browser-level WebSocket debugger URL of a remote
/// debugging endpoint.
pub async fn discover(endpoint: &str) -> Result<VersionInfo> {
    let url = format!("{}/json/version", endpoint.trim_end_matches('/'));
    let response = reqwest::get(&url).await?;
    if !response.status().is_success() {
        return Err(CookieportError::Cdp(format!(
            "debugging endpoint {} answered {}",
            url,
            response.status()
        )));
    }
    Ok(response.json::<VersionInfo>().await?)
}

/// A connected browser.
pub struct Browser {
    conn: Arc<CdpConnection>,
}

impl Browser {
    /// Discover and attach to the browser behind a debugging endpoint.
    /// Target discovery is enabled up front so tab closure events reach
    /// every later wait.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        let info = discover(endpoint).await?;
        if let Some(name) = &info.browser {
            debug!("attaching to {}", name);
        }
        let conn = Arc::new(CdpConnection::connect(&info.web_socket_debugger_url).await?);
        conn.call(None, "Target.setDiscoverTargets", json!({ "discover": true }))
            .await?;
        Ok(Browser { conn })
    }

    /// Open a new tab at the URL and attach to it. The tab is left open;
    /// nothing in this tool ever closes one.
    pub async fn open_tab(&self, url: &str) -> Result<PageSession> {
        let result = self
            .conn
            .call(None, "Target.createTarget", json!({ "url": url }))
            .await
            .map_err(|err| {
                CookieportError::Tab(format!("could not open a tab at {}: {}", url, err))
            })?;
        let target_id = result
            .get("targetId")
            .and_then(Value::as_str)
            .ok_or_else(|| CookieportError::Tab("browser returned no tab handle".to_string()))?
            .to_string();
        self.attach(&target_id).await
    }

    /// Attach to an existing page for cookie work, or a blank one if the
    /// browser shows none.
    pub async fn page_session(&self) -> Result<PageSession> {
        let result = self.conn.call(None, "Target.getTargets", json!({})).await?;
        let target_id = result
            .get("targetInfos")
            .and_then(Value::as_array)
            .and_then(|targets| {
                targets.iter().find(|target| {
                    target.get("type").and_then(Value::as_str) == Some("page")
                })
            })
            .and_then(|target| target.get("targetId").and_then(Value::as_str))
            .map(str::to_string);

        match target_id {
            Some(id) => self.attach(&id).await,
            None => self.open_tab("about:blank").await,
        }
    }

    async fn attach(&self, target_id: &str) -> Result<PageSession> {
        let result = self
            .conn
            .call(
                None,
                "Target.attachToTarget",
                json!({ "targetId": target_id, "flatten": true }),
            )
            .await
            .map_err(|err| CookieportError::Tab(format!("could not attach to tab: {}", err)))?;
        let session_id = result
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| CookieportError::Tab("browser returned no session handle".to_string()))?
            .to_string();
        Ok(PageSession::new(
            Arc::clone(&self.conn),
            target_id.to_string(),
            session_id,
        ))
    }
}
