//! Session-scoped page control

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use serde_json::{json, Value};
use tokio::sync::broadcast;

use crate::cdp::{CdpConnection, CdpEvent};
use crate::error::{CookieportError, Result};

/// A flat-mode session attached to one page target.
pub struct PageSession {
    conn: Arc<CdpConnection>,
    target_id: String,
    session_id: String,
}

impl PageSession {
    pub(crate) fn new(conn: Arc<CdpConnection>, target_id: String, session_id: String) -> Self {
        PageSession {
            conn,
            target_id,
            session_id,
        }
    }

    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Send one command scoped to this session.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.conn.call(Some(&self.session_id), method, params).await
    }

    /// Wait for the page to reach the loaded state. A page that is
    /// already complete resolves immediately; otherwise the load event is
    /// raced against tab closure and the deadline.
    pub async fn wait_until_loaded(&self, timeout: Duration) -> Result<()> {
        // Subscribe before probing so a load firing in between is not lost.
        let events = self.conn.subscribe();
        self.call("Page.enable", json!({})).await?;

        let state = self
            .call(
                "Runtime.evaluate",
                json!({ "expression": "document.readyState", "returnByValue": true }),
            )
            .await?;
        if state.pointer("/result/value").and_then(Value::as_str) == Some("complete") {
            debug!("tab {} already loaded", self.target_id);
            return Ok(());
        }

        wait_for_load(events, &self.target_id, &self.session_id, timeout).await
    }

    /// Evaluate an expression in the page, awaiting promises and
    /// returning the settled value. A thrown exception is a protocol
    /// error, not a crash.
    pub async fn evaluate(&self, expression: &str) -> Result<Value> {
        let result = self
            .call(
                "Runtime.evaluate",
                json!({
                    "expression": expression,
                    "awaitPromise": true,
                    "returnByValue": true,
                }),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let text = exception
                .get("exception")
                .and_then(|e| e.get("description"))
                .or_else(|| exception.get("text"))
                .and_then(Value::as_str)
                .unwrap_or("JavaScript exception");
            return Err(CookieportError::Cdp(format!("script failed: {}", text)));
        }

        Ok(result
            .pointer("/result/value")
            .cloned()
            .unwrap_or(Value::Null))
    }
}

/// Race the load event against tab closure and a deadline. Whichever
/// fires first wins; the subscription is dropped on every exit path.
pub(crate) async fn wait_for_load(
    mut events: broadcast::Receiver<CdpEvent>,
    target_id: &str,
    session_id: &str,
    timeout: Duration,
) -> Result<()> {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => {
                return Err(CookieportError::Timeout(format!(
                    "tab did not finish loading within {} seconds",
                    timeout.as_secs()
                )));
            }
            event = events.recv() => match event {
                Ok(event) => {
                    if event.method == "Page.loadEventFired"
                        && event.session_id.as_deref() == Some(session_id)
                    {
                        return Ok(());
                    }
                    if event.method == "Target.targetDestroyed"
                        && event.params.get("targetId").and_then(Value::as_str)
                            == Some(target_id)
                    {
                        return Err(CookieportError::TabClosed(
                            "the tab was closed before it finished loading".to_string(),
                        ));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => {
                    return Err(CookieportError::Cdp(
                        "browser connection closed while waiting for the tab to load"
                            .to_string(),
                    ));
                }
            }
        }
    }
}
