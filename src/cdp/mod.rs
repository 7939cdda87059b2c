//! DevTools protocol plumbing
//!
//! One WebSocket connection to the browser's debugger URL carries every
//! command. A write task drains an outgoing queue; a read task routes
//! responses to their callers by id and fans unsolicited events out on a
//! broadcast channel.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::stream::StreamExt;
use futures_util::SinkExt;
use log::{debug, warn};
use serde_json::{json, Value};
use tokio::sync::{broadcast, mpsc, oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::error::{CookieportError, Result};

pub mod browser;
pub mod session;

pub use browser::Browser;
pub use session::PageSession;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// An unsolicited protocol event.
#[derive(Debug, Clone)]
pub struct CdpEvent {
    pub method: String,
    pub session_id: Option<String>,
    pub params: Value,
}

type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<Result<Value>>>>>;

/// Command channel to one browser.
pub struct CdpConnection {
    outgoing: mpsc::UnboundedSender<Message>,
    pending: PendingMap,
    events: broadcast::Sender<CdpEvent>,
    next_id: AtomicU64,
    read_task: JoinHandle<()>,
    write_task: JoinHandle<()>,
}

impl CdpConnection {
    /// Connect to a browser's WebSocket debugger URL.
    pub async fn connect(ws_url: &str) -> Result<Self> {
        let (stream, _) = connect_async(ws_url).await?;
        let (mut sink, mut source) = stream.split();

        let (outgoing, mut outgoing_rx) = mpsc::unbounded_channel::<Message>();
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        let write_task = tokio::spawn(async move {
            while let Some(message) = outgoing_rx.recv().await {
                if sink.send(message).await.is_err() {
                    break;
                }
            }
        });

        let read_pending = Arc::clone(&pending);
        let read_events = events.clone();
        let read_task = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        dispatch_message(&text, &read_pending, &read_events).await;
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(err) => {
                        warn!("browser connection lost: {}", err);
                        break;
                    }
                }
            }
            fail_pending(&read_pending).await;
        });

        Ok(CdpConnection {
            outgoing,
            pending,
            events,
            next_id: AtomicU64::new(0),
            read_task,
            write_task,
        })
    }

    /// Subscribe to unsolicited events. Subscribe before triggering the
    /// action whose event is awaited, or the event may be missed.
    pub fn subscribe(&self) -> broadcast::Receiver<CdpEvent> {
        self.events.subscribe()
    }

    /// Send one command and await its response. Protocol-level rejections
    /// surface as `Cdp` errors carrying the browser's message.
    pub async fn call(
        &self,
        session_id: Option<&str>,
        method: &str,
        params: Value,
    ) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let mut command = json!({
            "id": id,
            "method": method,
            "params": params,
        });
        if let Some(session) = session_id {
            command["sessionId"] = json!(session);
        }

        let (sender, receiver) = oneshot::channel();
        self.pending.lock().await.insert(id, sender);

        debug!("-> {} (id {})", method, id);
        if self.outgoing.send(Message::Text(command.to_string())).is_err() {
            self.pending.lock().await.remove(&id);
            return Err(CookieportError::Cdp(
                "browser connection is closed".to_string(),
            ));
        }

        receiver.await.map_err(|_| {
            CookieportError::Cdp(format!(
                "browser connection closed before the response to {}",
                method
            ))
        })?
    }
}

impl Drop for CdpConnection {
    fn drop(&mut self) {
        self.read_task.abort();
        self.write_task.abort();
    }
}

async fn dispatch_message(
    text: &str,
    pending: &PendingMap,
    events: &broadcast::Sender<CdpEvent>,
) {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!("undecodable protocol message: {}", err);
            return;
        }
    };

    if let Some(id) = value.get("id").and_then(Value::as_u64) {
        let outcome = match value.get("error") {
            Some(error) => {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("protocol error");
                Err(CookieportError::Cdp(message.to_string()))
            }
            None => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
        };
        if let Some(sender) = pending.lock().await.remove(&id) {
            let _ = sender.send(outcome);
        }
        return;
    }

    if let Some(method) = value.get("method").and_then(Value::as_str) {
        let event = CdpEvent {
            method: method.to_string(),
            session_id: value
                .get("sessionId")
                .and_then(Value::as_str)
                .map(str::to_string),
            params: value.get("params").cloned().unwrap_or(Value::Null),
        };
        // No receivers is fine; events are only interesting while a
        // caller is waiting on one.
        let _ = events.send(event);
    }
}

async fn fail_pending(pending: &PendingMap) {
    let mut pending = pending.lock().await;
    for (_, sender) in pending.drain() {
        let _ = sender.send(Err(CookieportError::Cdp(
            "browser connection closed".to_string(),
        )));
    }
}
