//! Host side of the preview message channel
//!
//! Messages are accepted only from the live realm. Anything from a replaced
//! realm, or anything that fails to parse, is dropped without reaching the
//! console log.

use crate::console::ConsoleLog;
use crate::protocol::{RuntimeEvent, SandboxMessage};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Identity of one loaded preview document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RealmId(Uuid);

impl RealmId {
    /// Mint a fresh realm id
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RealmId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RealmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "realm-{}", self.0)
    }
}

/// Message as delivered to the host, tagged with the posting realm
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Realm that posted the message
    pub source: RealmId,
    /// Posted value
    pub data: serde_json::Value,
}

impl InboundMessage {
    /// Create inbound message
    #[inline]
    #[must_use]
    pub fn new(source: RealmId, data: serde_json::Value) -> Self {
        Self { source, data }
    }
}

/// Create the channel a realm adapter posts into
#[must_use]
pub fn channel(buffer: usize) -> (mpsc::Sender<InboundMessage>, mpsc::Receiver<InboundMessage>) {
    mpsc::channel(buffer.max(1))
}

/// Filters inbound messages and records accepted ones
#[derive(Debug)]
pub struct HostBridge {
    live: Mutex<Option<RealmId>>,
    log: Arc<ConsoleLog>,
}

impl HostBridge {
    /// Create bridge writing into `log`
    #[must_use]
    pub fn new(log: Arc<ConsoleLog>) -> Self {
        Self {
            live: Mutex::new(None),
            log,
        }
    }

    /// Console log receiving accepted events
    #[inline]
    #[must_use]
    pub fn log(&self) -> &Arc<ConsoleLog> {
        &self.log
    }

    /// Make `realm` the only accepted source
    pub fn attach(&self, realm: RealmId) {
        *self.live.lock() = Some(realm);
    }

    /// Stop accepting messages from any realm
    pub fn detach(&self) {
        *self.live.lock() = None;
    }

    /// Currently accepted realm
    #[must_use]
    pub fn live_realm(&self) -> Option<RealmId> {
        *self.live.lock()
    }

    /// Handle one inbound message
    pub fn on_message(&self, message: InboundMessage) -> Option<RuntimeEvent> {
        // Held until the entry is logged so `attach` cannot interleave
        let live = self.live.lock();
        if *live != Some(message.source) {
            tracing::trace!(source = %message.source, "dropped message from inactive realm");
            return None;
        }

        let event = match SandboxMessage::from_value(message.data) {
            Ok(parsed) => RuntimeEvent::from(parsed),
            Err(err) => {
                tracing::trace!(source = %message.source, error = %err, "dropped malformed message");
                return None;
            }
        };

        self.log.push(event.level, event.payload.clone());
        Some(event)
    }

    /// Drain a channel until every sender is gone; returns accepted count
    pub async fn pump(&self, mut receiver: mpsc::Receiver<InboundMessage>) -> usize {
        let mut accepted = 0;
        while let Some(message) = receiver.recv().await {
            if self.on_message(message).is_some() {
                accepted += 1;
            }
        }
        tracing::debug!(accepted, "preview channel closed");
        accepted
    }
}

impl Default for HostBridge {
    fn default() -> Self {
        Self::new(Arc::new(ConsoleLog::default()))
    }
}
