//! Preview session lifecycle
//!
//! Every load mints a new realm and makes it the bridge's only accepted
//! source, so output still in flight from the previous document is dropped.
//! A runaway script is recovered the same way: load again and the old realm
//! goes silent.

use crate::bridge::{HostBridge, RealmId};
use crate::document::{build_document, iframe_markup};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Preview configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Clear the console log whenever a new document is loaded
    pub clear_on_reload: bool,
}

/// Document currently shown in the preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPreview {
    /// Realm the document runs in
    pub realm: RealmId,
    /// Complete preview document
    pub document: String,
}

impl LoadedPreview {
    /// Sandboxed frame element for this document
    #[must_use]
    pub fn iframe(&self) -> String {
        iframe_markup(&self.document)
    }
}

/// Owns the live realm and its bridge
#[derive(Debug)]
pub struct PreviewSession {
    bridge: Arc<HostBridge>,
    config: PreviewConfig,
    current: Option<LoadedPreview>,
}

impl PreviewSession {
    /// Create session around a bridge
    #[must_use]
    pub fn new(bridge: Arc<HostBridge>, config: PreviewConfig) -> Self {
        Self {
            bridge,
            config,
            current: None,
        }
    }

    /// Bridge receiving this session's messages
    #[inline]
    #[must_use]
    pub fn bridge(&self) -> &Arc<HostBridge> {
        &self.bridge
    }

    /// Currently loaded preview
    #[inline]
    #[must_use]
    pub fn current(&self) -> Option<&LoadedPreview> {
        self.current.as_ref()
    }

    /// Load a source into a fresh realm
    pub fn load(&mut self, source: &str) -> &LoadedPreview {
        let document = build_document(source);
        let realm = RealmId::new();

        self.bridge.attach(realm);
        if self.config.clear_on_reload {
            self.bridge.log().clear();
        }

        tracing::info!(%realm, bytes = document.len(), "preview loaded");
        self.current.insert(LoadedPreview { realm, document })
    }

    /// Detach the live realm
    pub fn teardown(&mut self) {
        if let Some(previous) = self.current.take() {
            tracing::debug!(realm = %previous.realm, "preview torn down");
        }
        self.bridge.detach();
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(Arc::new(HostBridge::default()), PreviewConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_replaces_realm() {
        let mut session = PreviewSession::default();
        let first = session.load("a()").realm;
        let second = session.load("b()").realm;
        assert_ne!(first, second);
        assert_eq!(session.bridge().live_realm(), Some(second));
    }

    #[test]
    fn clear_on_reload_empties_log() {
        let mut session = PreviewSession::new(
            Arc::new(HostBridge::default()),
            PreviewConfig {
                clear_on_reload: true,
            },
        );
        session.load("a()");
        session
            .bridge()
            .log()
            .push(crate::protocol::ConsoleLevel::Log, "old");
        session.load("a()");
        assert!(session.bridge().log().is_empty());
    }

    #[test]
    fn teardown_detaches() {
        let mut session = PreviewSession::default();
        session.load("a()");
        session.teardown();
        assert!(session.current().is_none());
        assert_eq!(session.bridge().live_realm(), None);
    }
}
