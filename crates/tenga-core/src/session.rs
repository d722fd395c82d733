//! Session and credential lifecycle
//!
//! The bearer API key lives in an explicit `Session` object that is
//! injected into the REST client: loaded from durable storage at
//! startup, set on login, cleared on logout or when the backend rejects
//! it. Durable storage is a single `api_key` file under the data
//! directory; absence means unauthenticated.
//!
//! The session never performs navigation itself. Lifecycle changes are
//! emitted as [`SessionEvent`]s on a channel; whoever owns navigation
//! (the CLI command loop) subscribes and decides what "go to login"
//! means.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::Config;

/// Events emitted on session lifecycle changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A key was stored after an explicit login
    LoggedIn,
    /// The key was removed by an explicit logout
    LoggedOut,
    /// The backend rejected the key; it has been cleared
    Expired,
}

/// Holds the API key and its durable storage
pub struct Session {
    /// The key currently in memory, if any
    key: RwLock<Option<String>>,
    /// File the key is persisted to
    key_path: PathBuf,
    /// Event channel
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    /// Event receiver, handed out once via `take_events`
    event_rx: Mutex<Option<mpsc::UnboundedReceiver<SessionEvent>>>,
}

impl Session {
    /// Load the session from the configured key file
    ///
    /// A missing file simply means no credential is present.
    pub fn load(config: &Config) -> Result<Self> {
        Self::load_from_path(config.api_key_path())
    }

    /// Load the session from a specific key file path
    pub fn load_from_path(key_path: PathBuf) -> Result<Self> {
        let key = if key_path.exists() {
            let raw = std::fs::read_to_string(&key_path)
                .with_context(|| format!("Failed to read API key file: {:?}", key_path))?;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        } else {
            None
        };

        if key.is_some() {
            debug!("Loaded stored API key from {:?}", key_path);
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Ok(Self {
            key: RwLock::new(key),
            key_path,
            event_tx,
            event_rx: Mutex::new(Some(event_rx)),
        })
    }

    /// Take the event receiver (can only be called once)
    pub fn take_events(&self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.event_rx.lock().unwrap().take()
    }

    /// Whether a key is present
    ///
    /// Presence only; validity is confirmed by the backend's response.
    pub fn has_api_key(&self) -> bool {
        self.key.read().unwrap().is_some()
    }

    /// The current key, if any
    pub fn api_key(&self) -> Option<String> {
        self.key.read().unwrap().clone()
    }

    /// Store a key in memory and durable storage
    pub fn set_api_key(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.key_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory: {:?}", parent))?;
        }
        std::fs::write(&self.key_path, key)
            .with_context(|| format!("Failed to write API key file: {:?}", self.key_path))?;

        *self.key.write().unwrap() = Some(key.to_string());
        self.emit(SessionEvent::LoggedIn);
        Ok(())
    }

    /// Remove the key from memory and durable storage
    pub fn clear_api_key(&self) -> Result<()> {
        self.remove_key_file()?;
        *self.key.write().unwrap() = None;
        self.emit(SessionEvent::LoggedOut);
        Ok(())
    }

    /// Invalidate the session after the backend rejected the key
    ///
    /// Clears memory and durable storage and emits
    /// [`SessionEvent::Expired`]. Infallible so it can run from the
    /// client's response path; a failed file removal is logged and the
    /// in-memory key is still dropped.
    pub fn expire(&self) {
        if let Err(e) = self.remove_key_file() {
            warn!("Failed to remove stored API key: {}", e);
        }
        *self.key.write().unwrap() = None;
        self.emit(SessionEvent::Expired);
    }

    /// Path of the durable key file (for display purposes)
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    fn remove_key_file(&self) -> Result<()> {
        if self.key_path.exists() {
            std::fs::remove_file(&self.key_path)
                .with_context(|| format!("Failed to remove API key file: {:?}", self.key_path))?;
        }
        Ok(())
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }
}
