//! Engine-facing contracts
//!
//! Every rendering engine instance is bound to exactly one session. The
//! session id travels with each notification so the interaction loop can route
//! it, and can drop notifications from sessions that have since been released.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How an engine instance routes its network traffic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProxyMode {
    /// Direct connections
    None,
    /// Engine-level proxy, e.g. `socks5://127.0.0.1:9050`
    Custom(String),
    /// Proxy advertised through an environment variable of the engine's own
    /// network process. Used when the engine refuses a custom proxy.
    EnvironmentHint { var: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub proxy: ProxyMode,
    /// Ephemeral network session (no shared cookie jar or cache)
    pub ephemeral: bool,
    pub webrtc: bool,
    pub media_source: bool,
    pub encrypted_media: bool,
    /// Overrides the engine's default client identification string
    pub user_agent: Option<String>,
}

impl EngineSettings {
    /// Unrestricted settings with no proxy
    pub fn direct() -> Self {
        Self {
            proxy: ProxyMode::None,
            ephemeral: false,
            webrtc: true,
            media_source: true,
            encrypted_media: true,
            user_agent: None,
        }
    }

    pub fn is_proxied(&self) -> bool {
        !matches!(self.proxy, ProxyMode::None)
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::direct()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    UriChanged(String),
    TitleChanged(String),
    LoadFinished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub session: SessionId,
    pub kind: EngineEventKind,
}

/// Per-session notification channel handed to an engine at construction
#[derive(Debug, Clone)]
pub struct EventSink {
    session: SessionId,
    tx: UnboundedSender<EngineEvent>,
}

impl EventSink {
    pub fn new(session: SessionId, tx: UnboundedSender<EngineEvent>) -> Self {
        Self { session, tx }
    }

    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn emit(&self, kind: EngineEventKind) {
        // The receiver only goes away when the interaction loop is shutting down.
        if self
            .tx
            .send(EngineEvent {
                session: self.session,
                kind,
            })
            .is_err()
        {
            tracing::trace!(session = %self.session, "Engine event dropped, loop closed");
        }
    }
}

/// An opaque rendering engine instance.
///
/// Dropping the handle releases the instance.
pub trait RenderingEngine: Send {
    fn load_uri(&mut self, uri: &str);

    fn uri(&self) -> Option<&str>;

    fn title(&self) -> Option<&str>;

    fn reload(&mut self);

    fn can_go_back(&self) -> bool;

    fn go_back(&mut self);

    fn can_go_forward(&self) -> bool;

    fn go_forward(&mut self);

    /// Inject the dark-mode stylesheet into the current document
    fn apply_dark_style(&mut self);
}

/// Constructs engine instances
pub trait EngineBackend: Send + Sync {
    fn create(&self, settings: &EngineSettings, sink: EventSink)
        -> Result<Box<dyn RenderingEngine>>;
}
