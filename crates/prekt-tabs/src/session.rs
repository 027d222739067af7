//! Rendering session
//!
//! One browsing context: an exclusively owned engine instance plus the
//! network identity it was built for. Sessions are never cloned or shared;
//! a slot gives its session up only through [`RenderingSession::release`].

use prekt_engine::{RenderingEngine, SessionId, BLANK_URI};

use crate::identity::Identity;

/// Tab labels show at most this many characters of the page title
const LABEL_MAX_CHARS: usize = 12;

pub struct RenderingSession {
    id: SessionId,
    engine: Box<dyn RenderingEngine>,
    identity: Identity,
    last_known_uri: String,
    title: String,
}

impl RenderingSession {
    pub(crate) fn new(id: SessionId, engine: Box<dyn RenderingEngine>, identity: Identity) -> Self {
        Self {
            id,
            engine,
            identity,
            last_known_uri: String::new(),
            title: String::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Empty until the first load
    pub fn last_known_uri(&self) -> &str {
        &self.last_known_uri
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// True once something other than the blank marker has been loaded
    pub fn has_page(&self) -> bool {
        !self.last_known_uri.is_empty() && self.last_known_uri != BLANK_URI
    }

    pub(crate) fn load(&mut self, uri: &str) {
        self.last_known_uri = uri.to_string();
        self.title.clear();
        self.engine.load_uri(uri);
    }

    pub fn reload(&mut self) {
        self.engine.reload();
    }

    /// Returns false when there is nothing to go back to
    pub fn go_back(&mut self) -> bool {
        if !self.engine.can_go_back() {
            return false;
        }
        self.engine.go_back();
        true
    }

    /// Returns false when there is nothing to go forward to
    pub fn go_forward(&mut self) -> bool {
        if !self.engine.can_go_forward() {
            return false;
        }
        self.engine.go_forward();
        true
    }

    pub fn apply_dark_style(&mut self) {
        self.engine.apply_dark_style();
    }

    /// Engine reported a new URI. The blank marker never overwrites a known URI.
    pub fn observe_uri(&mut self, uri: &str) {
        if uri.is_empty() || uri == BLANK_URI {
            return;
        }
        self.last_known_uri = uri.to_string();
    }

    pub fn observe_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Title with fallback to the URI
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.last_known_uri
        } else {
            &self.title
        }
    }

    /// Short label for the tab bar; `index` is the zero-based slot
    pub fn tab_label(&self, index: usize) -> String {
        if self.title.is_empty() {
            return format!("Tab {}", index + 1);
        }

        if self.title.chars().count() > LABEL_MAX_CHARS {
            let short: String = self.title.chars().take(LABEL_MAX_CHARS).collect();
            format!("{short}…")
        } else {
            self.title.clone()
        }
    }

    /// Destroy the session, releasing its engine instance
    pub(crate) fn release(self) {
        tracing::debug!(
            session = %self.id,
            identity = %self.identity,
            "Releasing rendering session"
        );
        drop(self.engine);
    }
}

impl std::fmt::Debug for RenderingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderingSession")
            .field("id", &self.id)
            .field("identity", &self.identity)
            .field("last_known_uri", &self.last_known_uri)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prekt_engine::{EngineBackend, EngineSettings, EventSink, HeadlessBackend};
    use tokio::sync::mpsc;

    fn session() -> RenderingSession {
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = SessionId::new();
        let engine = HeadlessBackend::new()
            .create(&EngineSettings::direct(), EventSink::new(id, tx))
            .unwrap();
        RenderingSession::new(id, engine, Identity::Direct)
    }

    #[test]
    fn test_load_updates_uri_and_resets_title() {
        let mut session = session();
        assert!(!session.has_page());

        session.load("https://example.com");
        session.observe_title("Example Domain");
        assert_eq!(session.last_known_uri(), "https://example.com");

        session.load("https://rust-lang.org");
        assert!(session.title().is_empty());
        assert_eq!(session.display_title(), "https://rust-lang.org");
        assert!(session.has_page());
    }

    #[test]
    fn test_blank_uri_ignored() {
        let mut session = session();
        session.load("https://example.com");
        session.observe_uri(BLANK_URI);
        assert_eq!(session.last_known_uri(), "https://example.com");
    }

    #[test]
    fn test_tab_label() {
        let mut session = session();
        assert_eq!(session.tab_label(1), "Tab 2");

        session.observe_title("Rust");
        assert_eq!(session.tab_label(0), "Rust");

        session.observe_title("The Rust Programming Language");
        assert_eq!(session.tab_label(0), "The Rust Pro…");
    }

    #[test]
    fn test_history_guards() {
        let mut session = session();
        assert!(!session.go_back());
        assert!(!session.go_forward());

        session.load("https://a.example");
        session.load("https://b.example");
        assert!(session.go_back());
        assert!(session.go_forward());
        assert!(!session.go_forward());
    }
}
