//! Headless engine backend
//!
//! Keeps a per-instance navigation stack and emits the same notifications a
//! real engine would, synchronously, in the order URI -> title -> finished.
//! The backend keeps a registry of live instances keyed by session so callers
//! can observe creation and release.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::engine::{
    EngineBackend, EngineEventKind, EngineSettings, EventSink, ProxyMode, RenderingEngine,
    SessionId,
};
use crate::error::EngineError;
use crate::Result;

/// Observable state of one live headless engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineRecord {
    pub settings: EngineSettings,
    /// Every URI passed to `load_uri`, in order
    pub loads: Vec<String>,
    pub reloads: usize,
    pub dark_style_applied: usize,
}

#[derive(Clone, Default)]
pub struct HeadlessBackend {
    registry: Arc<RwLock<HashMap<SessionId, EngineRecord>>>,
    reject_custom_proxy: bool,
    unavailable: bool,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse `ProxyMode::Custom`, as an engine built without proxy support would
    pub fn rejecting_custom_proxy(mut self) -> Self {
        self.reject_custom_proxy = true;
        self
    }

    /// Fail every construction
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn is_live(&self, session: SessionId) -> bool {
        self.registry.read().contains_key(&session)
    }

    pub fn live_count(&self) -> usize {
        self.registry.read().len()
    }

    pub fn record(&self, session: SessionId) -> Option<EngineRecord> {
        self.registry.read().get(&session).cloned()
    }
}

impl EngineBackend for HeadlessBackend {
    fn create(
        &self,
        settings: &EngineSettings,
        sink: EventSink,
    ) -> Result<Box<dyn RenderingEngine>> {
        if self.unavailable {
            return Err(EngineError::Unavailable(
                "headless backend disabled".to_string(),
            ));
        }

        if let ProxyMode::Custom(proxy) = &settings.proxy {
            if self.reject_custom_proxy {
                return Err(EngineError::ProxyRejected(proxy.clone()));
            }
        }

        let session = sink.session();
        self.registry.write().insert(
            session,
            EngineRecord {
                settings: settings.clone(),
                loads: Vec::new(),
                reloads: 0,
                dark_style_applied: 0,
            },
        );

        tracing::debug!(session = %session, proxied = settings.is_proxied(), "Headless engine created");

        Ok(Box::new(HeadlessEngine {
            sink,
            registry: Arc::clone(&self.registry),
            entries: Vec::new(),
            position: None,
            title: None,
        }))
    }
}

pub struct HeadlessEngine {
    sink: EventSink,
    registry: Arc<RwLock<HashMap<SessionId, EngineRecord>>>,
    /// Back/forward list
    entries: Vec<String>,
    position: Option<usize>,
    title: Option<String>,
}

impl HeadlessEngine {
    fn with_record(&self, f: impl FnOnce(&mut EngineRecord)) {
        if let Some(record) = self.registry.write().get_mut(&self.sink.session()) {
            f(record);
        }
    }

    fn commit(&mut self) {
        let Some(uri) = self.uri().map(str::to_string) else {
            return;
        };
        let title = title_for(&uri);
        self.title = Some(title.clone());

        self.sink.emit(EngineEventKind::UriChanged(uri));
        self.sink.emit(EngineEventKind::TitleChanged(title));
        self.sink.emit(EngineEventKind::LoadFinished);
    }
}

impl RenderingEngine for HeadlessEngine {
    fn load_uri(&mut self, uri: &str) {
        let keep = self.position.map(|p| p + 1).unwrap_or(0);
        self.entries.truncate(keep);
        self.entries.push(uri.to_string());
        self.position = Some(self.entries.len() - 1);

        self.with_record(|record| record.loads.push(uri.to_string()));
        self.commit();
    }

    fn uri(&self) -> Option<&str> {
        self.position
            .and_then(|p| self.entries.get(p))
            .map(String::as_str)
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn reload(&mut self) {
        if self.position.is_none() {
            return;
        }
        self.with_record(|record| record.reloads += 1);
        self.sink.emit(EngineEventKind::LoadFinished);
    }

    fn can_go_back(&self) -> bool {
        matches!(self.position, Some(p) if p > 0)
    }

    fn go_back(&mut self) {
        if let Some(p) = self.position.filter(|p| *p > 0) {
            self.position = Some(p - 1);
            self.commit();
        }
    }

    fn can_go_forward(&self) -> bool {
        matches!(self.position, Some(p) if p + 1 < self.entries.len())
    }

    fn go_forward(&mut self) {
        if self.can_go_forward() {
            self.position = self.position.map(|p| p + 1);
            self.commit();
        }
    }

    fn apply_dark_style(&mut self) {
        self.with_record(|record| record.dark_style_applied += 1);
    }
}

impl Drop for HeadlessEngine {
    fn drop(&mut self) {
        self.registry.write().remove(&self.sink.session());
        tracing::debug!(session = %self.sink.session(), "Headless engine released");
    }
}

/// Document title a page would plausibly report: the host, the file name for
/// local pages, or the raw URI.
fn title_for(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) if url.scheme() == "file" => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uri.to_string()),
        Ok(url) => url
            .host_str()
            .map(str::to_string)
            .unwrap_or_else(|| uri.to_string()),
        Err(_) => uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineEvent;
    use tokio::sync::mpsc;

    fn engine(backend: &HeadlessBackend) -> (Box<dyn RenderingEngine>, SessionId, mpsc::UnboundedReceiver<EngineEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = SessionId::new();
        let engine = backend
            .create(&EngineSettings::direct(), EventSink::new(session, tx))
            .unwrap();
        (engine, session, rx)
    }

    #[test]
    fn test_load_emits_notifications_in_order() {
        let backend = HeadlessBackend::new();
        let (mut engine, session, mut rx) = engine(&backend);

        engine.load_uri("https://example.com/page");

        let kinds: Vec<EngineEventKind> = std::iter::from_fn(|| rx.try_recv().ok())
            .inspect(|e| assert_eq!(e.session, session))
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EngineEventKind::UriChanged("https://example.com/page".to_string()),
                EngineEventKind::TitleChanged("example.com".to_string()),
                EngineEventKind::LoadFinished,
            ]
        );
        assert_eq!(engine.title(), Some("example.com"));
    }

    #[test]
    fn test_back_forward() {
        let backend = HeadlessBackend::new();
        let (mut engine, _, _rx) = engine(&backend);

        assert!(!engine.can_go_back());
        engine.load_uri("https://a.example");
        engine.load_uri("https://b.example");
        assert!(engine.can_go_back());
        assert!(!engine.can_go_forward());

        engine.go_back();
        assert_eq!(engine.uri(), Some("https://a.example"));
        assert!(engine.can_go_forward());

        // A new load discards the forward entries
        engine.load_uri("https://c.example");
        assert!(!engine.can_go_forward());
        engine.go_back();
        assert_eq!(engine.uri(), Some("https://a.example"));
    }

    #[test]
    fn test_registry_tracks_release() {
        let backend = HeadlessBackend::new();
        let (engine, session, _rx) = engine(&backend);
        assert!(backend.is_live(session));
        assert_eq!(backend.live_count(), 1);

        drop(engine);
        assert!(!backend.is_live(session));
        assert_eq!(backend.live_count(), 0);
    }

    #[test]
    fn test_custom_proxy_rejection() {
        let backend = HeadlessBackend::new().rejecting_custom_proxy();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut settings = EngineSettings::direct();
        settings.proxy = ProxyMode::Custom("socks5://127.0.0.1:9050".to_string());

        let result = backend.create(&settings, EventSink::new(SessionId::new(), tx.clone()));
        assert!(matches!(result, Err(EngineError::ProxyRejected(_))));

        settings.proxy = ProxyMode::EnvironmentHint {
            var: "SOCKS_PROXY".to_string(),
            value: "socks5://127.0.0.1:9050".to_string(),
        };
        assert!(backend
            .create(&settings, EventSink::new(SessionId::new(), tx))
            .is_ok());
    }

    #[test]
    fn test_title_for() {
        assert_eq!(title_for("https://www.rust-lang.org/learn"), "www.rust-lang.org");
        assert_eq!(title_for("file:///home/user/newtab.html"), "newtab.html");
        assert_eq!(title_for("not a uri"), "not a uri");
    }
}
