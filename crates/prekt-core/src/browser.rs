//! Main browser state container
//!
//! Owns the tab slots, the navigation history and the chrome state (URL field
//! and window title). Engine notifications are routed here by session id;
//! notifications from sessions that have since been released are dropped.

use prekt_engine::{EngineBackend, EngineEvent, EngineEventKind, BLANK_URI};
use prekt_navigation::{InputResolver, NavigationHistory};
use prekt_probe::TabTarget;
use prekt_tabs::{Identity, SessionFactory, SwapOutcome, TabChanged, TabManager};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

use crate::config::Config;
use crate::Result;

pub const DEFAULT_WINDOW_TITLE: &str = "PrekT-BR :3";

pub struct Browser {
    config: Config,
    tabs: TabManager,
    history: NavigationHistory,
    input: InputResolver,
    url_field: String,
    window_title: String,
    dark_mode: bool,
}

impl Browser {
    pub fn new(
        config: Config,
        backend: Arc<dyn EngineBackend>,
        events: UnboundedSender<EngineEvent>,
    ) -> Result<Self> {
        let factory = SessionFactory::new(backend, config.anonymity_profile(), events);
        let tabs = TabManager::new(factory, config.tab_count, config.home_uri.clone())?;
        let history = NavigationHistory::new(config.history_capacity);
        let input = InputResolver::with_wikipedia_host(config.wikipedia_host.clone());

        tracing::info!(tabs = tabs.len(), "Browser initialized");

        Ok(Self {
            url_field: config.home_uri.clone(),
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            config,
            tabs,
            history,
            input,
            dark_mode: false,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn input(&self) -> &InputResolver {
        &self.input
    }

    pub fn url_field(&self) -> &str {
        &self.url_field
    }

    pub fn window_title(&self) -> &str {
        &self.window_title
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    // === Tab operations ===

    pub fn navigate_active(&mut self, uri: &str) -> Result<()> {
        let active = self.tabs.active_index();
        Ok(self.tabs.navigate(active, uri)?)
    }

    pub fn go_home(&mut self) -> Result<()> {
        let home = self.config.home_uri.clone();
        self.navigate_active(&home)
    }

    pub fn reload(&mut self) {
        self.tabs.current_mut().reload();
    }

    pub fn go_back(&mut self) -> bool {
        self.tabs.current_mut().go_back()
    }

    pub fn go_forward(&mut self) -> bool {
        self.tabs.current_mut().go_forward()
    }

    /// Switch tabs and resync the URL field and window title
    pub fn select_tab(&mut self, index: usize) -> Result<TabChanged> {
        let changed = self.tabs.select(index)?;

        self.url_field = if changed.uri.is_empty() || changed.uri == BLANK_URI {
            self.config.home_uri.clone()
        } else {
            changed.uri.clone()
        };
        let title = if changed.title.is_empty() {
            DEFAULT_WINDOW_TITLE
        } else {
            changed.title.as_str()
        };
        self.window_title = format!("[Tab {}] {}", index + 1, title);

        Ok(changed)
    }

    pub fn swap_active_identity(&mut self, target: Identity) -> Result<SwapOutcome> {
        let active = self.tabs.active_index();
        let outcome = self.tabs.swap_identity(active, target)?;
        self.url_field = outcome.loaded_uri.clone();
        Ok(outcome)
    }

    /// Flip dark mode. Enabling it styles the active page right away.
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        if self.dark_mode {
            self.tabs.current_mut().apply_dark_style();
        }
        tracing::debug!(enabled = self.dark_mode, "Dark mode toggled");
        self.dark_mode
    }

    /// Snapshot of every slot for a background probe
    pub fn tab_targets(&self) -> Vec<TabTarget> {
        self.tabs
            .slots()
            .iter()
            .map(|slot| TabTarget {
                slot: slot.index(),
                identity: slot.session().identity(),
                uri: slot.session().last_known_uri().to_string(),
            })
            .collect()
    }

    // === Engine notifications ===

    pub fn handle_engine_event(&mut self, event: EngineEvent) {
        let active = self.tabs.active_index();
        let Some((index, session)) = self.tabs.session_by_id_mut(event.session) else {
            tracing::trace!(session = %event.session, "Dropping event from released session");
            return;
        };

        match event.kind {
            EngineEventKind::UriChanged(uri) => {
                if uri.is_empty() || uri == BLANK_URI {
                    return;
                }
                session.observe_uri(&uri);
                if index == active {
                    self.url_field = uri.clone();
                }
                self.history.record(&uri);
            }
            EngineEventKind::TitleChanged(title) => {
                session.observe_title(&title);
                if index == active {
                    self.window_title = if title.is_empty() {
                        DEFAULT_WINDOW_TITLE.to_string()
                    } else {
                        title
                    };
                }
            }
            EngineEventKind::LoadFinished => {
                if self.dark_mode {
                    session.apply_dark_style();
                }
            }
        }
    }
}
