//! PrekT Core
//!
//! Coordination layer for the shell: configuration, the browser state
//! container and the command console. All of it lives on one task; the only
//! work that leaves that task is network probing.

mod browser;
mod config;
mod console;
mod error;

pub use browser::{Browser, DEFAULT_WINDOW_TITLE};
pub use config::{Config, CONFIG_ENV_VAR, DEFAULT_TAB_COUNT};
pub use console::{Console, Flow, ProbeCompletion, Transcript, TranscriptDelta, PROMPT};
pub use error::CoreError;

// Re-export core components
pub use prekt_calc::{evaluate, evaluate_to_string, EvalError, Evaluator};
pub use prekt_engine::{
    EngineBackend, EngineError, EngineEvent, EngineEventKind, HeadlessBackend, SessionId,
};
pub use prekt_navigation::{Command, HistoryEntry, InputResolver, NavigationError, NavigationHistory};
pub use prekt_probe::{HostReport, HostResolver, NetworkProbe, ProbeError, SystemResolver};
pub use prekt_tabs::{Identity, RenderingSession, TabError, TabManager};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging. Output goes to stderr; stdout carries the transcript.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
