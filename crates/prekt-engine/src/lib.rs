//! PrekT Rendering Engine Interface
//!
//! The page-rendering/network engine is an external collaborator. The shell
//! only sees it through [`RenderingEngine`] (an owned, opaque handle) and the
//! three notifications it emits: URI changed, title changed, load finished.
//!
//! [`HeadlessEngine`] is an in-process backend with no network or painting,
//! used by the shell binary and by tests.

mod engine;
mod error;
mod headless;

pub use engine::{
    EngineBackend, EngineEvent, EngineEventKind, EngineSettings, EventSink, ProxyMode,
    RenderingEngine, SessionId,
};
pub use error::EngineError;
pub use headless::{EngineRecord, HeadlessBackend, HeadlessEngine};

pub type Result<T> = std::result::Result<T, EngineError>;

/// Marker URI an engine reports before anything has been loaded.
pub const BLANK_URI: &str = "about:blank";
