//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Engine error: {0}")]
    Engine(#[from] prekt_engine::EngineError),

    #[error("Tab error: {0}")]
    Tab(#[from] prekt_tabs::TabError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] prekt_navigation::NavigationError),

    #[error("Evaluation error: {0}")]
    Eval(#[from] prekt_calc::EvalError),

    #[error("Probe error: {0}")]
    Probe(#[from] prekt_probe::ProbeError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
