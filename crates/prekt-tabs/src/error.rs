//! Tab error types

use thiserror::Error;

use crate::identity::Identity;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab {tab} does not exist (valid tabs: 1-{count})", tab = .index + 1)]
    InvalidIndex { index: usize, count: usize },

    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    #[error("Tab {tab} is already {identity}", tab = .slot + 1)]
    AlreadyInState { slot: usize, identity: Identity },

    #[error("Engine error: {0}")]
    Engine(#[from] prekt_engine::EngineError),
}
