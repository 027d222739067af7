//! Engine error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Rendering engine unavailable: {0}")]
    Unavailable(String),

    #[error("Proxy configuration rejected: {0}")]
    ProxyRejected(String),
}
