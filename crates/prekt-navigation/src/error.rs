//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Invalid URI: {0:?}")]
    InvalidUri(String),

    #[error("Unknown command: '{0}'. Type 'help' to see available commands.")]
    UnknownCommand(String),

    #[error("Empty command")]
    EmptyCommand,
}
