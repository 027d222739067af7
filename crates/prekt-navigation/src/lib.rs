//! PrekT Navigation
//!
//! - Navigation history shared by every tab, deduplicated on consecutive
//!   repeats and bounded in size
//! - Address input normalization and search URL building
//! - Console command parsing: `verb [argument]`

mod command;
mod error;
mod history;
mod input;

pub use command::Command;
pub use error::NavigationError;
pub use history::{HistoryEntry, NavigationHistory, DEFAULT_HISTORY_CAPACITY};
pub use input::{InputResolver, SearchEngine, DEFAULT_SCHEME, DEFAULT_WIKIPEDIA_HOST};

pub type Result<T> = std::result::Result<T, NavigationError>;
