//! PrekT Tab Management
//!
//! A fixed number of tab slots, each always holding exactly one live
//! rendering session. A slot's network identity (direct or anonymized) is
//! changed only by rebuilding its session through the [`SessionFactory`].

mod error;
mod factory;
mod identity;
mod manager;
mod session;

pub use error::TabError;
pub use factory::{AnonymityProfile, FactoryWarning, SessionBuild, SessionFactory};
pub use identity::Identity;
pub use manager::{SwapOutcome, TabChanged, TabManager, TabSlot};
pub use session::RenderingSession;

pub type Result<T> = std::result::Result<T, TabError>;
