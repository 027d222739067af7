//! Tab Manager
//!
//! Owns a fixed set of slots. Every slot holds exactly one live session from
//! construction until the manager is dropped; swapping identity replaces the
//! session in place and releases the old one.

use prekt_engine::{SessionId, BLANK_URI};
use serde::Serialize;
use std::mem;

use crate::error::TabError;
use crate::factory::{FactoryWarning, SessionFactory};
use crate::identity::Identity;
use crate::session::RenderingSession;
use crate::Result;

#[derive(Debug)]
pub struct TabSlot {
    index: usize,
    session: RenderingSession,
}

impl TabSlot {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn session(&self) -> &RenderingSession {
        &self.session
    }
}

/// Emitted when the active slot changes, so the URL field and window title
/// can resync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabChanged {
    pub index: usize,
    pub uri: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapOutcome {
    pub slot: usize,
    pub identity: Identity,
    pub loaded_uri: String,
    pub warning: Option<FactoryWarning>,
}

pub struct TabManager {
    slots: Vec<TabSlot>,
    active: usize,
    factory: SessionFactory,
    home_uri: String,
}

impl TabManager {
    /// Build `slot_count` direct sessions, each showing the home page
    pub fn new(factory: SessionFactory, slot_count: usize, home_uri: String) -> Result<Self> {
        if slot_count == 0 {
            return Err(TabError::InvalidIndex { index: 0, count: 0 });
        }

        let mut slots = Vec::with_capacity(slot_count);
        for index in 0..slot_count {
            let mut session = factory.create(Identity::Direct)?.session;
            session.load(&home_uri);
            slots.push(TabSlot { index, session });
        }

        tracing::info!(slots = slot_count, home = %home_uri, "Tab manager ready");

        Ok(Self {
            slots,
            active: 0,
            factory,
            home_uri,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn home_uri(&self) -> &str {
        &self.home_uri
    }

    pub fn slots(&self) -> &[TabSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Result<&TabSlot> {
        self.slots.get(index).ok_or(TabError::InvalidIndex {
            index,
            count: self.slots.len(),
        })
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut TabSlot> {
        let count = self.slots.len();
        self.slots
            .get_mut(index)
            .ok_or(TabError::InvalidIndex { index, count })
    }

    /// Make `index` the active slot
    pub fn select(&mut self, index: usize) -> Result<TabChanged> {
        let slot = self.slot(index)?;
        let changed = TabChanged {
            index,
            uri: slot.session.last_known_uri().to_string(),
            title: slot.session.title().to_string(),
        };

        self.active = index;
        tracing::debug!(slot = index, uri = %changed.uri, "Tab selected");

        Ok(changed)
    }

    /// The active slot's session
    pub fn current(&self) -> &RenderingSession {
        &self.slots[self.active].session
    }

    pub fn current_mut(&mut self) -> &mut RenderingSession {
        &mut self.slots[self.active].session
    }

    /// Rebuild the session in `index` with `target` identity.
    ///
    /// The page the slot was showing is reloaded in the new session. If the
    /// factory fails the slot keeps its old session.
    pub fn swap_identity(&mut self, index: usize, target: Identity) -> Result<SwapOutcome> {
        let current = self.slot(index)?.session.identity();
        if !current.can_transition_to(target) {
            return Err(TabError::AlreadyInState {
                slot: index,
                identity: target,
            });
        }

        let captured = self.slot(index)?.session.last_known_uri().to_string();
        let build = self.factory.create(target)?;

        let resume = if captured.is_empty() || captured == BLANK_URI {
            self.home_uri.clone()
        } else {
            captured
        };

        let slot = self.slot_mut(index)?;
        let old = mem::replace(&mut slot.session, build.session);
        old.release();
        slot.session.load(&resume);

        tracing::info!(
            slot = index,
            from = %current,
            to = %target,
            uri = %resume,
            "Swapped tab identity"
        );

        Ok(SwapOutcome {
            slot: index,
            identity: target,
            loaded_uri: resume,
            warning: build.warning,
        })
    }

    pub fn navigate(&mut self, index: usize, uri: &str) -> Result<()> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(TabError::InvalidUri(uri.to_string()));
        }

        self.slot_mut(index)?.session.load(uri);
        tracing::debug!(slot = index, uri = %uri, "Navigating");
        Ok(())
    }

    /// Derived on demand from the slots, never stored
    pub fn any_anonymized(&self) -> bool {
        self.slots.iter().any(|s| s.session.identity().is_anonymized())
    }

    pub fn anonymized_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .filter(|s| s.session.identity().is_anonymized())
            .map(|s| s.index)
            .collect()
    }

    /// Look up the live session an engine notification belongs to
    pub fn session_by_id_mut(&mut self, id: SessionId) -> Option<(usize, &mut RenderingSession)> {
        self.slots
            .iter_mut()
            .find(|s| s.session.id() == id)
            .map(|s| (s.index, &mut s.session))
    }
}
