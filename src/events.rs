//! Synchronous change notifications for inventory mutations.
//!
//! Three channels fire on store mutations: added, removed, and changed.
//! Delivery is synchronous and reentrant-unsafe: a listener must not mutate
//! the store that fired it. Payloads are [`EntrySnapshot`]s, so removal
//! listeners still see the entry's last state.

use std::fmt;

use crate::entry::EntrySnapshot;

type Listener = Box<dyn Fn(&EntrySnapshot) + Send + Sync>;

/// Listener registry for one inventory store.
#[derive(Default)]
pub struct InventoryEvents {
    added: Vec<Listener>,
    removed: Vec<Listener>,
    changed: Vec<Listener>,
}

impl InventoryEvents {
    /// Registers a listener fired after an entry is added or a stack grows.
    pub fn on_added(&mut self, listener: impl Fn(&EntrySnapshot) + Send + Sync + 'static) {
        self.added.push(Box::new(listener));
    }

    /// Registers a listener fired after a removal, with the entry's state
    /// before deletion.
    pub fn on_removed(&mut self, listener: impl Fn(&EntrySnapshot) + Send + Sync + 'static) {
        self.removed.push(Box::new(listener));
    }

    /// Registers a listener fired after any add or remove.
    pub fn on_changed(&mut self, listener: impl Fn(&EntrySnapshot) + Send + Sync + 'static) {
        self.changed.push(Box::new(listener));
    }

    pub(crate) fn emit_added(&self, snapshot: &EntrySnapshot) {
        for listener in &self.added {
            listener(snapshot);
        }
    }

    pub(crate) fn emit_removed(&self, snapshot: &EntrySnapshot) {
        for listener in &self.removed {
            listener(snapshot);
        }
    }

    pub(crate) fn emit_changed(&self, snapshot: &EntrySnapshot) {
        for listener in &self.changed {
            listener(snapshot);
        }
    }
}

impl fmt::Debug for InventoryEvents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InventoryEvents")
            .field("added", &self.added.len())
            .field("removed", &self.removed.len())
            .field("changed", &self.changed.len())
            .finish()
    }
}
