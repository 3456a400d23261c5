//! Item entries: the runtime records of held items.
//!
//! An [`ItemEntry`] ties a quantity (or a single unique instance) to one
//! [`ItemDefinition`], carries its own stable id, and is stamped with
//! catalog-issued ordering indices on creation and on every mutation.
//! Definition-specific runtime state (durability, level, ...) hangs off the
//! entry as an [`EntryState`] object supplied by the definition's resolver.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::definition::ItemDefinition;

/// Unique identifier of one entry within one inventory store.
///
/// Generated on entry creation and preserved across save/load, so external
/// references to an entry stay valid between sessions.
///
/// # Examples
///
/// ```
/// use stockpile::EntryId;
///
/// let a = EntryId::new();
/// let b = EntryId::new();
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Creates a new random entry id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an entry id from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Upcast helper so trait objects can be downcast through [`Any`].
pub trait AsAny: Any {
    /// Returns `self` as a [`Any`] reference.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as a mutable [`Any`] reference.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Definition-specific runtime state attached to an entry.
///
/// Implement this on a plain struct and return it from
/// [`DataResolver::new_state`](crate::resolver::DataResolver::new_state) to
/// give every entry of a definition type its own mutable extra fields. Use
/// [`ItemEntry::state`]/[`ItemEntry::state_mut`] to reach it as the concrete
/// type.
pub trait EntryState: AsAny + fmt::Debug + Send + Sync {}

/// A runtime record of a held item.
///
/// Entries are manufactured through [`ItemEntry::create`] (fresh) or
/// [`ItemEntry::restore`] (from decoded save data) and mutated only through
/// the owning store, which keeps the `updated_at` index in sync.
#[derive(Debug)]
pub struct ItemEntry {
    id: EntryId,
    definition: Arc<ItemDefinition>,
    quantity: u32,
    created_at: u64,
    updated_at: u64,
    state: Option<Box<dyn EntryState>>,
}

impl ItemEntry {
    /// Manufactures a fresh entry for a definition, stamping both ordering
    /// indices from the catalog and attaching resolver-supplied state.
    ///
    /// Unique definitions always produce a quantity-1 entry; stackable
    /// quantities are floored at 1.
    #[must_use]
    pub fn create(definition: Arc<ItemDefinition>, catalog: &Catalog, quantity: u32) -> Self {
        let quantity = if definition.unique { 1 } else { quantity.max(1) };
        let state = definition.resolver.new_state();
        Self {
            id: EntryId::new(),
            definition,
            quantity,
            created_at: catalog.next_index(),
            updated_at: catalog.next_index(),
            state,
        }
    }

    /// Rebuilds an entry from decoded save data.
    ///
    /// The id, quantity, and both ordering indices are restored exactly; no
    /// catalog indices are consumed. Resolver-supplied state is attached
    /// fresh so the resolver's load hook can populate it.
    #[must_use]
    pub fn restore(
        definition: Arc<ItemDefinition>,
        quantity: u32,
        id: EntryId,
        created_at: u64,
        updated_at: u64,
    ) -> Self {
        let state = definition.resolver.new_state();
        Self {
            id,
            definition,
            quantity,
            created_at,
            updated_at,
            state,
        }
    }

    /// The entry's stable id.
    #[must_use]
    pub const fn id(&self) -> EntryId {
        self.id
    }

    /// The definition this entry was created from.
    #[must_use]
    pub const fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    /// Held quantity. Always 1 for unique entries.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Ordering index assigned once at creation.
    #[must_use]
    pub const fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Ordering index reassigned on every mutation.
    #[must_use]
    pub const fn updated_at(&self) -> u64 {
        self.updated_at
    }

    /// Returns the resolver-supplied state as the concrete type `T`.
    #[must_use]
    pub fn state<T: EntryState>(&self) -> Option<&T> {
        // as_deref reaches the trait object itself; calling as_any on the
        // box would downcast against the box's type.
        self.state.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Mutable access to the resolver-supplied state.
    ///
    /// After changing custom state, call [`touch`](Self::touch) so the
    /// entry's `updated_at` index reflects the mutation.
    pub fn state_mut<T: EntryState>(&mut self) -> Option<&mut T> {
        self.state.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    /// Re-stamps `updated_at` with a fresh catalog index.
    pub fn touch(&mut self, catalog: &Catalog) {
        self.updated_at = catalog.next_index();
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32, catalog: &Catalog) {
        self.quantity = quantity;
        self.touch(catalog);
    }

    /// An owned copy of the entry's base fields, used as the notification
    /// payload.
    #[must_use]
    pub fn snapshot(&self) -> EntrySnapshot {
        EntrySnapshot {
            id: self.id,
            definition: Arc::clone(&self.definition),
            quantity: self.quantity,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Owned copy of an entry's base fields.
///
/// Handed to notification listeners so observers see the entry's state at
/// the moment of the mutation, including the state just before a deletion.
#[derive(Debug, Clone)]
pub struct EntrySnapshot {
    /// The entry's stable id.
    pub id: EntryId,
    /// The definition the entry was created from.
    pub definition: Arc<ItemDefinition>,
    /// Quantity at the time of the snapshot.
    pub quantity: u32,
    /// Ordering index assigned at creation.
    pub created_at: u64,
    /// Ordering index of the most recent mutation.
    pub updated_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ItemDefinition;

    fn catalog() -> Catalog {
        Catalog::new(Vec::new()).unwrap()
    }

    fn potion() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::builder("potion", "Potion").build())
    }

    fn relic() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::builder("relic", "Relic").unique(true).build())
    }

    #[test]
    fn test_entry_id_uniqueness() {
        let a = EntryId::new();
        let b = EntryId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_entry_id_display_roundtrip() {
        let id = EntryId::new();
        let display = id.to_string();
        let parsed = EntryId::from_uuid(display.parse().unwrap());
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_create_stamps_increasing_indices() {
        let catalog = catalog();
        let entry = ItemEntry::create(potion(), &catalog, 3);
        assert_eq!(entry.quantity(), 3);
        assert!(entry.updated_at() > entry.created_at());
    }

    #[test]
    fn test_create_floors_quantity() {
        let catalog = catalog();
        let entry = ItemEntry::create(potion(), &catalog, 0);
        assert_eq!(entry.quantity(), 1);
    }

    #[test]
    fn test_unique_entries_are_singletons() {
        let catalog = catalog();
        let entry = ItemEntry::create(relic(), &catalog, 99);
        assert_eq!(entry.quantity(), 1);
    }

    #[test]
    fn test_restore_preserves_fields_exactly() {
        let catalog = catalog();
        let id = EntryId::new();
        let entry = ItemEntry::restore(potion(), 7, id, 40, 42);
        assert_eq!(entry.id(), id);
        assert_eq!(entry.quantity(), 7);
        assert_eq!(entry.created_at(), 40);
        assert_eq!(entry.updated_at(), 42);
        // Restoring consumes no catalog indices.
        assert_eq!(catalog.next_index(), 0);
    }

    #[test]
    fn test_touch_bumps_updated_at_only() {
        let catalog = catalog();
        let mut entry = ItemEntry::create(potion(), &catalog, 1);
        let created = entry.created_at();
        let updated = entry.updated_at();
        entry.touch(&catalog);
        assert_eq!(entry.created_at(), created);
        assert!(entry.updated_at() > updated);
    }

    #[test]
    fn test_snapshot_copies_base_fields() {
        let catalog = catalog();
        let entry = ItemEntry::create(potion(), &catalog, 5);
        let snapshot = entry.snapshot();
        assert_eq!(snapshot.id, entry.id());
        assert_eq!(snapshot.quantity, 5);
        assert_eq!(snapshot.definition.id, entry.definition().id);
    }
}
