//! The inventory store: add, remove, query, save, and load item entries.
//!
//! A store holds one actor's entries on top of an explicit catalog
//! reference. Stackable definitions own at most one entry each and merge on
//! add; unique definitions get a brand-new entry per add. Three structures
//! are kept in lockstep by every mutation: the entry table (owner of all
//! entries, insertion-ordered), the stackable index, and the unique list.
//!
//! All operations are synchronous and run to completion; the store does no
//! internal locking, and one logical owner must drive it at a time.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::catalog::Catalog;
use crate::definition::{DefinitionId, ItemDefinition};
use crate::entry::{EntryId, EntryState, ItemEntry};
use crate::error::{InventoryError, InventoryResult};
use crate::events::InventoryEvents;
use crate::resolver::{DataResolver, EntryRecord, SaveEnvelope};

/// Filter for [`Inventory::query`].
///
/// Entries must match every requested criterion: category string equality,
/// and/or the concrete resolver type of the owning definition (the stand-in
/// for a definition "type" now that definitions are data plus a strategy
/// object).
#[derive(Debug, Clone, Default)]
pub struct EntryQuery {
    category: Option<String>,
    definition_type: Option<TypeId>,
}

impl EntryQuery {
    /// An empty query matching every entry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only entries whose definition has this category.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Keeps only entries whose definition carries a resolver of type `R`.
    #[must_use]
    pub fn definition_type<R: DataResolver>(mut self) -> Self {
        self.definition_type = Some(TypeId::of::<R>());
        self
    }

    fn matches(&self, entry: &ItemEntry) -> bool {
        if let Some(category) = &self.category {
            if entry.definition().category != *category {
                return false;
            }
        }
        if let Some(type_id) = self.definition_type {
            // as_ref reaches the trait object; the Arc itself would report
            // its own type id.
            if entry.definition().resolver.as_ref().as_any().type_id() != type_id {
                return false;
            }
        }
        true
    }
}

/// One actor's item holdings.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use stockpile::{Catalog, Inventory, ItemDefinition};
///
/// let catalog = Arc::new(
///     Catalog::new(vec![ItemDefinition::builder("potion", "Potion").build()]).unwrap(),
/// );
/// let mut inventory = Inventory::new(Arc::clone(&catalog));
///
/// inventory.add_by_id("potion", 3);
/// inventory.add_by_id("potion", 2);
///
/// let entry = inventory.get_by_id("potion").unwrap();
/// assert_eq!(entry.quantity(), 5);
/// ```
#[derive(Debug)]
pub struct Inventory {
    catalog: Arc<Catalog>,
    entries: IndexMap<EntryId, ItemEntry>,
    stacks: HashMap<DefinitionId, EntryId>,
    unique: Vec<EntryId>,
    events: InventoryEvents,
}

impl Inventory {
    /// Creates an empty store backed by the given catalog.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            entries: IndexMap::new(),
            stacks: HashMap::new(),
            unique: Vec::new(),
            events: InventoryEvents::default(),
        }
    }

    /// The catalog this store resolves definitions against.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// The notification channels. Use [`events_mut`](Self::events_mut) to
    /// subscribe.
    #[must_use]
    pub fn events(&self) -> &InventoryEvents {
        &self.events
    }

    /// Mutable access to the notification channels for subscribing.
    pub fn events_mut(&mut self) -> &mut InventoryEvents {
        &mut self.events
    }

    /// Number of live entries (stacks count once, however large).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry for a definition: the stack for stackables, or the first
    /// live unique entry (linear scan; unique populations are expected to
    /// stay small).
    #[must_use]
    pub fn get(&self, definition: &ItemDefinition) -> Option<&ItemEntry> {
        if let Some(entry_id) = self.stacks.get(definition.id.as_str()) {
            return self.entries.get(entry_id);
        }

        self.unique
            .iter()
            .filter_map(|id| self.entries.get(id))
            .find(|entry| entry.definition().id == definition.id)
    }

    /// [`get`](Self::get) by definition id; unknown ids miss.
    #[must_use]
    pub fn get_by_id(&self, definition_id: &str) -> Option<&ItemEntry> {
        let definition = self.catalog.get(definition_id)?;
        self.get(definition)
    }

    /// The entry with this id, whatever its kind. O(1).
    #[must_use]
    pub fn get_entry(&self, entry_id: &EntryId) -> Option<&ItemEntry> {
        self.entries.get(entry_id)
    }

    /// Mutable access to an entry, for editing resolver-supplied state.
    ///
    /// Quantity is not mutable this way; it moves only through
    /// [`add`](Self::add)/[`remove`](Self::remove). After changing custom
    /// state, call [`ItemEntry::touch`] so `updated_at` reflects the
    /// mutation.
    pub fn get_entry_mut(&mut self, entry_id: &EntryId) -> Option<&mut ItemEntry> {
        self.entries.get_mut(entry_id)
    }

    /// Returns true if a live entry for the definition holds at least
    /// `quantity`. Unique entries are quantity-1 singletons.
    #[must_use]
    pub fn has(&self, definition: &ItemDefinition, quantity: u32) -> bool {
        self.get(definition)
            .is_some_and(|entry| entry.quantity() >= quantity)
    }

    /// [`has`](Self::has) by definition id; unknown ids are simply absent.
    #[must_use]
    pub fn has_by_id(&self, definition_id: &str, quantity: u32) -> bool {
        self.catalog
            .get(definition_id)
            .is_some_and(|definition| self.has(definition, quantity))
    }

    /// Returns true if the entry id is live and satisfies the quantity
    /// check. Stackables forward to the stack's quantity; unique entries
    /// are present-or-not.
    #[must_use]
    pub fn has_entry(&self, entry_id: &EntryId, quantity: u32) -> bool {
        let Some(entry) = self.entries.get(entry_id) else {
            return false;
        };
        if entry.definition().unique {
            return true;
        }
        self.has(entry.definition(), quantity)
    }

    /// Adds `quantity` of a definition.
    ///
    /// Unique definitions always get a brand-new quantity-1 entry, never a
    /// merge. Stackables merge into the existing stack (bumping its
    /// `updated_at`) or open a new one. Fires added and changed on every
    /// successful call. `quantity == 0` is a tolerant no-op returning
    /// `None`.
    pub fn add(&mut self, definition: &Arc<ItemDefinition>, quantity: u32) -> Option<&ItemEntry> {
        if quantity == 0 {
            return None;
        }

        let entry_id = if definition.unique {
            let entry = ItemEntry::create(Arc::clone(definition), &self.catalog, 1);
            let entry_id = entry.id();
            self.insert_entry(entry)?;
            entry_id
        } else if let Some(&existing) = self.stacks.get(definition.id.as_str()) {
            let entry = self.entries.get_mut(&existing)?;
            let merged = entry.quantity().saturating_add(quantity);
            entry.set_quantity(merged, &self.catalog);
            existing
        } else {
            let entry = ItemEntry::create(Arc::clone(definition), &self.catalog, quantity);
            let entry_id = entry.id();
            self.insert_entry(entry)?;
            entry_id
        };

        log::trace!("added {}x {}", quantity, definition.id.as_str());
        let snapshot = self.entries.get(&entry_id)?.snapshot();
        self.events.emit_added(&snapshot);
        self.events.emit_changed(&snapshot);
        self.entries.get(&entry_id)
    }

    /// [`add`](Self::add) by definition id. An unknown id is a tolerant
    /// no-op returning `None`, mirroring the null-definition convenience.
    pub fn add_by_id(&mut self, definition_id: &str, quantity: u32) -> Option<&ItemEntry> {
        let Some(definition) = self.catalog.get(definition_id).cloned() else {
            log::warn!("add_by_id: unknown definition {definition_id}");
            return None;
        };
        self.add(&definition, quantity)
    }

    /// Inserts an externally-constructed entry (a transfer from another
    /// store, or a starting-item template).
    ///
    /// Unique entries and stackables without an existing stack are inserted
    /// as-is with a fresh `updated_at` stamp. When a stack for the
    /// definition already exists, merge semantics win: the entry is folded
    /// into [`add`](Self::add) and its identity is dropped, so a transfer
    /// never produces two stacks. A colliding entry id is a tolerant no-op
    /// returning `None`.
    pub fn add_entry(&mut self, mut entry: ItemEntry) -> Option<&ItemEntry> {
        let definition = Arc::clone(entry.definition());
        if definition.unique || !self.stacks.contains_key(definition.id.as_str()) {
            entry.touch(&self.catalog);
            let entry_id = self.insert_entry(entry)?;
            return self.entries.get(&entry_id);
        }

        let quantity = entry.quantity();
        self.add(&definition, quantity)
    }

    /// Removes `quantity` from a stackable definition's stack; the entry is
    /// deleted when its quantity reaches zero. Fires removed and changed
    /// with the entry's state before deletion.
    ///
    /// # Errors
    ///
    /// [`InventoryError::RemoveUniqueByDefinition`] for unique definitions
    /// (ambiguous among their entries; use
    /// [`remove_entry`](Self::remove_entry));
    /// [`InventoryError::StackNotFound`] when no stack is held.
    pub fn remove(&mut self, definition: &ItemDefinition, quantity: u32) -> InventoryResult<()> {
        if definition.unique {
            return Err(InventoryError::RemoveUniqueByDefinition(
                definition.id.clone(),
            ));
        }

        let entry_id = *self
            .stacks
            .get(definition.id.as_str())
            .ok_or_else(|| InventoryError::StackNotFound(definition.id.clone()))?;
        let Some(entry) = self.entries.get_mut(&entry_id) else {
            return Err(InventoryError::EntryNotFound(entry_id));
        };

        let remaining = entry.quantity().saturating_sub(quantity);
        entry.set_quantity(remaining, &self.catalog);
        let snapshot = entry.snapshot();

        if remaining == 0 {
            self.stacks.remove(definition.id.as_str());
            self.entries.shift_remove(&entry_id);
            log::trace!("stack {} deleted", definition.id);
        }

        self.events.emit_removed(&snapshot);
        self.events.emit_changed(&snapshot);
        Ok(())
    }

    /// [`remove`](Self::remove) by definition id. An unknown id is a
    /// tolerant no-op.
    pub fn remove_by_id(&mut self, definition_id: &str, quantity: u32) -> InventoryResult<()> {
        let Some(definition) = self.catalog.get(definition_id).cloned() else {
            return Ok(());
        };
        self.remove(&definition, quantity)
    }

    /// Removes an entry by id. Stackables delegate to
    /// [`remove`](Self::remove) with the given quantity; unique entries
    /// ignore `quantity` (they are singletons) and are deleted outright,
    /// with the same notification contract.
    ///
    /// # Errors
    ///
    /// [`InventoryError::EntryNotFound`] if the id is not live.
    pub fn remove_entry(&mut self, entry_id: &EntryId, quantity: u32) -> InventoryResult<()> {
        let Some(entry) = self.entries.get(entry_id) else {
            return Err(InventoryError::EntryNotFound(*entry_id));
        };

        if !entry.definition().unique {
            let definition = Arc::clone(entry.definition());
            return self.remove(&definition, quantity);
        }

        let snapshot = entry.snapshot();
        self.unique.retain(|id| id != entry_id);
        self.entries.shift_remove(entry_id);
        self.events.emit_removed(&snapshot);
        self.events.emit_changed(&snapshot);
        Ok(())
    }

    /// Snapshot list of all live entries: unique entries first, then
    /// stacks, each in insertion order.
    #[must_use]
    pub fn get_all(&self) -> Vec<&ItemEntry> {
        let mut all: Vec<&ItemEntry> = self
            .unique
            .iter()
            .filter_map(|id| self.entries.get(id))
            .collect();
        all.extend(self.entries.values().filter(|e| !e.definition().unique));
        all
    }

    /// [`get_all`](Self::get_all) filtered by an [`EntryQuery`].
    #[must_use]
    pub fn query(&self, query: &EntryQuery) -> Vec<&ItemEntry> {
        self.get_all()
            .into_iter()
            .filter(|entry| query.matches(entry))
            .collect()
    }

    /// The narrower typed view: entries whose state is a `T`.
    #[must_use]
    pub fn entries_with_state<T: EntryState>(&self) -> Vec<&ItemEntry> {
        self.get_all()
            .into_iter()
            .filter(|entry| entry.state::<T>().is_some())
            .collect()
    }

    /// Encodes every live entry through its own definition's resolver and
    /// wraps the ordered records in the save envelope.
    pub fn save(&self) -> InventoryResult<String> {
        let mut items = Vec::with_capacity(self.entries.len());
        for entry in self.get_all() {
            items.push(entry.definition().resolver.save(entry)?);
        }
        SaveEnvelope { items }.encode()
    }

    /// Decodes an envelope produced by [`save`](Self::save) and inserts the
    /// restored entries directly, bypassing merge and stamping so ids,
    /// quantities, and indices come back exactly.
    ///
    /// Each record is decoded twice: a generic pass recovers the owning
    /// definition id, then that definition's resolver does the full decode.
    ///
    /// # Errors
    ///
    /// [`InventoryError::Decode`] on malformed input,
    /// [`InventoryError::UnknownDefinition`] when a record references a
    /// definition the catalog no longer has, and
    /// [`InventoryError::DuplicateEntry`] on colliding records. A failed
    /// load is not rolled back; treat the store as indeterminate and
    /// discard it.
    pub fn load(&mut self, raw: &str) -> InventoryResult<()> {
        let envelope = SaveEnvelope::decode(raw)?;
        let count = envelope.items.len();

        for item in &envelope.items {
            let record = EntryRecord::decode(item)?;
            let definition = self
                .catalog
                .get(record.definition_id.as_str())
                .cloned()
                .ok_or_else(|| InventoryError::UnknownDefinition(record.definition_id.clone()))?;

            let entry = definition.resolver.load(item, &self.catalog)?;
            if self.entries.contains_key(&entry.id())
                || (!definition.unique && self.stacks.contains_key(definition.id.as_str()))
            {
                return Err(InventoryError::DuplicateEntry(entry.id()));
            }
            self.insert_entry(entry);
        }

        log::debug!("restored {count} entries");
        Ok(())
    }

    /// Indexes an entry in the structure matching its kind plus the id
    /// table, keeping them in lockstep. `None` when the id or stack slot is
    /// already taken.
    fn insert_entry(&mut self, entry: ItemEntry) -> Option<EntryId> {
        let entry_id = entry.id();
        if self.entries.contains_key(&entry_id) {
            log::warn!("entry id collision, insert skipped: {entry_id}");
            return None;
        }

        if entry.definition().unique {
            self.unique.push(entry_id);
        } else {
            let definition_id = entry.definition().id.clone();
            if self.stacks.contains_key(definition_id.as_str()) {
                log::warn!("stack slot already taken, insert skipped: {definition_id}");
                return None;
            }
            self.stacks.insert(definition_id, entry_id);
        }

        self.entries.insert(entry_id, entry);
        Some(entry_id)
    }
}
