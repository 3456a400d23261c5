//! Persistence glue: the key/value collaborator boundary and a per-actor
//! session wrapper.
//!
//! The engine never touches durable storage itself; it hands opaque blobs
//! to whatever implements [`KeyValueStore`]. [`InventorySession`] wires one
//! actor's inventory to that store: restored state always wins over
//! re-seeding the starting items.

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::definition::DefinitionId;
use crate::error::InventoryResult;
use crate::inventory::Inventory;

/// Key under which the catalog counter blob is stashed.
pub const CATALOG_SAVE_KEY: &str = "item_catalog";

/// The persistent key/value collaborator.
///
/// The engine only needs get and set; where and how the values are durably
/// stored is the implementation's business.
pub trait KeyValueStore {
    /// The blob stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous blob.
    fn set(&mut self, key: &str, value: String);
}

/// In-memory [`KeyValueStore`], for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    values: HashMap<String, String>,
}

impl MemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }
}

/// One starting item/quantity pair for seeding a fresh inventory.
#[derive(Debug, Clone)]
pub struct StartingItem {
    /// Definition to add.
    pub definition_id: DefinitionId,
    /// How many to add.
    pub quantity: u32,
}

impl StartingItem {
    /// Creates a starting item pair.
    #[must_use]
    pub fn new(definition_id: impl Into<DefinitionId>, quantity: u32) -> Self {
        Self {
            definition_id: definition_id.into(),
            quantity,
        }
    }
}

/// One actor's inventory bound to its stable persistence key.
#[derive(Debug)]
pub struct InventorySession {
    id: String,
    inventory: Inventory,
}

impl InventorySession {
    /// Opens the inventory for an actor id.
    ///
    /// If a blob exists under the id, it is loaded and the starting items
    /// are ignored; otherwise the starting list is seeded in order through
    /// the normal add path (unknown starting ids are skipped, like any
    /// unknown-definition add).
    ///
    /// # Errors
    ///
    /// Propagates load failures from an existing blob; the session is not
    /// created in that case.
    pub fn open(
        id: impl Into<String>,
        starting_items: &[StartingItem],
        catalog: Arc<Catalog>,
        store: &dyn KeyValueStore,
    ) -> InventoryResult<Self> {
        let id = id.into();
        let mut inventory = Inventory::new(catalog);

        if let Some(saved) = store.get(&id) {
            inventory.load(&saved)?;
            log::debug!("session {id}: restored from save");
        } else {
            for item in starting_items {
                inventory.add_by_id(item.definition_id.as_str(), item.quantity);
            }
            log::debug!("session {id}: seeded {} starting items", starting_items.len());
        }

        Ok(Self { id, inventory })
    }

    /// The actor's stable persistence key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The wrapped inventory.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Mutable access to the wrapped inventory.
    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Writes the current inventory blob back under the actor id.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> InventoryResult<()> {
        let blob = self.inventory.save()?;
        store.set(&self.id, blob);
        Ok(())
    }
}

/// Stashes the catalog counter under [`CATALOG_SAVE_KEY`].
pub fn save_catalog(catalog: &Catalog, store: &mut dyn KeyValueStore) -> InventoryResult<()> {
    let blob = catalog.save()?;
    store.set(CATALOG_SAVE_KEY, blob);
    Ok(())
}

/// Restores the catalog counter from [`CATALOG_SAVE_KEY`], a no-op when no
/// blob has been stored yet.
pub fn load_catalog(catalog: &Catalog, store: &dyn KeyValueStore) -> InventoryResult<()> {
    if let Some(blob) = store.get(CATALOG_SAVE_KEY) {
        catalog.load(&blob)?;
    }
    Ok(())
}
