//! The item catalog: definition registry and ordering-index allocator.
//!
//! A [`Catalog`] maps stable identifiers to authored definitions and is the
//! sole source of the monotonic ordering index used to timestamp entry
//! creation and mutation. Definitions are authored content and are not part
//! of the persisted state; only the counter is saved, and forgetting to
//! persist it means entries created after a restart can receive indices
//! that collide with or predate restored ones.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::definition::{DefinitionId, ItemDefinition};
use crate::error::{InventoryError, InventoryResult};

/// Persisted form of the catalog: the counter, nothing else.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogSnapshot {
    id_index: u64,
}

/// Registry of item definitions plus the ordering-index allocator.
///
/// Built once from the authored definition list; shared behind `Arc` by
/// every store that consults it. The counter uses interior mutability so a
/// shared catalog can stamp indices without a lock.
#[derive(Debug)]
pub struct Catalog {
    definitions: HashMap<DefinitionId, Arc<ItemDefinition>>,
    categories: Vec<String>,
    id_index: AtomicU64,
}

impl Catalog {
    /// Builds a catalog from authored definitions.
    ///
    /// # Errors
    ///
    /// [`InventoryError::DuplicateDefinition`] if two definitions share an
    /// id; duplicate ids are a data-integrity defect in the authored
    /// content.
    pub fn new(definitions: impl IntoIterator<Item = ItemDefinition>) -> InventoryResult<Self> {
        let mut map = HashMap::new();
        for definition in definitions {
            let id = definition.id.clone();
            if map.insert(id.clone(), Arc::new(definition)).is_some() {
                return Err(InventoryError::DuplicateDefinition(id));
            }
        }

        Ok(Self {
            definitions: map,
            categories: vec!["Default".to_string()],
            id_index: AtomicU64::new(0),
        })
    }

    /// Replaces the authored category list.
    #[must_use]
    pub fn with_categories<S: Into<String>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Looks up a definition by id. No side effects.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<ItemDefinition>> {
        self.definitions.get(id)
    }

    /// The authored category list, consumed by UI collaborators for
    /// filtering and custom sort configuration.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Number of registered definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if no definitions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Hands out the next ordering index: returns the current counter value
    /// and increments it, so two calls never yield the same value. Call
    /// once per timestamp needed.
    pub fn next_index(&self) -> u64 {
        self.id_index.fetch_add(1, Ordering::Relaxed)
    }

    /// Encodes the counter as an opaque blob. Definitions are authored
    /// content and are not included.
    pub fn save(&self) -> InventoryResult<String> {
        let snapshot = CatalogSnapshot {
            id_index: self.id_index.load(Ordering::Relaxed),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Restores the counter from a blob produced by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// [`InventoryError::Decode`] on malformed input; the counter is left
    /// untouched in that case.
    pub fn load(&self, raw: &str) -> InventoryResult<()> {
        let snapshot: CatalogSnapshot = serde_json::from_str(raw)?;
        self.id_index.store(snapshot.id_index, Ordering::Relaxed);
        log::debug!("catalog counter restored to {}", snapshot.id_index);
        Ok(())
    }
}
