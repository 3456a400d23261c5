//! # Stockpile - an embeddable inventory engine
//!
//! Stockpile tracks owned quantities of catalog-defined item types for one
//! actor (a player, a container, a shop). Stackable items merge into a
//! single quantity-bearing entry; unique items get an independent entry per
//! instance. Results order deterministically for display, and full state
//! round-trips through an opaque encoded blob keyed by a stable per-actor
//! identifier.
//!
//! ## Core concepts
//!
//! - **Definition**: immutable description of an item type, registered in a
//!   [`Catalog`]
//! - **Entry**: a runtime holding record tied to one definition, stamped
//!   with catalog-issued ordering indices
//! - **Resolver**: a per-definition-type serialization strategy that
//!   round-trips entry state
//! - **Inventory**: the entry store - add, remove, query, sort, save, load
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use stockpile::{Catalog, Inventory, ItemDefinition, SortKey, SortOrder, SortSpec};
//!
//! let catalog = Arc::new(
//!     Catalog::new(vec![
//!         ItemDefinition::builder("potion", "Healing Potion")
//!             .category("Consumable")
//!             .build(),
//!         ItemDefinition::builder("sword", "Iron Sword")
//!             .category("Weapon")
//!             .unique(true)
//!             .build(),
//!     ])
//!     .unwrap(),
//! );
//!
//! let mut inventory = Inventory::new(Arc::clone(&catalog));
//! inventory.add_by_id("potion", 3);
//! inventory.add_by_id("sword", 1);
//!
//! let mut entries = inventory.get_all();
//! stockpile::sort_entries(
//!     &mut entries,
//!     &SortSpec::by(SortKey::Alphabetical, SortOrder::Ascending),
//! );
//! assert_eq!(entries[0].definition().display_name, "Healing Potion");
//!
//! let saved = inventory.save().unwrap();
//! let mut restored = Inventory::new(catalog);
//! restored.load(&saved).unwrap();
//! assert_eq!(restored.get_all().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod definition;
pub mod entry;
pub mod error;
pub mod events;
pub mod inventory;
pub mod resolver;
pub mod session;
pub mod sort;

// Re-export primary types at crate root for convenience
pub use catalog::Catalog;
pub use definition::{DefinitionId, ItemDefinition, ItemDefinitionBuilder};
pub use entry::{AsAny, EntryId, EntrySnapshot, EntryState, ItemEntry};
pub use error::{InventoryError, InventoryResult};
pub use events::InventoryEvents;
pub use inventory::{EntryQuery, Inventory};
pub use resolver::{DataResolver, EntryRecord, SaveEnvelope, StackResolver};
pub use session::{
    load_catalog, save_catalog, InventorySession, KeyValueStore, MemoryKeyValueStore, StartingItem,
    CATALOG_SAVE_KEY,
};
pub use sort::{sort_entries, CategoryOrder, SortKey, SortOrder, SortSpec};
