//! Per-definition serialization strategies and the save codec.
//!
//! Every definition carries a [`DataResolver`] strategy object. The provided
//! [`save`](DataResolver::save)/[`load`](DataResolver::load) drivers encode
//! and decode the universal entry fields through [`EntryRecord`] and hand
//! type-specific extras to the overridable `on_save`/`on_load` hooks.
//!
//! Decoding is a two-pass affair: a generic [`EntryRecord::decode`] pass
//! recovers the owning definition id (tolerating extra fields it does not
//! understand), then the definition's concrete resolver performs the full
//! decode. The format is self-describing only up to the definition id, so
//! the first pass is what locates the right strategy for the second.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::catalog::Catalog;
use crate::definition::DefinitionId;
use crate::entry::{AsAny, EntryId, EntryState, ItemEntry};
use crate::error::{InventoryError, InventoryResult};

/// Wire schema of one encoded entry.
///
/// The universal fields are fixed; resolver-specific extras travel in a
/// flattened map, so a generic decode never fails on fields it does not
/// understand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Id of the owning definition.
    pub definition_id: DefinitionId,
    /// The entry's stable id.
    pub entry_id: EntryId,
    /// Held quantity at save time.
    pub quantity: u32,
    /// Ordering index assigned at creation.
    pub created_at: u64,
    /// Ordering index of the most recent mutation.
    pub updated_at: u64,
    /// Resolver-specific extra fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EntryRecord {
    /// Builds a record from an entry's universal fields, with empty extras.
    ///
    /// Each call starts from a fresh record, so no field can leak from a
    /// previous encode.
    #[must_use]
    pub fn from_entry(entry: &ItemEntry) -> Self {
        Self {
            definition_id: entry.definition().id.clone(),
            entry_id: entry.id(),
            quantity: entry.quantity(),
            created_at: entry.created_at(),
            updated_at: entry.updated_at(),
            extra: Map::new(),
        }
    }

    /// Encodes the record as an opaque string.
    pub fn encode(&self) -> InventoryResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes a record, ignoring resolver-specific fields it does not
    /// understand. This is the generic first pass of the two-pass decode.
    pub fn decode(raw: &str) -> InventoryResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Top-level save structure: an ordered list of opaque per-entry records.
///
/// Record order follows the store's iteration order at save time; it carries
/// no meaning on its own, display order is the sort engine's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveEnvelope {
    /// Encoded entry records, one per live entry.
    pub items: Vec<String>,
}

impl SaveEnvelope {
    /// Encodes the envelope as an opaque string.
    pub fn encode(&self) -> InventoryResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes an envelope. Malformed input is a fatal decode error.
    pub fn decode(raw: &str) -> InventoryResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Serialization strategy for entries of one definition type.
///
/// The default implementation covers definitions with no extra runtime
/// state. Definition types that carry per-entry state implement
/// [`new_state`](Self::new_state) plus the save/load hooks:
///
/// ```
/// use serde_json::{Map, Value};
/// use stockpile::{DataResolver, EntryState, InventoryResult, ItemEntry};
///
/// #[derive(Debug, Default)]
/// struct WeaponState {
///     durability: u32,
/// }
///
/// impl EntryState for WeaponState {}
///
/// #[derive(Debug)]
/// struct WeaponResolver;
///
/// impl DataResolver for WeaponResolver {
///     fn new_state(&self) -> Option<Box<dyn EntryState>> {
///         Some(Box::new(WeaponState::default()))
///     }
///
///     fn on_save(&self, entry: &ItemEntry, extra: &mut Map<String, Value>) -> InventoryResult<()> {
///         if let Some(state) = entry.state::<WeaponState>() {
///             extra.insert("durability".into(), state.durability.into());
///         }
///         Ok(())
///     }
///
///     fn on_load(&self, entry: &mut ItemEntry, extra: &Map<String, Value>) -> InventoryResult<()> {
///         let durability = extra.get("durability").and_then(Value::as_u64).unwrap_or(0);
///         if let Some(state) = entry.state_mut::<WeaponState>() {
///             state.durability = u32::try_from(durability).unwrap_or(u32::MAX);
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait DataResolver: AsAny + fmt::Debug + Send + Sync {
    /// Fresh per-entry state for this definition type, attached to every
    /// entry at creation and restore time. `None` means entries of this
    /// type carry no extra state.
    fn new_state(&self) -> Option<Box<dyn EntryState>> {
        None
    }

    /// Hook: externalize type-specific fields into the record's extras.
    fn on_save(&self, entry: &ItemEntry, extra: &mut Map<String, Value>) -> InventoryResult<()> {
        let _ = (entry, extra);
        Ok(())
    }

    /// Hook: populate type-specific entry state from the record's extras.
    fn on_load(&self, entry: &mut ItemEntry, extra: &Map<String, Value>) -> InventoryResult<()> {
        let _ = (entry, extra);
        Ok(())
    }

    /// Externalizes an entry: universal fields plus whatever
    /// [`on_save`](Self::on_save) contributes.
    fn save(&self, entry: &ItemEntry) -> InventoryResult<String> {
        let mut record = EntryRecord::from_entry(entry);
        self.on_save(entry, &mut record.extra)?;
        record.encode()
    }

    /// Internalizes an entry: decodes the record, looks up the owning
    /// definition in the catalog, rebuilds the entry with its saved id,
    /// quantity, and indices, then lets [`on_load`](Self::on_load) fill in
    /// type-specific state.
    ///
    /// # Errors
    ///
    /// [`InventoryError::UnknownDefinition`] if the encoded definition id is
    /// absent from the catalog; [`InventoryError::Decode`] on malformed
    /// input.
    fn load(&self, raw: &str, catalog: &Catalog) -> InventoryResult<ItemEntry> {
        let record = EntryRecord::decode(raw)?;
        let definition = catalog
            .get(record.definition_id.as_str())
            .cloned()
            .ok_or_else(|| InventoryError::UnknownDefinition(record.definition_id.clone()))?;

        let mut entry = ItemEntry::restore(
            definition,
            record.quantity,
            record.entry_id,
            record.created_at,
            record.updated_at,
        );
        self.on_load(&mut entry, &record.extra)?;
        Ok(entry)
    }
}

/// Stateless resolver for definitions with no extra per-entry fields.
#[derive(Debug, Default)]
pub struct StackResolver;

impl DataResolver for StackResolver {}
