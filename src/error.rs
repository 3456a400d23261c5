//! Error types for Stockpile.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific failure conditions and keeps the error contract
//! explicit: lookups that are allowed to miss return `Option`, tolerant
//! no-ops return `None`, and only contract violations surface here.

use thiserror::Error;

use crate::definition::DefinitionId;
use crate::entry::EntryId;

/// Failures surfaced by the catalog, the inventory store, and the resolvers.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// No entry with this id is held by the store.
    #[error("entry not found: {0}")]
    EntryNotFound(EntryId),

    /// No stack for this definition is held by the store.
    #[error("no stack held for definition: {0}")]
    StackNotFound(DefinitionId),

    /// The definition id is absent from the catalog where the contract
    /// requires it to exist (typically while decoding a save record).
    #[error("definition missing from catalog: {0}")]
    UnknownDefinition(DefinitionId),

    /// Unique items cannot be removed by definition; among several live
    /// entries the target would be ambiguous.
    #[error("unique items cannot be removed by definition ({0}); use remove_entry with an entry id")]
    RemoveUniqueByDefinition(DefinitionId),

    /// A catalog was constructed with two definitions sharing one id.
    #[error("duplicate definition id in catalog: {0}")]
    DuplicateDefinition(DefinitionId),

    /// A save blob contained colliding entries: a repeated entry id, or a
    /// second stack record for one stackable definition.
    #[error("duplicate entry in save data: {0}")]
    DuplicateEntry(EntryId),

    /// A save envelope, entry record, or catalog snapshot failed to decode.
    #[error("failed to decode save data: {0}")]
    Decode(#[from] serde_json::Error),
}

impl InventoryError {
    /// Returns true if this error is a not-found condition (entry, stack,
    /// or definition missing where the contract requires existence).
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::EntryNotFound(_) | Self::StackNotFound(_) | Self::UnknownDefinition(_)
        )
    }

    /// Returns true if this error signals programmer misuse of the API.
    #[must_use]
    pub const fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::RemoveUniqueByDefinition(_))
    }

    /// Returns true if this error came from decoding malformed save data.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Result type alias for Stockpile operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_predicates() {
        let err = InventoryError::EntryNotFound(EntryId::new());
        assert!(err.is_not_found());
        assert!(!err.is_invalid_operation());
        assert!(!err.is_decode());

        let err = InventoryError::StackNotFound(DefinitionId::from("potion"));
        assert!(err.is_not_found());

        let err = InventoryError::UnknownDefinition(DefinitionId::from("ghost"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_operation_predicate() {
        let err = InventoryError::RemoveUniqueByDefinition(DefinitionId::from("sword"));
        assert!(err.is_invalid_operation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_predicate() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = InventoryError::from(json_err);
        assert!(err.is_decode());
    }

    #[test]
    fn test_display_messages() {
        let err = InventoryError::StackNotFound(DefinitionId::from("potion"));
        assert!(err.to_string().contains("potion"));

        let err = InventoryError::RemoveUniqueByDefinition(DefinitionId::from("sword"));
        let msg = err.to_string();
        assert!(msg.contains("sword"));
        assert!(msg.contains("remove_entry"));
    }
}
