//! Item definitions: immutable descriptions of item types.
//!
//! Definitions are authored once (by catalog tooling outside this crate),
//! registered in a [`Catalog`](crate::catalog::Catalog), and shared by every
//! entry created from them. Each definition carries an explicit
//! [`DataResolver`] strategy object that owns entry state creation and
//! serialization for that definition type.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::resolver::{DataResolver, StackResolver};

/// Stable authored identifier of an item definition.
///
/// Unique across all definitions in one catalog and stable across sessions;
/// save data references definitions by this id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefinitionId(String);

impl DefinitionId {
    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DefinitionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DefinitionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DefinitionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Immutable description of an item type.
///
/// Built once with [`ItemDefinition::builder`] and shared as
/// `Arc<ItemDefinition>`; entries hold a reference to their definition, not
/// a copy. Equality and hashing go by [`id`](Self::id).
#[derive(Debug)]
pub struct ItemDefinition {
    /// Stable identifier, unique within one catalog.
    pub id: DefinitionId,
    /// Name shown by UI collaborators; also the alphabetical sort key.
    pub display_name: String,
    /// Category name used for filtering and category sorting.
    pub category: String,
    /// Unique item types never merge; every instance is tracked by its own
    /// entry with an implicit quantity of 1.
    pub unique: bool,
    /// Serialization strategy for entries of this definition type.
    pub resolver: Arc<dyn DataResolver>,
}

impl ItemDefinition {
    /// Starts building a definition with the given id and display name.
    ///
    /// Defaults: category `"Default"`, stackable, [`StackResolver`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stockpile::ItemDefinition;
    ///
    /// let sword = ItemDefinition::builder("sword", "Iron Sword")
    ///     .category("Weapon")
    ///     .unique(true)
    ///     .build();
    /// assert!(sword.unique);
    /// assert_eq!(sword.category, "Weapon");
    /// ```
    #[must_use]
    pub fn builder(
        id: impl Into<DefinitionId>,
        display_name: impl Into<String>,
    ) -> ItemDefinitionBuilder {
        ItemDefinitionBuilder {
            id: id.into(),
            display_name: display_name.into(),
            category: "Default".to_string(),
            unique: false,
            resolver: None,
        }
    }
}

impl PartialEq for ItemDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ItemDefinition {}

impl std::hash::Hash for ItemDefinition {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Builder for [`ItemDefinition`].
#[derive(Debug)]
pub struct ItemDefinitionBuilder {
    id: DefinitionId,
    display_name: String,
    category: String,
    unique: bool,
    resolver: Option<Arc<dyn DataResolver>>,
}

impl ItemDefinitionBuilder {
    /// Sets the category name.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Marks the definition as unique (entries never merge).
    #[must_use]
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets the serialization strategy for entries of this type.
    #[must_use]
    pub fn resolver(mut self, resolver: Arc<dyn DataResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Finishes the definition.
    #[must_use]
    pub fn build(self) -> ItemDefinition {
        ItemDefinition {
            id: self.id,
            display_name: self.display_name,
            category: self.category,
            unique: self.unique,
            resolver: self.resolver.unwrap_or_else(|| Arc::new(StackResolver)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let def = ItemDefinition::builder("potion", "Potion").build();
        assert_eq!(def.id.as_str(), "potion");
        assert_eq!(def.display_name, "Potion");
        assert_eq!(def.category, "Default");
        assert!(!def.unique);
    }

    #[test]
    fn test_builder_overrides() {
        let def = ItemDefinition::builder("sword", "Iron Sword")
            .category("Weapon")
            .unique(true)
            .build();
        assert_eq!(def.category, "Weapon");
        assert!(def.unique);
    }

    #[test]
    fn test_equality_is_by_id() {
        let a = ItemDefinition::builder("potion", "Potion").build();
        let b = ItemDefinition::builder("potion", "Renamed Potion")
            .category("Other")
            .build();
        assert_eq!(a, b);
    }

    #[test]
    fn test_definition_id_borrow_lookup() {
        use std::collections::HashMap;

        let mut map: HashMap<DefinitionId, u32> = HashMap::new();
        map.insert(DefinitionId::from("potion"), 1);
        // Borrow<str> lets callers look up by plain string slices.
        assert_eq!(map.get("potion"), Some(&1));
    }

    #[test]
    fn test_definition_id_serde_is_transparent() {
        let id = DefinitionId::from("potion");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"potion\"");
    }
}
