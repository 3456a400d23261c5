//! Deterministic display sorting for entry lists.
//!
//! Comparison is a total order built from a primary key with a secondary
//! key breaking ties, so entries sharing a creation index never land in a
//! nondeterministic relative order across runs. The underlying sort is
//! stable, so input order decides anything still equal after both keys.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::entry::ItemEntry;

/// What to compare entries by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Skip this comparison level.
    None,
    /// The entry's creation ordering index.
    #[default]
    CreatedAt,
    /// The entry's last-mutation ordering index.
    UpdatedAt,
    /// The definition's display name, byte-lexicographic.
    Alphabetical,
    /// The definition's category name; see [`CategoryOrder`] for custom
    /// rankings.
    Category,
}

/// Direction of a comparison level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Custom category ranking for [`SortKey::Category`].
///
/// Categories are compared by their position in the supplied list.
/// Categories absent from the list sort after every ranked category and
/// fall back to lexicographic comparison among themselves.
#[derive(Debug, Clone, Default)]
pub struct CategoryOrder {
    ranks: HashMap<String, usize>,
}

impl CategoryOrder {
    /// Builds a ranking from an ordered category list, first = lowest rank.
    #[must_use]
    pub fn new<S: Into<String>>(categories: impl IntoIterator<Item = S>) -> Self {
        let ranks = categories
            .into_iter()
            .enumerate()
            .map(|(rank, category)| (category.into(), rank))
            .collect();
        Self { ranks }
    }

    /// The rank of a category, or `None` if it is unranked.
    #[must_use]
    pub fn rank(&self, category: &str) -> Option<usize> {
        self.ranks.get(category).copied()
    }
}

/// Full sort configuration: two comparison levels plus an optional custom
/// category ranking.
///
/// The default sorts by creation index ascending, breaking ties
/// alphabetically ascending.
#[derive(Debug, Clone)]
pub struct SortSpec {
    /// Primary comparison key.
    pub primary: SortKey,
    /// Direction of the primary comparison.
    pub primary_order: SortOrder,
    /// Tie-breaking key, applied when the primary comparison is equal.
    pub secondary: SortKey,
    /// Direction of the secondary comparison.
    pub secondary_order: SortOrder,
    /// Custom category ranking; `None` means lexicographic categories.
    pub category_order: Option<CategoryOrder>,
}

impl SortSpec {
    /// A spec with the given primary key and order, defaulting the
    /// tie-breaker to alphabetical ascending.
    #[must_use]
    pub fn by(primary: SortKey, primary_order: SortOrder) -> Self {
        Self {
            primary,
            primary_order,
            secondary: SortKey::Alphabetical,
            secondary_order: SortOrder::Ascending,
            category_order: None,
        }
    }

    /// Overrides the tie-breaking key and order.
    #[must_use]
    pub fn then_by(mut self, secondary: SortKey, secondary_order: SortOrder) -> Self {
        self.secondary = secondary;
        self.secondary_order = secondary_order;
        self
    }

    /// Supplies a custom category ranking used by [`SortKey::Category`] at
    /// either level.
    #[must_use]
    pub fn with_category_order(mut self, order: CategoryOrder) -> Self {
        self.category_order = Some(order);
        self
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::by(SortKey::CreatedAt, SortOrder::Ascending)
    }
}

fn compare(
    a: &ItemEntry,
    b: &ItemEntry,
    key: SortKey,
    order: SortOrder,
    category_order: Option<&CategoryOrder>,
) -> Ordering {
    let result = match key {
        SortKey::None => Ordering::Equal,
        SortKey::CreatedAt => a.created_at().cmp(&b.created_at()),
        SortKey::UpdatedAt => a.updated_at().cmp(&b.updated_at()),
        SortKey::Alphabetical => a
            .definition()
            .display_name
            .cmp(&b.definition().display_name),
        SortKey::Category => {
            let left = a.definition().category.as_str();
            let right = b.definition().category.as_str();
            match category_order {
                Some(ranking) => match (ranking.rank(left), ranking.rank(right)) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    // Unranked categories sort after every ranked one.
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => left.cmp(right),
                },
                None => left.cmp(right),
            }
        }
    };

    match order {
        SortOrder::Ascending => result,
        SortOrder::Descending => result.reverse(),
    }
}

/// Sorts entries in place per the spec, primary key first, secondary key on
/// ties. Uses a stable sort.
pub fn sort_entries(entries: &mut [&ItemEntry], spec: &SortSpec) {
    entries.sort_by(|a, b| {
        compare(
            a,
            b,
            spec.primary,
            spec.primary_order,
            spec.category_order.as_ref(),
        )
        .then_with(|| {
            compare(
                a,
                b,
                spec.secondary,
                spec.secondary_order,
                spec.category_order.as_ref(),
            )
        })
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::Catalog;
    use crate::definition::ItemDefinition;
    use crate::entry::EntryId;

    fn entry(name: &str, category: &str, created_at: u64, updated_at: u64) -> ItemEntry {
        let definition = Arc::new(
            ItemDefinition::builder(name.to_ascii_lowercase(), name)
                .category(category)
                .build(),
        );
        ItemEntry::restore(definition, 1, EntryId::new(), created_at, updated_at)
    }

    fn names(entries: &[&ItemEntry]) -> Vec<String> {
        entries
            .iter()
            .map(|e| e.definition().display_name.clone())
            .collect()
    }

    #[test]
    fn test_secondary_key_breaks_created_at_ties() {
        let a = entry("Banana", "Food", 5, 0);
        let b = entry("Apple", "Food", 5, 0);
        let c = entry("Cherry", "Food", 3, 0);
        let mut list = vec![&a, &b, &c];

        sort_entries(&mut list, &SortSpec::default());
        assert_eq!(names(&list), ["Cherry", "Apple", "Banana"]);
    }

    #[test]
    fn test_descending_flips_comparison() {
        let a = entry("Apple", "Food", 1, 0);
        let b = entry("Banana", "Food", 2, 0);
        let mut list = vec![&a, &b];

        sort_entries(
            &mut list,
            &SortSpec::by(SortKey::CreatedAt, SortOrder::Descending),
        );
        assert_eq!(names(&list), ["Banana", "Apple"]);
    }

    #[test]
    fn test_updated_at_key() {
        let a = entry("Apple", "Food", 0, 9);
        let b = entry("Banana", "Food", 1, 4);
        let mut list = vec![&a, &b];

        sort_entries(
            &mut list,
            &SortSpec::by(SortKey::UpdatedAt, SortOrder::Ascending),
        );
        assert_eq!(names(&list), ["Banana", "Apple"]);
    }

    #[test]
    fn test_category_lexicographic_without_ranking() {
        let a = entry("Sword", "Weapon", 0, 0);
        let b = entry("Bread", "Food", 1, 0);
        let mut list = vec![&a, &b];

        sort_entries(
            &mut list,
            &SortSpec::by(SortKey::Category, SortOrder::Ascending),
        );
        assert_eq!(names(&list), ["Bread", "Sword"]);
    }

    #[test]
    fn test_custom_category_ranking() {
        let sword = entry("Sword", "Weapon", 0, 0);
        let bread = entry("Bread", "Food", 1, 0);
        let gem = entry("Gem", "Treasure", 2, 0);
        let mut list = vec![&bread, &gem, &sword];

        let spec = SortSpec::by(SortKey::Category, SortOrder::Ascending)
            .with_category_order(CategoryOrder::new(["Weapon", "Treasure", "Food"]));
        sort_entries(&mut list, &spec);
        assert_eq!(names(&list), ["Sword", "Gem", "Bread"]);
    }

    #[test]
    fn test_unranked_categories_sort_after_ranked() {
        let sword = entry("Sword", "Weapon", 0, 0);
        let bread = entry("Bread", "Food", 1, 0);
        let gem = entry("Gem", "Treasure", 2, 0);
        let mut list = vec![&bread, &gem, &sword];

        // Food and Treasure are unranked: they follow Weapon and order
        // lexicographically between themselves.
        let spec = SortSpec::by(SortKey::Category, SortOrder::Ascending)
            .with_category_order(CategoryOrder::new(["Weapon"]));
        sort_entries(&mut list, &spec);
        assert_eq!(names(&list), ["Sword", "Bread", "Gem"]);
    }

    #[test]
    fn test_none_key_preserves_input_order() {
        let a = entry("Banana", "Food", 2, 0);
        let b = entry("Apple", "Food", 1, 0);
        let mut list = vec![&a, &b];

        let spec = SortSpec::by(SortKey::None, SortOrder::Ascending)
            .then_by(SortKey::None, SortOrder::Ascending);
        sort_entries(&mut list, &spec);
        assert_eq!(names(&list), ["Banana", "Apple"]);
    }
}
