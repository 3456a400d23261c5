//! End-to-end inventory scenarios, including a custom data resolver with
//! per-entry weapon state.

use std::sync::Arc;

use serde_json::{Map, Value};
use stockpile::{
    sort_entries, Catalog, CategoryOrder, DataResolver, EntryQuery, EntryState, Inventory,
    InventoryResult, ItemDefinition, ItemEntry, SortKey, SortOrder, SortSpec, StackResolver,
};

#[derive(Debug, Default)]
struct WeaponState {
    level: u32,
    durability: u32,
}

impl EntryState for WeaponState {}

#[derive(Debug)]
struct WeaponResolver;

impl DataResolver for WeaponResolver {
    fn new_state(&self) -> Option<Box<dyn EntryState>> {
        Some(Box::new(WeaponState::default()))
    }

    fn on_save(&self, entry: &ItemEntry, extra: &mut Map<String, Value>) -> InventoryResult<()> {
        if let Some(state) = entry.state::<WeaponState>() {
            extra.insert("level".to_string(), state.level.into());
            extra.insert("durability".to_string(), state.durability.into());
        }
        Ok(())
    }

    fn on_load(&self, entry: &mut ItemEntry, extra: &Map<String, Value>) -> InventoryResult<()> {
        let level = extra.get("level").and_then(Value::as_u64).unwrap_or(0);
        let durability = extra.get("durability").and_then(Value::as_u64).unwrap_or(0);
        if let Some(state) = entry.state_mut::<WeaponState>() {
            state.level = u32::try_from(level).unwrap_or(u32::MAX);
            state.durability = u32::try_from(durability).unwrap_or(u32::MAX);
        }
        Ok(())
    }
}

fn catalog() -> Arc<Catalog> {
    Arc::new(
        Catalog::new(vec![
            ItemDefinition::builder("potion", "Healing Potion")
                .category("Consumable")
                .build(),
            ItemDefinition::builder("bread", "Bread")
                .category("Consumable")
                .build(),
            ItemDefinition::builder("sword", "Iron Sword")
                .category("Weapon")
                .unique(true)
                .resolver(Arc::new(WeaponResolver))
                .build(),
        ])
        .unwrap()
        .with_categories(["Weapon", "Consumable"]),
    )
}

#[test]
fn unique_weapons_survive_a_round_trip_with_their_ids() {
    let catalog = catalog();
    let mut inventory = Inventory::new(Arc::clone(&catalog));

    let first = inventory.add_by_id("sword", 1).map(ItemEntry::id).unwrap();
    let second = inventory.add_by_id("sword", 1).map(ItemEntry::id).unwrap();
    assert_eq!(inventory.get_all().len(), 2);

    let saved = inventory.save().unwrap();
    let mut restored = Inventory::new(catalog);
    restored.load(&saved).unwrap();

    assert!(restored.get_entry(&first).is_some());
    assert!(restored.get_entry(&second).is_some());
}

#[test]
fn drained_stacks_disappear_completely() {
    let catalog = catalog();
    let mut inventory = Inventory::new(catalog);

    inventory.add_by_id("potion", 3);
    inventory.remove_by_id("potion", 3).unwrap();

    assert!(!inventory.has_by_id("potion", 1));
    assert_eq!(inventory.get_all().len(), 0);
}

#[test]
fn custom_resolver_state_round_trips() {
    let catalog = catalog();
    let mut inventory = Inventory::new(Arc::clone(&catalog));

    let entry_id = inventory.add_by_id("sword", 1).map(ItemEntry::id).unwrap();

    // Level the sword up and wear it down, then stamp the mutation.
    let entry = inventory.get_entry_mut(&entry_id).unwrap();
    let state = entry.state_mut::<WeaponState>().unwrap();
    state.level = 7;
    state.durability = 42;
    entry.touch(&catalog);

    let saved = inventory.save().unwrap();
    let mut restored = Inventory::new(catalog);
    restored.load(&saved).unwrap();

    let state = restored
        .get_entry(&entry_id)
        .and_then(ItemEntry::state::<WeaponState>)
        .unwrap();
    assert_eq!(state.level, 7);
    assert_eq!(state.durability, 42);
}

#[test]
fn touching_custom_state_reorders_updated_at() {
    let catalog = catalog();
    let mut inventory = Inventory::new(Arc::clone(&catalog));

    let first = inventory.add_by_id("sword", 1).map(ItemEntry::id).unwrap();
    let second = inventory.add_by_id("sword", 1).map(ItemEntry::id).unwrap();

    let entry = inventory.get_entry_mut(&first).unwrap();
    entry.touch(&catalog);

    let mut entries = inventory.get_all();
    sort_entries(
        &mut entries,
        &SortSpec::by(SortKey::UpdatedAt, SortOrder::Descending),
    );
    assert_eq!(entries[0].id(), first);
    assert_eq!(entries[1].id(), second);
}

#[test]
fn queries_filter_by_definition_type_and_category() {
    let catalog = catalog();
    let mut inventory = Inventory::new(catalog);

    inventory.add_by_id("potion", 2);
    inventory.add_by_id("bread", 1);
    inventory.add_by_id("sword", 1);
    inventory.add_by_id("sword", 1);

    let weapons = inventory.query(&EntryQuery::new().definition_type::<WeaponResolver>());
    assert_eq!(weapons.len(), 2);

    let stackables = inventory.query(&EntryQuery::new().definition_type::<StackResolver>());
    assert_eq!(stackables.len(), 2);

    let consumables = inventory.query(&EntryQuery::new().category("Consumable"));
    assert_eq!(consumables.len(), 2);

    let weapon_state = inventory.entries_with_state::<WeaponState>();
    assert_eq!(weapon_state.len(), 2);
}

#[test]
fn display_sort_uses_catalog_category_ranking() {
    let catalog = catalog();
    let mut inventory = Inventory::new(Arc::clone(&catalog));

    inventory.add_by_id("bread", 1);
    inventory.add_by_id("sword", 1);
    inventory.add_by_id("potion", 1);

    let mut entries = inventory.get_all();
    let spec = SortSpec::by(SortKey::Category, SortOrder::Ascending)
        .with_category_order(CategoryOrder::new(catalog.categories().to_vec()));
    sort_entries(&mut entries, &spec);

    let names: Vec<&str> = entries
        .iter()
        .map(|e| e.definition().display_name.as_str())
        .collect();
    // Weapon ranks before Consumable; the consumables tie on category and
    // fall back to the alphabetical secondary key.
    assert_eq!(names, ["Iron Sword", "Bread", "Healing Potion"]);
}

#[test]
fn listeners_observe_a_shop_purchase_flow() {
    use std::sync::atomic::{AtomicU32, Ordering};

    let catalog = catalog();
    let mut inventory = Inventory::new(catalog);

    let changes = Arc::new(AtomicU32::new(0));
    let sink = Arc::clone(&changes);
    inventory.events_mut().on_changed(move |_| {
        sink.fetch_add(1, Ordering::Relaxed);
    });

    inventory.add_by_id("potion", 5); // stock up
    inventory.remove_by_id("potion", 2).unwrap(); // sell two
    inventory.add_by_id("sword", 1); // acquire a unique

    assert_eq!(changes.load(Ordering::Relaxed), 3);
    assert_eq!(inventory.get_by_id("potion").unwrap().quantity(), 3);
}
