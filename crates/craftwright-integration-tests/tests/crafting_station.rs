//! Crafting-station scenarios driven by a JSON-defined catalog.
//!
//! Models a blacksmith NPC: content authored as data, loaded through the
//! data loader, frozen into a catalog, and crafted through a `Crafter`
//! whose recipe set grows as the player unlocks recipes.

use craftwright_core::crafter::Crafter;
use craftwright_core::data_loader::load_catalog_json;
use craftwright_core::item::Inventory;
use craftwright_core::processor::{CraftError, CraftingProcessor, IngredientRemover};
use craftwright_core::selection::Selection;
use craftwright_core::test_utils::*;
use craftwright_core::wallet::Wallet;

const BLACKSMITH_DATA: &str = r#"{
    "categories": [
        {"name": "material"},
        {"name": "metal", "parents": ["material"]},
        {"name": "precious_metal", "parents": ["metal"]}
    ],
    "definitions": [
        {"name": "iron_ingot", "category": "metal"},
        {"name": "gold_ingot", "category": "precious_metal"},
        {"name": "oak_plank", "category": "material"},
        {"name": "iron_sword", "properties": [{"id": 1, "value": 12}]},
        {"name": "gilded_sword", "properties": [{"id": 1, "value": 18}]}
    ],
    "currencies": [{"name": "coins"}],
    "recipes": [
        {
            "name": "forge_sword",
            "definitions": [{"definition": "iron_ingot", "amount": 2}],
            "categories": [{"category": "material", "amount": 1}],
            "outputs": [{"definition": "iron_sword", "amount": 1}],
            "currency_cost": [{"currency": "coins", "amount": 10}]
        },
        {
            "name": "gild_sword",
            "definitions": [
                {"definition": "iron_sword", "amount": 1},
                {"definition": "gold_ingot", "amount": 1}
            ],
            "outputs": [{"definition": "gilded_sword", "amount": 1}],
            "currency_cost": [{"currency": "coins", "amount": 50}]
        }
    ]
}"#;

#[test]
fn blacksmith_crafts_from_loaded_catalog() {
    let catalog = load_catalog_json(BLACKSMITH_DATA).unwrap().build().unwrap();
    let iron = catalog.definition_id("iron_ingot").unwrap();
    let plank = catalog.definition_id("oak_plank").unwrap();
    let sword = catalog.definition_id("iron_sword").unwrap();
    let coins = catalog.currency_id("coins").unwrap();
    let forge = catalog.recipe_id("forge_sword").unwrap();

    let mut blacksmith = Crafter::new();
    blacksmith.add_recipe(forge);

    let mut inv = funded_inventory(&[(iron, 2), (plank, 1)], coins, 25);
    assert!(blacksmith.can_craft(forge, &inv, &catalog, 1));

    let output = blacksmith.craft(forge, &mut inv, &catalog, 1).unwrap();
    assert_eq!(output.items[0].definition, sword);
    // The loaded definition's default properties ride along.
    assert_eq!(output.items[0].get_property(damage()), Some(12));
    assert_eq!(inv.wallet().unwrap().balance(coins), 15);
}

/// A two-step chain: forge a sword, then gild it. The second recipe is
/// locked until unlocked.
#[test]
fn recipe_unlock_gates_the_upgrade_chain() {
    let catalog = load_catalog_json(BLACKSMITH_DATA).unwrap().build().unwrap();
    let iron = catalog.definition_id("iron_ingot").unwrap();
    let gold = catalog.definition_id("gold_ingot").unwrap();
    let gilded = catalog.definition_id("gilded_sword").unwrap();
    let coins = catalog.currency_id("coins").unwrap();
    let forge = catalog.recipe_id("forge_sword").unwrap();
    let gild = catalog.recipe_id("gild_sword").unwrap();

    let mut blacksmith = Crafter::new();
    blacksmith.add_recipe(forge);

    let mut inv = funded_inventory(&[(iron, 3), (gold, 1)], coins, 100);
    blacksmith.craft(forge, &mut inv, &catalog, 1).unwrap();

    // The gilding recipe is known to the catalog but not this crafter.
    assert!(!blacksmith.can_craft(gild, &inv, &catalog, 1));
    assert_eq!(
        blacksmith.craft(gild, &mut inv, &catalog, 1),
        Err(CraftError::UnknownRecipe)
    );

    blacksmith.add_recipe(gild);
    let output = blacksmith.craft(gild, &mut inv, &catalog, 1).unwrap();
    assert_eq!(output.items[0].definition, gilded);
    assert_eq!(inv.wallet().unwrap().balance(coins), 40);
    assert_eq!(inv.main.total_of(gilded), 1);
}

/// The category line of the loaded recipe accepts anything under
/// `material`, including the gold that `metal` inherits from it.
#[test]
fn loaded_category_hierarchy_resolves_transitively() {
    let catalog = load_catalog_json(BLACKSMITH_DATA).unwrap().build().unwrap();
    let iron = catalog.definition_id("iron_ingot").unwrap();
    let gold = catalog.definition_id("gold_ingot").unwrap();
    let coins = catalog.currency_id("coins").unwrap();
    let forge = catalog.recipe_id("forge_sword").unwrap();

    let mut blacksmith = Crafter::new();
    blacksmith.add_recipe(forge);

    // No plank: the material line must fall through to the gold.
    let mut inv = funded_inventory(&[(iron, 2), (gold, 1)], coins, 10);
    let output = blacksmith.craft(forge, &mut inv, &catalog, 1).unwrap();
    assert_eq!(output.items.len(), 1);
    assert_eq!(inv.main.total_of(gold), 0);
}

// ============================================================================
// External removal strategies
// ============================================================================

/// A station that voids ingredients instead of returning them to the world
/// (e.g., a furnace). The hook sees the same selection the check approved.
struct FurnaceRemover;

impl IngredientRemover for FurnaceRemover {
    fn remove_ingredients(&mut self, inventory: &mut Inventory, selection: &Selection) -> bool {
        for r in selection.iter() {
            if inventory.main.remove(r.stack, r.amount) != r.amount {
                return false;
            }
        }
        true
    }
}

#[test]
fn station_with_custom_removal_strategy() {
    let sc = standard_catalog();
    let mut station =
        Crafter::with_processor(CraftingProcessor::with_remover(Box::new(FurnaceRemover)));
    station.add_recipe(sc.forge_sword);

    let mut inv = stocked_inventory(&[(sc.iron_ingot, 3), (sc.leather_strip, 1)]);
    let mut wallet = Wallet::new();
    wallet.deposit(sc.coins, 10);
    inv.attach_wallet(wallet);

    station.craft(sc.forge_sword, &mut inv, &sc.catalog, 1).unwrap();
    assert_eq!(inv.main.total_of(sc.iron_ingot), 0);
    assert_eq!(inv.main.total_of(sc.iron_sword), 1);
}
