//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::collections::BTreeMap;

use crate::catalog::{Catalog, CatalogBuilder};
use crate::id::*;
use crate::item::{Inventory, ItemStack};
use crate::recipe::*;
use crate::wallet::{CurrencyAmount, Wallet};

// ===========================================================================
// Property ids
// ===========================================================================

pub fn damage() -> PropertyId {
    PropertyId(1)
}
pub fn durability() -> PropertyId {
    PropertyId(2)
}
pub fn purity() -> PropertyId {
    PropertyId(3)
}

// ===========================================================================
// Standard catalog
// ===========================================================================

/// A small RPG-style crafting dataset shared by integration tests and
/// benchmarks. Category tree:
///
/// ```text
/// material
/// ├── metal
/// │   └── precious_metal   (gold_ingot, silver_ingot)
/// │       (iron_ingot under metal)
/// ├── wood                 (oak_plank)
/// └── gem                  (ruby)
/// ```
pub struct StandardCatalog {
    pub catalog: Catalog,

    pub material: CategoryId,
    pub metal: CategoryId,
    pub precious_metal: CategoryId,
    pub wood: CategoryId,
    pub gem: CategoryId,

    pub iron_ingot: DefinitionId,
    pub gold_ingot: DefinitionId,
    pub silver_ingot: DefinitionId,
    pub oak_plank: DefinitionId,
    pub ruby: DefinitionId,
    pub leather_strip: DefinitionId,
    pub iron_sword: DefinitionId,
    pub gold_ring: DefinitionId,

    pub coins: CurrencyId,

    pub forge_sword: RecipeId,
    pub craft_ring: RecipeId,
}

pub fn standard_catalog() -> StandardCatalog {
    let mut b = CatalogBuilder::new();

    let material = b.register_category("material", vec![]);
    let metal = b.register_category("metal", vec![material]);
    let precious_metal = b.register_category("precious_metal", vec![metal]);
    let wood = b.register_category("wood", vec![material]);
    let gem = b.register_category("gem", vec![material]);

    let iron_ingot = b.register_definition("iron_ingot", Some(metal), BTreeMap::new());
    let gold_ingot = b.register_definition(
        "gold_ingot",
        Some(precious_metal),
        BTreeMap::from([(purity(), 90)]),
    );
    let silver_ingot = b.register_definition("silver_ingot", Some(precious_metal), BTreeMap::new());
    let oak_plank = b.register_definition("oak_plank", Some(wood), BTreeMap::new());
    let ruby = b.register_definition("ruby", Some(gem), BTreeMap::new());
    let leather_strip = b.register_definition("leather_strip", None, BTreeMap::new());
    let iron_sword = b.register_definition(
        "iron_sword",
        None,
        BTreeMap::from([(damage(), 12), (durability(), 100)]),
    );
    let gold_ring = b.register_definition("gold_ring", None, BTreeMap::new());

    let coins = b.register_currency("coins");

    // 2x iron_ingot + 1x any metal + 1x leather_strip, 10 coins -> sword.
    let forge_sword = b.register_recipe(
        "forge_sword",
        Recipe::new()
            .with_definition_ingredient(DefinitionIngredient {
                definition: iron_ingot,
                amount: 2,
            })
            .with_category_ingredient(CategoryIngredient {
                category: metal,
                amount: 1,
            })
            .with_definition_ingredient(DefinitionIngredient {
                definition: leather_strip,
                amount: 1,
            })
            .with_currency_cost(CurrencyAmount {
                currency: coins,
                amount: 10,
            })
            .with_output(RecipeOutput {
                definition: iron_sword,
                amount: 1,
            }),
    );

    // 1x exact pure gold + 1x any gem -> ring. No currency cost.
    let craft_ring = b.register_recipe(
        "craft_ring",
        Recipe::new()
            .with_item_ingredient(ItemIngredient {
                definition: gold_ingot,
                properties: BTreeMap::from([(purity(), 90)]),
                amount: 1,
            })
            .with_category_ingredient(CategoryIngredient {
                category: gem,
                amount: 1,
            })
            .with_output(RecipeOutput {
                definition: gold_ring,
                amount: 1,
            }),
    );

    StandardCatalog {
        catalog: b.build().unwrap(),
        material,
        metal,
        precious_metal,
        wood,
        gem,
        iron_ingot,
        gold_ingot,
        silver_ingot,
        oak_plank,
        ruby,
        leather_strip,
        iron_sword,
        gold_ring,
        coins,
        forge_sword,
        craft_ring,
    }
}

// ===========================================================================
// Stack and inventory constructors
// ===========================================================================

pub fn stack(definition: DefinitionId, quantity: u32) -> ItemStack {
    ItemStack::new(definition, quantity)
}

pub fn stack_with(definition: DefinitionId, quantity: u32, props: &[(PropertyId, i64)]) -> ItemStack {
    let mut s = ItemStack::new(definition, quantity);
    for &(id, value) in props {
        s.set_property(id, value);
    }
    s
}

/// An inventory stocked with one stack per entry, no wallet.
pub fn stocked_inventory(entries: &[(DefinitionId, u32)]) -> Inventory {
    let mut inventory = Inventory::new();
    for &(definition, quantity) in entries {
        inventory.main.insert(stack(definition, quantity));
    }
    inventory
}

/// A stocked inventory with a wallet holding `balance` of `currency`.
pub fn funded_inventory(
    entries: &[(DefinitionId, u32)],
    currency: CurrencyId,
    balance: u64,
) -> Inventory {
    let mut inventory = stocked_inventory(entries);
    let mut wallet = Wallet::new();
    wallet.deposit(currency, balance);
    inventory.attach_wallet(wallet);
    inventory
}
