//! Greedy ingredient reservation.
//!
//! One algorithm resolves every requirement kind against either a live
//! collection or a pre-chosen candidate list. Per requirement it scans
//! candidates in source order, subtracts what earlier requirements already
//! reserved on each stack (the double-count guard), takes the clamped
//! remainder, and fails the whole resolution the moment a requirement
//! cannot be covered.
//!
//! Kind order is fixed: exact items, then definitions, then categories,
//! with category requirements pre-sorted most-specific-first so a broad
//! catch-all cannot starve a narrower requirement of a shared stack.

use crate::catalog::Catalog;
use crate::id::{CategoryId, DefinitionId, PropertyId, StackId};
use crate::item::{ItemCollection, ItemStack, StackView};
use crate::recipe::{CategoryIngredient, Ingredients};
use crate::selection::Selection;
use std::collections::BTreeMap;

/// The matching predicate of one ingredient requirement, in decreasing
/// order of specificity. Dispatched by match, not trait objects.
#[derive(Debug, Clone)]
pub enum IngredientPredicate<'a> {
    /// Exact item: same definition, identical property values.
    Item {
        definition: DefinitionId,
        properties: &'a BTreeMap<PropertyId, i64>,
    },
    /// Any stack of this definition.
    Definition(DefinitionId),
    /// Any stack whose definition the category contains.
    Category(CategoryId),
}

impl IngredientPredicate<'_> {
    pub fn matches(&self, stack: &ItemStack, catalog: &Catalog) -> bool {
        match self {
            IngredientPredicate::Item {
                definition,
                properties,
            } => stack.value_equivalent(*definition, properties),
            IngredientPredicate::Definition(definition) => stack.definition == *definition,
            IngredientPredicate::Category(category) => {
                catalog.category_contains_definition(*category, stack.definition)
            }
        }
    }
}

/// Where candidate stacks come from during one resolution.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// Query the live collection per requirement.
    Live(&'a ItemCollection),
    /// Validate a pre-chosen list of stacks (in the given order) against
    /// the requirements, resolving their current amounts from `collection`.
    Picked {
        collection: &'a ItemCollection,
        chosen: &'a [StackId],
    },
}

impl Source<'_> {
    /// Fill `scratch` with the candidates for one requirement, in source
    /// order. `scratch` is per-call; no state survives between calls.
    fn gather(
        &self,
        predicate: &IngredientPredicate<'_>,
        catalog: &Catalog,
        scratch: &mut Vec<StackView>,
    ) {
        match self {
            Source::Live(collection) => {
                collection.collect_matching(scratch, |stack| predicate.matches(stack, catalog));
            }
            Source::Picked { collection, chosen } => {
                scratch.clear();
                for &id in *chosen {
                    if let Some(stack) = collection.get(id) {
                        if predicate.matches(stack, catalog) {
                            scratch.push(StackView {
                                stack: id,
                                definition: stack.definition,
                                available: stack.quantity,
                            });
                        }
                    }
                }
            }
        }
    }
}

/// Resolve every requirement of `ingredients`, scaled by `quantity`,
/// accumulating reservations into `selection`. Returns false (leaving the
/// partial selection in place for inspection) as soon as any requirement
/// cannot be fully reserved.
pub fn try_select(
    ingredients: &Ingredients,
    source: Source<'_>,
    catalog: &Catalog,
    quantity: u32,
    selection: &mut Selection,
) -> bool {
    let mut scratch: Vec<StackView> = Vec::new();

    for ingredient in &ingredients.items {
        let predicate = IngredientPredicate::Item {
            definition: ingredient.definition,
            properties: &ingredient.properties,
        };
        if !reserve_one(&predicate, ingredient.amount, quantity, &source, catalog, &mut scratch, selection) {
            return false;
        }
    }

    for ingredient in &ingredients.definitions {
        let predicate = IngredientPredicate::Definition(ingredient.definition);
        if !reserve_one(&predicate, ingredient.amount, quantity, &source, catalog, &mut scratch, selection) {
            return false;
        }
    }

    let mut categories = ingredients.categories.clone();
    sort_categories_by_specificity(&mut categories, catalog);
    for ingredient in &categories {
        let predicate = IngredientPredicate::Category(ingredient.category);
        if !reserve_one(&predicate, ingredient.amount, quantity, &source, catalog, &mut scratch, selection) {
            return false;
        }
    }

    true
}

/// Greedy reservation of one requirement against its candidates.
fn reserve_one(
    predicate: &IngredientPredicate<'_>,
    per_unit: u32,
    quantity: u32,
    source: &Source<'_>,
    catalog: &Catalog,
    scratch: &mut Vec<StackView>,
    selection: &mut Selection,
) -> bool {
    let mut needed = per_unit as u64 * quantity as u64;
    source.gather(predicate, catalog, scratch);

    for view in scratch.iter() {
        if needed == 0 {
            break;
        }
        // What earlier requirements reserved on this stack is off limits.
        let already = selection.reserved_for(view.stack);
        let have = view.available.saturating_sub(already);
        let take = (have as u64).min(needed) as u32;
        selection.reserve(view.stack, take);
        needed -= take as u64;
    }

    needed == 0
}

/// Order category requirements most-specific-first: whenever category B is
/// inherently contained by category A, B's requirement ends up before A's.
/// Incomparable requirements keep their original relative order.
///
/// Containment is a partial order, so this is a stable topological pass
/// rather than a comparator sort (`sort_by` requires a total order).
pub fn sort_categories_by_specificity(
    categories: &mut Vec<CategoryIngredient>,
    catalog: &Catalog,
) {
    let mut remaining = std::mem::take(categories);
    let mut sorted = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        // First remaining requirement that contains no other remaining one.
        let pick = remaining
            .iter()
            .position(|x| {
                !remaining
                    .iter()
                    .any(|y| catalog.category_contains(x.category, y.category))
            })
            // The catalog rejects containment cycles, so a pick always
            // exists; fall back to front for robustness.
            .unwrap_or(0);
        sorted.push(remaining.remove(pick));
    }

    *categories = sorted;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::recipe::{CategoryIngredient, DefinitionIngredient, ItemIngredient, Recipe};

    struct Fixture {
        catalog: Catalog,
        iron: DefinitionId,
        gold: DefinitionId,
        metal: CategoryId,
        precious: CategoryId,
    }

    /// metal ⊃ precious_metal; iron_ingot in metal, gold_ingot in precious.
    fn fixture() -> Fixture {
        let mut b = CatalogBuilder::new();
        let metal = b.register_category("metal", vec![]);
        let precious = b.register_category("precious_metal", vec![metal]);
        let iron = b.register_definition("iron_ingot", Some(metal), BTreeMap::new());
        let gold = b.register_definition("gold_ingot", Some(precious), BTreeMap::new());
        Fixture {
            catalog: b.build().unwrap(),
            iron,
            gold,
            metal,
            precious,
        }
    }

    fn item_req(definition: DefinitionId, amount: u32) -> ItemIngredient {
        ItemIngredient {
            definition,
            properties: BTreeMap::new(),
            amount,
        }
    }

    // -----------------------------------------------------------------------
    // Greedy reservation, live mode
    // -----------------------------------------------------------------------

    #[test]
    fn item_then_category_share_one_stack() {
        // Recipe: 2x exact iron + 1x anything-metal. One iron stack of 3
        // covers both: the item line claims 2, the category line the rest.
        let f = fixture();
        let mut coll = ItemCollection::new();
        let stack = coll.insert(ItemStack::new(f.iron, 3)).unwrap();

        let recipe = Recipe::new()
            .with_item_ingredient(item_req(f.iron, 2))
            .with_category_ingredient(CategoryIngredient {
                category: f.metal,
                amount: 1,
            });

        let mut selection = Selection::new();
        let ok = try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        );
        assert!(ok);
        assert_eq!(selection.reserved_for(stack), 3);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn exhausted_stack_fails_later_requirement() {
        // Same recipe but the stack holds exactly 2: the item line takes
        // everything and the category line sees have = 2 - 2 = 0.
        let f = fixture();
        let mut coll = ItemCollection::new();
        coll.insert(ItemStack::new(f.iron, 2)).unwrap();

        let recipe = Recipe::new()
            .with_item_ingredient(item_req(f.iron, 2))
            .with_category_ingredient(CategoryIngredient {
                category: f.metal,
                amount: 1,
            });

        let mut selection = Selection::new();
        let ok = try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        );
        assert!(!ok);
    }

    #[test]
    fn spans_multiple_stacks() {
        let f = fixture();
        let mut coll = ItemCollection::new();
        let a = coll.insert(ItemStack::new(f.iron, 3)).unwrap();
        let b = coll.insert(ItemStack::new(f.iron, 4)).unwrap();

        let recipe = Recipe::new().with_definition_ingredient(DefinitionIngredient {
            definition: f.iron,
            amount: 6,
        });

        let mut selection = Selection::new();
        assert!(try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        ));
        assert_eq!(selection.reserved_for(a) + selection.reserved_for(b), 6);
    }

    #[test]
    fn quantity_scales_required_amounts() {
        let f = fixture();
        let mut coll = ItemCollection::new();
        let stack = coll.insert(ItemStack::new(f.iron, 10)).unwrap();

        let recipe = Recipe::new().with_definition_ingredient(DefinitionIngredient {
            definition: f.iron,
            amount: 3,
        });

        let mut selection = Selection::new();
        assert!(try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            3,
            &mut selection,
        ));
        assert_eq!(selection.reserved_for(stack), 9);

        selection.clear();
        assert!(!try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            4,
            &mut selection,
        ));
    }

    #[test]
    fn item_predicate_requires_exact_properties() {
        let f = fixture();
        let sharpness = PropertyId(0);
        let mut coll = ItemCollection::new();
        let mut sharpened = ItemStack::new(f.iron, 5);
        sharpened.set_property(sharpness, 10);
        coll.insert(sharpened).unwrap();

        // Plain-iron exact requirement must not match the sharpened stack.
        let recipe = Recipe::new().with_item_ingredient(item_req(f.iron, 1));
        let mut selection = Selection::new();
        assert!(!try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        ));

        // A definition requirement does match it.
        let recipe = Recipe::new().with_definition_ingredient(DefinitionIngredient {
            definition: f.iron,
            amount: 1,
        });
        selection.clear();
        assert!(try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        ));
    }

    #[test]
    fn category_predicate_matches_through_hierarchy() {
        let f = fixture();
        let mut coll = ItemCollection::new();
        let stack = coll.insert(ItemStack::new(f.gold, 2)).unwrap();

        // gold_ingot is in precious_metal which metal contains.
        let recipe = Recipe::new().with_category_ingredient(CategoryIngredient {
            category: f.metal,
            amount: 2,
        });
        let mut selection = Selection::new();
        assert!(try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        ));
        assert_eq!(selection.reserved_for(stack), 2);
    }

    // -----------------------------------------------------------------------
    // Specificity ordering
    // -----------------------------------------------------------------------

    #[test]
    fn contained_category_sorts_first() {
        let f = fixture();
        let mut cats = vec![
            CategoryIngredient {
                category: f.metal,
                amount: 1,
            },
            CategoryIngredient {
                category: f.precious,
                amount: 1,
            },
        ];
        sort_categories_by_specificity(&mut cats, &f.catalog);
        assert_eq!(cats[0].category, f.precious);
        assert_eq!(cats[1].category, f.metal);
    }

    #[test]
    fn incomparable_categories_keep_order() {
        let mut b = CatalogBuilder::new();
        let weapon = b.register_category("weapon", vec![]);
        let tool = b.register_category("tool", vec![]);
        let catalog = b.build().unwrap();

        let mut cats = vec![
            CategoryIngredient {
                category: tool,
                amount: 1,
            },
            CategoryIngredient {
                category: weapon,
                amount: 2,
            },
        ];
        sort_categories_by_specificity(&mut cats, &catalog);
        assert_eq!(cats[0].category, tool);
        assert_eq!(cats[1].category, weapon);
    }

    #[test]
    fn specific_category_claims_stack_before_broad_one() {
        // A gold stack satisfies both precious_metal and metal; the
        // precious requirement must claim it first even though the broad
        // requirement is listed first in the recipe.
        let f = fixture();
        let mut coll = ItemCollection::new();
        let gold_stack = coll.insert(ItemStack::new(f.gold, 1)).unwrap();
        let iron_stack = coll.insert(ItemStack::new(f.iron, 1)).unwrap();

        let recipe = Recipe::new()
            .with_category_ingredient(CategoryIngredient {
                category: f.metal,
                amount: 1,
            })
            .with_category_ingredient(CategoryIngredient {
                category: f.precious,
                amount: 1,
            });

        let mut selection = Selection::new();
        assert!(try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        ));
        // Without the sort, metal would grab the gold stack (slot order)
        // and precious would find nothing.
        assert_eq!(selection.reserved_for(gold_stack), 1);
        assert_eq!(selection.reserved_for(iron_stack), 1);
    }

    #[test]
    fn chain_of_three_sorts_deepest_first() {
        let mut b = CatalogBuilder::new();
        let resource = b.register_category("resource", vec![]);
        let metal = b.register_category("metal", vec![resource]);
        let precious = b.register_category("precious_metal", vec![metal]);
        let catalog = b.build().unwrap();

        let mut cats = vec![
            CategoryIngredient { category: resource, amount: 1 },
            CategoryIngredient { category: precious, amount: 1 },
            CategoryIngredient { category: metal, amount: 1 },
        ];
        sort_categories_by_specificity(&mut cats, &catalog);
        let order: Vec<CategoryId> = cats.iter().map(|c| c.category).collect();
        assert_eq!(order, vec![precious, metal, resource]);
    }

    // -----------------------------------------------------------------------
    // Validation mode
    // -----------------------------------------------------------------------

    #[test]
    fn picked_candidates_validate() {
        let f = fixture();
        let mut coll = ItemCollection::new();
        let stack = coll.insert(ItemStack::new(f.iron, 3)).unwrap();

        let recipe = Recipe::new().with_definition_ingredient(DefinitionIngredient {
            definition: f.iron,
            amount: 2,
        });

        let chosen = [stack];
        let mut selection = Selection::new();
        assert!(try_select(
            &recipe.ingredients,
            Source::Picked {
                collection: &coll,
                chosen: &chosen,
            },
            &f.catalog,
            1,
            &mut selection,
        ));
        assert_eq!(selection.reserved_for(stack), 2);
    }

    #[test]
    fn picked_candidates_ignore_unrelated_inventory() {
        // The collection holds plenty of iron, but the player picked only
        // a gold stack; an iron requirement must fail.
        let f = fixture();
        let mut coll = ItemCollection::new();
        coll.insert(ItemStack::new(f.iron, 10)).unwrap();
        let gold_stack = coll.insert(ItemStack::new(f.gold, 10)).unwrap();

        let recipe = Recipe::new().with_definition_ingredient(DefinitionIngredient {
            definition: f.iron,
            amount: 1,
        });

        let chosen = [gold_stack];
        let mut selection = Selection::new();
        assert!(!try_select(
            &recipe.ingredients,
            Source::Picked {
                collection: &coll,
                chosen: &chosen,
            },
            &f.catalog,
            1,
            &mut selection,
        ));
    }

    #[test]
    fn picked_dead_handles_are_skipped() {
        let f = fixture();
        let mut coll = ItemCollection::new();
        let stack = coll.insert(ItemStack::new(f.iron, 2)).unwrap();
        let _ = coll.remove(stack, 2);

        let recipe = Recipe::new().with_definition_ingredient(DefinitionIngredient {
            definition: f.iron,
            amount: 1,
        });

        let chosen = [stack];
        let mut selection = Selection::new();
        assert!(!try_select(
            &recipe.ingredients,
            Source::Picked {
                collection: &coll,
                chosen: &chosen,
            },
            &f.catalog,
            1,
            &mut selection,
        ));
    }

    // -----------------------------------------------------------------------
    // Double-count property (P2)
    // -----------------------------------------------------------------------

    #[test]
    fn no_stack_over_reserved_across_requirements() {
        let f = fixture();
        let mut coll = ItemCollection::new();
        let stack = coll.insert(ItemStack::new(f.gold, 5)).unwrap();

        // Three lines all matching the same gold stack: exact, definition,
        // category. Total demand 5 == available.
        let recipe = Recipe::new()
            .with_item_ingredient(item_req(f.gold, 2))
            .with_definition_ingredient(DefinitionIngredient {
                definition: f.gold,
                amount: 2,
            })
            .with_category_ingredient(CategoryIngredient {
                category: f.precious,
                amount: 1,
            });

        let mut selection = Selection::new();
        assert!(try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        ));
        assert_eq!(selection.reserved_for(stack), 5);

        // One more unit of demand anywhere must fail.
        let recipe = recipe.with_category_ingredient(CategoryIngredient {
            category: f.metal,
            amount: 1,
        });
        selection.clear();
        assert!(!try_select(
            &recipe.ingredients,
            Source::Live(&coll),
            &f.catalog,
            1,
            &mut selection,
        ));
    }

    proptest::proptest! {
        /// P2: reserved amount on a stack never exceeds its availability,
        /// whatever the demand profile.
        #[test]
        fn reserved_never_exceeds_available(
            available in 0u32..60,
            item_amt in 0u32..20,
            def_amt in 0u32..20,
            cat_amt in 0u32..20,
            quantity in 1u32..4,
        ) {
            let f = fixture();
            let mut coll = ItemCollection::new();
            let stack = coll.insert(ItemStack::new(f.gold, available));

            let mut recipe = Recipe::new();
            if item_amt > 0 {
                recipe = recipe.with_item_ingredient(item_req(f.gold, item_amt));
            }
            if def_amt > 0 {
                recipe = recipe.with_definition_ingredient(DefinitionIngredient {
                    definition: f.gold,
                    amount: def_amt,
                });
            }
            if cat_amt > 0 {
                recipe = recipe.with_category_ingredient(CategoryIngredient {
                    category: f.precious,
                    amount: cat_amt,
                });
            }

            let mut selection = Selection::new();
            let ok = try_select(
                &recipe.ingredients,
                Source::Live(&coll),
                &f.catalog,
                quantity,
                &mut selection,
            );

            if let Some(stack) = stack {
                proptest::prop_assert!(selection.reserved_for(stack) <= available);
            }
            let demand = (item_amt as u64 + def_amt as u64 + cat_amt as u64)
                * quantity as u64;
            proptest::prop_assert_eq!(ok, demand <= available as u64);
        }
    }
}
