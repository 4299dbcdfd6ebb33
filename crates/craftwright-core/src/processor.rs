//! The crafting transaction coordinator.
//!
//! Two-phase protocol: [`CraftingProcessor::can_craft`] is advisory and
//! read-only, safe to call speculatively every frame; [`CraftingProcessor::craft`]
//! is authoritative and re-validates before mutating, so approvals that went
//! stale between frames (items taken, currency spent by other systems)
//! cannot be spent.
//!
//! Commit is staged: the whole selection is verified present, then removed
//! entry by entry; a short removal restores everything already taken before
//! the error is returned, so the inventory is never left partially debited.

use crate::catalog::Catalog;
use crate::id::StackId;
use crate::item::{Inventory, ItemStack};
use crate::matcher::{self, Source};
use crate::recipe::Recipe;
use crate::selection::Selection;

/// Why a craft attempt failed. `can_craft` collapses all of these to
/// `false`; `craft` reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CraftError {
    #[error("one or more ingredient requirements could not be reserved")]
    InsufficientIngredients,
    #[error("currency balance below the scaled recipe cost")]
    InsufficientCurrency,
    #[error("computed selection no longer present in the inventory")]
    StaleSelection,
    #[error("a reserved ingredient could not be removed during commit")]
    RemovalFailed,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("recipe references definitions unknown to the catalog")]
    InvalidRecipe,
    #[error("recipe is not in this crafter's recipe set")]
    UnknownRecipe,
}

/// The items produced by a successful craft, already added to the
/// inventory. Amounts are the recipe outputs scaled by the quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CraftingOutput {
    pub items: Vec<ItemStack>,
}

/// External removal hook: when configured, the processor delegates
/// ingredient removal to this strategy instead of debiting the main
/// collection itself. Invoked synchronously; returns false on failure,
/// in which case the hook must not have mutated the inventory.
pub trait IngredientRemover {
    fn remove_ingredients(&mut self, inventory: &mut Inventory, selection: &Selection) -> bool;
}

/// Resolves recipe ingredients against an inventory and commits crafts.
///
/// Stateless between calls: the only state-carrying object is the
/// transient [`Selection`] inside one call, plus the optional removal hook.
#[derive(Default)]
pub struct CraftingProcessor {
    remover: Option<Box<dyn IngredientRemover>>,
}

impl std::fmt::Debug for CraftingProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CraftingProcessor")
            .field("external_removal", &self.remover.is_some())
            .finish()
    }
}

impl CraftingProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A processor that delegates ingredient removal to `remover`.
    pub fn with_remover(remover: Box<dyn IngredientRemover>) -> Self {
        Self {
            remover: Some(remover),
        }
    }

    pub fn set_remover(&mut self, remover: Option<Box<dyn IngredientRemover>>) {
        self.remover = remover;
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Automatically select the stacks a craft of `quantity` would consume.
    /// Returns `None` if the inventory cannot cover the ingredients.
    ///
    /// Lower-level surface for callers that preview or adjust the selection
    /// before committing; `can_craft`/`craft` run this internally.
    pub fn try_auto_select(
        &self,
        recipe: &Recipe,
        inventory: &Inventory,
        catalog: &Catalog,
        quantity: u32,
    ) -> Option<Selection> {
        if quantity == 0 {
            return None;
        }
        let mut selection = Selection::new();
        let ok = matcher::try_select(
            &recipe.ingredients,
            Source::Live(&inventory.main),
            catalog,
            quantity,
            &mut selection,
        );
        ok.then_some(selection)
    }

    // -----------------------------------------------------------------------
    // Affordability (read-only)
    // -----------------------------------------------------------------------

    /// Whether a craft of `quantity` would succeed right now. Never
    /// mutates the inventory.
    pub fn can_craft(
        &self,
        recipe: &Recipe,
        inventory: &Inventory,
        catalog: &Catalog,
        quantity: u32,
    ) -> bool {
        self.check_craft(recipe, inventory, catalog, quantity).is_ok()
    }

    /// Like [`Self::can_craft`] but reports why a craft would fail, and on
    /// success returns the selection that would be consumed.
    pub fn check_craft(
        &self,
        recipe: &Recipe,
        inventory: &Inventory,
        catalog: &Catalog,
        quantity: u32,
    ) -> Result<Selection, CraftError> {
        validate_input(recipe, catalog, quantity)?;

        let selection = self
            .try_auto_select(recipe, inventory, catalog, quantity)
            .ok_or(CraftError::InsufficientIngredients)?;

        // Re-validate the computed selection against the live inventory.
        // Guards the auto-select scratch buffers: the commit consumes the
        // selection, so it must be provably present, not just computed.
        let chosen: Vec<StackId> = selection.iter().map(|r| r.stack).collect();
        let mut validated = Selection::new();
        let ok = matcher::try_select(
            &recipe.ingredients,
            Source::Picked {
                collection: &inventory.main,
                chosen: &chosen,
            },
            catalog,
            quantity,
            &mut validated,
        );
        if !ok || !inventory.main.holds(&validated) {
            return Err(CraftError::StaleSelection);
        }

        check_currency(recipe, inventory, quantity)?;

        Ok(validated)
    }

    /// Affordability check against stacks the caller picked manually
    /// (e.g., ingredients dragged into a crafting grid).
    pub fn can_craft_with(
        &self,
        recipe: &Recipe,
        inventory: &Inventory,
        catalog: &Catalog,
        chosen: &[StackId],
        quantity: u32,
    ) -> bool {
        self.check_chosen(recipe, inventory, catalog, chosen, quantity)
            .is_ok()
    }

    fn check_chosen(
        &self,
        recipe: &Recipe,
        inventory: &Inventory,
        catalog: &Catalog,
        chosen: &[StackId],
        quantity: u32,
    ) -> Result<Selection, CraftError> {
        validate_input(recipe, catalog, quantity)?;

        let mut selection = Selection::new();
        let ok = matcher::try_select(
            &recipe.ingredients,
            Source::Picked {
                collection: &inventory.main,
                chosen,
            },
            catalog,
            quantity,
            &mut selection,
        );
        if !ok {
            return Err(CraftError::InsufficientIngredients);
        }
        if !inventory.main.holds(&selection) {
            return Err(CraftError::StaleSelection);
        }

        check_currency(recipe, inventory, quantity)?;

        Ok(selection)
    }

    // -----------------------------------------------------------------------
    // Commit
    // -----------------------------------------------------------------------

    /// Craft `quantity` units: re-validate, remove the reserved
    /// ingredients, deduct the currency cost, then create and add the
    /// scaled outputs. On any failure the inventory is left untouched.
    pub fn craft(
        &mut self,
        recipe: &Recipe,
        inventory: &mut Inventory,
        catalog: &Catalog,
        quantity: u32,
    ) -> Result<CraftingOutput, CraftError> {
        let selection = self.check_craft(recipe, inventory, catalog, quantity)?;
        self.commit(recipe, inventory, catalog, &selection, quantity)
    }

    /// Commit against manually picked stacks. Same contract as
    /// [`Self::craft`] but the selection is validated from `chosen`.
    pub fn craft_with(
        &mut self,
        recipe: &Recipe,
        inventory: &mut Inventory,
        catalog: &Catalog,
        chosen: &[StackId],
        quantity: u32,
    ) -> Result<CraftingOutput, CraftError> {
        let selection = self.check_chosen(recipe, inventory, catalog, chosen, quantity)?;
        self.commit(recipe, inventory, catalog, &selection, quantity)
    }

    fn commit(
        &mut self,
        recipe: &Recipe,
        inventory: &mut Inventory,
        catalog: &Catalog,
        selection: &Selection,
        quantity: u32,
    ) -> Result<CraftingOutput, CraftError> {
        // Removed amounts, kept for restore until the transaction is done.
        let mut removed: Vec<ItemStack> = Vec::with_capacity(selection.len());

        match &mut self.remover {
            Some(remover) => {
                if !remover.remove_ingredients(inventory, selection) {
                    return Err(CraftError::RemovalFailed);
                }
            }
            None => {
                for reservation in selection.iter() {
                    if reservation.amount == 0 {
                        continue;
                    }
                    let snapshot = inventory.main.get(reservation.stack).cloned();
                    let got = inventory.main.remove(reservation.stack, reservation.amount);
                    if let Some(mut stack) = snapshot {
                        if got > 0 {
                            stack.quantity = got;
                            removed.push(stack);
                        }
                    }
                    if got != reservation.amount {
                        restore(inventory, removed);
                        return Err(CraftError::RemovalFailed);
                    }
                }
            }
        }

        if !recipe.currency_cost.is_empty() {
            let paid = inventory
                .wallet_mut()
                .map(|w| w.withdraw(&recipe.currency_cost, quantity))
                .unwrap_or(false);
            if !paid {
                restore(inventory, removed);
                return Err(CraftError::InsufficientCurrency);
            }
        }

        let mut output = CraftingOutput::default();
        for entry in &recipe.outputs {
            let amount = entry.amount.saturating_mul(quantity);
            // Output definitions were checked up front.
            let Some(stack) = catalog.instantiate(entry.definition, amount) else {
                continue;
            };
            inventory.main.deposit(stack.clone());
            output.items.push(stack);
        }

        Ok(output)
    }
}

fn validate_input(recipe: &Recipe, catalog: &Catalog, quantity: u32) -> Result<(), CraftError> {
    if quantity == 0 {
        return Err(CraftError::InvalidQuantity);
    }
    for entry in &recipe.outputs {
        if catalog.get_definition(entry.definition).is_none() {
            return Err(CraftError::InvalidRecipe);
        }
    }
    Ok(())
}

/// Currency decoration of the affordability check: scaled cost against the
/// wallet capability; an inventory without a wallet only affords recipes
/// with an empty cost.
fn check_currency(recipe: &Recipe, inventory: &Inventory, quantity: u32) -> Result<(), CraftError> {
    if recipe.currency_cost.is_empty() {
        return Ok(());
    }
    let affordable = inventory
        .wallet()
        .map(|w| w.can_afford(&recipe.currency_cost, quantity))
        .unwrap_or(false);
    if affordable {
        Ok(())
    } else {
        Err(CraftError::InsufficientCurrency)
    }
}

fn restore(inventory: &mut Inventory, removed: Vec<ItemStack>) {
    for stack in removed {
        inventory.main.deposit(stack);
    }
}
