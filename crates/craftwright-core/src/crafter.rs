//! A crafting station: a set of known recipes bound to a processor.
//!
//! A `Crafter` models a workbench, forge, or NPC that can only craft
//! from its own recipe set. Resolution and commit are delegated to the
//! embedded [`CraftingProcessor`]; the crafter adds the membership
//! gate and ID-based lookup through the catalog.

use crate::catalog::Catalog;
use crate::id::RecipeId;
use crate::item::Inventory;
use crate::processor::{CraftError, CraftingOutput, CraftingProcessor};
use crate::recipe::Recipe;

#[derive(Debug, Default)]
pub struct Crafter {
    processor: CraftingProcessor,
    recipes: Vec<RecipeId>,
}

impl Crafter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A crafter using a preconfigured processor (e.g., one with an
    /// external removal hook).
    pub fn with_processor(processor: CraftingProcessor) -> Self {
        Self {
            processor,
            recipes: Vec::new(),
        }
    }

    pub fn processor(&self) -> &CraftingProcessor {
        &self.processor
    }

    pub fn processor_mut(&mut self) -> &mut CraftingProcessor {
        &mut self.processor
    }

    /// Add a recipe to the set. Returns false if it was already known.
    pub fn add_recipe(&mut self, recipe: RecipeId) -> bool {
        if self.recipes.contains(&recipe) {
            return false;
        }
        self.recipes.push(recipe);
        true
    }

    /// Remove a recipe from the set. Returns false if it was not known.
    pub fn remove_recipe(&mut self, recipe: RecipeId) -> bool {
        match self.recipes.iter().position(|&r| r == recipe) {
            Some(index) => {
                self.recipes.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn knows(&self, recipe: RecipeId) -> bool {
        self.recipes.contains(&recipe)
    }

    pub fn recipes(&self) -> &[RecipeId] {
        &self.recipes
    }

    /// Resolve a recipe ID through the membership gate and the catalog.
    fn lookup<'a>(&self, recipe: RecipeId, catalog: &'a Catalog) -> Result<&'a Recipe, CraftError> {
        if !self.knows(recipe) {
            return Err(CraftError::UnknownRecipe);
        }
        catalog.get_recipe(recipe).ok_or(CraftError::InvalidRecipe)
    }

    /// Whether this crafter can craft `quantity` of the given recipe from
    /// the inventory right now. False for recipes outside its set.
    pub fn can_craft(
        &self,
        recipe: RecipeId,
        inventory: &Inventory,
        catalog: &Catalog,
        quantity: u32,
    ) -> bool {
        self.lookup(recipe, catalog)
            .map(|r| self.processor.can_craft(r, inventory, catalog, quantity))
            .unwrap_or(false)
    }

    pub fn craft(
        &mut self,
        recipe: RecipeId,
        inventory: &mut Inventory,
        catalog: &Catalog,
        quantity: u32,
    ) -> Result<CraftingOutput, CraftError> {
        let found = self.lookup(recipe, catalog)?;
        self.processor.craft(found, inventory, catalog, quantity)
    }
}
