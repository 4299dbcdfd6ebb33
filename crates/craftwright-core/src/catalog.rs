//! Item, category, currency, and recipe database.
//!
//! Built once at startup through [`CatalogBuilder`] and frozen into an
//! immutable [`Catalog`]. The crafting engine consumes two capabilities from
//! the catalog: category containment (for category-level ingredients and the
//! specificity sort) and item instantiation (for recipe output).

use crate::id::{CategoryId, CurrencyId, DefinitionId, PropertyId, RecipeId};
use crate::item::ItemStack;
use crate::recipe::Recipe;
use std::collections::{BTreeMap, HashMap};

/// An item definition: the template items are stamped from.
#[derive(Debug, Clone)]
pub struct DefinitionDef {
    pub name: String,
    /// The category this definition belongs to, if any.
    pub category: Option<CategoryId>,
    /// Properties stamped onto newly instantiated items.
    pub default_properties: BTreeMap<PropertyId, i64>,
}

/// An item category. Categories form a DAG through `parents`; a category
/// with no parents is a root.
#[derive(Debug, Clone)]
pub struct CategoryDef {
    pub name: String,
    pub parents: Vec<CategoryId>,
}

/// A currency kind.
#[derive(Debug, Clone)]
pub struct CurrencyDef {
    pub name: String,
}

/// Builder for constructing an immutable Catalog.
/// Two-phase lifecycle: registration -> finalization.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    definitions: Vec<DefinitionDef>,
    definition_name_to_id: HashMap<String, DefinitionId>,
    categories: Vec<CategoryDef>,
    category_name_to_id: HashMap<String, CategoryId>,
    currencies: Vec<CurrencyDef>,
    currency_name_to_id: HashMap<String, CurrencyId>,
    recipes: Vec<Recipe>,
    recipe_name_to_id: HashMap<String, RecipeId>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category. Parents must already be registered.
    pub fn register_category(&mut self, name: &str, parents: Vec<CategoryId>) -> CategoryId {
        let id = CategoryId(self.categories.len() as u32);
        self.categories.push(CategoryDef {
            name: name.to_string(),
            parents,
        });
        self.category_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register an item definition. Returns its ID.
    pub fn register_definition(
        &mut self,
        name: &str,
        category: Option<CategoryId>,
        default_properties: BTreeMap<PropertyId, i64>,
    ) -> DefinitionId {
        let id = DefinitionId(self.definitions.len() as u32);
        self.definitions.push(DefinitionDef {
            name: name.to_string(),
            category,
            default_properties,
        });
        self.definition_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a currency kind. Returns its ID.
    pub fn register_currency(&mut self, name: &str) -> CurrencyId {
        let id = CurrencyId(self.currencies.len() as u32);
        self.currencies.push(CurrencyDef {
            name: name.to_string(),
        });
        self.currency_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Register a recipe. Returns its ID.
    pub fn register_recipe(&mut self, name: &str, recipe: Recipe) -> RecipeId {
        let id = RecipeId(self.recipes.len() as u32);
        self.recipes.push(recipe);
        self.recipe_name_to_id.insert(name.to_string(), id);
        id
    }

    /// Mutate an existing recipe by name.
    pub fn mutate_recipe<F>(&mut self, name: &str, f: F) -> Result<(), CatalogError>
    where
        F: FnOnce(&mut Recipe),
    {
        let id = self
            .recipe_name_to_id
            .get(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        f(&mut self.recipes[id.0 as usize]);
        Ok(())
    }

    /// Lookup definition ID by name.
    pub fn definition_id(&self, name: &str) -> Option<DefinitionId> {
        self.definition_name_to_id.get(name).copied()
    }

    /// Lookup category ID by name.
    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.category_name_to_id.get(name).copied()
    }

    /// Lookup currency ID by name.
    pub fn currency_id(&self, name: &str) -> Option<CurrencyId> {
        self.currency_name_to_id.get(name).copied()
    }

    /// Lookup recipe ID by name.
    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    fn check_definition(&self, id: DefinitionId) -> Result<(), CatalogError> {
        if id.0 as usize >= self.definitions.len() {
            return Err(CatalogError::InvalidDefinitionRef(id));
        }
        Ok(())
    }

    fn check_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        if id.0 as usize >= self.categories.len() {
            return Err(CatalogError::InvalidCategoryRef(id));
        }
        Ok(())
    }

    /// Finalize and build the immutable catalog.
    ///
    /// Validates every cross-reference: definition categories, category
    /// parents (including acyclicity), and all recipe ingredient, output,
    /// and currency references.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        for def in &self.definitions {
            if let Some(cat) = def.category {
                self.check_category(cat)?;
            }
        }

        for (i, cat) in self.categories.iter().enumerate() {
            for &parent in &cat.parents {
                self.check_category(parent)?;
            }
            if self.reaches(CategoryId(i as u32), CategoryId(i as u32), 0) {
                return Err(CatalogError::CategoryCycle(cat.name.clone()));
            }
        }

        for recipe in &self.recipes {
            for ingredient in &recipe.ingredients.items {
                self.check_definition(ingredient.definition)?;
            }
            for ingredient in &recipe.ingredients.definitions {
                self.check_definition(ingredient.definition)?;
            }
            for ingredient in &recipe.ingredients.categories {
                self.check_category(ingredient.category)?;
            }
            for output in &recipe.outputs {
                self.check_definition(output.definition)?;
            }
            for cost in &recipe.currency_cost {
                if cost.currency.0 as usize >= self.currencies.len() {
                    return Err(CatalogError::InvalidCurrencyRef(cost.currency));
                }
            }
        }

        Ok(Catalog {
            definitions: self.definitions,
            definition_name_to_id: self.definition_name_to_id,
            categories: self.categories,
            category_name_to_id: self.category_name_to_id,
            currencies: self.currencies,
            currency_name_to_id: self.currency_name_to_id,
            recipes: self.recipes,
            recipe_name_to_id: self.recipe_name_to_id,
        })
    }

    /// Whether `target` is reachable from `from` by following parent links,
    /// taking at least one step. Depth-capped so a pre-existing cycle in
    /// unchecked input cannot recurse forever.
    fn reaches(&self, from: CategoryId, target: CategoryId, depth: usize) -> bool {
        if depth > self.categories.len() {
            return true;
        }
        let Some(cat) = self.categories.get(from.0 as usize) else {
            return false;
        };
        cat.parents
            .iter()
            .any(|&p| p == target || self.reaches(p, target, depth + 1))
    }
}

/// Immutable catalog. Frozen after build(). Thread-safe to share.
#[derive(Debug)]
pub struct Catalog {
    definitions: Vec<DefinitionDef>,
    definition_name_to_id: HashMap<String, DefinitionId>,
    categories: Vec<CategoryDef>,
    category_name_to_id: HashMap<String, CategoryId>,
    currencies: Vec<CurrencyDef>,
    currency_name_to_id: HashMap<String, CurrencyId>,
    recipes: Vec<Recipe>,
    recipe_name_to_id: HashMap<String, RecipeId>,
}

impl Catalog {
    pub fn get_definition(&self, id: DefinitionId) -> Option<&DefinitionDef> {
        self.definitions.get(id.0 as usize)
    }

    pub fn get_category(&self, id: CategoryId) -> Option<&CategoryDef> {
        self.categories.get(id.0 as usize)
    }

    pub fn get_currency(&self, id: CurrencyId) -> Option<&CurrencyDef> {
        self.currencies.get(id.0 as usize)
    }

    pub fn get_recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.get(id.0 as usize)
    }

    pub fn definition_id(&self, name: &str) -> Option<DefinitionId> {
        self.definition_name_to_id.get(name).copied()
    }

    pub fn category_id(&self, name: &str) -> Option<CategoryId> {
        self.category_name_to_id.get(name).copied()
    }

    pub fn currency_id(&self, name: &str) -> Option<CurrencyId> {
        self.currency_name_to_id.get(name).copied()
    }

    pub fn recipe_id(&self, name: &str) -> Option<RecipeId> {
        self.recipe_name_to_id.get(name).copied()
    }

    pub fn definition_count(&self) -> usize {
        self.definitions.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Whether `ancestor` strictly contains `descendant` in the category
    /// DAG. A category never contains itself.
    pub fn category_contains(&self, ancestor: CategoryId, descendant: CategoryId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let Some(cat) = self.categories.get(descendant.0 as usize) else {
            return false;
        };
        cat.parents
            .iter()
            .any(|&p| p == ancestor || self.category_contains(ancestor, p))
    }

    /// Whether `category` contains the given definition, either directly or
    /// through the definition's category ancestry.
    pub fn category_contains_definition(
        &self,
        category: CategoryId,
        definition: DefinitionId,
    ) -> bool {
        let Some(def) = self.definitions.get(definition.0 as usize) else {
            return false;
        };
        match def.category {
            Some(direct) => direct == category || self.category_contains(category, direct),
            None => false,
        }
    }

    /// Create a new item stack from a definition template, stamping the
    /// definition's default properties onto it.
    pub fn instantiate(&self, definition: DefinitionId, quantity: u32) -> Option<ItemStack> {
        let def = self.definitions.get(definition.0 as usize)?;
        let mut stack = ItemStack::new(definition, quantity);
        stack.properties = def.default_properties.clone();
        Some(stack)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid definition reference: {0:?}")]
    InvalidDefinitionRef(DefinitionId),
    #[error("invalid category reference: {0:?}")]
    InvalidCategoryRef(CategoryId),
    #[error("invalid currency reference: {0:?}")]
    InvalidCurrencyRef(CurrencyId),
    #[error("category parent cycle through: {0}")]
    CategoryCycle(String),
}
