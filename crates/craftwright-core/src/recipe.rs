//! Recipe data: ingredient requirements at three specificity levels,
//! output templates, and an optional currency cost.
//!
//! A requirement's specificity decides when it gets to claim stacks during
//! resolution: exact items first, then definitions, then categories (with
//! categories themselves sorted most-specific-first, see
//! [`crate::matcher::sort_categories_by_specificity`]).

use crate::id::{CategoryId, DefinitionId, PropertyId};
use crate::wallet::CurrencyAmount;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Requires stacks value-equivalent to an exact item: same definition and
/// identical property values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIngredient {
    pub definition: DefinitionId,
    /// Property values the matched stack must carry exactly.
    #[serde(default)]
    pub properties: BTreeMap<PropertyId, i64>,
    /// Amount required per crafted unit.
    pub amount: u32,
}

/// Requires stacks of a given definition, regardless of properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionIngredient {
    pub definition: DefinitionId,
    pub amount: u32,
}

/// Requires stacks whose definition belongs to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryIngredient {
    pub category: CategoryId,
    pub amount: u32,
}

/// The three ordered requirement lists of one recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredients {
    #[serde(default)]
    pub items: Vec<ItemIngredient>,
    #[serde(default)]
    pub definitions: Vec<DefinitionIngredient>,
    #[serde(default)]
    pub categories: Vec<CategoryIngredient>,
}

impl Ingredients {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.definitions.is_empty() && self.categories.is_empty()
    }
}

/// An output template: a definition instantiated with `amount * quantity`
/// at craft time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeOutput {
    pub definition: DefinitionId,
    pub amount: u32,
}

/// A crafting recipe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub ingredients: Ingredients,
    #[serde(default)]
    pub outputs: Vec<RecipeOutput>,
    /// Currency cost per crafted unit. Empty means free of currency.
    #[serde(default)]
    pub currency_cost: Vec<CurrencyAmount>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item_ingredient(mut self, ingredient: ItemIngredient) -> Self {
        self.ingredients.items.push(ingredient);
        self
    }

    pub fn with_definition_ingredient(mut self, ingredient: DefinitionIngredient) -> Self {
        self.ingredients.definitions.push(ingredient);
        self
    }

    pub fn with_category_ingredient(mut self, ingredient: CategoryIngredient) -> Self {
        self.ingredients.categories.push(ingredient);
        self
    }

    pub fn with_output(mut self, output: RecipeOutput) -> Self {
        self.outputs.push(output);
        self
    }

    pub fn with_currency_cost(mut self, cost: CurrencyAmount) -> Self {
        self.currency_cost.push(cost);
        self
    }
}
