//! Data-driven catalog loading from JSON.
//!
//! Feature-gated behind `data-loader`. Deserializes game content into a
//! [`CatalogBuilder`]; all cross-references (category parents, definition
//! categories, recipe ingredients and costs) are by name and resolved
//! during loading.

use std::collections::BTreeMap;

use crate::catalog::{CatalogBuilder, CatalogError};
use crate::id::PropertyId;
use crate::recipe::{
    CategoryIngredient, DefinitionIngredient, ItemIngredient, Recipe, RecipeOutput,
};
use crate::wallet::CurrencyAmount;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("unknown category reference: {0}")]
    UnknownCategoryRef(String),
    #[error("unknown definition reference: {0}")]
    UnknownDefinitionRef(String),
    #[error("unknown currency reference: {0}")]
    UnknownCurrencyRef(String),
}

// ---------------------------------------------------------------------------
// JSON data structures
// ---------------------------------------------------------------------------

/// Top-level catalog data structure for JSON deserialization.
#[derive(Debug, serde::Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub categories: Vec<CategoryData>,
    #[serde(default)]
    pub definitions: Vec<DefinitionData>,
    #[serde(default)]
    pub currencies: Vec<CurrencyData>,
    #[serde(default)]
    pub recipes: Vec<RecipeData>,
}

/// JSON representation of an item category. Parents reference earlier
/// categories by name.
#[derive(Debug, serde::Deserialize)]
pub struct CategoryData {
    pub name: String,
    #[serde(default)]
    pub parents: Vec<String>,
}

/// JSON representation of an item definition.
#[derive(Debug, serde::Deserialize)]
pub struct DefinitionData {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>, // references category by name
    #[serde(default)]
    pub properties: Vec<PropertyData>,
}

/// JSON representation of a property value.
#[derive(Debug, serde::Deserialize)]
pub struct PropertyData {
    pub id: u16,
    pub value: i64,
}

/// JSON representation of a currency kind.
#[derive(Debug, serde::Deserialize)]
pub struct CurrencyData {
    pub name: String,
}

/// JSON representation of a recipe.
#[derive(Debug, serde::Deserialize)]
pub struct RecipeData {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ItemIngredientData>,
    #[serde(default)]
    pub definitions: Vec<DefinitionIngredientData>,
    #[serde(default)]
    pub categories: Vec<CategoryIngredientData>,
    #[serde(default)]
    pub outputs: Vec<OutputData>,
    #[serde(default)]
    pub currency_cost: Vec<CurrencyCostData>,
}

/// Exact-item ingredient: definition by name plus required properties.
#[derive(Debug, serde::Deserialize)]
pub struct ItemIngredientData {
    pub definition: String,
    #[serde(default)]
    pub properties: Vec<PropertyData>,
    pub amount: u32,
}

#[derive(Debug, serde::Deserialize)]
pub struct DefinitionIngredientData {
    pub definition: String,
    pub amount: u32,
}

#[derive(Debug, serde::Deserialize)]
pub struct CategoryIngredientData {
    pub category: String,
    pub amount: u32,
}

#[derive(Debug, serde::Deserialize)]
pub struct OutputData {
    pub definition: String,
    pub amount: u32,
}

#[derive(Debug, serde::Deserialize)]
pub struct CurrencyCostData {
    pub currency: String,
    pub amount: u64,
}

// ---------------------------------------------------------------------------
// Loading functions
// ---------------------------------------------------------------------------

/// Load a catalog builder from a JSON string.
pub fn load_catalog_json(json: &str) -> Result<CatalogBuilder, DataLoadError> {
    let data: CatalogData = serde_json::from_str(json)?;
    build_catalog(data)
}

/// Load a catalog builder from JSON bytes.
pub fn load_catalog_json_bytes(bytes: &[u8]) -> Result<CatalogBuilder, DataLoadError> {
    let data: CatalogData = serde_json::from_slice(bytes)?;
    build_catalog(data)
}

fn parse_properties(props: &[PropertyData]) -> BTreeMap<PropertyId, i64> {
    props
        .iter()
        .map(|p| (PropertyId(p.id), p.value))
        .collect()
}

fn build_catalog(data: CatalogData) -> Result<CatalogBuilder, DataLoadError> {
    let mut builder = CatalogBuilder::new();

    // Phase 1: categories (parents resolve against earlier entries)
    for category in &data.categories {
        let mut parents = Vec::with_capacity(category.parents.len());
        for parent in &category.parents {
            let id = builder
                .category_id(parent)
                .ok_or_else(|| DataLoadError::UnknownCategoryRef(parent.clone()))?;
            parents.push(id);
        }
        builder.register_category(&category.name, parents);
    }

    // Phase 2: definitions (resolve category refs by name)
    for definition in &data.definitions {
        let category = match &definition.category {
            Some(name) => Some(
                builder
                    .category_id(name)
                    .ok_or_else(|| DataLoadError::UnknownCategoryRef(name.clone()))?,
            ),
            None => None,
        };
        builder.register_definition(
            &definition.name,
            category,
            parse_properties(&definition.properties),
        );
    }

    // Phase 3: currencies
    for currency in &data.currencies {
        builder.register_currency(&currency.name);
    }

    // Phase 4: recipes (resolve all refs by name)
    for recipe in &data.recipes {
        let mut built = Recipe::new();
        for entry in &recipe.items {
            let definition = builder
                .definition_id(&entry.definition)
                .ok_or_else(|| DataLoadError::UnknownDefinitionRef(entry.definition.clone()))?;
            built = built.with_item_ingredient(ItemIngredient {
                definition,
                properties: parse_properties(&entry.properties),
                amount: entry.amount,
            });
        }
        for entry in &recipe.definitions {
            let definition = builder
                .definition_id(&entry.definition)
                .ok_or_else(|| DataLoadError::UnknownDefinitionRef(entry.definition.clone()))?;
            built = built.with_definition_ingredient(DefinitionIngredient {
                definition,
                amount: entry.amount,
            });
        }
        for entry in &recipe.categories {
            let category = builder
                .category_id(&entry.category)
                .ok_or_else(|| DataLoadError::UnknownCategoryRef(entry.category.clone()))?;
            built = built.with_category_ingredient(CategoryIngredient {
                category,
                amount: entry.amount,
            });
        }
        for entry in &recipe.outputs {
            let definition = builder
                .definition_id(&entry.definition)
                .ok_or_else(|| DataLoadError::UnknownDefinitionRef(entry.definition.clone()))?;
            built = built.with_output(RecipeOutput {
                definition,
                amount: entry.amount,
            });
        }
        for entry in &recipe.currency_cost {
            let currency = builder
                .currency_id(&entry.currency)
                .ok_or_else(|| DataLoadError::UnknownCurrencyRef(entry.currency.clone()))?;
            built = built.with_currency_cost(CurrencyAmount {
                currency,
                amount: entry.amount,
            });
        }
        builder.register_recipe(&recipe.name, built);
    }

    Ok(builder)
}

// ===========================================================================
// Tests
// ===========================================================================
