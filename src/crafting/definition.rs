//! Crafting Recipe Definitions
//!
//! Defines the data structures for crafting recipes, including TOML
//! deserialization (Raw*) and resolved versions whose ingredients are
//! built into [`Ingredient`] trees.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::DefinitionError;
use crate::ingredient::{Condition, Ingredient, Transform, TransformNew};
use crate::item::{ItemStack, LiquidStack, WILDCARD_META};

/// Tag groups by name, as loaded from the tags directory
pub type TagTable = HashMap<String, Vec<ItemStack>>;

/// Recipe categories for UI organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecipeCategory {
    Consumables,
    #[default]
    Materials,
    Equipment,
    Tools,
}

impl RecipeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipeCategory::Consumables => "consumables",
            RecipeCategory::Materials => "materials",
            RecipeCategory::Equipment => "equipment",
            RecipeCategory::Tools => "tools",
        }
    }
}

// ============================================================================
// Raw TOML Structures
// ============================================================================

fn default_count() -> i32 {
    1
}

/// Meta is either a number or `"*"` for any
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawMeta {
    Value(u32),
    Pattern(String),
}

impl RawMeta {
    fn resolve(&self) -> Result<u32, DefinitionError> {
        match self {
            RawMeta::Value(meta) => Ok(*meta),
            RawMeta::Pattern(p) if p == "*" => Ok(WILDCARD_META),
            RawMeta::Pattern(p) => Err(DefinitionError::InvalidMeta(p.clone())),
        }
    }
}

/// Raw ingredient entry from TOML.
///
/// Exactly one of `item`, `liquid`, `tag`, `any` or `one_of` names the
/// identity; everything else decorates it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawIngredient {
    pub item: Option<String>,
    pub liquid: Option<String>,
    pub tag: Option<String>,
    #[serde(default)]
    pub any: bool,
    pub one_of: Option<Vec<RawIngredient>>,
    pub meta: Option<RawMeta>,
    #[serde(default)]
    pub nbt: Map<String, Value>,
    #[serde(default = "default_count")]
    pub count: i32,
    pub mark: Option<String>,
    #[serde(default)]
    pub only: Vec<Condition>,
    pub transform: Option<Transform>,
    pub transform_new: Option<TransformNew>,
}

impl RawIngredient {
    /// Build the ingredient tree described by this entry
    pub fn build(&self, tags: &TagTable) -> Result<Ingredient, DefinitionError> {
        let identities = [
            self.item.is_some(),
            self.liquid.is_some(),
            self.tag.is_some(),
            self.any,
            self.one_of.is_some(),
        ]
        .iter()
        .filter(|named| **named)
        .count();
        if identities != 1 {
            return Err(DefinitionError::Identity(identities));
        }

        let mut ingredient = if let Some(item_id) = &self.item {
            let meta = match &self.meta {
                Some(meta) => meta.resolve()?,
                None => 0,
            };
            Ingredient::item(ItemStack::new(item_id).with_meta(meta).with_tag(self.nbt.clone()))
        } else if let Some(liquid_id) = &self.liquid {
            Ingredient::liquid(LiquidStack::new(liquid_id, self.count))?
        } else if let Some(name) = &self.tag {
            let members = tags
                .get(name)
                .ok_or_else(|| DefinitionError::UnknownTag(name.clone()))?;
            Ingredient::tag(name, members.clone())
        } else if let Some(options) = &self.one_of {
            let built = options
                .iter()
                .map(|option| option.build(tags))
                .collect::<Result<Vec<_>, _>>()?;
            Ingredient::any_of(built)?
        } else {
            Ingredient::any()
        };

        for condition in &self.only {
            ingredient = ingredient.only(condition.clone());
        }
        if let Some(transform) = &self.transform {
            ingredient = ingredient.transform(transform.clone());
        }
        if let Some(transform) = &self.transform_new {
            ingredient = ingredient.transform_new(transform.clone());
        }
        if let Some(mark) = &self.mark {
            ingredient = ingredient.marked(mark);
        }
        if self.liquid.is_none() && self.count != 1 {
            ingredient = ingredient.with_amount(self.count)?;
        }

        Ok(ingredient)
    }
}

/// Raw result entry from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    pub item_id: String,
    #[serde(default)]
    pub meta: u32,
    #[serde(default = "default_count")]
    pub count: i32,
}

/// Raw recipe definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecipeDefinition {
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: RecipeCategory,
    #[serde(default)]
    pub ingredients: Vec<RawIngredient>,
    #[serde(default)]
    pub results: Vec<RawResult>,
}

// ============================================================================
// Resolved Structures
// ============================================================================

/// A fully resolved recipe definition
#[derive(Debug, Clone)]
pub struct RecipeDefinition {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub category: RecipeCategory,
    pub ingredients: Vec<Ingredient>,
    pub results: Vec<ItemStack>,
}

impl RecipeDefinition {
    /// Create a resolved RecipeDefinition from raw TOML data
    pub fn from_raw(id: &str, raw: &RawRecipeDefinition, tags: &TagTable) -> Result<Self, DefinitionError> {
        if raw.ingredients.is_empty() {
            return Err(DefinitionError::NoIngredients(id.to_string()));
        }

        Ok(Self {
            id: id.to_string(),
            display_name: raw
                .display_name
                .clone()
                .unwrap_or_else(|| id.replace('_', " ")),
            description: raw.description.clone().unwrap_or_default(),
            category: raw.category,
            ingredients: raw
                .ingredients
                .iter()
                .map(|i| i.build(tags))
                .collect::<Result<_, _>>()?,
            results: raw
                .results
                .iter()
                .map(|r| ItemStack::new(&r.item_id).with_meta(r.meta).with_amount(r.count))
                .collect(),
        })
    }

    /// Recipe expressed as script commands, one ingredient per entry
    pub fn to_command_strings(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(Ingredient::to_command_string)
            .collect()
    }
}
