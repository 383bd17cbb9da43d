//! Composable ingredient matching for crafting recipes.
//!
//! [`Ingredient`] trees decide whether candidate stacks satisfy a recipe and
//! compute what a craft leaves behind. The [`crafting`] module loads recipes
//! built from them, and [`lint`] reports problems in a recipe data directory.

pub mod config;
pub mod crafting;
pub mod error;
pub mod ingredient;
pub mod item;
pub mod lint;
pub mod protocol;

pub use error::{CraftError, DefinitionError, IngredientError};
pub use ingredient::Ingredient;
pub use item::{Actor, ItemStack, LiquidStack};
