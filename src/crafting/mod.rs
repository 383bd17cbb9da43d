//! Crafting System
//!
//! Provides declarative recipe definitions and a registry that matches and
//! crafts them.

pub mod definition;
pub mod registry;

pub use definition::{RawIngredient, RecipeCategory, RecipeDefinition, TagTable};
pub use registry::{CraftOutcome, CraftingRegistry, Slot};
