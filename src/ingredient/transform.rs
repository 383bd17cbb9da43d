//! Item Transformers
//!
//! Two independent transformer kinds exist. Legacy transformers see the
//! actor who triggered the craft; new-style transformers only see the item.
//! Both compute what is left behind for a matched input.

use serde::Deserialize;
use serde_json::Value;

use crate::item::{Actor, ItemStack};

/// Actor-aware transformer
pub trait ItemTransformer: Send + Sync {
    fn apply(&self, item: &ItemStack, actor: Option<&Actor>) -> ItemStack;
}

/// Actor-agnostic transformer
pub trait ItemTransformerNew: Send + Sync {
    fn apply(&self, item: &ItemStack) -> ItemStack;
}

impl<F> ItemTransformer for F
where
    F: Fn(&ItemStack, Option<&Actor>) -> ItemStack + Send + Sync,
{
    fn apply(&self, item: &ItemStack, actor: Option<&Actor>) -> ItemStack {
        self(item, actor)
    }
}

impl<F> ItemTransformerNew for F
where
    F: Fn(&ItemStack) -> ItemStack + Send + Sync,
{
    fn apply(&self, item: &ItemStack) -> ItemStack {
        self(item)
    }
}

// ============================================================================
// Built-in Transformers
// ============================================================================

/// Legacy transformers available to declarative recipe definitions
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Transform {
    /// Leave the matched item in place
    Reuse,
    /// Hand back a different stack (e.g. an empty bucket)
    GiveBack { item: ItemStack },
    /// Leave the item behind with additional damage
    Damage { amount: u32 },
    /// Use the item up
    Consume,
    /// Leave the item behind, stamped with the crafter's name
    Sign,
}

impl ItemTransformer for Transform {
    fn apply(&self, item: &ItemStack, actor: Option<&Actor>) -> ItemStack {
        match self {
            Transform::Reuse => item.clone(),
            Transform::GiveBack { item: given } => given.clone(),
            Transform::Damage { amount } => item.with_meta(item.meta.saturating_add(*amount)),
            Transform::Consume => item.with_amount(0),
            Transform::Sign => match actor {
                Some(actor) => {
                    let mut tag = item.tag.clone();
                    tag.insert("CraftedBy".to_string(), Value::String(actor.name.clone()));
                    item.with_tag(tag)
                }
                None => item.clone(),
            },
        }
    }
}

/// New-style transformers available to declarative recipe definitions
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformNew {
    Replace { item: ItemStack },
    Damage { amount: u32 },
}

impl ItemTransformerNew for TransformNew {
    fn apply(&self, item: &ItemStack) -> ItemStack {
        match self {
            TransformNew::Replace { item: replacement } => replacement.clone(),
            TransformNew::Damage { amount } => item.with_meta(item.meta.saturating_add(*amount)),
        }
    }
}
