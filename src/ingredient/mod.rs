//! Ingredient Algebra
//!
//! An [`Ingredient`] is an immutable tree: a base identity rule wrapped by
//! decorators (quantity, mark, filter, transform) and combined with
//! alternatives. Every builder returns a new tree and leaves `self` alone,
//! so a built ingredient can be shared freely between threads.
//!
//! Quantity decorators are kept outermost: marking, filtering or transforming
//! a quantity pushes the new decorator below it, so the amount check always
//! runs before any identity comparison.
//!
//! Stacking two transform decorators of the same kind keeps both in the tree,
//! but only the last one applied is invoked. This is logged when it happens.

pub mod condition;
pub mod transform;

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::IngredientError;
use crate::item::{Actor, ItemStack, LiquidStack};

pub use condition::{Condition, ItemCondition};
pub use transform::{ItemTransformer, ItemTransformerNew, Transform, TransformNew};

// ============================================================================
// Base Identity Rules
// ============================================================================

/// Raw identity rule at the bottom of every ingredient
#[derive(Debug, Clone, PartialEq)]
pub enum Base {
    /// A single item pattern (`<id>`, `<id:meta>`, `<id:*>`)
    Item(ItemStack),
    /// A liquid with a required amount
    Liquid(LiquidStack),
    /// A named group of item patterns, resolved when the ingredient is built
    Tag { name: String, members: Vec<ItemStack> },
    /// Any non-empty item
    Any,
}

impl Base {
    fn accepts(&self, item: &ItemStack, exact: bool) -> bool {
        let identity = |pattern: &ItemStack| {
            if exact {
                pattern.matches_identity_exact(item)
            } else {
                pattern.matches_identity(item)
            }
        };

        match self {
            Base::Item(pattern) => identity(pattern),
            Base::Tag { members, .. } => members.iter().any(identity),
            Base::Any => true,
            Base::Liquid(_) => false,
        }
    }

    fn to_command_string(&self) -> String {
        match self {
            Base::Item(pattern) => pattern.to_command_string(),
            Base::Liquid(liquid) if liquid.amount == 1 => liquid.to_command_string(),
            Base::Liquid(liquid) => format!("{} * {}", liquid.to_command_string(), liquid.amount),
            Base::Tag { name, .. } => format!("<ore:{}>", name),
            Base::Any => "<*>".to_string(),
        }
    }
}

// ============================================================================
// Ingredient Tree
// ============================================================================

#[derive(Clone)]
enum Node {
    Base(Base),
    Quantity {
        inner: Box<Ingredient>,
        amount: i32,
    },
    Marked {
        inner: Box<Ingredient>,
        mark: String,
    },
    Filtered {
        inner: Box<Ingredient>,
        condition: Arc<dyn ItemCondition>,
    },
    Transformed {
        inner: Box<Ingredient>,
        transformer: Arc<dyn ItemTransformer>,
    },
    TransformedNew {
        inner: Box<Ingredient>,
        transformer: Arc<dyn ItemTransformerNew>,
    },
    Or(Vec<Ingredient>),
}

impl Node {
    /// The wrapped ingredient, for decorators
    fn child(&self) -> Option<&Ingredient> {
        match self {
            Node::Quantity { inner, .. }
            | Node::Marked { inner, .. }
            | Node::Filtered { inner, .. }
            | Node::Transformed { inner, .. }
            | Node::TransformedNew { inner, .. } => Some(inner),
            Node::Base(_) | Node::Or(_) => None,
        }
    }
}

/// A crafting requirement that matches, and optionally transforms, items
#[derive(Clone)]
pub struct Ingredient(Node);

/// What an ingredient wraps, for tooling that needs to look inside
#[derive(Debug, Clone, Copy)]
pub enum Internal<'a> {
    Ingredient(&'a Ingredient),
    Base(&'a Base),
    Alternatives(&'a [Ingredient]),
}

impl Ingredient {
    /// Ingredient matching one item pattern. The stack's amount is ignored,
    /// use [`Ingredient::with_amount`] to require more than one.
    pub fn item(pattern: ItemStack) -> Self {
        Ingredient(Node::Base(Base::Item(pattern.with_amount(1))))
    }

    pub fn liquid(liquid: LiquidStack) -> Result<Self, IngredientError> {
        if liquid.amount < 0 {
            return Err(IngredientError::NegativeAmount(liquid.amount));
        }
        Ok(Ingredient(Node::Base(Base::Liquid(liquid))))
    }

    pub fn tag(name: &str, members: Vec<ItemStack>) -> Self {
        Ingredient(Node::Base(Base::Tag {
            name: name.to_string(),
            members: members.into_iter().map(|m| m.with_amount(1)).collect(),
        }))
    }

    pub fn any() -> Self {
        Ingredient(Node::Base(Base::Any))
    }

    /// Alternatives combinator. Nested alternatives are flattened.
    pub fn any_of(options: Vec<Ingredient>) -> Result<Self, IngredientError> {
        let mut flat = Vec::with_capacity(options.len());
        for option in options {
            match option.0 {
                Node::Or(children) => flat.extend(children),
                node => flat.push(Ingredient(node)),
            }
        }
        if flat.len() < 2 {
            return Err(IngredientError::TooFewAlternatives(flat.len()));
        }
        Ok(Ingredient(Node::Or(flat)))
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    pub fn amount(&self) -> i32 {
        match &self.0 {
            Node::Base(Base::Liquid(liquid)) => liquid.amount,
            Node::Base(_) | Node::Or(_) => 1,
            Node::Quantity { amount, .. } => *amount,
            node => node.child().map_or(1, Ingredient::amount),
        }
    }

    /// Same rule, requiring exactly `amount` units. An amount of zero is
    /// allowed and never fails the quantity check, but candidates are still
    /// checked for emptiness first, so a zero-amount stack never matches.
    pub fn with_amount(&self, amount: i32) -> Result<Self, IngredientError> {
        if amount < 0 {
            return Err(IngredientError::NegativeAmount(amount));
        }
        let node = match &self.0 {
            Node::Quantity { inner, .. } => Node::Quantity {
                inner: inner.clone(),
                amount,
            },
            Node::Base(Base::Liquid(liquid)) => Node::Base(Base::Liquid(liquid.with_amount(amount))),
            _ => Node::Quantity {
                inner: Box::new(self.clone()),
                amount,
            },
        };
        Ok(Ingredient(node))
    }

    /// Units consumed when `item` is matched. Alternatives report the amount
    /// of the first option that accepts the item.
    pub fn amount_for(&self, item: &ItemStack) -> i32 {
        match &self.0 {
            Node::Or(options) => options
                .iter()
                .find(|o| o.matches(item))
                .map_or(1, |o| o.amount_for(item)),
            Node::Base(_) | Node::Quantity { .. } => self.amount(),
            node => node.child().map_or(1, |inner| inner.amount_for(item)),
        }
    }

    pub fn mark(&self) -> Option<&str> {
        match &self.0 {
            Node::Marked { mark, .. } => Some(mark.as_str()),
            node => node.child().and_then(Ingredient::mark),
        }
    }

    /// Same rule carrying `mark`. Re-marking replaces the previous mark.
    pub fn marked(&self, mark: &str) -> Self {
        match &self.0 {
            Node::Quantity { inner, amount } => Ingredient(Node::Quantity {
                inner: Box::new(inner.marked(mark)),
                amount: *amount,
            }),
            Node::Marked { inner, .. } => Ingredient(Node::Marked {
                inner: inner.clone(),
                mark: mark.to_string(),
            }),
            _ => Ingredient(Node::Marked {
                inner: Box::new(self.clone()),
                mark: mark.to_string(),
            }),
        }
    }

    /// Narrow matches to candidates that also satisfy `condition`
    pub fn only<C>(&self, condition: C) -> Self
    where
        C: ItemCondition + 'static,
    {
        self.only_shared(Arc::new(condition))
    }

    fn only_shared(&self, condition: Arc<dyn ItemCondition>) -> Self {
        match &self.0 {
            Node::Quantity { inner, amount } => Ingredient(Node::Quantity {
                inner: Box::new(inner.only_shared(condition)),
                amount: *amount,
            }),
            _ => Ingredient(Node::Filtered {
                inner: Box::new(self.clone()),
                condition,
            }),
        }
    }

    /// Attach a legacy (actor-aware) transformer.
    ///
    /// If the chain already has one, the new transformer is the one invoked.
    pub fn transform<T>(&self, transformer: T) -> Self
    where
        T: ItemTransformer + 'static,
    {
        self.transform_shared(Arc::new(transformer))
    }

    fn transform_shared(&self, transformer: Arc<dyn ItemTransformer>) -> Self {
        match &self.0 {
            Node::Quantity { inner, amount } => Ingredient(Node::Quantity {
                inner: Box::new(inner.transform_shared(transformer)),
                amount: *amount,
            }),
            _ => {
                if self.has_transformers() {
                    warn!("{} already has a transformer, the new one shadows it", self);
                }
                Ingredient(Node::Transformed {
                    inner: Box::new(self.clone()),
                    transformer,
                })
            }
        }
    }

    /// Attach a new-style transformer. Last applied wins, as with [`Ingredient::transform`].
    pub fn transform_new<T>(&self, transformer: T) -> Self
    where
        T: ItemTransformerNew + 'static,
    {
        self.transform_new_shared(Arc::new(transformer))
    }

    fn transform_new_shared(&self, transformer: Arc<dyn ItemTransformerNew>) -> Self {
        match &self.0 {
            Node::Quantity { inner, amount } => Ingredient(Node::Quantity {
                inner: Box::new(inner.transform_new_shared(transformer)),
                amount: *amount,
            }),
            _ => {
                if self.has_new_transformers() {
                    warn!("{} already has a new-style transformer, the new one shadows it", self);
                }
                Ingredient(Node::TransformedNew {
                    inner: Box::new(self.clone()),
                    transformer,
                })
            }
        }
    }

    /// Either `self` or `other`, flattened into a single alternatives node
    pub fn or(&self, other: Ingredient) -> Self {
        let mut options = Vec::new();
        for ingredient in [self.clone(), other] {
            match ingredient.0 {
                Node::Or(children) => options.extend(children),
                node => options.push(Ingredient(node)),
            }
        }
        Ingredient(Node::Or(options))
    }

    // ------------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------------

    /// Loose match: wildcard meta and partial tags are accepted
    pub fn matches<'a>(&self, candidate: impl Into<Option<&'a ItemStack>>) -> bool {
        match candidate.into() {
            Some(item) if !item.is_empty() => self.accepts(item, false),
            _ => false,
        }
    }

    /// Strict match: id, meta and tag must equal the pattern
    pub fn matches_exact<'a>(&self, candidate: impl Into<Option<&'a ItemStack>>) -> bool {
        match candidate.into() {
            Some(item) if !item.is_empty() => self.accepts(item, true),
            _ => false,
        }
    }

    fn accepts(&self, item: &ItemStack, exact: bool) -> bool {
        match &self.0 {
            Node::Base(base) => base.accepts(item, exact),
            Node::Quantity { inner, amount } => item.amount >= *amount && inner.accepts(item, exact),
            Node::Filtered { inner, condition } => inner.accepts(item, exact) && condition.matches(item),
            Node::Marked { inner, .. } | Node::Transformed { inner, .. } | Node::TransformedNew { inner, .. } => {
                inner.accepts(item, exact)
            }
            Node::Or(options) => options.iter().any(|o| o.accepts(item, exact)),
        }
    }

    /// Only liquid bases (directly, under a mark, or as an alternative) accept liquids
    pub fn matches_liquid(&self, liquid: &LiquidStack) -> bool {
        match &self.0 {
            Node::Base(Base::Liquid(required)) => {
                required.liquid_id == liquid.liquid_id && liquid.amount >= required.amount
            }
            Node::Marked { inner, .. } => inner.matches_liquid(liquid),
            Node::Or(options) => options.iter().any(|o| o.matches_liquid(liquid)),
            Node::Base(_)
            | Node::Quantity { .. }
            | Node::Filtered { .. }
            | Node::Transformed { .. }
            | Node::TransformedNew { .. } => false,
        }
    }

    /// True if everything `other` accepts is also accepted by `self`.
    /// Used to find overlapping recipes.
    pub fn contains(&self, other: &Ingredient) -> bool {
        match &self.0 {
            Node::Base(Base::Any) => !other.items().is_empty() || other.liquids().is_empty(),
            Node::Base(Base::Liquid(required)) => {
                let liquids = other.liquids();
                other.items().is_empty()
                    && !liquids.is_empty()
                    && liquids
                        .iter()
                        .all(|l| l.liquid_id == required.liquid_id && l.amount >= required.amount)
            }
            Node::Base(base) => {
                let items = other.items();
                !items.is_empty() && items.iter().all(|item| base.accepts(item, false))
            }
            Node::Quantity { inner, amount } => other.amount() >= *amount && inner.contains(other),
            Node::Or(options) => match &other.0 {
                Node::Or(others) => others.iter().all(|o| options.iter().any(|s| s.contains(o))),
                _ => options.iter().any(|s| s.contains(other)),
            },
            node => node.child().is_some_and(|inner| inner.contains(other)),
        }
    }

    // ------------------------------------------------------------------------
    // Enumeration
    // ------------------------------------------------------------------------

    /// Concrete stacks this ingredient can match, for display in tooling.
    /// `<*>` enumerates nothing.
    pub fn items(&self) -> Vec<ItemStack> {
        match &self.0 {
            Node::Base(Base::Item(pattern)) => vec![pattern.clone()],
            Node::Base(Base::Tag { members, .. }) => members.clone(),
            Node::Base(_) => Vec::new(),
            Node::Quantity { inner, amount } => inner
                .items()
                .into_iter()
                .map(|item| item.with_amount(*amount))
                .collect(),
            Node::Or(options) => options.iter().flat_map(Ingredient::items).collect(),
            node => node.child().map(Ingredient::items).unwrap_or_default(),
        }
    }

    /// Fresh copies of [`Ingredient::items`], each stamped with this ingredient's amount
    pub fn item_array(&self) -> Vec<ItemStack> {
        let amount = self.amount();
        self.items()
            .into_iter()
            .map(|item| item.with_amount(amount))
            .collect()
    }

    pub fn liquids(&self) -> Vec<LiquidStack> {
        match &self.0 {
            Node::Base(Base::Liquid(liquid)) => vec![liquid.clone()],
            Node::Marked { inner, .. } => inner.liquids(),
            Node::Or(options) => options.iter().flat_map(Ingredient::liquids).collect(),
            _ => Vec::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Transformation
    // ------------------------------------------------------------------------

    /// Run the legacy transformer for a matched item. Alternatives use the
    /// first option that both matches the item and carries a transformer.
    pub fn apply_transform(&self, item: &ItemStack, actor: Option<&Actor>) -> Result<ItemStack, IngredientError> {
        self.try_apply_transform(item, actor)
            .ok_or(IngredientError::NoTransformer)
    }

    /// Like [`Ingredient::apply_transform`], but `None` when the rule that
    /// accepts `item` has no legacy transformer
    pub fn try_apply_transform(&self, item: &ItemStack, actor: Option<&Actor>) -> Option<ItemStack> {
        match &self.0 {
            Node::Transformed { transformer, .. } => Some(transformer.apply(item, actor)),
            Node::Base(_) => None,
            Node::Or(options) => options
                .iter()
                .find(|o| o.has_transformers() && o.matches(item))?
                .try_apply_transform(item, actor),
            node => node.child()?.try_apply_transform(item, actor),
        }
    }

    pub fn apply_new_transform(&self, item: &ItemStack) -> Result<ItemStack, IngredientError> {
        self.try_apply_new_transform(item)
            .ok_or(IngredientError::NoNewTransformer)
    }

    pub fn try_apply_new_transform(&self, item: &ItemStack) -> Option<ItemStack> {
        match &self.0 {
            Node::TransformedNew { transformer, .. } => Some(transformer.apply(item)),
            Node::Base(_) => None,
            Node::Or(options) => options
                .iter()
                .find(|o| o.has_new_transformers() && o.matches(item))?
                .try_apply_new_transform(item),
            node => node.child()?.try_apply_new_transform(item),
        }
    }

    pub fn has_transformers(&self) -> bool {
        match &self.0 {
            Node::Transformed { .. } => true,
            Node::Or(options) => options.iter().any(Ingredient::has_transformers),
            node => node.child().is_some_and(Ingredient::has_transformers),
        }
    }

    pub fn has_new_transformers(&self) -> bool {
        match &self.0 {
            Node::TransformedNew { .. } => true,
            Node::Or(options) => options.iter().any(Ingredient::has_new_transformers),
            node => node.child().is_some_and(Ingredient::has_new_transformers),
        }
    }

    // ------------------------------------------------------------------------
    // Tooling
    // ------------------------------------------------------------------------

    /// Script expression that re-declares this ingredient. Conditions and
    /// transformers are code, so they are not part of the string.
    pub fn to_command_string(&self) -> String {
        match &self.0 {
            Node::Base(base) => base.to_command_string(),
            Node::Quantity { inner, amount } => match &inner.0 {
                Node::Or(_) => format!("({}) * {}", inner.to_command_string(), amount),
                _ => format!("{} * {}", inner.to_command_string(), amount),
            },
            Node::Marked { inner, mark } => format!("{}.marked({:?})", inner.to_command_string(), mark),
            Node::Filtered { inner, .. } | Node::Transformed { inner, .. } | Node::TransformedNew { inner, .. } => {
                inner.to_command_string()
            }
            Node::Or(options) => options
                .iter()
                .map(Ingredient::to_command_string)
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    pub fn internal(&self) -> Internal<'_> {
        match &self.0 {
            Node::Base(base) => Internal::Base(base),
            Node::Or(options) => Internal::Alternatives(options),
            node => match node.child() {
                Some(inner) => Internal::Ingredient(inner),
                None => Internal::Alternatives(&[]),
            },
        }
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_command_string())
    }
}

impl fmt::Debug for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Node::Base(base) => f.debug_tuple("Base").field(base).finish(),
            Node::Quantity { inner, amount } => f
                .debug_struct("Quantity")
                .field("inner", inner)
                .field("amount", amount)
                .finish(),
            Node::Marked { inner, mark } => f
                .debug_struct("Marked")
                .field("inner", inner)
                .field("mark", mark)
                .finish(),
            Node::Filtered { inner, .. } => f.debug_struct("Filtered").field("inner", inner).finish_non_exhaustive(),
            Node::Transformed { inner, .. } => f.debug_struct("Transformed").field("inner", inner).finish_non_exhaustive(),
            Node::TransformedNew { inner, .. } => f
                .debug_struct("TransformedNew")
                .field("inner", inner)
                .finish_non_exhaustive(),
            Node::Or(options) => f.debug_tuple("Or").field(options).finish(),
        }
    }
}
