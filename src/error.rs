/// Contract violations raised while building or applying ingredients
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IngredientError {
    #[error("ingredient amount cannot be negative (got {0})")]
    NegativeAmount(i32),
    #[error("an alternative ingredient needs at least two options (got {0})")]
    TooFewAlternatives(usize),
    #[error("ingredient has no transformer")]
    NoTransformer,
    #[error("ingredient has no new-style transformer")]
    NoNewTransformer,
}

/// Problems turning a declarative ingredient into an ingredient tree
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("ingredient must name exactly one of item, liquid, tag, any or one_of (found {0})")]
    Identity(usize),
    #[error("unknown tag group '{0}'")]
    UnknownTag(String),
    #[error("invalid meta '{0}', expected an integer or \"*\"")]
    InvalidMeta(String),
    #[error("recipe '{0}' has no ingredients")]
    NoIngredients(String),
    #[error(transparent)]
    Ingredient(#[from] IngredientError),
}

/// Reasons a craft request cannot be fulfilled
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CraftError {
    #[error("recipe '{0}' not found")]
    RecipeNotFound(String),
    #[error("missing ingredients for recipe '{0}'")]
    MissingIngredients(String),
    #[error(transparent)]
    Transform(#[from] IngredientError),
}
