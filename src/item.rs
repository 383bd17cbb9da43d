use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Meta value that matches any damage/variant when used in a pattern
pub const WILDCARD_META: u32 = 32767;

fn default_amount() -> i32 {
    1
}

// ============================================================================
// Item Stacks
// ============================================================================

/// A concrete stack of items: identity (id, meta, tag) plus an amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item_id: String,
    #[serde(default)]
    pub meta: u32,
    #[serde(default = "default_amount")]
    pub amount: i32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub tag: Map<String, Value>,
}

impl ItemStack {
    pub fn new(item_id: &str) -> Self {
        Self {
            item_id: item_id.to_string(),
            meta: 0,
            amount: 1,
            tag: Map::new(),
        }
    }

    /// Pattern matching every meta value of the given item
    pub fn wildcard(item_id: &str) -> Self {
        Self::new(item_id).with_meta(WILDCARD_META)
    }

    pub fn with_meta(&self, meta: u32) -> Self {
        Self {
            meta,
            ..self.clone()
        }
    }

    pub fn with_amount(&self, amount: i32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    pub fn with_tag(&self, tag: Map<String, Value>) -> Self {
        Self {
            tag,
            ..self.clone()
        }
    }

    /// An empty stack stands in for "no item" (air, an empty slot)
    pub fn is_empty(&self) -> bool {
        self.item_id.is_empty() || self.amount <= 0
    }

    pub fn is_wildcard(&self) -> bool {
        self.meta == WILDCARD_META
    }

    /// Loose identity comparison, treating `self` as the pattern.
    ///
    /// Wildcard meta accepts any meta and the pattern's tag only has to be
    /// contained in the candidate's tag.
    pub fn matches_identity(&self, candidate: &ItemStack) -> bool {
        self.item_id == candidate.item_id
            && (self.is_wildcard() || self.meta == candidate.meta)
            && tag_contains(&candidate.tag, &self.tag)
    }

    /// Exact identity comparison: id, meta and tag must all be equal
    pub fn matches_identity_exact(&self, candidate: &ItemStack) -> bool {
        self.item_id == candidate.item_id && self.meta == candidate.meta && self.tag == candidate.tag
    }

    pub fn to_command_string(&self) -> String {
        let mut out = if self.is_wildcard() {
            format!("<{}:*>", self.item_id)
        } else if self.meta != 0 {
            format!("<{}:{}>", self.item_id, self.meta)
        } else {
            format!("<{}>", self.item_id)
        };
        if !self.tag.is_empty() {
            out.push_str(&format!(".withTag({})", Value::Object(self.tag.clone())));
        }
        out
    }
}

/// Returns true if every entry of `pattern` is present in `tag`.
/// Nested tables are compared recursively, everything else by equality.
pub fn tag_contains(tag: &Map<String, Value>, pattern: &Map<String, Value>) -> bool {
    pattern.iter().all(|(key, expected)| match (tag.get(key), expected) {
        (Some(Value::Object(actual)), Value::Object(expected)) => tag_contains(actual, expected),
        (Some(actual), expected) => actual == expected,
        (None, _) => false,
    })
}

// ============================================================================
// Liquid Stacks
// ============================================================================

/// A quantity of liquid (amount in millibuckets)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidStack {
    pub liquid_id: String,
    pub amount: i32,
}

impl LiquidStack {
    pub fn new(liquid_id: &str, amount: i32) -> Self {
        Self {
            liquid_id: liquid_id.to_string(),
            amount,
        }
    }

    pub fn with_amount(&self, amount: i32) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }

    pub fn to_command_string(&self) -> String {
        format!("<liquid:{}>", self.liquid_id)
    }
}

// ============================================================================
// Actor
// ============================================================================

/// Whoever triggered a craft. Passed through to legacy transformers untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}
