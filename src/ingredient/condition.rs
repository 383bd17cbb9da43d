//! Item Conditions
//!
//! Predicates used by filtered ingredients. Anything implementing
//! [`ItemCondition`] can be passed to `Ingredient::only`, including plain
//! closures; [`Condition`] covers the ones recipe files can name.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::item::{tag_contains, ItemStack};

/// Extra requirement a candidate stack has to satisfy
pub trait ItemCondition: Send + Sync {
    fn matches(&self, item: &ItemStack) -> bool;
}

impl<F> ItemCondition for F
where
    F: Fn(&ItemStack) -> bool + Send + Sync,
{
    fn matches(&self, item: &ItemStack) -> bool {
        self(item)
    }
}

/// Conditions available to declarative recipe definitions
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    DamageAtLeast { value: u32 },
    DamageAtMost { value: u32 },
    Damaged,
    HasTag { tag: Map<String, Value> },
}

impl ItemCondition for Condition {
    fn matches(&self, item: &ItemStack) -> bool {
        match self {
            Condition::DamageAtLeast { value } => item.meta >= *value,
            Condition::DamageAtMost { value } => item.meta <= *value,
            Condition::Damaged => item.meta > 0,
            Condition::HasTag { tag } => tag_contains(&item.tag, tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_conditions() {
        let worn = ItemStack::new("pickaxe").with_meta(12);

        assert!(Condition::DamageAtLeast { value: 10 }.matches(&worn));
        assert!(!Condition::DamageAtMost { value: 10 }.matches(&worn));
        assert!(Condition::Damaged.matches(&worn));
        assert!(!Condition::Damaged.matches(&ItemStack::new("pickaxe")));
    }

    #[test]
    fn test_parse_condition() {
        let parsed: Condition = toml::from_str(
            r#"
            type = "has_tag"
            tag = { Unbreakable = 1 }
        "#,
        )
        .unwrap();

        let mut tag = Map::new();
        tag.insert("Unbreakable".to_string(), Value::from(1));
        assert!(parsed.matches(&ItemStack::new("sword").with_tag(tag)));
        assert!(!parsed.matches(&ItemStack::new("sword")));
    }

    #[test]
    fn test_closure_condition() {
        let named = |item: &ItemStack| item.item_id.ends_with("_ingot");
        assert!(named.matches(&ItemStack::new("iron_ingot")));
        assert!(!named.matches(&ItemStack::new("iron_ore")));
    }
}
