//! Crafting Recipe Registry
//!
//! Loads and caches recipe definitions and tag groups from TOML files,
//! detects overlapping recipes and performs shapeless crafts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::definition::{RawRecipeDefinition, RecipeCategory, RecipeDefinition, TagTable};
use crate::error::CraftError;
use crate::ingredient::Ingredient;
use crate::item::{Actor, ItemStack, LiquidStack};
use crate::protocol::SingleError;

/// Which input an ingredient was matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Item(usize),
    Liquid(usize),
}

/// Everything produced by a successful craft
#[derive(Debug, Clone, PartialEq)]
pub struct CraftOutcome {
    pub recipe_id: String,
    /// Recipe results
    pub results: Vec<ItemStack>,
    /// Input stacks after consumption, index-aligned with the inputs
    pub remaining: Vec<ItemStack>,
    pub remaining_liquids: Vec<LiquidStack>,
    /// Non-empty stacks produced by ingredient transformers
    pub returned: Vec<ItemStack>,
    /// Consumed stack for every marked ingredient, by mark
    pub marked: HashMap<String, ItemStack>,
    pub marked_liquids: HashMap<String, LiquidStack>,
}

/// Registry for all recipe definitions
pub struct CraftingRegistry {
    recipes: HashMap<String, RecipeDefinition>,
    tags: TagTable,
}

impl CraftingRegistry {
    pub fn new() -> Self {
        Self {
            recipes: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    /// Load all tag groups from `<data_dir>/tags`.
    ///
    /// Unreadable directories are fatal; files that fail to parse are
    /// reported as diagnostics and skipped.
    pub fn load_tags_from_directory(&mut self, data_dir: &Path) -> Result<Vec<SingleError>, String> {
        let mut diagnostics = Vec::new();

        for path in toml_files(&data_dir.join("tags"))? {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

            let table: TagTable = match toml::from_str(&content) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    diagnostics.push(parse_error(&path, &content, &e));
                    continue;
                }
            };

            for (name, members) in table {
                if self.tags.contains_key(&name) {
                    warn!("Duplicate tag '{}' in {:?}, overwriting", name, path);
                }
                debug!("Loaded tag: {} ({} members)", name, members.len());
                self.tags.insert(name, members);
            }
        }

        info!("Loaded {} tag groups", self.tags.len());

        Ok(diagnostics)
    }

    /// Load all recipe definitions from `<data_dir>/recipes`.
    ///
    /// Tags must be loaded first. Recipes that fail to build are reported as
    /// diagnostics and left out of the registry.
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<Vec<SingleError>, String> {
        let mut diagnostics = Vec::new();

        for path in toml_files(&data_dir.join("recipes"))? {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

            // Parse as table of recipes
            let table: HashMap<String, RawRecipeDefinition> = match toml::from_str(&content) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Failed to parse {:?}: {}", path, e);
                    diagnostics.push(parse_error(&path, &content, &e));
                    continue;
                }
            };

            let mut ids: Vec<_> = table.keys().cloned().collect();
            ids.sort();

            for id in ids {
                let raw = &table[&id];
                let recipe = match RecipeDefinition::from_raw(&id, raw, &self.tags) {
                    Ok(recipe) => recipe,
                    Err(e) => {
                        warn!("Skipping recipe '{}' in {:?}: {}", id, path, e);
                        let line = header_line(&content, &id);
                        diagnostics.push(SingleError::error(
                            &path.display().to_string(),
                            line,
                            0,
                            &format!("recipe '{}': {}", id, e),
                        ));
                        continue;
                    }
                };

                if self.recipes.contains_key(&id) {
                    warn!("Duplicate recipe ID '{}' in {:?}, overwriting", id, path);
                }
                info!(
                    "Loaded recipe: {} ({}) - {} ingredients -> {} results",
                    recipe.display_name,
                    id,
                    recipe.ingredients.len(),
                    recipe.results.len()
                );
                self.recipes.insert(id, recipe);
            }
        }

        info!("Loaded {} recipe definitions", self.recipes.len());

        Ok(diagnostics)
    }

    /// Register a recipe built in code, replacing any recipe with the same ID
    pub fn insert(&mut self, recipe: RecipeDefinition) {
        if self.recipes.contains_key(&recipe.id) {
            warn!("Duplicate recipe ID '{}', overwriting", recipe.id);
        }
        self.recipes.insert(recipe.id.clone(), recipe);
    }

    /// Get a recipe definition by ID
    pub fn get(&self, id: &str) -> Option<&RecipeDefinition> {
        self.recipes.get(id)
    }

    /// Get all recipe IDs
    pub fn ids(&self) -> impl Iterator<Item = &String> {
        self.recipes.keys()
    }

    /// Get all recipes
    pub fn all(&self) -> impl Iterator<Item = &RecipeDefinition> {
        self.recipes.values()
    }

    /// Get recipes by category
    pub fn by_category(&self, category: RecipeCategory) -> Vec<&RecipeDefinition> {
        self.recipes
            .values()
            .filter(|r| r.category == category)
            .collect()
    }

    /// Get the members of a tag group
    pub fn tag(&self, name: &str) -> Option<&[ItemStack]> {
        self.tags.get(name).map(Vec::as_slice)
    }

    /// Check if a recipe exists
    pub fn contains(&self, id: &str) -> bool {
        self.recipes.contains_key(id)
    }

    /// Get the number of loaded recipes
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    fn sorted(&self) -> Vec<&RecipeDefinition> {
        let mut recipes: Vec<_> = self.recipes.values().collect();
        recipes.sort_by(|a, b| a.id.cmp(&b.id));
        recipes
    }

    /// Pairs of recipes where one accepts every input arrangement the other does
    pub fn conflicts(&self) -> Vec<(String, String)> {
        let recipes = self.sorted();
        let mut conflicts = Vec::new();

        for (i, a) in recipes.iter().enumerate() {
            for b in &recipes[i + 1..] {
                if subsumes(&a.ingredients, &b.ingredients) || subsumes(&b.ingredients, &a.ingredients) {
                    conflicts.push((a.id.clone(), b.id.clone()));
                }
            }
        }

        conflicts
    }

    /// First recipe (by ID) whose ingredients consume exactly the non-empty
    /// item and liquid inputs. Returns the recipe and, for each ingredient,
    /// the input it uses.
    pub fn find_match(&self, inputs: &[ItemStack], liquids: &[LiquidStack]) -> Option<(&RecipeDefinition, Vec<Slot>)> {
        self.sorted().into_iter().find_map(|recipe| {
            assign_inputs(&recipe.ingredients, inputs, liquids).map(|slots| (recipe, slots))
        })
    }

    /// Craft a recipe from the given inputs, running every transformer on its
    /// consumed stack. Legacy transformers run first, new-style ones on their result.
    ///
    /// Alternatives consume and transform through the option that accepted the
    /// input. An option without a transformer leaves its stack untransformed.
    pub fn craft(
        &self,
        recipe_id: &str,
        inputs: &[ItemStack],
        liquids: &[LiquidStack],
        actor: Option<&Actor>,
    ) -> Result<CraftOutcome, CraftError> {
        let recipe = self
            .get(recipe_id)
            .ok_or_else(|| CraftError::RecipeNotFound(recipe_id.to_string()))?;
        let slots = assign_inputs(&recipe.ingredients, inputs, liquids)
            .ok_or_else(|| CraftError::MissingIngredients(recipe_id.to_string()))?;

        let mut remaining = inputs.to_vec();
        let mut remaining_liquids = liquids.to_vec();
        let mut returned = Vec::new();
        let mut marked = HashMap::new();
        let mut marked_liquids = HashMap::new();

        for (ingredient, &slot) in recipe.ingredients.iter().zip(&slots) {
            let slot = match slot {
                Slot::Item(slot) => slot,
                Slot::Liquid(slot) => {
                    let liquid = &liquids[slot];
                    let amount = liquid_amount_for(ingredient, liquid);
                    remaining_liquids[slot] = liquid.with_amount(liquid.amount - amount);
                    if let Some(mark) = ingredient.mark() {
                        marked_liquids.insert(mark.to_string(), liquid.with_amount(amount));
                    }
                    continue;
                }
            };

            let input = &inputs[slot];
            let amount = ingredient.amount_for(input);
            let consumed = input.with_amount(amount);
            remaining[slot] = input.with_amount(input.amount - amount);

            if let Some(mark) = ingredient.mark() {
                marked.insert(mark.to_string(), consumed.clone());
            }

            let legacy = ingredient.try_apply_transform(&consumed, actor);
            let source = legacy.as_ref().unwrap_or(&consumed);
            let transformed = ingredient.try_apply_new_transform(source).or(legacy);
            if let Some(stack) = transformed.filter(|s| !s.is_empty()) {
                returned.push(stack);
            }
        }

        info!(
            "Crafted {} for {} (returned {:?})",
            recipe_id,
            actor.map_or("nobody", |a| a.id.as_str()),
            returned
        );

        Ok(CraftOutcome {
            recipe_id: recipe_id.to_string(),
            results: recipe.results.clone(),
            remaining,
            remaining_liquids,
            returned,
            marked,
            marked_liquids,
        })
    }
}

impl Default for CraftingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// All `.toml` files in a directory, sorted. A missing directory yields none.
fn toml_files(dir: &Path) -> Result<Vec<PathBuf>, String> {
    if !dir.exists() {
        warn!("Directory does not exist: {:?}", dir);
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir).map_err(|e| format!("Failed to read directory {:?}: {}", dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

fn parse_error(path: &Path, content: &str, error: &toml::de::Error) -> SingleError {
    let (line, offset) = error
        .span()
        .map(|span| position(content, span.start))
        .unwrap_or((0, 0));
    SingleError::error(&path.display().to_string(), line, offset, error.message())
}

/// 1-based line and column of a byte offset
fn position(content: &str, byte: usize) -> (u32, u32) {
    let before = &content[..byte.min(content.len())];
    let line = before.matches('\n').count() + 1;
    let column = before.len() - before.rfind('\n').map_or(0, |i| i + 1) + 1;
    (line as u32, column as u32)
}

/// 1-based line of the first table header belonging to recipe `id`, or 0
fn header_line(content: &str, id: &str) -> u32 {
    let table = format!("[{}]", id);
    let nested = format!("[{}.", id);
    let array = format!("[[{}.", id);
    content
        .lines()
        .map(str::trim)
        .position(|line| line == table || line.starts_with(&nested) || line.starts_with(&array))
        .map_or(0, |i| i as u32 + 1)
}

/// Units of `liquid` consumed by an ingredient that accepts it
fn liquid_amount_for(ingredient: &Ingredient, liquid: &LiquidStack) -> i32 {
    ingredient
        .liquids()
        .into_iter()
        .find(|l| l.liquid_id == liquid.liquid_id && liquid.amount >= l.amount)
        .map_or(0, |l| l.amount)
}

/// True if every ingredient of `narrow` is contained by a distinct ingredient of `wide`
fn subsumes(wide: &[Ingredient], narrow: &[Ingredient]) -> bool {
    fn assign(wide: &[Ingredient], narrow: &[Ingredient], used: &mut [bool]) -> bool {
        let Some((first, rest)) = narrow.split_first() else {
            return true;
        };
        for (i, candidate) in wide.iter().enumerate() {
            if !used[i] && candidate.contains(first) {
                used[i] = true;
                if assign(wide, rest, used) {
                    return true;
                }
                used[i] = false;
            }
        }
        false
    }

    wide.len() == narrow.len() && assign(wide, narrow, &mut vec![false; wide.len()])
}

/// Match each ingredient to a distinct non-empty input, using every non-empty input
fn assign_inputs(ingredients: &[Ingredient], inputs: &[ItemStack], liquids: &[LiquidStack]) -> Option<Vec<Slot>> {
    struct Search<'a> {
        inputs: &'a [ItemStack],
        liquids: &'a [LiquidStack],
        used_items: Vec<bool>,
        used_liquids: Vec<bool>,
        slots: Vec<Slot>,
    }

    impl Search<'_> {
        fn assign(&mut self, ingredients: &[Ingredient]) -> bool {
            let Some((first, rest)) = ingredients.split_first() else {
                return true;
            };
            for i in 0..self.inputs.len() {
                if !self.used_items[i] && first.matches(&self.inputs[i]) {
                    self.used_items[i] = true;
                    self.slots.push(Slot::Item(i));
                    if self.assign(rest) {
                        return true;
                    }
                    self.slots.pop();
                    self.used_items[i] = false;
                }
            }
            for i in 0..self.liquids.len() {
                if !self.used_liquids[i] && self.liquids[i].amount > 0 && first.matches_liquid(&self.liquids[i]) {
                    self.used_liquids[i] = true;
                    self.slots.push(Slot::Liquid(i));
                    if self.assign(rest) {
                        return true;
                    }
                    self.slots.pop();
                    self.used_liquids[i] = false;
                }
            }
            false
        }
    }

    let occupied = inputs.iter().filter(|input| !input.is_empty()).count()
        + liquids.iter().filter(|liquid| liquid.amount > 0).count();
    if occupied != ingredients.len() {
        return None;
    }

    let mut search = Search {
        inputs,
        liquids,
        used_items: vec![false; inputs.len()],
        used_liquids: vec![false; liquids.len()],
        slots: Vec::with_capacity(ingredients.len()),
    };
    search.assign(ingredients).then_some(search.slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingredient::{Transform, TransformNew};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &str) {
        std::fs::create_dir_all(dir).unwrap();
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn recipe(id: &str, ingredients: Vec<Ingredient>, result: &str) -> RecipeDefinition {
        RecipeDefinition {
            id: id.to_string(),
            display_name: id.to_string(),
            description: String::new(),
            category: RecipeCategory::Materials,
            ingredients,
            results: vec![ItemStack::new(result)],
        }
    }

    fn item(id: &str) -> Ingredient {
        Ingredient::item(ItemStack::new(id))
    }

    #[test]
    fn test_load_recipes_from_directory() {
        let temp_dir = TempDir::new().unwrap();

        write_file(
            &temp_dir.path().join("tags"),
            "metals.toml",
            r#"
ingotIron = [{ item_id = "iron" }, { item_id = "wrought_iron" }]
"#,
        );
        write_file(
            &temp_dir.path().join("recipes"),
            "tools.toml",
            r#"
[iron_bars]
display_name = "Iron Bars"
category = "materials"

[[iron_bars.ingredients]]
tag = "ingotIron"
count = 6

[[iron_bars.results]]
item_id = "iron_bars"
count = 16

[broken]
[[broken.ingredients]]
tag = "ingotGold"
"#,
        );

        let mut registry = CraftingRegistry::new();
        assert!(registry.load_tags_from_directory(temp_dir.path()).unwrap().is_empty());
        let diagnostics = registry.load_from_directory(temp_dir.path()).unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("iron_bars"));
        assert_eq!(registry.tag("ingotIron").map(|t| t.len()), Some(2));

        let recipe = registry.get("iron_bars").unwrap();
        assert_eq!(recipe.display_name, "Iron Bars");
        assert_eq!(recipe.ingredients[0].amount(), 6);
        assert_eq!(recipe.results[0].amount, 16);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, 14);
        assert!(diagnostics[0].explanation.contains("ingotGold"));
    }

    #[test]
    fn test_parse_errors_become_diagnostics() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir.path().join("recipes"), "bad.toml", "[oops\nitem = 1\n");

        let mut registry = CraftingRegistry::new();
        let diagnostics = registry.load_from_directory(temp_dir.path()).unwrap();

        assert!(registry.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].level, crate::protocol::ErrorLevel::Error);
        assert!(diagnostics[0].file_name.ends_with("bad.toml"));
        assert!(!diagnostics[0].explanation.is_empty());
    }

    #[test]
    fn test_missing_directories_are_empty() {
        let temp_dir = TempDir::new().unwrap();
        let mut registry = CraftingRegistry::new();

        assert!(registry.load_tags_from_directory(temp_dir.path()).unwrap().is_empty());
        assert!(registry.load_from_directory(temp_dir.path()).unwrap().is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_conflicts() {
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe(
            "any_plank_stick",
            vec![Ingredient::item(ItemStack::wildcard("planks")), item("stick")],
            "sign",
        ));
        registry.insert(recipe(
            "oak_stick",
            vec![item("stick"), Ingredient::item(ItemStack::new("planks").with_meta(0))],
            "oak_sign",
        ));
        registry.insert(recipe("torch", vec![item("coal"), item("stick")], "torch"));

        assert_eq!(
            registry.conflicts(),
            vec![("any_plank_stick".to_string(), "oak_stick".to_string())]
        );
    }

    #[test]
    fn test_quantities_prevent_conflicts() {
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe("one", vec![item("iron")], "nugget"));
        registry.insert(recipe("four", vec![item("iron").with_amount(4).unwrap()], "block"));

        // "one" accepts everything "four" does, but not the other way around
        assert_eq!(registry.conflicts().len(), 1);

        let mut registry = CraftingRegistry::new();
        registry.insert(recipe("four", vec![item("iron").with_amount(4).unwrap()], "block"));
        registry.insert(recipe("gold", vec![item("gold").with_amount(4).unwrap()], "gold_block"));
        assert!(registry.conflicts().is_empty());
    }

    #[test]
    fn test_find_match() {
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe("torch", vec![item("coal"), item("stick")], "torch"));
        registry.insert(recipe("block", vec![item("iron").with_amount(4).unwrap()], "iron_block"));

        let inputs = vec![ItemStack::new(""), ItemStack::new("stick"), ItemStack::new("coal")];
        let (found, slots) = registry.find_match(&inputs, &[]).unwrap();
        assert_eq!(found.id, "torch");
        assert_eq!(slots, vec![Slot::Item(2), Slot::Item(1)]);

        assert!(registry.find_match(&[ItemStack::new("iron").with_amount(3)], &[]).is_none());
        assert!(registry.find_match(&[ItemStack::new("iron").with_amount(4)], &[]).is_some());
        assert!(
            registry
                .find_match(&[ItemStack::new("coal"), ItemStack::new("stick"), ItemStack::new("dirt")], &[])
                .is_none()
        );
        assert!(
            registry
                .find_match(&[ItemStack::new("coal"), ItemStack::new("stick")], &[LiquidStack::new("water", 10)])
                .is_none()
        );
    }

    #[test]
    fn test_craft_runs_transformers() {
        let bucket = ItemStack::new("bucket");
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe(
            "cake",
            vec![
                item("milk_bucket")
                    .transform(Transform::GiveBack { item: bucket.clone() })
                    .marked("milk"),
                item("wheat").with_amount(3).unwrap(),
                Ingredient::item(ItemStack::wildcard("knife"))
                    .transform_new(TransformNew::Damage { amount: 1 }),
            ],
            "cake",
        ));

        let actor = Actor::new("p1", "Alice");
        let inputs = vec![
            ItemStack::new("wheat").with_amount(5),
            ItemStack::new("milk_bucket"),
            ItemStack::new("knife").with_meta(7),
        ];
        let outcome = registry.craft("cake", &inputs, &[], Some(&actor)).unwrap();

        assert_eq!(outcome.results, vec![ItemStack::new("cake")]);
        assert_eq!(outcome.remaining[0].amount, 2);
        assert!(outcome.remaining[1].is_empty());
        assert_eq!(outcome.returned, vec![bucket, ItemStack::new("knife").with_meta(8)]);
        assert_eq!(outcome.marked.get("milk"), Some(&ItemStack::new("milk_bucket")));
    }

    #[test]
    fn test_craft_errors() {
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe("torch", vec![item("coal"), item("stick")], "torch"));

        assert_eq!(
            registry.craft("lamp", &[], &[], None).unwrap_err(),
            CraftError::RecipeNotFound("lamp".to_string())
        );
        assert_eq!(
            registry.craft("torch", &[ItemStack::new("coal")], &[], None).unwrap_err(),
            CraftError::MissingIngredients("torch".to_string())
        );
    }

    #[test]
    fn test_position() {
        assert_eq!(position("abc\ndef", 5), (2, 2));
        assert_eq!(position("abc", 0), (1, 1));
        assert_eq!(header_line("\n[foo]\n[foo.x]", "foo"), 2);
        assert_eq!(header_line("[[foo.ingredients]]", "foo"), 1);
        assert_eq!(header_line("", "foo"), 0);
    }

    #[test]
    fn test_header_line_ignores_longer_ids() {
        let content = "[iron_bars]\n[[iron_bars.ingredients]]\n\n[iron]\n[[iron.ingredients]]\n";
        assert_eq!(header_line(content, "iron_bars"), 1);
        assert_eq!(header_line(content, "iron"), 4);
    }

    #[test]
    fn test_craft_alternative_without_transformer() {
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe(
            "sweet_bread",
            vec![
                item("sugar").or(item("honey_bottle").transform_new(TransformNew::Replace {
                    item: ItemStack::new("glass_bottle"),
                })),
                item("wheat"),
            ],
            "sweet_bread",
        ));

        let with_sugar = registry
            .craft("sweet_bread", &[ItemStack::new("sugar"), ItemStack::new("wheat")], &[], None)
            .unwrap();
        assert!(with_sugar.returned.is_empty());
        assert!(with_sugar.remaining.iter().all(ItemStack::is_empty));

        let with_honey = registry
            .craft("sweet_bread", &[ItemStack::new("honey_bottle"), ItemStack::new("wheat")], &[], None)
            .unwrap();
        assert_eq!(with_honey.returned, vec![ItemStack::new("glass_bottle")]);
    }

    #[test]
    fn test_craft_alternative_with_quantity() {
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe(
            "nuggets",
            vec![
                item("iron")
                    .with_amount(3)
                    .unwrap()
                    .transform(Transform::Reuse)
                    .or(item("gold"))
                    .marked("metal"),
            ],
            "nugget",
        ));

        let outcome = registry
            .craft("nuggets", &[ItemStack::new("iron").with_amount(5)], &[], None)
            .unwrap();
        assert_eq!(outcome.remaining, vec![ItemStack::new("iron").with_amount(2)]);
        assert_eq!(outcome.returned, vec![ItemStack::new("iron").with_amount(3)]);
        assert_eq!(outcome.marked.get("metal"), Some(&ItemStack::new("iron").with_amount(3)));

        let gold = registry
            .craft("nuggets", &[ItemStack::new("gold").with_amount(2)], &[], None)
            .unwrap();
        assert_eq!(gold.remaining, vec![ItemStack::new("gold")]);
        assert!(gold.returned.is_empty());
    }

    #[test]
    fn test_craft_consumes_liquids() {
        let mut registry = CraftingRegistry::new();
        registry.insert(recipe(
            "quench",
            vec![
                item("iron"),
                Ingredient::liquid(LiquidStack::new("water", 1000)).unwrap().marked("coolant"),
            ],
            "tempered_iron",
        ));

        let water = LiquidStack::new("water", 1500);
        let (found, slots) = registry.find_match(&[ItemStack::new("iron")], &[water.clone()]).unwrap();
        assert_eq!(found.id, "quench");
        assert_eq!(slots, vec![Slot::Item(0), Slot::Liquid(0)]);

        let outcome = registry.craft("quench", &[ItemStack::new("iron")], &[water], None).unwrap();
        assert_eq!(outcome.remaining_liquids, vec![LiquidStack::new("water", 500)]);
        assert_eq!(outcome.marked_liquids.get("coolant"), Some(&LiquidStack::new("water", 1000)));

        assert_eq!(
            registry
                .craft("quench", &[ItemStack::new("iron")], &[LiquidStack::new("water", 999)], None)
                .unwrap_err(),
            CraftError::MissingIngredients("quench".to_string())
        );
        assert!(registry.craft("quench", &[ItemStack::new("iron")], &[], None).is_err());
    }

    #[test]
    fn test_bundled_recipes_craft() {
        let data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let mut registry = CraftingRegistry::new();
        assert!(registry.load_tags_from_directory(&data_dir).unwrap().is_empty());
        assert!(registry.load_from_directory(&data_dir).unwrap().is_empty());

        let inputs = vec![
            ItemStack::new("milk_bucket"),
            ItemStack::new("sugar"),
            ItemStack::new("wheat").with_amount(3),
        ];
        let (found, _) = registry.find_match(&inputs, &[]).unwrap();
        assert_eq!(found.id, "cake");
        let cake = registry.craft("cake", &inputs, &[], None).unwrap();
        assert_eq!(cake.results, vec![ItemStack::new("cake")]);
        assert_eq!(cake.returned, vec![ItemStack::new("bucket")]);

        let ingot = registry
            .craft(
                "cooled_ingot",
                &[ItemStack::new("iron_ingot")],
                &[LiquidStack::new("water", 1000)],
                None,
            )
            .unwrap();
        assert_eq!(ingot.results, vec![ItemStack::new("tempered_iron")]);
        assert_eq!(ingot.remaining_liquids[0].amount, 0);
    }
}
