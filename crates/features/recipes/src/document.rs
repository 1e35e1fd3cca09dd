//! Shaped recipe documents.

use dtab_kernel::domain::constants::PACK_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One rendered recipe file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeDocument {
    pub format_version: String,
    #[serde(rename = "minecraft:recipe_shaped")]
    pub recipe: ShapedRecipe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShapedRecipe {
    pub description: RecipeDescription,
    #[serde(default)]
    pub tags: Vec<String>,
    pub pattern: Vec<String>,
    pub key: BTreeMap<String, RecipeItem>,
    pub result: RecipeResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeDescription {
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeItem {
    pub item: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeResult {
    pub item: String,
    pub count: u32,
}

impl RecipeDocument {
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.recipe.description.identifier
    }

    #[must_use]
    pub fn result(&self) -> &RecipeResult {
        &self.recipe.result
    }

    /// Pretty-printed JSON as written into archives.
    ///
    /// # Errors
    /// Propagates [`serde_json::Error`]; unreachable for documents built from this schema.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(self)
    }
}

/// Crafting recipe for the duplicating table itself: eight iron ingots around a crafting table.
#[must_use]
pub fn table_recipe() -> RecipeDocument {
    let table = format!("{PACK_NAMESPACE}:duplicating_table");
    let key = BTreeMap::from([
        ("i".to_owned(), RecipeItem { item: "minecraft:iron_ingot".to_owned() }),
        ("C".to_owned(), RecipeItem { item: "minecraft:crafting_table".to_owned() }),
    ]);

    RecipeDocument {
        format_version: "1.12".to_owned(),
        recipe: ShapedRecipe {
            description: RecipeDescription { identifier: table.clone() },
            tags: vec!["crafting_table".to_owned()],
            pattern: ["iii", "iCi", "iii"].map(str::to_owned).to_vec(),
            key,
            result: RecipeResult { item: table, count: 1 },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_recipe_uses_iron_and_crafting_table() {
        let recipe = table_recipe();
        assert_eq!(recipe.identifier(), "duplicatingtable:duplicating_table");
        assert_eq!(recipe.recipe.key["i"].item, "minecraft:iron_ingot");
        assert_eq!(recipe.recipe.key["C"].item, "minecraft:crafting_table");
        assert_eq!(recipe.result().count, 1);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let raw = r#"{"format_version":"1.12","minecraft:recipe_shaped":{"description":{"identifier":"x"},
            "pattern":["X"],"key":{},"result":{"item":"minecraft:x","count":2},"extra":true}}"#;
        assert!(serde_json::from_str::<RecipeDocument>(raw).is_err());
    }
}
