//! Fixed documents of the duplicating table block.

use chrono::Utc;
use dtab_kernel::domain::constants::{CRAFTING_TAG, PACK_NAMESPACE};
use dtab_kernel::item::ItemId;
use serde_json::{Value, json};

fn block_id() -> String {
    format!("{PACK_NAMESPACE}:duplicating_table")
}

/// `blocks/duplicating_table.json` in the behavior pack.
#[must_use]
pub fn behavior_block() -> Value {
    let rotations = [("south", 0), ("east", 90), ("west", -90), ("north", 180)];
    let permutations: Vec<Value> = rotations
        .iter()
        .map(|(facing, degrees)| {
            json!({
                "condition": format!("query.block_state('minecraft:cardinal_direction')=='{facing}'"),
                "components": { "minecraft:transformation": { "rotation": [0, degrees, 0] } }
            })
        })
        .collect();

    json!({
        "format_version": "1.20.60",
        "minecraft:block": {
            "description": {
                "identifier": block_id(),
                "menu_category": { "category": "equipment" },
                "is_experimental": false,
                "traits": {
                    "minecraft:placement_direction": {
                        "enabled_states": ["minecraft:cardinal_direction"]
                    }
                }
            },
            "components": {
                "minecraft:crafting_table": {
                    "crafting_tags": [CRAFTING_TAG],
                    "grid_size": 3,
                    "table_name": "Duplicating"
                },
                "minecraft:collision_box": { "size": [16, 16, 16], "origin": [-8, 0, -8] },
                "minecraft:geometry": "geometry.duplicating_table",
                "minecraft:material_instances": {
                    "up": { "texture": "dt_top", "render_method": "opaque" },
                    "*": { "texture": "dt_side", "render_method": "opaque" },
                    "north": { "texture": "dt_front", "render_method": "opaque" }
                },
                "minecraft:flammable": true,
                "minecraft:destructible_by_mining": { "seconds_to_destroy": 1 },
                "minecraft:destructible_by_explosion": { "explosion_resistance": 7.5 },
                "minecraft:selection_box": { "origin": [-8, 0, -8], "size": [16, 16, 16] }
            },
            "permutations": permutations
        }
    })
}

/// `blocks.json` in the resource pack.
#[must_use]
pub fn resource_blocks() -> Value {
    json!({
        "format_version": [1, 1, 0],
        block_id(): {
            "sound": "wood",
            "textures": { "up": "dt_top", "side": "dt_side" }
        }
    })
}

#[must_use]
pub fn terrain_texture() -> Value {
    json!({
        "num_mip_levels": 4,
        "padding": 8,
        "resource_pack_name": "Duplicating Table",
        "texture_name": "atlas.terrain",
        "texture_data": {
            "dt_side": { "textures": "textures/blocks/duplicating_table_side" },
            "dt_top": { "textures": "textures/blocks/duplicating_table_top" },
            "dt_front": { "textures": "textures/blocks/duplicating_table_front" }
        }
    })
}

/// `models/blocks/duplicating_table.geo.json`: a single full cube.
#[must_use]
pub fn geometry() -> Value {
    let side = |face: &str| json!({ "uv": [0, 0], "uv_size": [16, 16], "material_instance": face });
    let cap = |face: &str| json!({ "uv": [16, 16], "uv_size": [-16, -16], "material_instance": face });

    json!({
        "format_version": "1.12.0",
        "minecraft:geometry": [{
            "description": {
                "identifier": "geometry.duplicating_table",
                "texture_width": 16,
                "texture_height": 16,
                "visible_bounds_width": 2,
                "visible_bounds_height": 2.5,
                "visible_bounds_offset": [0, 0.75, 0]
            },
            "bones": [{
                "name": "root",
                "pivot": [0, 0, 0],
                "cubes": [{
                    "origin": [-8, 0, -8],
                    "size": [16, 16, 16],
                    "uv": {
                        "north": side("north"),
                        "east": side("east"),
                        "south": side("south"),
                        "west": side("west"),
                        "up": cap("up"),
                        "down": cap("down")
                    }
                }]
            }]
        }]
    })
}

pub const LANGUAGES: &str = "[\n\t\"en_US\"\n]";

#[must_use]
pub fn en_us_lang() -> String {
    format!("tile.{}.name=Duplicating Table", block_id())
}

/// `pack.mcmeta` of the datapack layout.
#[must_use]
pub fn pack_mcmeta() -> Value {
    json!({ "pack": { "pack_format": 10, "description": "Duplication Recipes Datapack" } })
}

/// Keyword checks in priority order; the first hit picks the folder.
const CATEGORIES: &[(&str, &[&str])] = &[
    ("ores", &["ore", "raw_"]),
    ("metals", &["ingot", "nugget"]),
    ("wood", &["wood", "log", "plank"]),
    ("stone", &["stone", "cobble", "granite", "diorite"]),
    ("gems", &["diamond", "emerald", "ruby", "sapphire"]),
    ("food", &["food", "bread", "meat", "apple"]),
];

/// Folder of `item` in the categorized layout.
#[must_use]
pub fn category_for(item: &ItemId) -> &'static str {
    let name = item.as_str().to_lowercase();
    CATEGORIES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| name.contains(keyword)))
        .map_or("misc", |(category, _)| *category)
}

/// README of the categorized layout.
#[must_use]
pub fn categorized_readme(total: usize) -> String {
    format!(
        "# Custom Recipe Pack\n\n\
         This pack contains {total} duplication recipes organized by category.\n\n\
         ## Folder Structure:\n\
         - ores/ - Ore-related items\n\
         - metals/ - Ingots and metal items\n\
         - wood/ - Wood and wooden items\n\
         - stone/ - Stone and rock items\n\
         - gems/ - Precious gems and crystals\n\
         - food/ - Food and consumable items\n\
         - misc/ - Everything else\n\n\
         ## Installation:\n\
         Place the recipe files in your Minecraft data folder according to your needs.\n\n\
         Generated on: {}\n\
         Total items: {total}\n",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )
}
