//! Names shared across slices.

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const CATALOG_TAG: &str = "Catalog";
pub const GENERATOR_TAG: &str = "Generator";
pub const SESSIONS_TAG: &str = "Sessions";

/// Namespace of vanilla item identifiers.
pub const ITEM_NAMESPACE: &str = "minecraft";
/// Namespace of everything the packs define.
pub const PACK_NAMESPACE: &str = "duplicatingtable";
/// Crafting tag the duplicating table accepts.
pub const CRAFTING_TAG: &str = "duplicating_table";

/// Suffix appended to the safe item stem to form a recipe file name.
pub const RECIPE_FILE_SUFFIX: &str = "_19.json";
/// Recipe file for the table itself.
pub const TABLE_RECIPE_FILE: &str = "duplicating_table.json";

pub const BEHAVIOR_PACK_DIR: &str = "Duplicating Table BP";
pub const RESOURCE_PACK_DIR: &str = "Duplicating Table RP";
pub const DATAPACK_RECIPES_DIR: &str = "data/duplicating/recipes";

// Session addressing
pub const SESSION_HEADER: &str = "x-session-id";
pub const SESSION_COOKIE: &str = "dtab_session";
pub const DEFAULT_SESSION_KEY: &str = "default";
pub const MAX_SESSION_KEY_LEN: usize = 64;

/// Longest accepted item identifier, namespace excluded.
pub const MAX_ITEM_LEN: usize = 100;
/// Longest file stem derived from an item identifier.
pub const MAX_FILE_STEM_LEN: usize = 50;
