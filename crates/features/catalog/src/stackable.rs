//! Items with a stack size of one cannot be duplicated.

use dtab_kernel::item::ItemId;
use fxhash::FxHashSet;
use std::sync::LazyLock;

/// Bedrock release the list was last checked against.
pub const CHECKED_AGAINST: &str = "1.21.94";

#[rustfmt::skip]
const NON_STACKABLE: &[&str] = &[
    // tools and weapons
    "wooden_sword", "stone_sword", "iron_sword", "golden_sword", "diamond_sword", "netherite_sword",
    "wooden_pickaxe", "stone_pickaxe", "iron_pickaxe", "golden_pickaxe", "diamond_pickaxe", "netherite_pickaxe",
    "wooden_axe", "stone_axe", "iron_axe", "golden_axe", "diamond_axe", "netherite_axe",
    "wooden_shovel", "stone_shovel", "iron_shovel", "golden_shovel", "diamond_shovel", "netherite_shovel",
    "wooden_hoe", "stone_hoe", "iron_hoe", "golden_hoe", "diamond_hoe", "netherite_hoe",
    "bow", "crossbow", "shield", "fishing_rod", "shears", "flint_and_steel", "trident", "mace",
    "carrot_on_a_stick", "warped_fungus_on_a_stick",
    // armor
    "leather_helmet", "chainmail_helmet", "iron_helmet", "golden_helmet", "diamond_helmet", "netherite_helmet",
    "turtle_helmet",
    "leather_chestplate", "chainmail_chestplate", "iron_chestplate", "golden_chestplate", "diamond_chestplate",
    "netherite_chestplate",
    "leather_leggings", "chainmail_leggings", "iron_leggings", "golden_leggings", "diamond_leggings",
    "netherite_leggings",
    "leather_boots", "chainmail_boots", "iron_boots", "golden_boots", "diamond_boots", "netherite_boots",
    "leather_horse_armor", "iron_horse_armor", "golden_horse_armor", "diamond_horse_armor",
    "elytra", "wolf_armor",
    // harnesses
    "black_harness", "white_harness", "orange_harness", "magenta_harness", "light_blue_harness",
    "yellow_harness", "lime_harness", "pink_harness", "gray_harness", "light_gray_harness", "cyan_harness",
    "purple_harness", "blue_harness", "brown_harness", "green_harness", "red_harness",
    // bundles
    "bundle", "black_bundle", "white_bundle", "orange_bundle", "magenta_bundle", "light_blue_bundle",
    "yellow_bundle", "lime_bundle", "pink_bundle", "gray_bundle", "light_gray_bundle", "cyan_bundle",
    "purple_bundle", "blue_bundle", "brown_bundle", "green_bundle", "red_bundle",
    // banner patterns
    "flower_banner_pattern", "creeper_banner_pattern", "skull_banner_pattern", "mojang_banner_pattern",
    "globe_banner_pattern", "piglin_banner_pattern", "flow_banner_pattern", "guster_banner_pattern",
    "field_masoned_banner_pattern", "bordure_indented_banner_pattern",
    // filled buckets (the empty bucket stacks to 16)
    "water_bucket", "lava_bucket", "milk_bucket", "powder_snow_bucket", "cod_bucket", "salmon_bucket",
    "pufferfish_bucket", "tropical_fish_bucket", "axolotl_bucket", "tadpole_bucket",
    // stews and soups
    "mushroom_stew", "rabbit_stew", "beetroot_soup", "suspicious_stew",
    // potions
    "potion", "splash_potion", "lingering_potion",
    // music discs
    "music_disc_13", "music_disc_cat", "music_disc_blocks", "music_disc_chirp", "music_disc_far",
    "music_disc_mall", "music_disc_mellohi", "music_disc_stal", "music_disc_strad", "music_disc_ward",
    "music_disc_11", "music_disc_wait", "music_disc_otherside", "music_disc_5", "music_disc_pigstep",
    "music_disc_relic", "music_disc_creator", "music_disc_creator_music_box", "music_disc_precipice",
    "music_disc_tears", "music_disc_lava_chicken",
    // boats
    "boat", "oak_boat", "spruce_boat", "birch_boat", "jungle_boat", "acacia_boat", "dark_oak_boat",
    "mangrove_boat", "cherry_boat", "pale_oak_boat", "bamboo_raft",
    "chest_boat", "oak_chest_boat", "spruce_chest_boat", "birch_chest_boat", "jungle_chest_boat",
    "acacia_chest_boat", "dark_oak_chest_boat", "mangrove_chest_boat", "cherry_chest_boat",
    "pale_oak_chest_boat", "bamboo_chest_raft",
    // minecarts
    "minecart", "chest_minecart", "hopper_minecart", "tnt_minecart", "furnace_minecart",
    "command_block_minecart",
    // beds
    "bed", "white_bed", "orange_bed", "magenta_bed", "light_blue_bed", "yellow_bed", "lime_bed", "pink_bed",
    "gray_bed", "light_gray_bed", "cyan_bed", "purple_bed", "blue_bed", "brown_bed", "green_bed", "red_bed",
    "black_bed",
    // shulker boxes
    "shulker_box", "undyed_shulker_box", "white_shulker_box", "orange_shulker_box", "magenta_shulker_box",
    "light_blue_shulker_box", "yellow_shulker_box", "lime_shulker_box", "pink_shulker_box",
    "gray_shulker_box", "light_gray_shulker_box", "cyan_shulker_box", "purple_shulker_box",
    "blue_shulker_box", "brown_shulker_box", "green_shulker_box", "red_shulker_box", "black_shulker_box",
    // books
    "written_book", "writable_book", "book_and_quill", "enchanted_book",
    // misc
    "totem_of_undying", "saddle", "filled_map", "cake", "spyglass", "brush", "goat_horn",
    // education edition
    "sparkler", "glow_stick", "medicine",
];

static NON_STACKABLE_SET: LazyLock<FxHashSet<&'static str>> =
    LazyLock::new(|| NON_STACKABLE.iter().copied().collect());

/// Case-insensitive lookup against the non-stackable list.
#[must_use]
pub fn is_stackable(item: &ItemId) -> bool {
    !NON_STACKABLE_SET.contains(item.as_str().to_ascii_lowercase().as_str())
}

/// Splits `items` into `(stackable, filtered)`, keeping relative order in both.
pub fn partition_stackable<I>(items: I) -> (Vec<ItemId>, Vec<ItemId>)
where
    I: IntoIterator<Item = ItemId>,
{
    let (stackable, filtered): (Vec<_>, Vec<_>) = items.into_iter().partition(is_stackable);
    if !filtered.is_empty() {
        tracing::debug!(
            stackable = stackable.len(),
            filtered = filtered.len(),
            "Filtered non-stackable items"
        );
    }
    (stackable, filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ItemId {
        ItemId::parse(name).unwrap()
    }

    #[test]
    fn tools_and_vehicles_are_filtered() {
        assert!(!is_stackable(&id("diamond_sword")));
        assert!(!is_stackable(&id("Oak_Boat")));
        assert!(!is_stackable(&id("music_disc_pigstep")));
    }

    #[test]
    fn common_materials_stack() {
        assert!(is_stackable(&id("iron_ingot")));
        assert!(is_stackable(&id("bucket")));
        assert!(is_stackable(&id("armor_stand")));
    }

    #[test]
    fn partition_keeps_order() {
        let (stackable, filtered) =
            partition_stackable(["stick", "bow", "coal", "saddle"].map(id));
        assert_eq!(stackable, [id("stick"), id("coal")]);
        assert_eq!(filtered, [id("bow"), id("saddle")]);
    }

    #[test]
    fn list_has_no_duplicates() {
        assert_eq!(NON_STACKABLE_SET.len(), NON_STACKABLE.len());
    }
}
