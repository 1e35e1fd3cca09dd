use dtab_domain::pack::{PackLayers, PackMode};

#[test]
fn modes_accept_legacy_aliases() {
    let parsed: Vec<Option<PackMode>> =
        ["standard", "custom", "datapack", "behavior_pack", "complete_pack", "recipes-only"]
            .into_iter()
            .map(PackMode::parse)
            .collect();

    assert_eq!(
        parsed,
        vec![
            Some(PackMode::RecipesOnly),
            Some(PackMode::Categorized),
            Some(PackMode::Datapack),
            Some(PackMode::BehaviorPack),
            Some(PackMode::CompletePack),
            Some(PackMode::RecipesOnly),
        ]
    );
    assert_eq!(PackMode::parse("zip"), None);
}

#[test]
fn canonical_names_round_trip() {
    for mode in PackMode::ALL {
        assert_eq!(PackMode::parse(mode.as_str()), Some(mode));
        assert_eq!(mode.to_string(), mode.as_str());
    }
}

#[test]
fn only_pack_modes_need_assets() {
    assert!(!PackMode::RecipesOnly.layers().intersects(PackLayers::NEEDS_ASSETS));
    assert!(!PackMode::Datapack.layers().intersects(PackLayers::NEEDS_ASSETS));
    assert!(PackMode::BehaviorPack.layers().contains(PackLayers::BEHAVIOR));
    assert!(!PackMode::BehaviorPack.layers().contains(PackLayers::RESOURCE));
    assert!(PackMode::CompletePack.layers().contains(PackLayers::BEHAVIOR | PackLayers::RESOURCE));
}

#[test]
fn archive_name_uses_canonical_mode() {
    assert_eq!(PackMode::BehaviorPack.archive_name(), "minecraft_recipes_behavior-pack.zip");
}
