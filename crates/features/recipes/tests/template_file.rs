use dtab_kernel::item::ItemId;
use dtab_recipes::{DEFAULT_TEMPLATE, RecipeError, TemplateCache};
use tempfile::TempDir;

const ALT_TEMPLATE: &str = r#"{"format_version":"1.16","minecraft:recipe_shaped":{"description":{"identifier":"x:{{ result_item }}"},
"pattern":["XX"],"key":{"X":{"item":"minecraft:{{ result_item }}"}},"result":{"item":"minecraft:{{ result_item }}","count":2}}}"#;

fn stick() -> ItemId {
    ItemId::parse("stick").unwrap()
}

#[test]
fn absent_template_reports_missing_until_reloaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipe.json.j2");

    let cache = TemplateCache::load(&path).unwrap();
    assert!(!cache.is_loaded());
    assert!(matches!(cache.render(&stick()), Err(RecipeError::TemplateMissing { .. })));

    std::fs::write(&path, DEFAULT_TEMPLATE).unwrap();
    cache.reload().unwrap();
    assert_eq!(cache.render(&stick()).unwrap().result().item, "minecraft:stick");
}

#[test]
fn failed_reload_keeps_previous_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipe.json.j2");
    std::fs::write(&path, DEFAULT_TEMPLATE).unwrap();
    let cache = TemplateCache::load(&path).unwrap();

    std::fs::write(&path, "{{#each}}").unwrap();
    assert!(cache.reload().is_err());
    assert_eq!(cache.render(&stick()).unwrap().recipe.pattern, ["X"]);

    std::fs::remove_file(&path).unwrap();
    assert!(matches!(cache.reload(), Err(RecipeError::TemplateMissing { .. })));
    assert!(cache.is_loaded());
}

#[test]
fn reload_picks_up_edits_for_every_clone() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recipe.json.j2");
    std::fs::write(&path, DEFAULT_TEMPLATE).unwrap();
    let cache = TemplateCache::load(&path).unwrap();
    let shared = cache.clone();

    std::fs::write(&path, ALT_TEMPLATE).unwrap();
    cache.reload().unwrap();

    let doc = shared.render(&stick()).unwrap();
    assert_eq!(doc.format_version, "1.16");
    assert_eq!(doc.identifier(), "x:stick");
}

#[test]
fn render_all_preserves_order() {
    let cache = TemplateCache::from_source(DEFAULT_TEMPLATE).unwrap();
    let items: Vec<ItemId> = ["iron_ingot", "gold_ingot"].iter().map(|n| ItemId::parse(n).unwrap()).collect();

    let rendered = cache.render_all(&items).unwrap();
    let results: Vec<_> = rendered.iter().map(|r| r.document.result().item.as_str()).collect();
    assert_eq!(results, ["minecraft:iron_ingot", "minecraft:gold_ingot"]);
}
