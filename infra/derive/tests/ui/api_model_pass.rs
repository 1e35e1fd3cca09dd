use dtab_derive::api_model;

#[api_model(deny_unknown_fields = false)]
pub struct Report {
    pub total_items: usize,
    pub items: Vec<String>,
}

#[api_model]
#[serde(rename_all = "camelCase")]
pub struct Strict {
    #[serde(default)]
    pub selected: Vec<String>,
}

fn main() {
    let report = Report { total_items: 1, items: vec!["iron_ingot".to_owned()] };
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("totalItems"));
    let _: Strict = serde_json::from_str("{}").unwrap();
}
