//! Item extraction from uploaded catalogs.

use crate::error::{CatalogError, CatalogErrorExt};
use dtab_kernel::domain::constants::ITEM_NAMESPACE;
use dtab_kernel::item::ItemId;
use serde_json::Value;
use std::path::Path;

/// Array fields that may hold items, highest priority first.
pub const RECOGNIZED_FIELDS: [&str; 4] = ["items", "item_ids", "identifiers", "entries"];

/// Keys read from object entries of an items array, first present wins.
const ENTRY_KEYS: [&str; 3] = ["id", "item", "name"];

/// Items extracted from one catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedCatalog {
    /// Document order; duplicates are kept.
    pub items: Vec<ItemId>,
    /// Entries that were not strings or failed identifier validation.
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct CatalogParser {
    fields: Vec<String>,
}

impl Default for CatalogParser {
    fn default() -> Self {
        Self::with_fields(RECOGNIZED_FIELDS)
    }
}

impl CatalogParser {
    /// Parser that looks for `fields`, in priority order.
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { fields: fields.into_iter().map(Into::into).collect() }
    }

    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Picks the format from the file extension: `.json` or `.txt`.
    ///
    /// # Errors
    /// Returns [`CatalogError::UnsupportedFormat`] for other extensions, otherwise whatever the
    /// selected format parser returns.
    pub fn parse_upload(&self, file_name: &str, bytes: &[u8]) -> Result<ParsedCatalog, CatalogError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => self.parse_json(bytes),
            Some("txt") => parse_text(bytes),
            _ => Err(CatalogError::UnsupportedFormat {
                message: "expected a .json or .txt file".into(),
                context: Some(file_name.to_owned().into()),
            }),
        }
    }

    /// Walks the document depth-first, consuming the highest-priority recognized array field
    /// of every object. A top-level array is itself an items array.
    ///
    /// # Errors
    /// Returns [`CatalogError`] when the bytes are not UTF-8 JSON or no recognized array exists.
    pub fn parse_json(&self, bytes: &[u8]) -> Result<ParsedCatalog, CatalogError> {
        let text = std::str::from_utf8(bytes).context("reading catalog")?;
        let document: Value = serde_json::from_str(text).context("parsing catalog")?;

        let mut walk = Walk::default();
        match &document {
            Value::Array(entries) => walk.collect(entries),
            other => self.walk(other, &mut walk),
        }

        if walk.arrays == 0 {
            return Err(CatalogError::NoItemsArray {
                message: format!("expected one of the fields {}", self.fields.join(", ")).into(),
                context: None,
            });
        }

        Ok(walk.catalog)
    }

    fn walk(&self, value: &Value, walk: &mut Walk) {
        match value {
            Value::Object(map) => {
                let consumed = self
                    .fields
                    .iter()
                    .map(String::as_str)
                    .find(|field| map.get(*field).is_some_and(Value::is_array));

                for (key, child) in map {
                    match child {
                        Value::Array(entries) if Some(key.as_str()) == consumed => {
                            walk.collect(entries);
                        },
                        _ => self.walk(child, walk),
                    }
                }
            },
            Value::Array(values) => values.iter().for_each(|v| self.walk(v, walk)),
            _ => {},
        }
    }
}

#[derive(Default)]
struct Walk {
    catalog: ParsedCatalog,
    arrays: usize,
}

impl Walk {
    fn collect(&mut self, entries: &[Value]) {
        self.arrays += 1;
        for entry in entries {
            let raw = match entry {
                Value::String(s) => Some(s.as_str()),
                Value::Object(obj) => ENTRY_KEYS.iter().find_map(|k| obj.get(*k)).and_then(Value::as_str),
                _ => None,
            };
            self.push(raw);
        }
    }

    fn push(&mut self, raw: Option<&str>) {
        match raw.and_then(clean_entry).and_then(|name| ItemId::parse(name).ok()) {
            Some(id) => self.catalog.items.push(id),
            None => self.catalog.skipped += 1,
        }
    }
}

/// One identifier per line; blank lines and `#` or `//` comments are ignored.
///
/// # Errors
/// Returns [`CatalogError::Encoding`] when the bytes are not UTF-8.
pub fn parse_text(bytes: &[u8]) -> Result<ParsedCatalog, CatalogError> {
    let text = std::str::from_utf8(bytes).context("reading catalog")?;

    let mut walk = Walk::default();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .for_each(|line| walk.push(Some(line)));

    Ok(walk.catalog)
}

/// Strips quotes, the `minecraft:` namespace and a numeric data suffix (`wool:3`).
///
/// Other namespaces are left in place so identifier validation rejects them.
#[must_use]
pub fn clean_entry(raw: &str) -> Option<&str> {
    let name = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
    let name = name
        .strip_prefix(ITEM_NAMESPACE)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(name);

    let name = match name.rsplit_once(':') {
        Some((base, data)) if !data.is_empty() && data.bytes().all(|b| b.is_ascii_digit()) => base,
        _ => name,
    };

    let name = name.trim();
    (!name.is_empty()).then_some(name)
}
