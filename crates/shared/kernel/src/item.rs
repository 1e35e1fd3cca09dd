//! Validated item identifiers.

use crate::domain::constants::{ITEM_NAMESPACE, MAX_FILE_STEM_LEN, MAX_ITEM_LEN, RECIPE_FILE_SUFFIX};
use serde::{Deserialize, Serialize};
use std::borrow::{Borrow, Cow};
use std::fmt;
use std::str::FromStr;

#[dtab_derive::dtab_error]
pub enum ItemError {
    #[error("Invalid item identifier{}: {message}", format_context(.context))]
    Invalid { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// A bare item name such as `iron_ingot`.
///
/// Holds 1 to 100 characters from `[A-Za-z0-9_-]`. A `minecraft:` prefix is accepted on input
/// and stripped; other namespaces are rejected. Case is preserved, so `Iron_Ingot` and
/// `iron_ingot` are distinct identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Validates `raw` after trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns [`ItemError::Invalid`] describing the first rule `raw` breaks.
    pub fn parse(raw: &str) -> Result<Self, ItemError> {
        let trimmed = raw.trim();
        let name = match trimmed.split_once(':') {
            Some((ITEM_NAMESPACE, rest)) => rest,
            Some((namespace, _)) => {
                return Err(invalid(format!("unsupported namespace '{namespace}'"), trimmed));
            },
            None => trimmed,
        };

        if name.is_empty() {
            return Err(invalid("identifier is empty", trimmed));
        }
        if name.chars().count() > MAX_ITEM_LEN {
            return Err(invalid(format!("longer than {MAX_ITEM_LEN} characters"), trimmed));
        }
        if let Some(bad) = name.chars().find(|c| !is_item_char(*c)) {
            return Err(invalid(format!("unexpected character '{bad}'"), trimmed));
        }

        Ok(Self(name.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `minecraft:<name>`.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{ITEM_NAMESPACE}:{}", self.0)
    }

    /// `<safe stem>_19.json`.
    #[must_use]
    pub fn recipe_file_name(&self) -> String {
        format!("{}{RECIPE_FILE_SUFFIX}", safe_file_stem(&self.0))
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

const fn is_item_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn invalid(message: impl Into<Cow<'static, str>>, input: &str) -> ItemError {
    let mut shown: String = input.chars().take(MAX_ITEM_LEN).collect();
    if shown.len() < input.len() {
        shown.push_str("...");
    }
    ItemError::Invalid { message: message.into(), context: Some(shown.into()) }
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_` and keeps at most 50 characters.
#[must_use]
pub fn safe_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if is_item_char(c) { c } else { '_' })
        .take(MAX_FILE_STEM_LEN)
        .collect()
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = ItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ItemId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_vanilla_namespace() {
        let id = ItemId::parse(" minecraft:iron_ingot ").unwrap();
        assert_eq!(id.as_str(), "iron_ingot");
        assert_eq!(id.qualified(), "minecraft:iron_ingot");
    }

    #[test]
    fn rejects_foreign_namespace_and_bad_characters() {
        assert!(ItemId::parse("modded:ruby").is_err());
        assert!(ItemId::parse("iron ingot").is_err());
        assert!(ItemId::parse("../etc/passwd").is_err());
        assert!(ItemId::parse("").is_err());
        assert!(ItemId::parse("minecraft:").is_err());
    }

    #[test]
    fn enforces_length_limit() {
        assert!(ItemId::parse(&"a".repeat(MAX_ITEM_LEN)).is_ok());
        let err = ItemId::parse(&"a".repeat(MAX_ITEM_LEN + 1)).unwrap_err();
        assert!(err.to_string().contains("longer than 100"));
    }

    #[test]
    fn preserves_case() {
        assert_eq!(ItemId::parse("Iron_Ingot").unwrap().as_str(), "Iron_Ingot");
    }

    #[test]
    fn file_names_are_sanitized_and_truncated() {
        assert_eq!(safe_file_stem("a.b c"), "a_b_c");
        assert_eq!(safe_file_stem(&"x".repeat(80)).len(), MAX_FILE_STEM_LEN);
        assert_eq!(ItemId::parse("gold_nugget").unwrap().recipe_file_name(), "gold_nugget_19.json");
    }

    #[test]
    fn deserializes_with_validation() {
        let ok: ItemId = serde_json::from_str("\"minecraft:stick\"").unwrap();
        assert_eq!(ok.as_str(), "stick");
        assert!(serde_json::from_str::<ItemId>("\"no spaces\"").is_err());
    }
}
