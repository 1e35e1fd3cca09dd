//! Deduplicated, ordered working set of item identifiers.

use dtab_kernel::item::ItemId;
use fxhash::FxHashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRegistry {
    items: Vec<ItemId>,
    seen: FxHashSet<ItemId>,
}

impl ItemRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends identifiers not yet present, keeping first-seen order.
    ///
    /// Returns how many were inserted.
    pub fn add<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = ItemId>,
    {
        let before = self.items.len();
        for item in items {
            if self.seen.insert(item.clone()) {
                self.items.push(item);
            }
        }
        self.items.len() - before
    }

    /// Returns whether `item` was present.
    pub fn remove(&mut self, item: &str) -> bool {
        if !self.seen.remove(item) {
            return false;
        }
        self.items.retain(|existing| existing.as_str() != item);
        true
    }

    /// Lazy case-insensitive substring search. The returned iterator is `Clone`, so it can be
    /// restarted from the beginning; an empty needle matches everything.
    #[must_use]
    pub fn search(&self, needle: &str) -> Search<'_> {
        Search { items: self.items.iter(), needle: needle.trim().to_lowercase() }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    #[must_use]
    pub fn contains(&self, item: &str) -> bool {
        self.seen.contains(item)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemId> {
        self.items.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ItemId> {
        self.items
    }
}

impl FromIterator<ItemId> for ItemRegistry {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.add(iter);
        registry
    }
}

impl<'a> IntoIterator for &'a ItemRegistry {
    type Item = &'a ItemId;
    type IntoIter = std::slice::Iter<'a, ItemId>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Matches produced by [`ItemRegistry::search`].
#[derive(Debug, Clone)]
pub struct Search<'a> {
    items: std::slice::Iter<'a, ItemId>,
    needle: String,
}

impl<'a> Iterator for Search<'a> {
    type Item = &'a ItemId;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        self.items.find(|item| needle.is_empty() || item.as_str().to_lowercase().contains(needle))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.items.len()))
    }
}
