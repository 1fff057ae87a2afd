//! Entity store — the narrow contract the sync engine consumes, plus the
//! in-process [`MemoryStore`] implementation.
//!
//! The engine never assumes more than this trait: lookups by identity and
//! by logical name, creation, translation upserts, and ordered child
//! listing. A backend wrapping a real CMS implements the same surface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::types::{DictionaryItem, ItemKey, Language};

// ---------------------------------------------------------------------------
// EntityStore trait
// ---------------------------------------------------------------------------

/// Authoritative storage for dictionary items.
///
/// Identity is immutable post-creation: `create` is the only place a key can
/// be chosen (via `seed`), and no method changes the key of a stored item.
pub trait EntityStore {
    /// Look an item up by its immutable identity.
    fn find_by_key(&self, key: &ItemKey) -> Result<Option<DictionaryItem>, StoreError>;

    /// Look an item up by its logical name (exact match).
    fn find_by_name(&self, name: &str) -> Result<Option<DictionaryItem>, StoreError>;

    /// Create a new item. `seed` fixes the identity at creation time; when
    /// absent a fresh identity is generated.
    fn create(
        &mut self,
        name: &str,
        parent: Option<ItemKey>,
        seed: Option<ItemKey>,
    ) -> Result<DictionaryItem, StoreError>;

    /// Persist a mutated item. The item's key must already exist; the
    /// stored identity is never changed by a save.
    fn save(&mut self, item: &DictionaryItem) -> Result<(), StoreError>;

    /// Insert or update one translation on an existing item.
    fn upsert_translation(
        &mut self,
        key: &ItemKey,
        culture: &str,
        text: &str,
    ) -> Result<(), StoreError>;

    /// Direct children of `key`, ordered by logical name ascending.
    fn children_of(&self, key: &ItemKey) -> Result<Vec<DictionaryItem>, StoreError>;

    /// Parentless items, ordered by logical name ascending.
    fn roots(&self) -> Result<Vec<DictionaryItem>, StoreError>;

    /// The set of languages the store knows about.
    fn languages(&self) -> Result<Vec<Language>, StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// In-process [`EntityStore`] backed by ordered maps.
///
/// Doubles as the deserialization target for snapshot files, so the whole
/// store state round-trips through serde.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    languages: Vec<Language>,
    #[serde(default)]
    items: BTreeMap<ItemKey, DictionaryItem>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a language. Replaces an existing entry with the same culture.
    pub fn add_language(&mut self, language: Language) {
        self.languages.retain(|l| l.culture != language.culture);
        self.languages.push(language);
        self.languages.sort_by(|a, b| a.culture.cmp(&b.culture));
    }

    /// Number of items held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn sorted_by_name(mut items: Vec<DictionaryItem>) -> Vec<DictionaryItem> {
        items.sort_by(|a, b| a.logical_name.cmp(&b.logical_name));
        items
    }
}

impl EntityStore for MemoryStore {
    fn find_by_key(&self, key: &ItemKey) -> Result<Option<DictionaryItem>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn find_by_name(&self, name: &str) -> Result<Option<DictionaryItem>, StoreError> {
        Ok(self
            .items
            .values()
            .find(|i| i.logical_name == name)
            .cloned())
    }

    fn create(
        &mut self,
        name: &str,
        parent: Option<ItemKey>,
        seed: Option<ItemKey>,
    ) -> Result<DictionaryItem, StoreError> {
        let key = seed.filter(|k| !k.is_nil()).unwrap_or_else(ItemKey::new);
        let item = DictionaryItem::new(key, name, parent);
        self.items.insert(key, item.clone());
        Ok(item)
    }

    fn save(&mut self, item: &DictionaryItem) -> Result<(), StoreError> {
        if !self.items.contains_key(&item.key) {
            return Err(StoreError::ItemNotFound { key: item.key });
        }
        self.items.insert(item.key, item.clone());
        Ok(())
    }

    fn upsert_translation(
        &mut self,
        key: &ItemKey,
        culture: &str,
        text: &str,
    ) -> Result<(), StoreError> {
        let item = self
            .items
            .get_mut(key)
            .ok_or(StoreError::ItemNotFound { key: *key })?;
        item.translations
            .insert(culture.to_string(), text.to_string());
        Ok(())
    }

    fn children_of(&self, key: &ItemKey) -> Result<Vec<DictionaryItem>, StoreError> {
        let children: Vec<DictionaryItem> = self
            .items
            .values()
            .filter(|i| i.parent.as_ref() == Some(key))
            .cloned()
            .collect();
        Ok(Self::sorted_by_name(children))
    }

    fn roots(&self) -> Result<Vec<DictionaryItem>, StoreError> {
        let roots: Vec<DictionaryItem> = self
            .items
            .values()
            .filter(|i| i.parent.is_none())
            .cloned()
            .collect();
        Ok(Self::sorted_by_name(roots))
    }

    fn languages(&self) -> Result<Vec<Language>, StoreError> {
        Ok(self.languages.clone())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
