//! Domain types for localized dictionary trees.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem
//! paths. All types are serializable/deserializable via serde + serde_yaml.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ItemKey
// ---------------------------------------------------------------------------

/// Largest numeric id that widens into the low-order segment of an
/// [`ItemKey`]: twelve decimal digits.
pub const MAX_NUMERIC_KEY: i64 = 999_999_999_999;

/// Immutable identity of a dictionary item, stable across renames.
///
/// The nil UUID means "no identity" and never matches a real item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemKey(Uuid);

impl ItemKey {
    /// Creates a fresh random identity.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wraps an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// True for the nil identity.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parses an identity from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Widens a narrow integer id into the identity space by zero-padding
    /// it into the low-order segment of an all-zero UUID template.
    ///
    /// Ids outside `0..=`[`MAX_NUMERIC_KEY`] do not fit the twelve-digit
    /// segment and yield `None`.
    #[must_use]
    pub fn from_numeric(id: i64) -> Option<Self> {
        if !(0..=MAX_NUMERIC_KEY).contains(&id) {
            return None;
        }
        Uuid::parse_str(&format!("00000000-0000-0000-0000-{id:012}"))
            .ok()
            .map(Self)
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemKey {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// Languages and translations
// ---------------------------------------------------------------------------

/// A language known to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: i64,
    /// Culture code, e.g. `en-US`.
    pub culture: String,
}

impl Language {
    pub fn new(id: i64, culture: impl Into<String>) -> Self {
        Self {
            id,
            culture: culture.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DictionaryItem
// ---------------------------------------------------------------------------

/// A node in the dictionary tree.
///
/// `key` is immutable once the item exists; `logical_name` is the mutable
/// human-assigned alias that on-disk paths derive from. `parent` is
/// identity-only — it carries no ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryItem {
    pub key: ItemKey,
    pub logical_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemKey>,
    /// Culture code → translated text, ordered by culture.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub translations: BTreeMap<String, String>,
}

impl DictionaryItem {
    pub fn new(key: ItemKey, logical_name: impl Into<String>, parent: Option<ItemKey>) -> Self {
        Self {
            key,
            logical_name: logical_name.into(),
            parent,
            translations: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn fresh_keys_are_unique_and_non_nil() {
        let a = ItemKey::new();
        let b = ItemKey::new();
        assert_ne!(a, b);
        assert!(!a.is_nil());
    }

    #[rstest]
    #[case(0, "00000000-0000-0000-0000-000000000000")]
    #[case(42, "00000000-0000-0000-0000-000000000042")]
    #[case(1055, "00000000-0000-0000-0000-000000001055")]
    #[case(MAX_NUMERIC_KEY, "00000000-0000-0000-0000-999999999999")]
    fn numeric_ids_widen_deterministically(#[case] id: i64, #[case] expected: &str) {
        let key = ItemKey::from_numeric(id).expect("widen");
        assert_eq!(key.to_string(), expected);
    }

    #[rstest]
    #[case(-1)]
    #[case(MAX_NUMERIC_KEY + 1)]
    fn out_of_range_ids_do_not_widen(#[case] id: i64) {
        assert_eq!(ItemKey::from_numeric(id), None);
    }

    #[test]
    fn widened_zero_is_the_nil_identity() {
        assert!(ItemKey::from_numeric(0).expect("widen").is_nil());
    }

    #[test]
    fn parse_roundtrip() {
        let key = ItemKey::new();
        let parsed: ItemKey = key.to_string().parse().expect("parse");
        assert_eq!(parsed, key);
    }

    #[test]
    fn item_serde_roundtrip() {
        let mut item = DictionaryItem::new(ItemKey::new(), "Greeting", None);
        item.translations
            .insert("en-US".to_string(), "Hello".to_string());
        let yaml = serde_yaml::to_string(&item).expect("serialize");
        let back: DictionaryItem = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(back, item);
    }

    #[test]
    fn translations_iterate_in_culture_order() {
        let mut item = DictionaryItem::new(ItemKey::new(), "Greeting", None);
        item.translations
            .insert("fr-FR".to_string(), "Bonjour".to_string());
        item.translations
            .insert("da-DK".to_string(), "Hej".to_string());
        item.translations
            .insert("en-US".to_string(), "Hello".to_string());
        let cultures: Vec<&str> = item.translations.keys().map(String::as_str).collect();
        assert_eq!(cultures, vec!["da-DK", "en-US", "fr-FR"]);
    }
}
