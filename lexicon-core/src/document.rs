//! Structured document model — the serialized form of a dictionary subtree.
//!
//! # Identity probing
//!
//! The place a document keeps its immutable identity has changed across
//! schema eras, and files from different eras coexist on disk. Extraction is
//! therefore an explicit ordered list of strategies, each a pure function
//! over the raw YAML value, applied in priority order with first hit wins:
//!
//! 1. top-level `key` parsed as a UUID (oldest schema kept the identity
//!    there; a logical name in that field fails the parse and falls through)
//! 2. nested `info.key`
//! 3. top-level `guid` (current schema)
//!
//! Any parse failure yields no identity, which never matches a real key.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::types::ItemKey;

/// Node type tag for dictionary item documents.
pub const DICTIONARY_ITEM_KIND: &str = "dictionary-item";

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// One localized value inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocValue {
    pub language_id: i64,
    /// Culture code, e.g. `en-US`.
    pub culture: String,
    /// Translated text, carried verbatim.
    pub text: String,
}

/// The on-disk form of a dictionary item subtree.
///
/// `values` are ordered by culture and `children` by logical key; the
/// ordering is load-bearing for hash stability, not cosmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictDocument {
    /// Node type tag.
    pub kind: String,
    /// Logical name of the item.
    #[serde(default)]
    pub key: String,
    /// Immutable identity; emitted on root documents only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guid: Option<ItemKey>,
    /// Recorded content hash. Non-semantic: excluded from hashing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    /// Marks an archival copy. Archives never trigger re-sync.
    #[serde(default, skip_serializing_if = "is_false")]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<DocValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DictDocument>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl DictDocument {
    /// An empty dictionary-item document with the given logical name.
    #[must_use]
    pub fn named(key: impl Into<String>) -> Self {
        Self {
            kind: DICTIONARY_ITEM_KIND.to_string(),
            key: key.into(),
            guid: None,
            hash: None,
            archived: false,
            values: Vec::new(),
            children: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Identity probing strategies
// ---------------------------------------------------------------------------

type Strategy = fn(&Value) -> Option<ItemKey>;

/// Ordered identity lookup strategies; first non-empty hit wins.
pub const IDENTITY_STRATEGIES: &[(&str, Strategy)] = &[
    ("key", probe_key_field),
    ("info.key", probe_info_key),
    ("guid", probe_guid_field),
];

/// Extract an identity from a raw document value using the strategy list.
///
/// Returns `None` when no strategy finds a non-nil identity.
#[must_use]
pub fn probe_identity(value: &Value) -> Option<ItemKey> {
    IDENTITY_STRATEGIES
        .iter()
        .find_map(|(_, strategy)| strategy(value))
}

fn parse_key(value: &Value) -> Option<ItemKey> {
    let key = ItemKey::parse(value.as_str()?).ok()?;
    (!key.is_nil()).then_some(key)
}

fn probe_key_field(value: &Value) -> Option<ItemKey> {
    parse_key(value.get("key")?)
}

fn probe_info_key(value: &Value) -> Option<ItemKey> {
    parse_key(value.get("info")?.get("key")?)
}

fn probe_guid_field(value: &Value) -> Option<ItemKey> {
    parse_key(value.get("guid")?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
