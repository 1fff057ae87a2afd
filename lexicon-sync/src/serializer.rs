//! Tree serializer — two-way mapping between dictionary item trees in the
//! store and structured documents.
//!
//! Serialization orders values by culture and children by logical name so
//! that two serializations of logically identical state are byte-identical;
//! hash-based change detection depends on this.
//!
//! Deserialization locates existing items guid-first, then by logical name,
//! and creates a new item only when both miss. Children missing from an
//! incoming document are left untouched: destructive child cleanup is a
//! non-goal of the sync path.

use lexicon_core::{DictDocument, DictionaryItem, DocValue, EntityStore, ItemKey};

use crate::error::SyncError;

/// Result of importing one document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    /// Identity of the root item the document resolved to.
    pub key: ItemKey,
    /// Logical name used for reporting.
    pub name: String,
    /// Logical names of the direct children observed in the document.
    pub child_names: Vec<String>,
}

// ---------------------------------------------------------------------------
// Serialize
// ---------------------------------------------------------------------------

/// Serialize `item` and its descendants into a structured document.
pub fn serialize<S: EntityStore + ?Sized>(
    store: &S,
    item: &DictionaryItem,
) -> Result<DictDocument, SyncError> {
    build_document(store, item, true)
}

fn build_document<S: EntityStore + ?Sized>(
    store: &S,
    item: &DictionaryItem,
    root: bool,
) -> Result<DictDocument, SyncError> {
    let mut doc = DictDocument::named(&item.logical_name);

    // Nested documents are located relative to their resolved parent, so
    // only the root carries an independent identity.
    if root {
        doc.guid = Some(item.key);
    }

    let languages = store.languages()?;
    for (culture, text) in &item.translations {
        let Some(language) = languages.iter().find(|l| &l.culture == culture) else {
            tracing::warn!(
                "skipping translation with unknown culture '{culture}' on '{}'",
                item.logical_name
            );
            continue;
        };
        doc.values.push(DocValue {
            language_id: language.id,
            culture: culture.clone(),
            text: text.clone(),
        });
    }

    for child in store.children_of(&item.key)? {
        doc.children.push(build_document(store, &child, false)?);
    }

    Ok(doc)
}

// ---------------------------------------------------------------------------
// Deserialize
// ---------------------------------------------------------------------------

/// Import a document tree into the store.
///
/// Fails only when the root document carries no logical name; everything
/// else degrades per-node (unknown cultures skipped, malformed children
/// skipped with a warning).
pub fn deserialize<S: EntityStore + ?Sized>(
    store: &mut S,
    doc: &DictDocument,
) -> Result<ImportOutcome, SyncError> {
    let item = import_node(store, doc, None)?;
    let child_names = doc
        .children
        .iter()
        .filter(|c| !c.key.is_empty())
        .map(|c| c.key.clone())
        .collect();
    Ok(ImportOutcome {
        key: item.key,
        name: item.logical_name,
        child_names,
    })
}

fn import_node<S: EntityStore + ?Sized>(
    store: &mut S,
    doc: &DictDocument,
    parent: Option<ItemKey>,
) -> Result<DictionaryItem, SyncError> {
    if doc.key.is_empty() {
        return Err(SyncError::MalformedDocument {
            reason: "document has no logical name".to_string(),
        });
    }

    let guid = doc.guid.filter(|g| !g.is_nil());

    let mut item = match guid {
        Some(g) => store.find_by_key(&g)?,
        None => None,
    };
    if item.is_none() {
        item = store.find_by_name(&doc.key)?;
    }

    let mut item = match item {
        Some(existing) => {
            // Identity is immutable post-creation; a document declaring a
            // different guid is recorded, never applied.
            if let Some(g) = guid {
                if g != existing.key {
                    tracing::warn!(
                        "document '{}' declares identity {g} but item holds {}; keeping the stored identity",
                        doc.key,
                        existing.key
                    );
                }
            }
            existing
        }
        None => match parent {
            Some(p) => store.create(&doc.key, Some(p), None)?,
            // Seeding a new root with the declared identity lets a later
            // rename still locate it by that identity.
            None => store.create(&doc.key, None, guid)?,
        },
    };

    if item.logical_name != doc.key {
        tracing::info!("renaming '{}' to '{}'", item.logical_name, doc.key);
        item.logical_name = doc.key.clone();
    }
    store.save(&item)?;

    let languages = store.languages()?;
    for value in &doc.values {
        if languages.iter().any(|l| l.culture == value.culture) {
            store.upsert_translation(&item.key, &value.culture, &value.text)?;
        } else {
            tracing::debug!(
                "skipping value with unknown culture '{}' on '{}'",
                value.culture,
                doc.key
            );
        }
    }

    for child in &doc.children {
        if let Err(e) = import_node(store, child, Some(item.key)) {
            tracing::warn!("skipping child of '{}': {e}", doc.key);
        }
    }

    // Children present in the store but absent from the document are left
    // in place. A true sync would remove them, but for dictionary trees
    // that is destructive: a missed rename is recoverable, deleted
    // translations are not.
    store
        .find_by_key(&item.key)?
        .ok_or_else(|| SyncError::MalformedDocument {
            reason: format!("item '{}' vanished during import", doc.key),
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
