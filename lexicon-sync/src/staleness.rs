//! Hash-based staleness check.
//!
//! Decides whether a stored document differs from live store state without
//! a full diff: re-serialize the matched item and compare canonical content
//! hashes. Every failure mode degrades to "stale" — preferring a redundant
//! re-sync over silently skipping a real change — except archival copies,
//! which are historical and never stale.

use lexicon_core::{DictDocument, EntityStore};

use crate::codec;

/// True when the document needs an update against live store state.
pub fn is_stale<S: EntityStore + ?Sized>(store: &S, doc: &DictDocument) -> bool {
    if doc.archived {
        return false;
    }

    let Ok(incoming_hash) = codec::content_hash(doc) else {
        return true;
    };

    if doc.key.is_empty() {
        return true;
    }

    let item = match store.find_by_name(&doc.key) {
        Ok(Some(item)) => item,
        Ok(None) | Err(_) => return true,
    };

    let Ok(fresh) = crate::serializer::serialize(store, &item) else {
        return true;
    };
    let Ok(fresh_hash) = codec::content_hash(&fresh) else {
        return true;
    };

    incoming_hash != fresh_hash
}
