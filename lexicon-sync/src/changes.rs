//! Detailed change reports — what an import of a document would touch.
//!
//! Same resolution logic as the staleness check, but instead of a boolean
//! it walks the incoming document against a fresh serialization of the
//! matched item and reports each differing field. Multi-line text changes
//! carry a unified diff.

use similar::TextDiff;

use lexicon_core::{DictDocument, EntityStore};

use crate::{codec, serializer};

/// What kind of divergence a [`Change`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// No live item matches the document; an import would create it.
    NewItem,
    /// Change detection itself failed; treat the document as changed.
    Error,
    /// A field differs between document and live state.
    Update,
    /// Present in the document, absent from live state.
    Create,
    /// Present in live state, absent from the document.
    Delete,
}

/// One field-level difference between a document and live store state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Slash-separated logical path of the node, e.g. `Parent/Parent.Child`.
    pub path: String,
    /// The field that differs, e.g. `Value (en-US)`.
    pub name: String,
    pub kind: ChangeKind,
    /// Live value (what the store holds now).
    pub old_value: Option<String>,
    /// Incoming value (what the document carries).
    pub new_value: Option<String>,
    /// Unified diff for multi-line text changes.
    pub detail: Option<String>,
}

impl Change {
    fn new_item(name: &str) -> Self {
        Self {
            path: name.to_string(),
            name: "item".to_string(),
            kind: ChangeKind::NewItem,
            old_value: None,
            new_value: Some(name.to_string()),
            detail: None,
        }
    }

    fn error(name: &str) -> Self {
        Self {
            path: name.to_string(),
            name: "item".to_string(),
            kind: ChangeKind::Error,
            old_value: None,
            new_value: None,
            detail: None,
        }
    }
}

/// Report every field-level difference an import of `doc` would apply.
///
/// Empty when the document is current or carries no identity to compare;
/// a single `NewItem` sentinel when no live item matches; a single `Error`
/// sentinel when re-serialization fails.
pub fn get_changes<S: EntityStore + ?Sized>(store: &S, doc: &DictDocument) -> Vec<Change> {
    if codec::content_hash(doc).is_err() {
        return Vec::new();
    }
    if doc.key.is_empty() {
        return Vec::new();
    }

    let item = match store.find_by_name(&doc.key) {
        Ok(Some(item)) => item,
        Ok(None) => return vec![Change::new_item(&doc.key)],
        Err(_) => return vec![Change::error(&doc.key)],
    };

    let fresh = match serializer::serialize(store, &item) {
        Ok(fresh) => fresh,
        Err(_) => return vec![Change::error(&doc.key)],
    };

    let mut changes = Vec::new();
    diff_nodes(doc, &fresh, &doc.key, &mut changes);
    changes
}

fn diff_nodes(incoming: &DictDocument, live: &DictDocument, path: &str, out: &mut Vec<Change>) {
    if incoming.kind != live.kind {
        out.push(Change {
            path: path.to_string(),
            name: "kind".to_string(),
            kind: ChangeKind::Update,
            old_value: Some(live.kind.clone()),
            new_value: Some(incoming.kind.clone()),
            detail: None,
        });
    }

    if let (Some(incoming_guid), Some(live_guid)) = (incoming.guid, live.guid) {
        if incoming_guid != live_guid {
            out.push(Change {
                path: path.to_string(),
                name: "guid".to_string(),
                kind: ChangeKind::Update,
                old_value: Some(live_guid.to_string()),
                new_value: Some(incoming_guid.to_string()),
                detail: None,
            });
        }
    }

    diff_values(incoming, live, path, out);
    diff_children(incoming, live, path, out);
}

fn diff_values(incoming: &DictDocument, live: &DictDocument, path: &str, out: &mut Vec<Change>) {
    for value in &incoming.values {
        let name = format!("Value ({})", value.culture);
        match live.values.iter().find(|v| v.culture == value.culture) {
            None => out.push(Change {
                path: path.to_string(),
                name,
                kind: ChangeKind::Create,
                old_value: None,
                new_value: Some(value.text.clone()),
                detail: None,
            }),
            Some(current) if current.text != value.text => out.push(Change {
                path: path.to_string(),
                name,
                kind: ChangeKind::Update,
                old_value: Some(current.text.clone()),
                new_value: Some(value.text.clone()),
                detail: text_diff(&current.text, &value.text),
            }),
            Some(_) => {}
        }
    }

    for current in &live.values {
        if !incoming.values.iter().any(|v| v.culture == current.culture) {
            out.push(Change {
                path: path.to_string(),
                name: format!("Value ({})", current.culture),
                kind: ChangeKind::Delete,
                old_value: Some(current.text.clone()),
                new_value: None,
                detail: None,
            });
        }
    }
}

fn diff_children(incoming: &DictDocument, live: &DictDocument, path: &str, out: &mut Vec<Change>) {
    for child in &incoming.children {
        let child_path = format!("{path}/{}", child.key);
        match live.children.iter().find(|c| c.key == child.key) {
            None => out.push(Change {
                path: child_path,
                name: "item".to_string(),
                kind: ChangeKind::Create,
                old_value: None,
                new_value: Some(child.key.clone()),
                detail: None,
            }),
            Some(current) => diff_nodes(child, current, &child_path, out),
        }
    }

    for current in &live.children {
        if !incoming.children.iter().any(|c| c.key == current.key) {
            out.push(Change {
                path: format!("{path}/{}", current.key),
                name: "item".to_string(),
                kind: ChangeKind::Delete,
                old_value: Some(current.key.clone()),
                new_value: None,
                detail: None,
            });
        }
    }
}

/// Unified diff of a text change; only multi-line values get one, short
/// values are readable from old/new alone.
fn text_diff(old: &str, new: &str) -> Option<String> {
    if !old.contains('\n') && !new.contains('\n') {
        return None;
    }
    let diff = TextDiff::from_lines(old, new)
        .unified_diff()
        .header("live", "incoming")
        .context_radius(3)
        .to_string();
    Some(diff)
}

#[cfg(test)]
mod tests {
    use lexicon_core::{DocValue, Language, MemoryStore};

    use crate::serializer::serialize;

    use super::*;

    fn seeded_store() -> (MemoryStore, DictDocument) {
        let mut store = MemoryStore::new();
        store.add_language(Language::new(1, "en-US"));
        store.add_language(Language::new(2, "da-DK"));

        let item = store.create("Greeting", None, None).expect("create");
        store
            .upsert_translation(&item.key, "en-US", "Hello")
            .expect("upsert");
        let item = store.find_by_key(&item.key).expect("lookup").expect("item");
        let doc = serialize(&store, &item).expect("serialize");
        (store, doc)
    }

    #[test]
    fn current_document_reports_no_changes() {
        let (store, doc) = seeded_store();
        assert!(get_changes(&store, &doc).is_empty());
    }

    #[test]
    fn unmatched_document_reports_the_new_item_sentinel() {
        let (store, _) = seeded_store();
        let doc = DictDocument::named("Brand.New");
        let changes = get_changes(&store, &doc);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::NewItem);
        assert_eq!(changes[0].new_value.as_deref(), Some("Brand.New"));
    }

    #[test]
    fn edited_value_reports_old_and_new_text() {
        let (store, mut doc) = seeded_store();
        doc.values[0].text = "Howdy".to_string();

        let changes = get_changes(&store, &doc);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Update);
        assert_eq!(changes[0].name, "Value (en-US)");
        assert_eq!(changes[0].old_value.as_deref(), Some("Hello"));
        assert_eq!(changes[0].new_value.as_deref(), Some("Howdy"));
        assert!(changes[0].detail.is_none(), "single-line edits carry no diff");
    }

    #[test]
    fn multi_line_edit_carries_a_unified_diff() {
        let (mut store, _) = seeded_store();
        let item = store.find_by_name("Greeting").expect("lookup").expect("item");
        store
            .upsert_translation(&item.key, "en-US", "line one\nline two\n")
            .expect("upsert");
        let item = store.find_by_key(&item.key).expect("lookup").expect("item");
        let mut doc = serialize(&store, &item).expect("serialize");
        doc.values[0].text = "line one\nline 2\n".to_string();

        let changes = get_changes(&store, &doc);
        assert_eq!(changes.len(), 1);
        let detail = changes[0].detail.as_deref().expect("unified diff");
        assert!(detail.contains("--- live"));
        assert!(detail.contains("+++ incoming"));
        assert!(detail.contains("-line two"));
        assert!(detail.contains("+line 2"));
    }

    #[test]
    fn value_only_in_document_reports_create() {
        let (store, mut doc) = seeded_store();
        doc.values.push(DocValue {
            language_id: 2,
            culture: "da-DK".to_string(),
            text: "Hej".to_string(),
        });

        let changes = get_changes(&store, &doc);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, ChangeKind::Create);
        assert_eq!(changes[0].name, "Value (da-DK)");
    }

    #[test]
    fn child_divergence_reports_create_and_delete_subtrees() {
        let (mut store, _) = seeded_store();
        let item = store.find_by_name("Greeting").expect("lookup").expect("item");
        store
            .create("Greeting.Live", Some(item.key), None)
            .expect("create");
        let item = store.find_by_key(&item.key).expect("lookup").expect("item");
        let mut doc = serialize(&store, &item).expect("serialize");
        doc.children.retain(|c| c.key != "Greeting.Live");
        doc.children.push(DictDocument::named("Greeting.Incoming"));

        let changes = get_changes(&store, &doc);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().any(|c| {
            c.kind == ChangeKind::Create && c.path == "Greeting/Greeting.Incoming"
        }));
        assert!(changes.iter().any(|c| {
            c.kind == ChangeKind::Delete && c.path == "Greeting/Greeting.Live"
        }));
    }

    #[test]
    fn nested_child_edits_report_the_full_path() {
        let (mut store, _) = seeded_store();
        let item = store.find_by_name("Greeting").expect("lookup").expect("item");
        let child = store
            .create("Greeting.Child", Some(item.key), None)
            .expect("create");
        store
            .upsert_translation(&child.key, "en-US", "inner")
            .expect("upsert");
        let item = store.find_by_key(&item.key).expect("lookup").expect("item");
        let mut doc = serialize(&store, &item).expect("serialize");
        doc.children[0].values[0].text = "edited".to_string();

        let changes = get_changes(&store, &doc);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "Greeting/Greeting.Child");
        assert_eq!(changes[0].old_value.as_deref(), Some("inner"));
    }

    #[test]
    fn document_without_logical_name_reports_nothing() {
        let (store, _) = seeded_store();
        let doc = DictDocument::named("");
        assert!(get_changes(&store, &doc).is_empty());
    }
}
