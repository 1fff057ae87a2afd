//! Lexicon core library — domain types, entity store, document model, errors.
//!
//! Public API surface:
//! - [`types`] — [`ItemKey`] and the dictionary item model
//! - [`store`] — the [`EntityStore`] contract and [`MemoryStore`]
//! - [`document`] — the structured document model and identity probing
//! - [`snapshot`] — store snapshot persistence
//! - [`error`] — [`StoreError`]

pub mod document;
pub mod error;
pub mod snapshot;
pub mod store;
pub mod types;

pub use document::{DictDocument, DocValue, DICTIONARY_ITEM_KIND};
pub use error::StoreError;
pub use store::{EntityStore, MemoryStore};
pub use types::{DictionaryItem, ItemKey, Language};
