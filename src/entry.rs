//! File entries and metadata merging.

use crate::error::{MultilangError, Result};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// File collection keyed by filename, in load order.
pub type Files = IndexMap<String, FileEntry>;

/// A single file handed over by the host loader.
///
/// `contents` is kept apart from the free-form `metadata` so that merging
/// metadata can never replace the payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileEntry {
    pub contents: Vec<u8>,

    /// Front matter and any other host-provided properties.
    pub metadata: Map<String, Value>,

    /// Resolved locale code; set by the resolver.
    pub locale: Option<String>,

    /// Locale code to the key of the same document in that locale.
    pub alt_files: IndexMap<String, String>,

    /// Routing prefix; only set on index documents (`""` or `"<locale>/"`).
    pub path: Option<String>,
}

impl FileEntry {
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: contents.into(),
            ..Self::default()
        }
    }

    /// Builder-style metadata insert.
    pub fn with_meta<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.metadata.get(key)
    }

    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Whether the host flagged this file as a directory index.
    pub fn is_index(&self) -> bool {
        matches!(self.metadata.get("index"), Some(Value::Bool(true)))
    }

    /// Key of this document in `locale`.
    pub fn alt_filename(&self, locale: &str) -> Result<&str> {
        self.alt_files
            .get(locale)
            .map(String::as_str)
            .ok_or_else(|| MultilangError::UnknownLocale {
                locale: locale.to_string(),
            })
    }

    /// This document in `locale`, looked up in the collection that owns it.
    ///
    /// Fails with `UnknownLocale` when there is no alternate for `locale`.
    pub fn lang<'a>(&self, files: &'a Files, locale: &str) -> Result<&'a FileEntry> {
        let name = self.alt_filename(locale)?;
        files.get(name).ok_or_else(|| MultilangError::UnknownLocale {
            locale: locale.to_string(),
        })
    }

    /// A copy of this entry with `base`'s metadata underneath its own.
    ///
    /// `base` is left untouched and this entry's `contents` is kept as is.
    pub fn merged_onto(&self, base: &FileEntry) -> FileEntry {
        FileEntry {
            contents: self.contents.clone(),
            metadata: deep_merge(&base.metadata, &self.metadata),
            locale: self.locale.clone(),
            alt_files: self.alt_files.clone(),
            path: self.path.clone(),
        }
    }
}

/// Deep-merge `overlay` onto a copy of `base`.
///
/// Objects merge key by key, arrays become an ordered union (base items the
/// overlay lacks, then the overlay's items), and any other overlay value wins.
pub fn deep_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let next = match merged.get(key) {
            Some(existing) => merge_value(existing, value),
            None => value.clone(),
        };
        merged.insert(key.clone(), next);
    }
    merged
}

fn merge_value(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => Value::Object(deep_merge(b, o)),
        (Value::Array(b), Value::Array(o)) => {
            let mut items: Vec<Value> = b.iter().filter(|v| !o.contains(v)).cloned().collect();
            items.extend(o.iter().cloned());
            Value::Array(items)
        }
        (_, overlay) => overlay.clone(),
    }
}
