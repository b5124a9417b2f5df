//! JSON manifest I/O for the command-line host.
//!
//! A manifest is an object mapping filenames to entries. Each entry carries
//! its text `contents` next to arbitrary metadata:
//!
//! ```json
//! {
//!   "index.html":    { "contents": "<h1>Home</h1>", "index": true, "title": "Home" },
//!   "index_es.html": { "contents": "<h1>Inicio</h1>", "index": true }
//! }
//! ```
//!
//! The resolved output wraps the collection with the locale index so that a
//! renderer can build locale switchers.

use crate::entry::{FileEntry, Files};
use crate::resolver::LocaleIndex;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize)]
struct ManifestEntry {
    #[serde(default)]
    contents: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    locale: Option<String>,

    #[serde(default, rename = "altFiles", skip_serializing_if = "IndexMap::is_empty")]
    alt_files: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<String>,

    #[serde(flatten)]
    metadata: Map<String, Value>,
}

impl ManifestEntry {
    fn into_entry(self) -> FileEntry {
        FileEntry {
            contents: self.contents.into_bytes(),
            metadata: self.metadata,
            locale: self.locale,
            alt_files: self.alt_files,
            path: self.path,
        }
    }

    fn from_entry(name: &str, entry: &FileEntry) -> Result<Self> {
        let contents = String::from_utf8(entry.contents.clone())
            .with_context(|| format!("Contents of {} are not valid UTF-8", name))?;
        Ok(Self {
            contents,
            locale: entry.locale.clone(),
            alt_files: entry.alt_files.clone(),
            path: entry.path.clone(),
            metadata: entry.metadata.clone(),
        })
    }
}

/// Resolved manifest written back by the host.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolvedManifest {
    default_locale: String,
    /// Locale code to the names registered in that locale.
    locales: IndexMap<String, Vec<String>>,
    files: IndexMap<String, ManifestEntry>,
}

/// Parse a manifest from a JSON string.
pub fn parse(json: &str) -> Result<Files> {
    let raw: IndexMap<String, ManifestEntry> =
        serde_json::from_str(json).context("Failed to parse manifest JSON")?;
    Ok(raw
        .into_iter()
        .map(|(name, entry)| (name, entry.into_entry()))
        .collect())
}

/// Load a manifest from disk.
pub fn load(path: &Path) -> Result<Files> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    parse(&json)
}

/// Render the resolved collection and its locale index as pretty JSON.
pub fn render(files: &Files, index: &LocaleIndex) -> Result<String> {
    let resolved = ResolvedManifest {
        default_locale: index.default_locale.clone(),
        locales: index
            .locales
            .iter()
            .map(|(locale, entries)| (locale.clone(), entries.keys().cloned().collect()))
            .collect(),
        files: files
            .iter()
            .map(|(name, entry)| -> Result<(String, ManifestEntry)> {
                Ok((name.clone(), ManifestEntry::from_entry(name, entry)?))
            })
            .collect::<Result<_>>()?,
    };

    serde_json::to_string_pretty(&resolved).context("Failed to serialize resolved manifest")
}

/// Write the resolved collection to disk.
pub fn save(path: &Path, files: &Files, index: &LocaleIndex) -> Result<()> {
    let json = render(files, index)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
