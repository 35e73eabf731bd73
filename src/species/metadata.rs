//! Optional species metadata asset.
//!
//! ```json
//! { "species": [ { "label": "Cod", "norwegianName": "Torsk", "characteristics": ["..."] } ] }
//! ```
//!
//! Loaded at most once per process. A missing or malformed asset yields an
//! empty table.

use crate::error::{Error, Result};
use crate::species::SpeciesRecord;
use crate::utils::AssetCache;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

static METADATA: AssetCache<MetadataTable> = AssetCache::new();

/// Species records keyed by model label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTable {
    by_label: HashMap<String, SpeciesRecord>,
}

/// Entries stay untyped so a bad field costs only that field.
#[derive(Debug, Default, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    species: Vec<Value>,
}

/// Build a record from one asset entry, reading each field on its own.
///
/// Fields that are missing or not strings become empty; non-string
/// characteristics are skipped. Entries without a usable label yield `None`.
fn record_from_entry(entry: &Value) -> Option<SpeciesRecord> {
    let text = |key: &str| {
        entry
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default()
    };

    let label = text("label");
    if label.trim().is_empty() {
        return None;
    }

    let characteristics = entry
        .get("characteristics")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|c| !c.trim().is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(SpeciesRecord {
        norwegian_name: text("norwegianName"),
        english_name: text("englishName"),
        scientific_name: text("scientificName"),
        description: text("description"),
        habitat: text("habitat"),
        average_size: text("averageSize"),
        characteristics,
        label,
    })
}

impl MetadataTable {
    /// Parse the JSON asset format.
    ///
    /// Entries with a blank label are dropped, as are blank characteristics.
    /// A mistyped field is left empty without affecting other fields or
    /// entries. A later entry with the same label replaces an earlier one.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let file: MetadataFile = serde_json::from_str(contents)?;

        let by_label = file
            .species
            .iter()
            .filter_map(record_from_entry)
            .map(|record| (record.label.clone(), record))
            .collect();

        Ok(Self { by_label })
    }

    /// Record for an exact label.
    pub fn get(&self, label: &str) -> Option<&SpeciesRecord> {
        self.by_label.get(label)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Read and parse a metadata asset file.
pub fn read_metadata(path: &Path) -> Result<MetadataTable> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::AssetRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    MetadataTable::from_json(&contents).map_err(|e| Error::AssetParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Process-wide metadata table, loaded from `path` on first call.
///
/// The first result, including an empty fallback table, is kept until
/// [`invalidate_metadata`] is called.
pub fn load_metadata(path: Option<&Path>) -> Arc<MetadataTable> {
    METADATA.get_or_init(|| {
        let Some(path) = path else {
            debug!("No metadata asset configured");
            return MetadataTable::default();
        };

        match read_metadata(path) {
            Ok(table) => {
                debug!("Loaded {} metadata records from {}", table.len(), path.display());
                table
            }
            Err(e) => {
                warn!("{e}, continuing without species metadata");
                MetadataTable::default()
            }
        }
    })
}

/// Drop the cached table so the next [`load_metadata`] reloads.
pub fn invalidate_metadata() {
    METADATA.invalidate();
}
