//! Label to species record resolution.

use crate::constants::UNKNOWN_SPECIES;
use crate::species::metadata::MetadataTable;
use crate::species::{SpeciesRecord, catalog};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Which table produced a resolved record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Curated table, matched by label.
    CatalogLabel,
    /// Curated table, matched by class index.
    CatalogIndex,
    /// Metadata asset, matched by label.
    Metadata,
}

/// Result of resolving a winning label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A full record was found.
    Species {
        /// The record.
        record: SpeciesRecord,
        /// Where it came from.
        source: ResolutionSource,
    },
    /// Nothing matched; only the label is known.
    RawLabelOnly {
        /// The winning label, or the unknown-species sentinel.
        label: String,
    },
}

impl Resolution {
    /// The record to display, with empty fields for a raw label.
    pub fn record(&self) -> SpeciesRecord {
        match self {
            Self::Species { record, .. } => record.clone(),
            Self::RawLabelOnly { label } => SpeciesRecord::label_only(label.clone()),
        }
    }

    /// Name shown as the headline.
    pub fn display_name(&self) -> &str {
        match self {
            Self::Species { record, .. } => record.display_name(),
            Self::RawLabelOnly { label } => label,
        }
    }
}

/// Resolves labels against the curated catalog and the metadata table.
#[derive(Debug, Clone, Default)]
pub struct SpeciesResolver {
    metadata: Arc<MetadataTable>,
}

impl SpeciesResolver {
    /// Create a resolver consulting `metadata` after the catalog.
    pub fn new(metadata: Arc<MetadataTable>) -> Self {
        Self { metadata }
    }

    /// Resolve a winning label, first match wins:
    ///
    /// 1. catalog by label, when a label is present;
    /// 2. catalog by `fallback_index`, only when no label is present;
    /// 3. metadata by label;
    /// 4. the raw label, or the unknown-species sentinel.
    ///
    /// A blank label counts as absent.
    pub fn resolve(&self, label: Option<&str>, fallback_index: usize) -> Resolution {
        let label = label.filter(|l| !l.trim().is_empty());

        let Some(label) = label else {
            if let Some(record) = catalog::by_index(fallback_index) {
                debug!("Resolved index {fallback_index} to {}", record.label);
                return Resolution::Species {
                    record: record.clone(),
                    source: ResolutionSource::CatalogIndex,
                };
            }
            return Resolution::RawLabelOnly {
                label: UNKNOWN_SPECIES.to_string(),
            };
        };

        if let Some(record) = catalog::by_label(label) {
            return Resolution::Species {
                record: record.clone(),
                source: ResolutionSource::CatalogLabel,
            };
        }

        if let Some(record) = self.metadata.get(label) {
            return Resolution::Species {
                record: record.clone(),
                source: ResolutionSource::Metadata,
            };
        }

        debug!("No species record for '{label}'");
        Resolution::RawLabelOnly {
            label: label.to_string(),
        }
    }
}
