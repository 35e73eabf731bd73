//! Displayable species record.

use serde::{Deserialize, Serialize};

/// Everything shown to the user about one species.
///
/// Missing text fields are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeciesRecord {
    /// Model label this record belongs to.
    pub label: String,
    /// Norwegian common name.
    pub norwegian_name: String,
    /// English common name.
    pub english_name: String,
    /// Latin binomial.
    pub scientific_name: String,
    /// Free-text description.
    pub description: String,
    /// Where the species lives.
    pub habitat: String,
    /// Typical adult size.
    pub average_size: String,
    /// Identifying features, in display order.
    pub characteristics: Vec<String>,
}

impl SpeciesRecord {
    /// Record carrying only a label; every display field is empty.
    pub fn label_only(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Best available display name.
    pub fn display_name(&self) -> &str {
        if self.norwegian_name.is_empty() {
            &self.label
        } else {
            &self.norwegian_name
        }
    }
}
