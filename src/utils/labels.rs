//! Label list file reading utilities.

use crate::constants::DEFAULT_LABELS;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

/// Read a model label list from file.
///
/// # File Format
/// - One label per line, line N naming class index N
/// - Surrounding whitespace is trimmed
/// - Blank lines are ignored
///
/// # Errors
/// - Returns error if file cannot be read
/// - Returns error if file contains invalid UTF-8
pub fn read_labels(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| Error::LabelsRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let reader = BufReader::new(file);
    let mut labels = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| Error::LabelsRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let trimmed = line.trim();
        if !trimmed.is_empty() {
            labels.push(trimmed.to_string());
        }
    }

    Ok(labels)
}

/// The built-in label list.
pub fn default_labels() -> Vec<String> {
    DEFAULT_LABELS.iter().map(ToString::to_string).collect()
}

/// Read labels from `path`, substituting the built-in list on any failure.
///
/// An empty file counts as a failure: a model cannot have zero classes.
pub fn load_labels_or_default(path: Option<&Path>) -> Vec<String> {
    let Some(path) = path else {
        debug!("No labels file configured, using built-in labels");
        return default_labels();
    };

    match read_labels(path) {
        Ok(labels) if !labels.is_empty() => {
            debug!("Loaded {} labels from {}", labels.len(), path.display());
            labels
        }
        Ok(_) => {
            warn!(
                "Labels file {} is empty, using built-in labels",
                path.display()
            );
            default_labels()
        }
        Err(e) => {
            warn!("{e}, using built-in labels");
            default_labels()
        }
    }
}
