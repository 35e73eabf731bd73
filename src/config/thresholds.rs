//! Decision threshold asset.
//!
//! The thresholds live in a JSON asset shipped next to the model:
//!
//! ```json
//! {
//!   "thresholds": { "multiClass": 0.6, "singleClass": 0.98 },
//!   "requireFlipAgreement": true,
//!   "minBrightness": 0.15,
//!   "minSharpness": 0.08,
//!   "minMargin": 0.15,
//!   "perClassThresholds": { "Makrell": 0.5 }
//! }
//! ```
//!
//! Every key is optional. A missing or malformed asset never fails: the
//! built-in defaults are used instead, and whatever was produced first is
//! cached for the rest of the process.

use crate::constants::thresholds as defaults;
use crate::error::{Error, Result};
use crate::inference::ModelMode;
use crate::utils::AssetCache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

static THRESHOLDS: AssetCache<ThresholdConfig> = AssetCache::new();

/// Acceptance thresholds and quality gate limits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdConfig {
    /// Minimum top-1 confidence for multi-class models.
    pub multi_class_threshold: f32,
    /// Minimum top-1 confidence for single-class models.
    pub single_class_threshold: f32,
    /// Whether single-class models must agree with the mirrored pass.
    pub require_flip_agreement: bool,
    /// Minimum mean brightness (0-1).
    pub min_brightness: f32,
    /// Minimum Laplacian variance.
    pub min_sharpness: f32,
    /// Minimum central framing margin (0-1).
    pub min_margin: f32,
    /// Label-specific thresholds overriding the mode threshold.
    pub per_class_thresholds: HashMap<String, f32>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            multi_class_threshold: defaults::MULTI_CLASS,
            single_class_threshold: defaults::SINGLE_CLASS,
            require_flip_agreement: defaults::REQUIRE_FLIP_AGREEMENT,
            min_brightness: defaults::MIN_BRIGHTNESS,
            min_sharpness: defaults::MIN_SHARPNESS,
            min_margin: defaults::MIN_MARGIN,
            per_class_thresholds: HashMap::new(),
        }
    }
}

impl ThresholdConfig {
    /// Threshold a `label` must reach under `mode`.
    ///
    /// A per-class override wins over the mode threshold.
    pub fn threshold_for(&self, label: &str, mode: ModelMode) -> f32 {
        self.per_class_thresholds
            .get(label)
            .copied()
            .unwrap_or(match mode {
                ModelMode::SingleClass => self.single_class_threshold,
                ModelMode::MultiClass => self.multi_class_threshold,
            })
    }

    /// Parse the JSON asset format.
    ///
    /// Keys are read one by one: a key whose value has the wrong type keeps
    /// its default, and per-class entries that are not numbers are skipped.
    /// Only a document that is not a JSON object is an error.
    pub fn from_json(contents: &str) -> serde_json::Result<Self> {
        let raw: ThresholdFile = serde_json::from_str(contents)?;
        let base = Self::default();
        let modes = raw.thresholds.as_ref();

        let per_class_thresholds = match raw.per_class_thresholds {
            Some(Value::Object(entries)) => entries
                .into_iter()
                .filter_map(|(label, value)| as_f32(&value).map(|v| (label, v)))
                .collect(),
            _ => HashMap::new(),
        };

        Ok(Self {
            multi_class_threshold: number(
                modes.and_then(|m| m.get("multiClass")),
                base.multi_class_threshold,
            ),
            single_class_threshold: number(
                modes.and_then(|m| m.get("singleClass")),
                base.single_class_threshold,
            ),
            require_flip_agreement: raw
                .require_flip_agreement
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(base.require_flip_agreement),
            min_brightness: number(raw.min_brightness.as_ref(), base.min_brightness),
            min_sharpness: number(raw.min_sharpness.as_ref(), base.min_sharpness),
            min_margin: number(raw.min_margin.as_ref(), base.min_margin),
            per_class_thresholds,
        })
    }
}

#[allow(clippy::cast_possible_truncation)]
fn as_f32(value: &Value) -> Option<f32> {
    value.as_f64().map(|v| v as f32)
}

fn number(value: Option<&Value>, default: f32) -> f32 {
    match value {
        None | Some(Value::Null) => default,
        Some(value) => as_f32(value).unwrap_or_else(|| {
            warn!("Ignoring non-numeric threshold value {value}");
            default
        }),
    }
}

/// On-disk shape of the threshold asset.
///
/// Values stay untyped so one bad key cannot sink the others.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThresholdFile {
    thresholds: Option<Value>,
    require_flip_agreement: Option<Value>,
    min_brightness: Option<Value>,
    min_sharpness: Option<Value>,
    min_margin: Option<Value>,
    per_class_thresholds: Option<Value>,
}

/// Parse threshold asset contents, substituting defaults on failure.
pub fn parse_thresholds_or_default(contents: &str) -> ThresholdConfig {
    ThresholdConfig::from_json(contents).unwrap_or_else(|e| {
        warn!("Malformed threshold asset ({e}), using defaults");
        ThresholdConfig::default()
    })
}

/// Read and parse a threshold asset file.
pub fn read_thresholds(path: &Path) -> Result<ThresholdConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::AssetRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    ThresholdConfig::from_json(&contents).map_err(|e| Error::AssetParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Process-wide thresholds, loaded from `path` on first call.
///
/// Later calls return the cached value regardless of `path`, including
/// when the first load fell back to defaults. Use [`invalidate_thresholds`]
/// to force a reload.
pub fn load_thresholds(path: Option<&Path>) -> Arc<ThresholdConfig> {
    THRESHOLDS.get_or_init(|| match path {
        Some(path) => match read_thresholds(path) {
            Ok(config) => {
                debug!(
                    "Loaded thresholds from {} ({} per-class overrides)",
                    path.display(),
                    config.per_class_thresholds.len()
                );
                config
            }
            Err(e) => {
                warn!("{e}, using default thresholds");
                ThresholdConfig::default()
            }
        },
        None => {
            debug!("No threshold asset configured, using defaults");
            ThresholdConfig::default()
        }
    })
}

/// Drop the cached thresholds so the next [`load_thresholds`] reloads.
pub fn invalidate_thresholds() {
    THRESHOLDS.invalidate();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ThresholdConfig::default();
        assert_eq!(config.multi_class_threshold, 0.60);
        assert_eq!(config.single_class_threshold, 0.98);
        assert!(config.require_flip_agreement);
        assert_eq!(config.min_brightness, 0.15);
        assert_eq!(config.min_sharpness, 0.08);
        assert_eq!(config.min_margin, 0.15);
        assert!(config.per_class_thresholds.is_empty());
    }

    #[test]
    fn test_parse_full_asset() {
        let config = ThresholdConfig::from_json(
            r#"{
                "thresholds": { "multiClass": 0.7, "singleClass": 0.95 },
                "requireFlipAgreement": false,
                "minBrightness": 0.2,
                "minSharpness": 12.5,
                "minMargin": 0.3,
                "perClassThresholds": { "Makrell": 0.5, "Sild": 0.65 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.multi_class_threshold, 0.7);
        assert_eq!(config.single_class_threshold, 0.95);
        assert!(!config.require_flip_agreement);
        assert_eq!(config.min_brightness, 0.2);
        assert_eq!(config.min_sharpness, 12.5);
        assert_eq!(config.min_margin, 0.3);
        assert_eq!(config.per_class_thresholds.get("Makrell"), Some(&0.5));
        assert_eq!(config.per_class_thresholds.get("Sild"), Some(&0.65));
    }

    #[test]
    fn test_parse_partial_asset_keeps_defaults() {
        let config = ThresholdConfig::from_json(r#"{ "thresholds": { "multiClass": 0.5 } }"#)
            .unwrap();
        assert_eq!(config.multi_class_threshold, 0.5);
        assert_eq!(config.single_class_threshold, 0.98);
        assert!(config.require_flip_agreement);
    }

    #[test]
    fn test_non_numeric_per_class_entries_skipped() {
        let config = ThresholdConfig::from_json(
            r#"{ "perClassThresholds": { "Torsk": "high", "Sei": 0.4, "Hyse": null } }"#,
        )
        .unwrap();
        assert_eq!(config.per_class_thresholds.len(), 1);
        assert_eq!(config.per_class_thresholds.get("Sei"), Some(&0.4));
    }

    #[test]
    fn test_mistyped_key_keeps_the_rest() {
        let config = parse_thresholds_or_default(
            r#"{
                "perClassThresholds": { "Makrell": 0.5 },
                "minSharpness": "high",
                "requireFlipAgreement": "yes",
                "thresholds": { "multiClass": 0.7, "singleClass": [0.9] },
                "minMargin": 0.25
            }"#,
        );
        assert_eq!(config.per_class_thresholds.get("Makrell"), Some(&0.5));
        assert_eq!(config.min_sharpness, 0.08);
        assert!(config.require_flip_agreement);
        assert_eq!(config.multi_class_threshold, 0.7);
        assert_eq!(config.single_class_threshold, 0.98);
        assert_eq!(config.min_margin, 0.25);
    }

    #[test]
    fn test_non_object_sections_ignored() {
        let config =
            ThresholdConfig::from_json(r#"{ "thresholds": 3, "perClassThresholds": [1] }"#)
                .unwrap();
        assert_eq!(config, ThresholdConfig::default());
    }

    #[test]
    fn test_malformed_asset_yields_defaults() {
        assert_eq!(
            parse_thresholds_or_default("this is not json {{"),
            ThresholdConfig::default()
        );
        assert_eq!(
            parse_thresholds_or_default("[1, 2, 3]"),
            ThresholdConfig::default()
        );
    }

    #[test]
    fn test_threshold_for_prefers_override() {
        let mut config = ThresholdConfig::default();
        config
            .per_class_thresholds
            .insert("Makrell".to_string(), 0.5);

        assert_eq!(config.threshold_for("Makrell", ModelMode::MultiClass), 0.5);
        assert_eq!(config.threshold_for("Makrell", ModelMode::SingleClass), 0.5);
        assert_eq!(config.threshold_for("Torsk", ModelMode::MultiClass), 0.60);
        assert_eq!(config.threshold_for("Torsk", ModelMode::SingleClass), 0.98);
    }

    #[test]
    #[serial]
    fn test_malformed_file_cached_as_defaults() {
        invalidate_thresholds();

        let mut bad = NamedTempFile::new().unwrap();
        writeln!(bad, "{{ \"thresholds\": ").unwrap();
        let first = load_thresholds(Some(bad.path()));
        assert_eq!(*first, ThresholdConfig::default());

        // A valid asset offered later is not parsed: the defaults stay cached.
        let mut good = NamedTempFile::new().unwrap();
        writeln!(good, r#"{{ "thresholds": {{ "multiClass": 0.1 }} }}"#).unwrap();
        let second = load_thresholds(Some(good.path()));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.multi_class_threshold, 0.60);

        invalidate_thresholds();
    }

    #[test]
    #[serial]
    fn test_invalidate_allows_reload() {
        invalidate_thresholds();

        let mut good = NamedTempFile::new().unwrap();
        writeln!(good, r#"{{ "thresholds": {{ "multiClass": 0.42 }} }}"#).unwrap();

        assert_eq!(load_thresholds(None).multi_class_threshold, 0.60);
        invalidate_thresholds();
        assert_eq!(
            load_thresholds(Some(good.path())).multi_class_threshold,
            0.42
        );

        invalidate_thresholds();
    }

    #[test]
    fn test_read_thresholds_missing_file() {
        let result = read_thresholds(Path::new("/nonexistent/config.json"));
        assert!(matches!(result, Err(Error::AssetRead { .. })));
    }
}
