//! Configuration loading and management.
//!
//! Two layers: the TOML application config (model and asset locations),
//! and the JSON threshold asset consumed by the decision policy.

mod file;
mod paths;
pub mod thresholds;
mod types;
mod validate;

pub use file::{load_config_file, load_default_config, save_config, save_default_config};
pub use paths::{
    LABELS_ASSET, METADATA_ASSET, THRESHOLDS_ASSET, assets_dir, config_dir, config_file_path,
    resolve_asset,
};
pub use thresholds::{ThresholdConfig, invalidate_thresholds, load_thresholds};
pub use types::{AssetsConfig, Config, DefaultsConfig, ModelConfig};
pub use validate::{validate_config, validate_input_size, validate_model_config};
