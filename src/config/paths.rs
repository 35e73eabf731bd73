//! Platform-specific configuration and asset paths.

use crate::constants::APP_NAME;
use crate::error::{Error, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// File name of the threshold asset inside the assets directory.
pub const THRESHOLDS_ASSET: &str = "config.json";

/// File name of the species metadata asset inside the assets directory.
pub const METADATA_ASSET: &str = "metadata.json";

/// File name of the label list inside the assets directory.
pub const LABELS_ASSET: &str = "labels.txt";

/// Get the configuration directory for the current platform.
///
/// - Linux: `~/.config/fisk/`
/// - macOS: `~/Library/Application Support/fisk/`
/// - Windows: `%APPDATA%\fisk\`
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(Error::ConfigDirNotFound)
}

/// Get the full path to the config file.
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Directory searched for assets that the config file does not name.
pub fn assets_dir() -> Result<PathBuf> {
    Ok(config_dir()?.join("assets"))
}

/// Resolve an asset path: an explicit path wins, otherwise the file in
/// `assets_dir` is used if it exists.
pub fn resolve_asset(explicit: Option<&Path>, assets_dir: Option<&Path>, name: &str) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        assets_dir
            .map(|dir| dir.join(name))
            .filter(|candidate| candidate.is_file())
    })
}
