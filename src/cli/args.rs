//! CLI argument definitions.

use crate::config::validate_input_size;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Fish species identification from photographs.
#[derive(Debug, Parser)]
#[command(name = "fisk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Images or directories of images to classify.
    pub inputs: Vec<PathBuf>,

    /// Common options for classification.
    #[command(flatten)]
    pub analyze: AnalyzeArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check image quality without classifying.
    Quality {
        /// Images or directories of images to check.
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Browse the built-in species catalog.
    Species {
        /// Species action to perform.
        #[command(subcommand)]
        action: SpeciesAction,
    },
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Species subcommand actions.
#[derive(Debug, Subcommand)]
pub enum SpeciesAction {
    /// List every catalog species.
    List,
    /// Show one species.
    Show {
        /// Model label, e.g. "Torsk".
        label: String,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
    /// Verify configured model and label files exist.
    Check,
}

/// Arguments for classification.
#[derive(Debug, Args)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalyzeArgs {
    /// Path to ONNX model file (overrides config).
    #[arg(short, long, env = "FISK_MODEL")]
    pub model: Option<PathBuf>,

    /// Path to labels file, one label per line (overrides config).
    #[arg(short, long, env = "FISK_LABELS")]
    pub labels: Option<PathBuf>,

    /// Path to threshold asset (JSON).
    #[arg(long, global = true, env = "FISK_THRESHOLDS")]
    pub thresholds: Option<PathBuf>,

    /// Path to species metadata asset (JSON).
    #[arg(long, env = "FISK_METADATA")]
    pub metadata: Option<PathBuf>,

    /// Model input side length in pixels.
    #[arg(long, value_parser = parse_input_size, env = "FISK_INPUT_SIZE")]
    pub input_size: Option<u32>,

    /// Skip the brightness/sharpness/framing check before inference.
    #[arg(long)]
    pub no_quality_gate: bool,

    /// Print one JSON event per line instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Suppress progress output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse and validate a model input size.
fn parse_input_size(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid size"))?;
    validate_input_size(value).map_err(|e| e.to_string())?;
    Ok(value)
}
