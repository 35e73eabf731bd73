//! Fisk - fish species identification from photographs.
//!
//! This crate classifies catch photos with an ONNX image model and decides
//! whether a prediction is trustworthy enough to show.

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod constants;
pub mod decision;
pub mod error;
pub mod imaging;
pub mod inference;
pub mod output;
pub mod pipeline;
pub mod species;
pub mod utils;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Command, ConfigAction, SpeciesAction};
use config::{
    Config, LABELS_ASSET, METADATA_ASSET, ModelConfig, THRESHOLDS_ASSET, ThresholdConfig, assets_dir,
    config_file_path, load_default_config, load_thresholds, resolve_asset, save_default_config,
    validate_model_config,
};
use constants::worker::QUEUE_CAPACITY;
use imaging::QualityMetrics;
use indicatif::ProgressBar;
use inference::FishClassifier;
use output::json_envelope::{
    ConfigPayload, QualityEntry, QualityPayload, ResultType, SpeciesInfoPayload,
    SpeciesListPayload,
};
use output::{CaptureReporter, CaptureSummary, create_reporter, display, emit_json_result, progress};
use pipeline::{CaptureContext, CaptureOutcome, CaptureWorker, collect_input_files, decode_image};
use species::{SpeciesResolver, catalog, load_metadata};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the fisk CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.analyze.verbose, cli.analyze.quiet);

    let config = load_default_config()?;

    if let Some(command) = cli.command {
        return handle_command(command, &cli.analyze, &config);
    }

    if cli.inputs.is_empty() {
        cli::help::print_smart_help(&config);
        return Ok(());
    }

    analyze_images(&cli.inputs, &cli.analyze, &config)
}

/// Classify every image under `inputs` and report one outcome per image.
fn analyze_images(inputs: &[PathBuf], args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let started = Instant::now();

    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImageFiles);
    }
    info!("Found {} image(s) to classify", files.len());

    let model_config = resolve_model_config(args, config);
    let json = args.json || config.defaults.json;

    let classifier = Arc::new(FishClassifier::from_config(&model_config));
    info!(
        "Model {2}: {0} labels, {1} mode",
        classifier.labels().len(),
        classifier.mode(),
        if classifier.is_available() {
            "loaded"
        } else {
            "unavailable"
        }
    );

    let context = CaptureContext {
        classifier: Arc::clone(&classifier),
        thresholds: resolve_thresholds(args, config),
        resolver: Arc::new(SpeciesResolver::new(resolve_metadata(args, config))),
        quality_gate: config.defaults.quality_gate && !args.no_quality_gate,
    };

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        if let Err(e) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
            warn!("Failed to install Ctrl+C handler: {e}");
        }
    }

    let reporter = create_reporter(json);
    reporter.pipeline_started(
        files.len(),
        model_config.path.as_deref(),
        classifier.is_available(),
        classifier.mode(),
    );

    let show_progress = !args.quiet && !args.no_progress && !json;
    let pb = progress::create_capture_progress(files.len(), show_progress);

    let runtime = tokio::runtime::Runtime::new().map_err(|e| Error::Internal {
        message: format!("failed to create async runtime: {e}"),
    })?;
    let mut summary = runtime.block_on(drive_captures(
        context,
        &files,
        reporter.as_ref(),
        pb.as_ref(),
        &interrupted,
    ))?;
    progress::finish_progress(pb, "done");

    if interrupted.load(Ordering::SeqCst) {
        reporter.cancelled(summary.completed(), files.len());
        return Err(Error::Interrupted);
    }

    summary.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    reporter.pipeline_completed(&summary);
    info!(
        "Classified {} image(s) in {:.2}s",
        files.len(),
        started.elapsed().as_secs_f64()
    );

    if summary.failed > 0 {
        return Err(Error::CapturesFailed {
            failed: summary.failed,
            total: files.len(),
        });
    }
    Ok(())
}

/// Feed `files` through a capture worker, keeping its queue full.
///
/// Stops submitting once `interrupted` is set; captures still queued at
/// that point are dropped without being reported.
async fn drive_captures(
    context: CaptureContext,
    files: &[PathBuf],
    reporter: &dyn CaptureReporter,
    pb: Option<&ProgressBar>,
    interrupted: &AtomicBool,
) -> Result<CaptureSummary> {
    let worker = CaptureWorker::spawn(context);
    let mut summary = CaptureSummary::default();
    let mut pending = VecDeque::with_capacity(QUEUE_CAPACITY);
    let mut remaining = files.iter();

    while !interrupted.load(Ordering::SeqCst) {
        while pending.len() < QUEUE_CAPACITY {
            let Some(path) = remaining.next() else {
                break;
            };
            pending.push_back((path, worker.submit(path.clone()).await?));
        }

        let Some((path, ticket)) = pending.pop_front() else {
            break;
        };
        settle(path, ticket.wait().await, reporter, &mut summary, pb);
    }

    worker.shutdown().await?;

    for (path, ticket) in pending {
        match ticket.wait().await {
            Err(Error::WorkerShutdown) => {}
            result => settle(path, result, reporter, &mut summary, pb),
        }
    }

    Ok(summary)
}

/// Report one finished capture.
fn settle(
    path: &Path,
    result: Result<CaptureOutcome>,
    reporter: &dyn CaptureReporter,
    summary: &mut CaptureSummary,
    pb: Option<&ProgressBar>,
) {
    match result {
        Ok(outcome) => {
            summary.record(&outcome.decision);
            progress::suspend(pb, || reporter.capture_completed(&outcome));
        }
        Err(e) => {
            summary.failed += 1;
            progress::suspend(pb, || reporter.capture_failed(path, &e));
        }
    }
    progress::inc_progress(pb);
}

/// Merge command-line model options over the config file.
fn resolve_model_config(args: &AnalyzeArgs, config: &Config) -> ModelConfig {
    let assets = assets_dir().ok();
    let labels = args
        .labels
        .clone()
        .or_else(|| config.model.labels.clone())
        .or_else(|| resolve_asset(None, assets.as_deref(), LABELS_ASSET));

    ModelConfig {
        path: args.model.clone().or_else(|| config.model.path.clone()),
        labels,
        input_size: args.input_size.unwrap_or(config.model.input_size),
    }
}

fn resolve_thresholds(args: &AnalyzeArgs, config: &Config) -> Arc<ThresholdConfig> {
    let explicit = args
        .thresholds
        .as_deref()
        .or(config.assets.thresholds.as_deref());
    let path = resolve_asset(explicit, assets_dir().ok().as_deref(), THRESHOLDS_ASSET);
    load_thresholds(path.as_deref())
}

fn resolve_metadata(args: &AnalyzeArgs, config: &Config) -> Arc<species::MetadataTable> {
    let explicit = args
        .metadata
        .as_deref()
        .or(config.assets.metadata.as_deref());
    let path = resolve_asset(explicit, assets_dir().ok().as_deref(), METADATA_ASSET);
    load_metadata(path.as_deref())
}

/// Initialize the tracing subscriber.
///
/// Logs go to stderr so NDJSON on stdout stays parseable.
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT is silenced by default; a missing model is a normal state.
    let filter_str = if quiet {
        "warn,ort=off"
    } else {
        match verbose {
            0 => "info,ort=off",
            1 => "debug,ort=warn",
            2 => "trace,ort=info",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_command(command: Command, args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let json = args.json || config.defaults.json;
    match command {
        Command::Quality { inputs } => handle_quality_command(&inputs, args, config, json),
        Command::Species { action } => handle_species_command(action, json),
        Command::Config { action } => handle_config_command(action, config, json),
    }
}

/// Report quality metrics for each image without running the model.
#[allow(clippy::print_stdout)]
fn handle_quality_command(
    inputs: &[PathBuf],
    args: &AnalyzeArgs,
    config: &Config,
    json: bool,
) -> Result<()> {
    let files = collect_input_files(inputs)?;
    if files.is_empty() {
        return Err(Error::NoValidImageFiles);
    }

    let thresholds = resolve_thresholds(args, config);
    let mut entries = Vec::with_capacity(files.len());
    let mut failed = 0;

    for file in &files {
        let image = match decode_image(file) {
            Ok(image) => image,
            Err(e) => {
                warn!("{e}");
                if !json {
                    print!("{}", display::render_failure(file, &e));
                }
                failed += 1;
                continue;
            }
        };

        let metrics = QualityMetrics::analyze(&image);
        let issues = metrics.issues(&thresholds);
        if !json {
            print!("{}", display::render_quality(file, &metrics, &issues));
        }
        entries.push(QualityEntry {
            file: file.clone(),
            metrics,
            issues,
        });
    }

    if json {
        emit_json_result(&QualityPayload {
            result_type: ResultType::Quality,
            images: entries,
        });
    }

    if failed > 0 {
        return Err(Error::CapturesFailed {
            failed,
            total: files.len(),
        });
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn handle_species_command(action: SpeciesAction, json: bool) -> Result<()> {
    match action {
        SpeciesAction::List => {
            if json {
                emit_json_result(&SpeciesListPayload {
                    result_type: ResultType::SpeciesList,
                    species: catalog::all().to_vec(),
                });
            } else {
                for record in catalog::all() {
                    println!("{:<12} {}", record.label, record.scientific_name);
                }
            }
            Ok(())
        }
        SpeciesAction::Show { label } => {
            let record = catalog::by_label(&label).ok_or(Error::SpeciesNotFound { label })?;
            if json {
                emit_json_result(&SpeciesInfoPayload {
                    result_type: ResultType::SpeciesInfo,
                    species: record.clone(),
                });
            } else {
                print!("{}", display::render_record(record));
            }
            Ok(())
        }
    }
}

#[allow(clippy::print_stdout)]
fn handle_config_command(action: ConfigAction, config: &Config, json: bool) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let saved_path = save_default_config(&Config::default())?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext step: set [model] path and labels in that file.");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let path = config_file_path()?;
            if json {
                let value =
                    serde_json::to_value(config).map_err(|source| Error::JsonSerialize { source })?;
                emit_json_result(&ConfigPayload {
                    result_type: ResultType::Config,
                    config_path: path,
                    config: value,
                });
            } else {
                let text = toml::to_string_pretty(config)
                    .map_err(|source| Error::ConfigSerialize { source })?;
                println!("# {}", path.display());
                print!("{text}");
            }
            Ok(())
        }
        ConfigAction::Path => {
            println!("{}", config_file_path()?.display());
            Ok(())
        }
        ConfigAction::Check => {
            validate_model_config(&config.model)?;
            match &config.model.path {
                Some(path) => println!("Model: {} (found)", path.display()),
                None => println!("Model: not configured"),
            }
            match &config.model.labels {
                Some(path) => println!("Labels: {} (found)", path.display()),
                None => println!("Labels: built-in defaults"),
            }
            println!("Input size: {}", config.model.input_size);
            Ok(())
        }
    }
}
