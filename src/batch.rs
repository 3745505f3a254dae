use crate::cli::Args;
use crate::constants::{INFO_PREFIX, PROGRESS_BAR_TEMPLATE};
use crate::encoder::EncoderOptions;
use crate::error::Result;
use crate::logger;
use crate::processing::{convert_file, ConversionResult};
use crate::utils::format_elapsed;
use crate::validation::{InputType, RunConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Tally of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub success_count: usize,
    pub total_count: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn failed_count(&self) -> usize {
        self.total_count - self.success_count
    }
}

/// Validate, build encoder options, convert. Shared by the one-shot CLI and
/// every interactive prompt cycle.
pub fn run_conversion(args: &Args) -> Result<RunSummary> {
    logger::configure(args.quiet, args.verbose);

    let config = RunConfig::from_args(args)?;
    info!("Parameter check passed, preparing to start processing...");
    verbose!(
        "input: {} ({:?}), output: {}, quality: {}, level: {}, minimal: {}",
        config.input_path.display(),
        config.input_type,
        config.output_path.display(),
        config.quality,
        config.compression,
        config.minimal
    );

    let options = EncoderOptions::from_config(&config);
    run_batch(&config, &options)
}

/// Converts the configured file, or every file below the configured directory,
/// strictly one after another.
pub fn run_batch(config: &RunConfig, options: &EncoderOptions) -> Result<RunSummary> {
    let start_time = Instant::now();

    let results = match config.input_type {
        InputType::File => vec![convert_file(&config.input_path, &config.output_path, options)],
        InputType::Directory => {
            let files = collect_files(&config.input_path)?;
            info!(
                "{} Found {} files, starting conversion...",
                INFO_PREFIX,
                files.len()
            );
            convert_all(&files, &config.output_path, options)
        }
    };

    let summary = RunSummary {
        success_count: results.iter().filter(|r| r.is_success()).count(),
        total_count: results.len(),
        elapsed: start_time.elapsed(),
    };

    info!(
        "\nConversion completed! Success: {}/{} files, Time: {}",
        summary.success_count,
        summary.total_count,
        format_elapsed(summary.elapsed)
    );
    if summary.failed_count() > 0 {
        warn!("Failed files: {}", summary.failed_count());
    }

    Ok(summary)
}

fn convert_all(files: &[PathBuf], output_dir: &Path, options: &EncoderOptions) -> Vec<ConversionResult> {
    let progress = if logger::is_quiet() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        progress.set_style(style.progress_chars("=>-"));
    }

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let result = progress.suspend(|| convert_file(file, output_dir, options));
        progress.inc(1);
        results.push(result);
    }

    progress.finish_and_clear();
    results
}

/// Lists every regular file below `dir`, descending into subdirectories.
///
/// No filtering by extension happens here; unsupported files are rejected by
/// the worker. Order follows the filesystem and is not stable across platforms.
pub fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
