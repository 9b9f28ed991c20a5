use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgGroup, CommandFactory, Parser, ValueEnum};
use clap::error::ErrorKind;
use colour_histogram_rs::batch::{BatchMode, BatchPipeline};
use colour_histogram_rs::histogram::{
    Backend, DEFAULT_HISTOGRAM_HEIGHT, EngineConfig, HistogramEngine, HistogramError,
};
use colour_histogram_rs::logger;

use tracing::{error, info};

#[derive(Parser)]
#[command(name = "colour-histogram")]
#[command(version, about = "Per-channel colour histograms for image folders", long_about = None)]
#[command(group(ArgGroup::new("mode").required(true).args(["generate", "stats"])))]
struct Cli {
    /// Generate `<file>_hist.png` for every image under PATH
    #[arg(short = 'g', value_name = "PATH")]
    generate: Option<PathBuf>,

    /// Generate `<file>_stats.csv` for every image under PATH
    #[arg(short = 's', value_name = "PATH")]
    stats: Option<PathBuf>,

    /// Counting backend
    #[arg(long, value_enum, default_value_t = BackendArg::Auto)]
    backend: BackendArg,

    /// Histogram image height in pixels
    #[arg(long, value_name = "PIXELS", default_value_t = DEFAULT_HISTOGRAM_HEIGHT)]
    height: u32,

    /// Number of worker threads
    #[arg(short = 'j', long, value_name = "N")]
    threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Auto,
    Cpu,
    Cuda,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Auto => Backend::Auto,
            BackendArg::Cpu => Backend::Cpu,
            BackendArg::Cuda => Backend::Cuda,
        }
    }
}

fn main() -> ExitCode {
    logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                }
                _ => println!("{}", Cli::command().render_help()),
            }
            return ExitCode::SUCCESS;
        }
    };

    let config = EngineConfig::builder()
        .backend(cli.backend.into())
        .histogram_height(cli.height)
        .worker_threads(cli.threads)
        .build();

    // The device is checked before any file is touched.
    let engine = match HistogramEngine::new(config) {
        Ok(engine) => engine,
        Err(e @ HistogramError::DeviceUnavailable(_)) => {
            error!("Compute device not available: {}", e);
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("Failed to initialize histogram engine: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Histogram engine initialized ({} backend)", engine.backend_name());

    let (mode, root) = match (cli.generate, cli.stats) {
        (Some(path), _) => (BatchMode::Histogram, path),
        (None, Some(path)) => (BatchMode::Stats, path),
        (None, None) => {
            println!("{}", Cli::command().render_help());
            return ExitCode::SUCCESS;
        }
    };

    match run(engine, mode, &root) {
        Ok(count) => {
            info!("Done, {} image(s) processed", count);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(engine: HistogramEngine, mode: BatchMode, root: &Path) -> anyhow::Result<usize> {
    let mut pipeline = BatchPipeline::new(engine, mode);
    let outputs = pipeline
        .run_with_progress(root, |path| println!("Processed: {}", path.display()))
        .with_context(|| format!("processing {}", root.display()))?;
    Ok(outputs.len())
}
