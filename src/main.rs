use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use life_common::{OutputFormat, SweepConfig};
use life_sweep::{
    Aggregate, ConfigKey, ParameterSweepCache, SweepResults, SweepScheduler, TrialRunner,
};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Command-line arguments; every override wins over the configuration file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the sweep configuration (TOML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Smallest grid side to sweep
    #[arg(long)]
    min_size: Option<usize>,

    /// Largest grid side to sweep
    #[arg(long)]
    max_size: Option<usize>,

    /// Generations per trial
    #[arg(long)]
    steps: Option<u32>,

    /// Spacing between swept densities
    #[arg(long)]
    density_step: Option<f64>,

    /// Worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Base seed for reproducible trials
    #[arg(long)]
    seed: Option<u64>,

    /// Result format printed to stdout
    #[arg(long, value_parser = parse_format)]
    format: Option<OutputFormat>,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    match value.to_ascii_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        other => Err(format!("unknown format '{}' (expected table or json)", other)),
    }
}

fn load_config(args: &Args) -> Result<SweepConfig> {
    let use_defaults =
        args.config.as_path() == Path::new(DEFAULT_CONFIG_PATH) && !args.config.exists();
    let mut config = if use_defaults {
        warn!("No {} found; using built-in defaults.", DEFAULT_CONFIG_PATH);
        SweepConfig::default()
    } else {
        SweepConfig::load(&args.config)?
    };

    if let Some(min_size) = args.min_size {
        config.sweep.min_size = min_size;
    }
    if let Some(max_size) = args.max_size {
        config.sweep.max_size = max_size;
    }
    if let Some(steps) = args.steps {
        config.trial.steps_per_trial = steps;
    }
    if let Some(density_step) = args.density_step {
        config.sweep.density_step = density_step;
    }
    if let Some(threads) = args.threads {
        config.runtime.threads = threads;
    }
    if args.seed.is_some() {
        config.trial.seed = args.seed;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.no_progress {
        config.output.show_progress = false;
    }

    config.validate().context("Invalid sweep configuration")?;
    Ok(config)
}

fn print_table(results: &SweepResults) {
    println!("{:>5} {:>7} {:>8} {:>12} {:>12}", "rows", "columns", "density", "mean", "std_dev");
    for record in results.records() {
        println!(
            "{:>5} {:>7} {:>8.4} {:>12.4} {:>12.4}",
            record.rows, record.columns, record.density, record.mean, record.std_dev
        );
    }
    for size in results.sizes() {
        if let Some(surface) = results.mean_over_densities(size) {
            println!("# {} mean over densities: {:.4}", size, surface);
        }
    }
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();

    info!("Starting Life Sweep...");
    let args = Args::parse();

    // --- Load Configuration ---
    let config = load_config(&args)?;
    let plan = config.sweep_plan()?;
    let params = config.trial_params()?;
    debug!("Sweep configuration: {:#?}", config);

    // --- Build Cache & Scheduler ---
    let cache = Arc::new(ParameterSweepCache::new(TrialRunner::new(params)));
    let scheduler = SweepScheduler::with_threads(Arc::clone(&cache), config.runtime.threads)
        .context("Failed to build worker pool")?;
    info!("Using {} Rayon threads.", scheduler.threads());
    info!(
        "Trials: {} steps each, scaling {:?}, seed {:?}.",
        params.steps_per_trial, params.scaling, params.seed
    );

    let total = plan.configuration_count() as u64;
    let progress_bar = if config.output.show_progress {
        ProgressBar::new(total)
    } else {
        ProgressBar::hidden()
    };
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} configurations ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    // --- Run Sweep ---
    let start_time = Instant::now();
    let observer = |key: ConfigKey, aggregate: Aggregate| {
        debug!("{} -> mean {:.4}, std {:.4}", key, aggregate.mean, aggregate.std_dev);
        progress_bar.inc(1);
    };
    let results = scheduler.run(&plan, &observer);
    progress_bar.finish_with_message("Sweep complete");

    let stats = cache.stats();
    info!(
        "Computed {} configurations in {:.3} seconds ({} cache hits).",
        results.len(),
        start_time.elapsed().as_secs_f64(),
        stats.hits
    );
    if let Some(peak) = results.peak_mean() {
        info!("Peak mean living cells: {:.4}", peak);
    }

    // --- Report Results ---
    match config.output.format {
        OutputFormat::Table => print_table(&results),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&results.records())
                .context("Failed to serialize sweep results")?;
            println!("{}", json);
        }
    }

    info!("Sweep Complete.");
    Ok(())
}
