//! `vermicular` binary: runs the multi-stage search comparison and prints
//! the side-by-side report.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin vermicular -- --platform simulator
//! cargo run --bin vermicular -- --config experiment.json --output results/
//! ```

use anyhow::{Context, bail};
use chrono::Local;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use vermicular::catalog::TargetCatalog;
use vermicular::report::progress_bar;
use vermicular::{
    Experiment, ExperimentConfig, Platform, Ratio, StageObserver, StageResult, Strategy, plan_pass,
};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "vermicular",
    version,
    about = "Multi-stage quantum search: standard Grover versus VERMICULAR",
    long_about = None
)]
struct Args {
    /// Execution platform (simulator, iqm, rigetti). Asked interactively if omitted.
    #[arg(short, long)]
    platform: Option<Platform>,

    /// JSON experiment configuration. Command-line flags override its fields.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the shots per circuit.
    #[arg(long)]
    shots: Option<usize>,

    /// Override the emulated per-operation error rate.
    #[arg(long)]
    error_rate: Option<f64>,

    /// Seed for the simulator and noise generators.
    #[arg(long)]
    seed: Option<u64>,

    /// Skip the cost confirmation.
    #[arg(short, long, default_value_t = false)]
    yes: bool,

    /// Directory the results file is written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    output: PathBuf,

    /// Print every stage circuit before running.
    #[arg(long, default_value_t = false)]
    show_circuits: bool,

    /// Log filter (a level such as `info`, or directives such as
    /// `vermicular=debug`). `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Prints each stage as it completes.
struct ConsoleObserver;

impl StageObserver for ConsoleObserver {
    fn pass_started(&mut self, strategy: Strategy, catalog: &TargetCatalog) {
        let banner = "=".repeat(60);
        println!("\n{}", banner);
        println!("{} GROVER - Multi-Stage Search ({} stages)", strategy.to_string().to_uppercase(), catalog.len());
        println!("{}", banner);
    }

    fn stage_completed(&mut self, stage_index: usize, stage: &StageResult, cumulative_depth: usize) {
        let target = stage.target();
        println!("\nStage {}: Searching for {} ({})...", stage_index + 1, target.name(), target.pattern());
        println!("  Target: |{}⟩", target.pattern());
        println!("  Iterations: {}", stage.iterations());
        println!("  Success Rate: {:.1}%", stage.success_rate() * 100.0);
        println!("  Circuit Depth: {}", stage.depth());
        println!("  Cumulative Depth: {}", cumulative_depth);
        println!("  Time: {:.2}s", stage.elapsed().as_secs_f64());
        println!("  [{}] {:.1}%", progress_bar(stage.success_rate(), 50), stage.success_rate() * 100.0);
    }
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_filter(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args) {
        error!("{e:#}");
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// Filter for `--log-level`; an unparsable value falls back to `warn`.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}

fn run(args: Args) -> anyhow::Result<()> {
    println!("VERMICULAR - Multi-Stage Quantum Search Demonstration");
    println!("=====================================================\n");

    let mut config = match args.config.as_deref() {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ExperimentConfig::from_json(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => ExperimentConfig::default(),
    };

    match args.platform {
        Some(platform) => config.platform = platform,
        None if args.config.is_none() => config.platform = prompt_platform()?,
        None => {}
    }
    if let Some(shots) = args.shots {
        config.shots = Some(shots);
    }
    if let Some(rate) = args.error_rate {
        config.error_rate = Some(rate);
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let experiment = Experiment::new(config).context("configuration validation failed")?;
    let config = experiment.config();
    let profile = config.platform.profile();

    println!("\n{}", "=".repeat(70));
    println!("QUANTUM DATABASE MULTI-STAGE SEARCH DEMO");
    println!("{}", "=".repeat(70));
    println!("Platform: {}", profile.device_name);
    println!("Shots per circuit: {}", config.effective_shots());
    println!("Task: Find {} fragments in sequence", experiment.catalog().len());
    for target in experiment.catalog() {
        println!("  - {}", target);
    }

    if !config.platform.is_free() {
        let cost = config.estimated_cost();
        println!("\nEstimated cost: ${:.2} ({} circuits)", cost, config.circuit_count());
        if !args.yes && !confirm("Proceed? (yes/no): ")? {
            println!("Demo cancelled");
            return Ok(());
        }
    }

    if args.show_circuits {
        print_circuits(&experiment)?;
    }

    let mut backend = experiment.platform_backend()?;
    let outcome = experiment.run_observed(&mut backend, &mut ConsoleObserver)?;

    for run in [&outcome.baseline, &outcome.augmented] {
        println!("\n{}", "=".repeat(40));
        println!("FINAL RESULTS - {}", run.strategy().to_string().to_uppercase());
        println!("{}", "=".repeat(40));
        let rates: Vec<String> =
            run.stage_rates().iter().map(|r| format!("{:.1}%", r * 100.0)).collect();
        println!("Stage Success Rates: [{}]", rates.join(", "));
        println!("Total Success (all {} stages): {:.1}%", run.stages().len(), run.total_success() * 100.0);
    }

    println!("\n{}", "=".repeat(70));
    println!("FINAL COMPARISON");
    println!("{}", "=".repeat(70));
    println!("{}", outcome.summary);

    match outcome.summary.overall() {
        Ratio::Unbounded => println!("\nStandard Grover never completed every stage"),
        Ratio::Finite(v) if outcome.summary.shows_clear_advantage() => {
            println!("\nVERMICULAR is {:.0}x more reliable for multi-stage searches!", v)
        }
        Ratio::Finite(_) => {
            println!("\nBoth algorithms show similar performance on {}", profile.device_name)
        }
    }

    let document = outcome.document(Local::now())?;
    let path = document
        .save_in(&args.output)
        .with_context(|| format!("failed to save results in {}", args.output.display()))?;
    println!("\nResults saved to: {}", path.display());
    Ok(())
}

fn prompt_platform() -> anyhow::Result<Platform> {
    println!("Select platform:");
    for (i, platform) in Platform::ALL.iter().enumerate() {
        let profile = platform.profile();
        if platform.is_free() {
            println!("{}. {} (free)", i + 1, profile.device_name);
        } else {
            let quote = ExperimentConfig { platform: *platform, ..Default::default() };
            println!("{}. {} (~${:.2})", i + 1, profile.device_name, quote.estimated_cost());
        }
    }
    let choice = read_line("\nYour choice (1-3): ")?;
    Ok(Platform::from_menu_choice(&choice))
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    let answer = read_line(prompt)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y"))
}

fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        bail!("standard input closed before an answer was given");
    }
    Ok(line)
}

fn print_circuits(experiment: &Experiment) -> anyhow::Result<()> {
    for strategy in Strategy::ALL {
        let plan = plan_pass(strategy, experiment.catalog())?;
        for (target, stage) in experiment.catalog().iter().zip(plan) {
            println!("\n{} / {} ({} rounds):\n{}", strategy, target, stage.iterations, stage.circuit);
        }
    }
    Ok(())
}
