use std::path::PathBuf;

use clap::Parser;

use arena_bench::config::{ResolvedOutputs, SweepConfig};
use arena_bench::logging::init_logging;
use arena_bench::runner::SweepRunner;

/// Weight-formula sweep harness for arena draft simulation.
#[derive(Debug, Parser)]
#[command(
    name = "arena-bench",
    author,
    version,
    about = "Monte-Carlo arena draft sweep harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/arena.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of draft rounds per combination.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the RNG seed for the sweep.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no sweep is run).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SweepConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.draft.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.draft.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let formula_count = config.formulas.len();
    let class_count = config.dataset.classes.len();
    let rounds = config.draft.rounds;

    println!(
        "Loaded configuration '{run_id}' with {formula_count} formula{} × {class_count} class{} ({rounds} rounds each)",
        if formula_count == 1 { "" } else { "s" },
        if class_count == 1 { "" } else { "es" }
    );

    let _logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = SweepRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: sweep execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Sweep complete for '{run_id}': {} combinations × {} rounds → {}",
        summary.combinations,
        summary.rounds_per_combination,
        summary.stats_path.display()
    );
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(plot_path) = summary.plot_path.as_ref() {
        println!("Mean score plot: {}", plot_path.display());
    }
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
