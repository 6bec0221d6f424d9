use std::fs;
use std::path::{Path, PathBuf};

use arena_core::draft::DraftSimulator;
use arena_core::model::pool::{Pool, PoolError};
use arena_core::stats::DraftStatistics;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{Level, event};

use crate::config::{FormulaConfig, ResolvedOutputs, SweepConfig};
use crate::dataset::{CardDataset, DatasetError};
use crate::report::{ReportError, render_plot, write_csv, write_markdown};
use crate::weights::{self, WeightError};

/// Primary entry point for running a (formula × class) sweep.
pub struct SweepRunner {
    config: SweepConfig,
    outputs: ResolvedOutputs,
    dataset: CardDataset,
    logging_enabled: bool,
}

/// One row of the comparison table.
#[derive(Debug, Clone, Serialize)]
pub struct StatRow {
    pub formula: String,
    pub class: String,
    #[serde(flatten)]
    pub statistics: DraftStatistics,
}

/// Summary details returned after a run.
pub struct RunSummary {
    pub combinations: usize,
    pub rounds_per_combination: usize,
    pub stats_path: PathBuf,
    pub summary_path: PathBuf,
    pub plot_path: Option<PathBuf>,
    pub telemetry_path: Option<PathBuf>,
}

impl SweepRunner {
    /// Build a runner from a validated configuration, loading the card
    /// dataset it points at.
    pub fn new(config: SweepConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        let dataset = CardDataset::from_path(&config.dataset.path)?;
        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
            dataset,
        })
    }

    /// Execute every (formula × class) combination and write the report
    /// artifacts.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.stats_csv.parent())?;
        ensure_parent(self.outputs.summary_md.parent())?;
        if !self.outputs.plots_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.outputs.plots_dir)?;
        }

        if self.logging_enabled && self.dataset.skipped() > 0 {
            event!(
                target: "arena_bench::dataset",
                Level::WARN,
                run_id = %self.config.run_id,
                skipped = self.dataset.skipped()
            );
        }

        // One master stream; every combination gets a private sub-seeded
        // RNG, so the units stay independent of sweep order.
        let mut master = StdRng::seed_from_u64(self.config.draft.seed.unwrap_or(0));
        let mut rows = Vec::with_capacity(
            self.config.formulas.len() * self.config.dataset.classes.len(),
        );
        for formula in &self.config.formulas {
            for class in &self.config.dataset.classes {
                let sub_seed = master.next_u64();
                rows.push(self.run_combination(formula, class, sub_seed)?);
            }
        }

        rows.sort_by(|a, b| {
            a.formula
                .cmp(&b.formula)
                .then_with(|| a.class.cmp(&b.class))
        });

        write_csv(&rows, &self.outputs.stats_csv)?;
        write_markdown(&rows, &self.config.run_id, &self.outputs.summary_md)?;
        let plot_path = match render_plot(&rows, &self.outputs.plots_dir) {
            Ok(path) => Some(path),
            Err(err) => {
                eprintln!("WARN: {}", err);
                None
            }
        };

        let telemetry_path = if self.logging_enabled {
            let telemetry_dir = self
                .outputs
                .summary_md
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            Some(telemetry_dir.join("telemetry.jsonl"))
        } else {
            None
        };

        Ok(RunSummary {
            combinations: rows.len(),
            rounds_per_combination: self.config.draft.rounds,
            stats_path: self.outputs.stats_csv.clone(),
            summary_path: self.outputs.summary_md.clone(),
            plot_path,
            telemetry_path,
        })
    }

    fn run_combination(
        &self,
        formula: &FormulaConfig,
        class: &str,
        seed: u64,
    ) -> Result<StatRow, RunnerError> {
        let partition = self.dataset.partition(class)?;
        let weights = weights::weigh(formula, class, &partition)?;

        // Zero weight is legal formula output but the pool requires strictly
        // positive weights, so those cards are never offered.
        let mut kept_weights = Vec::with_capacity(partition.len());
        let mut names = Vec::with_capacity(partition.len());
        let mut scores = Vec::with_capacity(partition.len());
        let mut dropped = 0usize;
        for (row, weight) in partition.iter().zip(&weights) {
            if *weight > 0.0 {
                kept_weights.push(*weight);
                names.push(row.name.clone());
                scores.push(row.score);
            } else {
                dropped += 1;
            }
        }

        let pool =
            Pool::from_columns(kept_weights, names, scores).map_err(|source| RunnerError::Pool {
                formula: formula.label(),
                class: class.to_string(),
                source,
            })?;
        let pool_size = pool.len();

        let mut simulator = DraftSimulator::new(pool);
        let mut rng = StdRng::seed_from_u64(seed);
        simulator.run(self.config.draft.rounds, &mut rng);
        let statistics = simulator
            .statistics()
            .map_err(|_| RunnerError::EmptyDraft {
                formula: formula.label(),
                class: class.to_string(),
            })?;

        if self.logging_enabled && tracing::enabled!(Level::INFO) {
            event!(
                target: "arena_bench::sweep",
                Level::INFO,
                run_id = %self.config.run_id,
                formula = formula.label(),
                class = %class,
                pool_size,
                dropped,
                mean = statistics.mean
            );
        }

        Ok(StatRow {
            formula: formula.label().to_string(),
            class: class.to_string(),
            statistics,
        })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Weight(#[from] WeightError),
    #[error("pool construction failed for {formula}/{class}: {source}")]
    Pool {
        formula: &'static str,
        class: String,
        #[source]
        source: PoolError,
    },
    #[error("no draft rounds recorded for {formula}/{class}")]
    EmptyDraft {
        formula: &'static str,
        class: String,
    },
    #[error(transparent)]
    Report(#[from] ReportError),
}
