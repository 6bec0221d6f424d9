//! Weight-formula transforms.
//!
//! Each formula maps one class partition to a fresh weight column,
//! normalized to sum to one; the input rows are never mutated. A zero entry
//! in the returned column is legal output (the card is simply never
//! offered) and it is the caller's job to drop such cards before building a
//! pool. Degenerate columns (non-finite or negative entries, or a zero
//! total) are errors surfaced here, before any sampling.

use crate::config::FormulaConfig;
use crate::dataset::{CardRow, NEUTRAL_CLASS, Rarity};
use serde::Deserialize;
use statrs::distribution::{Continuous, Normal};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeightError {
    #[error("inverse formula cannot weight zero-scored card '{name}'")]
    ZeroScore { name: String },
    #[error("formula '{formula}' produced a negative weight for card '{name}'")]
    Negative { formula: &'static str, name: String },
    #[error("formula '{formula}' produced a non-finite weight for card '{name}'")]
    NonFinite { formula: &'static str, name: String },
    #[error("formula '{formula}' produced no positive weight for class '{class}'")]
    ZeroTotal {
        formula: &'static str,
        class: String,
    },
    #[error("gaussian parameters are degenerate (std_dev = {std_dev})")]
    DegenerateNormal { std_dev: f64 },
}

/// Offer rates per rarity tier, plus how each tier's mass is split between
/// in-class and neutral cards. Injected into the rarity formula rather than
/// read from a global table.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RarityRates {
    pub common: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
    pub class_share: f64,
    pub neutral_share: f64,
}

impl Default for RarityRates {
    fn default() -> Self {
        Self {
            common: 76.0,
            rare: 20.0,
            epic: 3.0,
            legendary: 1.0,
            class_share: 2.0,
            neutral_share: 1.0,
        }
    }
}

impl RarityRates {
    pub fn rate(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Free | Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }

    pub fn is_valid(&self) -> bool {
        [
            self.common,
            self.rare,
            self.epic,
            self.legendary,
            self.class_share,
            self.neutral_share,
        ]
        .iter()
        .all(|value| value.is_finite() && *value > 0.0)
    }
}

/// Computes the normalized weight column for one class partition.
pub fn weigh(
    formula: &FormulaConfig,
    class: &str,
    rows: &[CardRow],
) -> Result<Vec<f64>, WeightError> {
    let raw = match formula {
        FormulaConfig::Linear { scale, buffer } => linear(rows, *scale, *buffer),
        FormulaConfig::Inverse { scale, buffer } => inverse(rows, *scale, *buffer)?,
        FormulaConfig::LinearCentered { center } => linear_centered(rows, *center),
        FormulaConfig::Normal { center, std_dev } => normal(rows, *center, *std_dev)?,
        FormulaConfig::StandardRarity { rates } => standard_rarity(rows, *rates),
    };
    normalize(raw, formula.label(), class, rows)
}

fn linear(rows: &[CardRow], scale: f64, buffer: f64) -> Vec<f64> {
    rows.iter().map(|row| scale * row.score + buffer).collect()
}

fn inverse(rows: &[CardRow], scale: f64, buffer: f64) -> Result<Vec<f64>, WeightError> {
    rows.iter()
        .map(|row| {
            if row.score == 0.0 {
                Err(WeightError::ZeroScore {
                    name: row.name.clone(),
                })
            } else {
                Ok(scale / row.score + buffer)
            }
        })
        .collect()
}

/// Peaks at the center and falls off linearly; the farthest card clamps to
/// zero weight.
fn linear_centered(rows: &[CardRow], center: Option<f64>) -> Vec<f64> {
    let center = center.unwrap_or_else(|| median(rows));
    let max_dev = rows
        .iter()
        .map(|row| (row.score - center).abs())
        .fold(0.0, f64::max);
    rows.iter()
        .map(|row| (max_dev - (row.score - center).abs()).max(0.0))
        .collect()
}

fn normal(
    rows: &[CardRow],
    center: Option<f64>,
    std_dev: Option<f64>,
) -> Result<Vec<f64>, WeightError> {
    let center = center.unwrap_or_else(|| median(rows));
    let std_dev = std_dev.unwrap_or_else(|| sample_std(rows));
    if !(std_dev.is_finite() && std_dev > 0.0) {
        return Err(WeightError::DegenerateNormal { std_dev });
    }
    let density =
        Normal::new(center, std_dev).map_err(|_| WeightError::DegenerateNormal { std_dev })?;
    Ok(rows.iter().map(|row| density.pdf(row.score)).collect())
}

/// Rarity-based offer rates: each rarity tier's mass is split between
/// in-class and neutral cards (2:1 by default) and divided evenly inside
/// each group. A tier with cards on only one side gives that side the full
/// rate.
fn standard_rarity(rows: &[CardRow], rates: RarityRates) -> Vec<f64> {
    let mut class_counts = [0usize; 4];
    let mut neutral_counts = [0usize; 4];
    for row in rows {
        let bucket = rarity_bucket(row.rarity);
        if row.player_class == NEUTRAL_CLASS {
            neutral_counts[bucket] += 1;
        } else {
            class_counts[bucket] += 1;
        }
    }

    let total_share = rates.class_share + rates.neutral_share;
    rows.iter()
        .map(|row| {
            let bucket = rarity_bucket(row.rarity);
            let rate = rates.rate(row.rarity);
            let is_neutral = row.player_class == NEUTRAL_CLASS;
            let (own, other, share) = if is_neutral {
                (neutral_counts[bucket], class_counts[bucket], rates.neutral_share)
            } else {
                (class_counts[bucket], neutral_counts[bucket], rates.class_share)
            };
            if other == 0 {
                rate / own as f64
            } else {
                rate * share / (total_share * own as f64)
            }
        })
        .collect()
}

fn rarity_bucket(rarity: Rarity) -> usize {
    match rarity {
        Rarity::Free | Rarity::Common => 0,
        Rarity::Rare => 1,
        Rarity::Epic => 2,
        Rarity::Legendary => 3,
    }
}

fn normalize(
    mut weights: Vec<f64>,
    formula: &'static str,
    class: &str,
    rows: &[CardRow],
) -> Result<Vec<f64>, WeightError> {
    for (weight, row) in weights.iter().zip(rows) {
        if !weight.is_finite() {
            return Err(WeightError::NonFinite {
                formula,
                name: row.name.clone(),
            });
        }
        if *weight < 0.0 {
            return Err(WeightError::Negative {
                formula,
                name: row.name.clone(),
            });
        }
    }

    let total: f64 = weights.iter().sum();
    if !(total > 0.0) {
        return Err(WeightError::ZeroTotal {
            formula,
            class: class.to_string(),
        });
    }

    for weight in &mut weights {
        *weight /= total;
    }
    Ok(weights)
}

fn median(rows: &[CardRow]) -> f64 {
    let mut scores: Vec<f64> = rows.iter().map(|row| row.score).collect();
    scores.sort_by(f64::total_cmp);
    let mid = scores.len() / 2;
    if scores.len() % 2 == 1 {
        scores[mid]
    } else {
        (scores[mid - 1] + scores[mid]) / 2.0
    }
}

fn sample_std(rows: &[CardRow]) -> f64 {
    if rows.len() < 2 {
        return 0.0;
    }
    let mean = rows.iter().map(|row| row.score).sum::<f64>() / rows.len() as f64;
    let variance = rows
        .iter()
        .map(|row| (row.score - mean).powi(2))
        .sum::<f64>()
        / (rows.len() as f64 - 1.0);
    variance.sqrt()
}
