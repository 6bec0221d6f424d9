use crate::model::card::Card;
use thiserror::Error;

/// Malformed pool input, rejected before any sampling happens.
#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    #[error("card pool is empty")]
    Empty,
    #[error("card {index} ('{name}') has weight {weight}; weights must be positive and finite")]
    InvalidWeight {
        index: usize,
        name: String,
        weight: f64,
    },
    #[error("column lengths differ: {weights} weights, {names} names, {scores} scores")]
    ColumnMismatch {
        weights: usize,
        names: usize,
        scores: usize,
    },
}

/// An ordered, immutable set of weighted cards.
///
/// A pool is fixed for the lifetime of the sampler built on it; changing the
/// weight formula or the class partition means building a new pool.
#[derive(Debug, Clone)]
pub struct Pool {
    cards: Vec<Card>,
}

impl Pool {
    /// Canonical constructor. Every weight must be positive and finite.
    pub fn new(cards: Vec<Card>) -> Result<Self, PoolError> {
        if cards.is_empty() {
            return Err(PoolError::Empty);
        }
        for (index, card) in cards.iter().enumerate() {
            if !(card.weight.is_finite() && card.weight > 0.0) {
                return Err(PoolError::InvalidWeight {
                    index,
                    name: card.name.clone(),
                    weight: card.weight,
                });
            }
        }
        Ok(Self { cards })
    }

    /// Builds a pool from `(weight, name, score)` triples.
    pub fn from_triples(triples: Vec<(f64, String, f64)>) -> Result<Self, PoolError> {
        Self::new(
            triples
                .into_iter()
                .map(|(weight, name, score)| Card {
                    weight,
                    name,
                    score,
                })
                .collect(),
        )
    }

    /// Builds a pool from three parallel columns of equal length.
    pub fn from_columns(
        weights: Vec<f64>,
        names: Vec<String>,
        scores: Vec<f64>,
    ) -> Result<Self, PoolError> {
        if weights.len() != names.len() || weights.len() != scores.len() {
            return Err(PoolError::ColumnMismatch {
                weights: weights.len(),
                names: names.len(),
                scores: scores.len(),
            });
        }
        Self::new(
            weights
                .into_iter()
                .zip(names)
                .zip(scores)
                .map(|((weight, name), score)| Card {
                    weight,
                    name,
                    score,
                })
                .collect(),
        )
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.cards.iter().map(|card| card.weight).sum()
    }
}
