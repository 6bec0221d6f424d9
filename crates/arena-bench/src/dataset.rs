//! Card dataset loading and per-class partitioning.
//!
//! The input is the JSON card table the upstream collection pipeline
//! persists: one object per collectible card with its name, rarity, owning
//! class, and tier-list score. Cards the tier list does not rate carry no
//! score and are skipped at load.

use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Class label for cards every class can draft.
pub const NEUTRAL_CLASS: &str = "NEUTRAL";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse dataset {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error("dataset contains no scored cards")]
    NoScoredCards,
    #[error("no cards available for class '{class}'")]
    EmptyPartition { class: String },
}

/// Card rarity tiers. `Free` basics are priced like commons by the tier
/// list, and the rarity weight formula treats them the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rarity {
    Free,
    Common,
    Rare,
    Epic,
    Legendary,
}

/// One scored card row.
#[derive(Debug, Clone, PartialEq)]
pub struct CardRow {
    pub name: String,
    pub rarity: Rarity,
    pub player_class: String,
    pub score: f64,
}

/// Raw row as persisted upstream; unscored cards are filtered out.
#[derive(Debug, Deserialize)]
struct RawRow {
    name: String,
    rarity: Rarity,
    #[serde(rename = "playerClass")]
    player_class: String,
    #[serde(rename = "arenaScore")]
    score: Option<f64>,
}

/// The full scored card table, partitionable by class.
#[derive(Debug, Clone)]
pub struct CardDataset {
    rows: Vec<CardRow>,
    skipped: usize,
}

impl CardDataset {
    /// Loads the dataset from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| DatasetError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let raw: Vec<RawRow> =
            serde_json::from_reader(reader).map_err(|source| DatasetError::Parse {
                source,
                path: path_buf,
            })?;
        Self::from_raw(raw)
    }

    /// Parses the dataset from an in-memory JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let raw: Vec<RawRow> =
            serde_json::from_str(json).map_err(|source| DatasetError::Parse {
                source,
                path: PathBuf::from("<inline>"),
            })?;
        Self::from_raw(raw)
    }

    pub fn from_rows(rows: Vec<CardRow>) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::NoScoredCards);
        }
        Ok(Self { rows, skipped: 0 })
    }

    fn from_raw(raw: Vec<RawRow>) -> Result<Self, DatasetError> {
        let mut rows = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;
        for row in raw {
            match row.score {
                Some(score) => rows.push(CardRow {
                    name: row.name,
                    rarity: row.rarity,
                    player_class: row.player_class.to_ascii_uppercase(),
                    score,
                }),
                None => skipped += 1,
            }
        }

        if rows.is_empty() {
            return Err(DatasetError::NoScoredCards);
        }

        Ok(Self { rows, skipped })
    }

    pub fn rows(&self) -> &[CardRow] {
        &self.rows
    }

    /// Rows dropped at load because the tier list carries no score for them.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Cards a class can be offered: its own cards plus every neutral card.
    /// The `NEUTRAL` label selects the neutral cards alone.
    pub fn partition(&self, class: &str) -> Result<Vec<CardRow>, DatasetError> {
        let class = class.to_ascii_uppercase();
        let rows: Vec<CardRow> = self
            .rows
            .iter()
            .filter(|row| row.player_class == class || row.player_class == NEUTRAL_CLASS)
            .cloned()
            .collect();

        if rows.is_empty() {
            return Err(DatasetError::EmptyPartition { class });
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::{CardDataset, DatasetError, Rarity};

    const SAMPLE_JSON: &str = r#"[
        {"name": "Fireball", "rarity": "COMMON", "playerClass": "MAGE", "arenaScore": 104},
        {"name": "Water Elemental", "rarity": "COMMON", "playerClass": "MAGE", "arenaScore": 90},
        {"name": "Boulderfist Ogre", "rarity": "COMMON", "playerClass": "NEUTRAL", "arenaScore": 80},
        {"name": "Ragnaros the Firelord", "rarity": "LEGENDARY", "playerClass": "NEUTRAL", "arenaScore": 118},
        {"name": "Bloodlust", "rarity": "FREE", "playerClass": "SHAMAN", "arenaScore": 66},
        {"name": "Unrated Card", "rarity": "COMMON", "playerClass": "NEUTRAL", "arenaScore": null}
    ]"#;

    #[test]
    fn loads_rows_and_skips_unscored_cards() {
        let dataset = CardDataset::from_json_str(SAMPLE_JSON).unwrap();
        assert_eq!(dataset.rows().len(), 5);
        assert_eq!(dataset.skipped(), 1);
        assert_eq!(dataset.rows()[4].rarity, Rarity::Free);
    }

    #[test]
    fn class_partition_includes_neutral_cards() {
        let dataset = CardDataset::from_json_str(SAMPLE_JSON).unwrap();
        let mage = dataset.partition("mage").unwrap();
        let names: Vec<&str> = mage.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Fireball",
                "Water Elemental",
                "Boulderfist Ogre",
                "Ragnaros the Firelord"
            ]
        );
    }

    #[test]
    fn neutral_partition_excludes_class_cards() {
        let dataset = CardDataset::from_json_str(SAMPLE_JSON).unwrap();
        let neutral = dataset.partition("NEUTRAL").unwrap();
        assert_eq!(neutral.len(), 2);
        assert!(neutral.iter().all(|row| row.player_class == "NEUTRAL"));
    }

    #[test]
    fn unknown_class_partition_still_offers_neutrals() {
        let dataset = CardDataset::from_json_str(SAMPLE_JSON).unwrap();
        let partition = dataset.partition("PALADIN").unwrap();
        assert_eq!(partition.len(), 2);
    }

    #[test]
    fn fully_unscored_dataset_is_rejected() {
        let json = r#"[{"name": "X", "rarity": "RARE", "playerClass": "MAGE", "arenaScore": null}]"#;
        assert!(matches!(
            CardDataset::from_json_str(json).unwrap_err(),
            DatasetError::NoScoredCards
        ));
    }

    #[test]
    fn missing_score_field_counts_as_unscored() {
        let json = r#"[
            {"name": "Rated", "rarity": "RARE", "playerClass": "MAGE", "arenaScore": 70},
            {"name": "Unrated", "rarity": "RARE", "playerClass": "MAGE"}
        ]"#;
        let dataset = CardDataset::from_json_str(json).unwrap();
        assert_eq!(dataset.rows().len(), 1);
        assert_eq!(dataset.skipped(), 1);
    }
}
