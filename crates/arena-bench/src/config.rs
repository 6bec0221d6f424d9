use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

use crate::weights::RarityRates;

const DEFAULT_ROUNDS: usize = 30_000;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// The nine playable classes plus the neutral-only partition.
const DEFAULT_CLASSES: [&str; 10] = [
    "DRUID", "HUNTER", "MAGE", "PALADIN", "PRIEST", "ROGUE", "SHAMAN", "WARLOCK", "WARRIOR",
    "NEUTRAL",
];

/// Root sweep configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SweepConfig {
    pub run_id: String,
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub draft: DraftConfig,
    pub formulas: Vec<FormulaConfig>,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SweepConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: SweepConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.dataset.validate()?;
        self.draft.validate()?;
        validate_formulas(&self.formulas)?;
        self.outputs.validate(&self.run_id)?;
        self.logging.normalize();
        Ok(())
    }

    /// Resolve output templates (e.g., `{run_id}` placeholders) into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            stats_csv: resolve_template(&self.run_id, &self.outputs.stats_csv),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
            plots_dir: resolve_template(&self.run_id, &self.outputs.plots_dir),
        }
    }
}

/// Card dataset configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DatasetConfig {
    pub path: String,
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,
}

impl DatasetConfig {
    fn validate(&mut self) -> Result<(), ValidationError> {
        if self.path.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "dataset.path".to_string(),
                message: "dataset path must not be empty".to_string(),
            });
        }

        if self.classes.is_empty() {
            return Err(ValidationError::InvalidField {
                field: "dataset.classes".to_string(),
                message: "at least one class must be specified".to_string(),
            });
        }

        for class in &mut self.classes {
            *class = class.trim().to_ascii_uppercase();
            if class.is_empty() {
                return Err(ValidationError::InvalidField {
                    field: "dataset.classes".to_string(),
                    message: "class labels must not be empty".to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for class in &self.classes {
            if !seen.insert(class.clone()) {
                return Err(ValidationError::InvalidField {
                    field: "dataset.classes".to_string(),
                    message: format!("class '{class}' listed more than once"),
                });
            }
        }

        Ok(())
    }
}

fn default_classes() -> Vec<String> {
    DEFAULT_CLASSES.iter().map(|class| class.to_string()).collect()
}

/// Draft sampling configuration block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DraftConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_rounds")]
    pub rounds: usize,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self {
            seed: None,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl DraftConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "draft.rounds".to_string(),
                message: "number of rounds must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_rounds() -> usize {
    DEFAULT_ROUNDS
}

/// One weight formula to sweep, with its parameters.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormulaConfig {
    Linear {
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        buffer: f64,
    },
    Inverse {
        #[serde(default = "default_scale")]
        scale: f64,
        #[serde(default)]
        buffer: f64,
    },
    LinearCentered {
        #[serde(default)]
        center: Option<f64>,
    },
    Normal {
        #[serde(default)]
        center: Option<f64>,
        #[serde(default)]
        std_dev: Option<f64>,
    },
    StandardRarity {
        #[serde(default)]
        rates: RarityRates,
    },
}

impl FormulaConfig {
    /// Stable label used in report rows and log events.
    pub fn label(&self) -> &'static str {
        match self {
            FormulaConfig::Linear { .. } => "linear",
            FormulaConfig::Inverse { .. } => "inverse",
            FormulaConfig::LinearCentered { .. } => "linear_centered",
            FormulaConfig::Normal { .. } => "normal",
            FormulaConfig::StandardRarity { .. } => "standard_rarity",
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |message: String| ValidationError::InvalidField {
            field: format!("formulas.{}", self.label()),
            message,
        };

        match self {
            FormulaConfig::Linear { scale, buffer } | FormulaConfig::Inverse { scale, buffer } => {
                if !scale.is_finite() || !buffer.is_finite() {
                    return Err(invalid(format!(
                        "scale ({scale}) and buffer ({buffer}) must be finite"
                    )));
                }
            }
            FormulaConfig::LinearCentered { center } => {
                if let Some(center) = center
                    && !center.is_finite()
                {
                    return Err(invalid(format!("center ({center}) must be finite")));
                }
            }
            FormulaConfig::Normal { center, std_dev } => {
                if let Some(center) = center
                    && !center.is_finite()
                {
                    return Err(invalid(format!("center ({center}) must be finite")));
                }
                if let Some(std_dev) = std_dev
                    && !(std_dev.is_finite() && *std_dev > 0.0)
                {
                    return Err(invalid(format!("std_dev ({std_dev}) must be positive")));
                }
            }
            FormulaConfig::StandardRarity { rates } => {
                if !rates.is_valid() {
                    return Err(invalid(
                        "rarity rates and shares must be positive and finite".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn default_scale() -> f64 {
    1.0
}

fn validate_formulas(formulas: &[FormulaConfig]) -> Result<(), ValidationError> {
    if formulas.is_empty() {
        return Err(ValidationError::InvalidField {
            field: "formulas".to_string(),
            message: "at least one formula must be specified".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for formula in formulas {
        if !seen.insert(formula.label()) {
            return Err(ValidationError::InvalidField {
                field: "formulas".to_string(),
                message: format!("formula '{}' defined more than once", formula.label()),
            });
        }
        formula.validate()?;
    }

    Ok(())
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub stats_csv: String,
    pub summary_md: String,
    pub plots_dir: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.stats_csv", &self.stats_csv),
            ("outputs.summary_md", &self.summary_md),
            ("outputs.plots_dir", &self.plots_dir),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    let replaced = template.replace("{run_id}", run_id);
    PathBuf::from(replaced)
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub stats_csv: PathBuf,
    pub summary_md: PathBuf,
    pub plots_dir: PathBuf,
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
