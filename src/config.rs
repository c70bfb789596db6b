//! Run configuration for both pipelines.
//!
//! Stored as a JSON object on disk, every field optional:
//! ```json
//! {
//!   "increment": 2.5,
//!   "group_column": "Plant",
//!   "baseline_column": "HeightW1",
//!   "final_column": "HeightW10",
//!   "projected_column": "HeightW11",
//!   "sample_size": 3
//! }
//! ```

use std::env::VarError;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{GrowthError, Result};

/// Environment variable that overrides [`GrowthConfig::increment`].
pub const INCREMENT_ENV: &str = "GROWTH_INCREMENT";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Added to `final_column` to project the next week.
    pub increment: f64,
    pub group_column: String,
    pub baseline_column: String,
    pub final_column: String,
    pub projected_column: String,
    /// Number of records shown in console samples.
    pub sample_size: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        GrowthConfig {
            increment: 2.0,
            group_column: "Plant".to_string(),
            baseline_column: "HeightW1".to_string(),
            final_column: "HeightW10".to_string(),
            projected_column: "HeightW11".to_string(),
            sample_size: 3,
        }
    }
}

impl GrowthConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            GrowthError::FileNotFound {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let config: GrowthConfig =
            serde_json::from_str(&content).map_err(|source| GrowthError::Config {
                path: path.to_path_buf(),
                source,
            })?;
        let increment = config.increment;
        config.with_increment(increment)
    }

    /// Loads `path` when given, otherwise starts from the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Applies `GROWTH_INCREMENT` if it is set.
    pub fn apply_env(self) -> Result<Self> {
        self.with_env_increment(std::env::var(INCREMENT_ENV))
    }

    fn with_env_increment(self, var: std::result::Result<String, VarError>) -> Result<Self> {
        match var {
            Ok(raw) => {
                debug!(value = %raw, "Increment overridden from environment");
                self.with_increment(parse_increment(&raw)?)
            }
            Err(VarError::NotPresent) => Ok(self),
            Err(VarError::NotUnicode(raw)) => Err(GrowthError::InvalidIncrement {
                value: raw.to_string_lossy().into_owned(),
            }),
        }
    }

    /// Replaces the increment, rejecting NaN and infinities.
    pub fn with_increment(mut self, increment: f64) -> Result<Self> {
        if !increment.is_finite() {
            return Err(GrowthError::InvalidIncrement {
                value: increment.to_string(),
            });
        }
        self.increment = increment;
        Ok(self)
    }
}

/// Parses a user-supplied increment such as `"2"` or `"-0.5"`.
pub fn parse_increment(raw: &str) -> Result<f64> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(GrowthError::InvalidIncrement {
            value: raw.to_string(),
        }),
    }
}
