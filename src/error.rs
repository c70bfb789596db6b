//! Error types shared by the loader and both pipelines.

use std::num::ParseFloatError;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GrowthError>;

#[derive(Debug, Error)]
pub enum GrowthError {
    #[error("could not open '{}'", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing expected column '{column}' in record {row}")]
    MissingColumn { column: String, row: usize },

    #[error("column '{column}' in record {row} is not numeric: '{value}'")]
    Parse {
        column: String,
        row: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("increment must be a finite number, got '{value}'")]
    InvalidIncrement { value: String },

    #[error("invalid configuration in '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GrowthError {
    /// Short hint for the console, keyed by the error kind.
    pub fn hint(&self) -> &'static str {
        match self {
            GrowthError::FileNotFound { .. } => {
                "Please make sure the file exists in the correct location."
            }
            GrowthError::MissingColumn { .. } => {
                "Please verify the CSV file has all required columns."
            }
            GrowthError::Parse { .. } => "Please verify the height columns contain numbers.",
            GrowthError::InvalidIncrement { .. } => "Pass a finite number, e.g. --increment 2.5",
            _ => "An unexpected error occurred.",
        }
    }
}
