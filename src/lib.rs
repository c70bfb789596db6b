pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod output;
pub mod report;
pub mod utility;

pub use aggregate::{AggregationResult, group_average_delta};
pub use config::GrowthConfig;
pub use dataset::{Dataset, Record, load_dataset};
pub use derive::compute_derived;
pub use error::{GrowthError, Result};
