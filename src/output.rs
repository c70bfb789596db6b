//! Output formatting and persistence for datasets and group summaries.
//!
//! Files are rendered fully in memory before anything touches the disk, so a
//! failed run never leaves a half-written CSV behind.

use std::collections::BTreeMap;
use std::path::Path;

use csv::{Terminator, WriterBuilder};
use tracing::{debug, info, warn};

use crate::aggregate::AggregationResult;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::utility::two_decimals;

pub const DEFAULT_KEY_HEADER: &str = "Plant";
pub const DEFAULT_VALUE_HEADER: &str = "AverageGain";

fn csv_writer() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| e.into_error().into())
}

/// Renders a dataset as CSV: header row followed by every record.
pub fn dataset_to_csv(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv_writer();
    writer.write_record(dataset.headers())?;
    for record in dataset {
        writer.write_record(record.values())?;
    }
    finish(writer)
}

/// Renders a summary as two-column CSV, sorted by key, values to two decimals.
pub fn summary_to_csv(
    result: &AggregationResult,
    key_header: &str,
    value_header: &str,
) -> Result<Vec<u8>> {
    let mut writer = csv_writer();
    writer.write_record([key_header, value_header])?;
    for (key, value) in result.sorted() {
        writer.write_record([key, two_decimals(value).as_str()])?;
    }
    finish(writer)
}

/// Writes `dataset` to `path`, replacing any existing file.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<()> {
    if dataset.is_empty() {
        warn!(path = %path.display(), "No records to write, output will hold the header only");
    }
    let bytes = dataset_to_csv(dataset)?;
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), records = dataset.len(), "Dataset written");
    Ok(())
}

/// Writes the summary CSV to `path`, replacing any existing file.
pub fn write_summary(
    path: &Path,
    result: &AggregationResult,
    key_header: &str,
    value_header: &str,
) -> Result<()> {
    let bytes = summary_to_csv(result, key_header, value_header)?;
    std::fs::write(path, bytes)?;
    info!(path = %path.display(), groups = result.len(), "Summary written");
    Ok(())
}

/// Pretty JSON object of group key to value, keys sorted.
///
/// Values go through the same two-decimal formatting as the summary CSV so
/// both outputs agree on ties.
pub fn summary_to_json(result: &AggregationResult) -> Result<String> {
    let rounded: BTreeMap<&str, f64> = result
        .iter()
        .map(|(key, value)| (key, two_decimals(value).parse().unwrap_or(value)))
        .collect();
    Ok(serde_json::to_string_pretty(&rounded)?)
}

/// Logs a summary using Rust's debug pretty-print format.
pub fn print_pretty(result: &AggregationResult) {
    debug!("{:#?}", result.sorted());
}
