//! Console report lines for the `inspect`, `append-week` and `summarize` commands.
//!
//! Everything here returns plain strings; the binary decides where they go.

use crate::aggregate::AggregationResult;
use crate::dataset::{Dataset, Record};
use crate::error::Result;
use crate::utility::{mean, two_decimals};

/// A full-width rule such as `=====`.
pub fn rule(ch: char, width: usize) -> String {
    std::iter::repeat_n(ch, width).collect()
}

/// Title framed by two rules.
pub fn banner(title: &str, width: usize) -> Vec<String> {
    vec![rule('=', width), title.to_string(), rule('=', width)]
}

/// Mean of a numeric column across every record, `None` when there are no records.
pub fn column_mean(dataset: &Dataset, column: &str) -> Result<Option<f64>> {
    if dataset.is_empty() {
        return Ok(None);
    }
    let values = dataset
        .iter()
        .enumerate()
        .map(|(i, record)| record.parse_f64(column, i + 1))
        .collect::<Result<Vec<f64>>>()?;
    Ok(Some(mean(&values)))
}

/// One record as `{Student: S1, Plant: Bean, ...}`.
pub fn record_line(record: &Record) -> String {
    let fields: Vec<String> = record.iter().map(|(k, v)| format!("{k}: {v}")).collect();
    format!("{{{}}}", fields.join(", "))
}

/// The first `n` records, each as a `Record i:` block listing `columns`.
///
/// Columns a record does not have are shown as `-`.
pub fn sample_lines(dataset: &Dataset, columns: &[&str], n: usize) -> Vec<String> {
    let width = columns.iter().map(|c| c.len()).max().unwrap_or(0) + 1;
    let mut lines = Vec::new();

    for (i, record) in dataset.iter().take(n).enumerate() {
        lines.push(format!("Record {}:", i + 1));
        for column in columns {
            let value = record.get(column).unwrap_or("-");
            lines.push(format!("  {:<width$} {}", format!("{column}:"), value));
        }
    }
    lines
}

/// Side-by-side view of `source` and the derived `target` for the first `n` records.
pub fn comparison_lines(
    original: &Dataset,
    derived: &Dataset,
    source: &str,
    target: &str,
    n: usize,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();

    for (i, (before, after)) in original.iter().zip(derived.iter()).take(n).enumerate() {
        let row = i + 1;
        let base = before.parse_f64(source, row)?;
        let projected = after.parse_f64(target, row)?;

        lines.push(format!("Record {row}:"));
        for label in ["Plant", "Student"] {
            if let Some(value) = before.get(label) {
                lines.push(format!("  {label}: {value}"));
            }
        }
        lines.push(format!("  {source}: {} cm", before.require(source, row)?));
        lines.push(format!("  {target}: {} cm (NEW)", after.require(target, row)?));
        lines.push(format!(
            "  Growth from {source} to {target}: {} cm",
            two_decimals(projected - base)
        ));
    }
    Ok(lines)
}

/// One line per group, sorted by key.
pub fn summary_lines(result: &AggregationResult) -> Vec<String> {
    result
        .sorted()
        .into_iter()
        .map(|(key, value)| format!("{key:12}: {value:.2} cm"))
        .collect()
}
