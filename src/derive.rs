//! Derived-column computation: projects a new height column from an existing one.

use tracing::{debug, info};

use crate::dataset::{Dataset, Record};
use crate::error::{GrowthError, Result};
use crate::utility::two_decimals;

/// Returns a new dataset where every record gains `new_column`, set to
/// `source_column + increment` formatted with two decimals.
///
/// Fails on the first record whose `source_column` is missing or not numeric;
/// nothing is returned in that case. The input dataset is left untouched.
#[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
pub fn compute_derived(
    dataset: &Dataset,
    source_column: &str,
    new_column: &str,
    increment: f64,
) -> Result<Dataset> {
    if !increment.is_finite() {
        return Err(GrowthError::InvalidIncrement {
            value: increment.to_string(),
        });
    }

    let records = dataset
        .iter()
        .enumerate()
        .map(|(i, record)| derive_record(record, i + 1, source_column, new_column, increment))
        .collect::<Result<Vec<Record>>>()?;

    let mut headers = dataset.headers().to_vec();
    if !headers.iter().any(|h| h == new_column) {
        headers.push(new_column.to_string());
    } else {
        debug!(column = new_column, "Column already present, overwriting values");
    }

    info!(
        records = records.len(),
        column = new_column,
        increment,
        "Derived column computed"
    );
    Ok(Dataset::new(headers, records))
}

fn derive_record(
    record: &Record,
    row: usize,
    source_column: &str,
    new_column: &str,
    increment: f64,
) -> Result<Record> {
    let base = record.parse_f64(source_column, row)?;
    Ok(record.with_field(new_column, two_decimals(base + increment)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plants() -> Dataset {
        Dataset::from_records(vec![
            Record::from_pairs([("Plant", "Bean"), ("Student", "S1"), ("HeightW10", "10.00")]),
            Record::from_pairs([("Plant", "Corn"), ("Student", "S2"), ("HeightW10", "7.125")]),
            Record::from_pairs([("Plant", "Pea"), ("Student", "S3"), ("HeightW10", "0")]),
        ])
    }

    #[test]
    fn test_adds_increment_with_two_decimals() {
        let out = compute_derived(&plants(), "HeightW10", "HeightW11", 2.0).unwrap();

        assert_eq!(out.records()[0].get("HeightW11"), Some("12.00"));
        assert_eq!(out.records()[2].get("HeightW11"), Some("2.00"));
    }

    #[test]
    fn test_every_row_matches_source_plus_increment() {
        let ds = plants();
        for k in [0.0, 2.0, -1.5, 0.333] {
            let out = compute_derived(&ds, "HeightW10", "HeightW11", k).unwrap();
            assert_eq!(out.len(), ds.len());
            for (orig, derived) in ds.iter().zip(out.iter()) {
                let base: f64 = orig.get("HeightW10").unwrap().parse().unwrap();
                assert_eq!(derived.get("HeightW11").unwrap(), format!("{:.2}", base + k));
                assert_eq!(derived.get("Plant"), orig.get("Plant"));
            }
        }
    }

    #[test]
    fn test_header_gains_one_column() {
        let out = compute_derived(&plants(), "HeightW10", "HeightW11", 2.0).unwrap();
        assert_eq!(out.headers(), ["Plant", "Student", "HeightW10", "HeightW11"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let ds = plants();
        let before = ds.clone();
        let _ = compute_derived(&ds, "HeightW10", "HeightW11", 5.0).unwrap();
        assert_eq!(ds, before);
        assert!(ds.records()[0].get("HeightW11").is_none());
    }

    #[test]
    fn test_existing_column_is_overwritten_not_duplicated() {
        let once = compute_derived(&plants(), "HeightW10", "HeightW11", 2.0).unwrap();
        let twice = compute_derived(&once, "HeightW10", "HeightW11", 3.0).unwrap();

        assert_eq!(twice.headers().len(), 4);
        assert_eq!(twice.records()[0].get("HeightW11"), Some("13.00"));
    }

    #[test]
    fn test_missing_source_column_fails_whole_operation() {
        let ds = Dataset::from_records(vec![
            Record::from_pairs([("Plant", "Bean"), ("HeightW10", "10")]),
            Record::from_pairs([("Plant", "Corn"), ("HeightW9", "10")]),
        ]);
        let result = compute_derived(&ds, "HeightW10", "HeightW11", 2.0);
        assert!(matches!(
            result,
            Err(GrowthError::MissingColumn { row: 2, .. })
        ));
    }

    #[test]
    fn test_non_numeric_source_fails() {
        let ds = Dataset::from_records(vec![Record::from_pairs([("HeightW10", "n/a")])]);
        let result = compute_derived(&ds, "HeightW10", "HeightW11", 2.0);
        assert!(matches!(result, Err(GrowthError::Parse { row: 1, .. })));
    }

    #[test]
    fn test_non_finite_increment_rejected() {
        let result = compute_derived(&plants(), "HeightW10", "HeightW11", f64::INFINITY);
        assert!(matches!(result, Err(GrowthError::InvalidIncrement { .. })));
    }

    #[test]
    fn test_empty_dataset() {
        let out = compute_derived(&Dataset::default(), "HeightW10", "HeightW11", 2.0).unwrap();
        assert!(out.is_empty());
    }
}
