//! Grouped mean of the difference between two numeric columns.

use std::collections::HashMap;

use tracing::info;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::utility::mean;

/// Group key to mean difference. Iteration order is unspecified; use
/// [`AggregationResult::sorted`] when output order matters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResult {
    groups: HashMap<String, f64>,
}

impl AggregationResult {
    pub fn get(&self, key: &str) -> Option<f64> {
        self.groups.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Entries ordered by group key.
    pub fn sorted(&self) -> Vec<(&str, f64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl FromIterator<(String, f64)> for AggregationResult {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        AggregationResult {
            groups: iter.into_iter().collect(),
        }
    }
}

/// For each distinct value of `group_column`, averages
/// `minuend_column - subtrahend_column` over the records in that group.
///
/// An empty dataset yields an empty result. The first missing or unparseable
/// field aborts the whole computation.
#[tracing::instrument(skip(dataset), fields(records = dataset.len()))]
pub fn group_average_delta(
    dataset: &Dataset,
    group_column: &str,
    minuend_column: &str,
    subtrahend_column: &str,
) -> Result<AggregationResult> {
    let mut deltas: HashMap<String, Vec<f64>> = HashMap::new();

    for (i, record) in dataset.iter().enumerate() {
        let row = i + 1;
        let key = record.require(group_column, row)?;
        let delta =
            record.parse_f64(minuend_column, row)? - record.parse_f64(subtrahend_column, row)?;

        deltas.entry(key.to_string()).or_default().push(delta);
    }

    let result: AggregationResult = deltas
        .into_iter()
        .map(|(key, series)| {
            let avg = mean(&series);
            (key, avg)
        })
        .collect();

    info!(groups = result.len(), "Group averages computed");
    Ok(result)
}
