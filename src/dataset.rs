//! In-memory representation of a growth-measurement CSV file.
//!
//! A [`Dataset`] is the header row plus every [`Record`] in file order. Both
//! the derived-column pipeline and the aggregation pipeline read from the same
//! loader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{GrowthError, Result};

const BOM: char = '\u{feff}';

/// One row of the input file: column name to raw string value, in header order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Record {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Like [`Record::get`], but a missing column is an error tagged with `row`.
    pub fn require(&self, column: &str, row: usize) -> Result<&str> {
        self.get(column).ok_or_else(|| GrowthError::MissingColumn {
            column: column.to_string(),
            row,
        })
    }

    /// Parses `column` as a float. Surrounding whitespace is ignored.
    pub fn parse_f64(&self, column: &str, row: usize) -> Result<f64> {
        let raw = self.require(column, row)?;
        raw.trim().parse::<f64>().map_err(|source| GrowthError::Parse {
            column: column.to_string(),
            row,
            value: raw.to_string(),
            source,
        })
    }

    /// Returns a copy of this record with `column` set to `value`.
    ///
    /// An existing column keeps its position; a new one is appended.
    pub fn with_field(&self, column: &str, value: String) -> Record {
        let mut fields = self.fields.clone();
        match fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, existing)) => *existing = value,
            None => fields.push((column.to_string(), value)),
        }
        Record { fields }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Header row plus records, in file order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Dataset { headers, records }
    }

    /// Builds a dataset from records alone, taking the header from the first one.
    pub fn from_records(records: Vec<Record>) -> Self {
        let headers = records
            .first()
            .map(|r| r.columns().map(str::to_string).collect())
            .unwrap_or_default();
        Dataset { headers, records }
    }

    /// Parses CSV with a header row from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| {
                if i == 0 {
                    h.trim_start_matches(BOM).to_string()
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            records.push(Record::from_pairs(
                headers.iter().map(String::as_str).zip(row.iter()),
            ));
        }

        Ok(Dataset { headers, records })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Reads the CSV file at `path` into a [`Dataset`].
///
/// # Errors
///
/// Returns [`GrowthError::FileNotFound`] if the file cannot be opened, or a
/// CSV error if a row is malformed.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| GrowthError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = Dataset::from_reader(file)?;
    debug!(
        records = dataset.len(),
        columns = dataset.headers().len(),
        "Dataset loaded"
    );
    Ok(dataset)
}
