//! Delimited source loading
//!
//! The whole file is read into memory before any filtering: the first row is
//! the header, every later row becomes a [`Record`] keyed by header name.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Error opening file '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Error reading file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("The file '{path}' must contain a header and at least one data row")]
    TooFewRows { path: PathBuf },
}

/// One data row, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: HashMap<String, String>,
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

    /// Value of a field, `None` when the record has no such field
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

/// Header plus every data row of a source file
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    header: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }
}

/// Load a delimited file with a header row
pub fn load_dataset(path: impl AsRef<Path>, delimiter: u8) -> Result<Dataset, SourceError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    load_dataset_from_reader(file, delimiter).map_err(|err| match err {
        ReaderError::Csv(source) => SourceError::Read {
            path: path.to_path_buf(),
            source,
        },
        ReaderError::TooFewRows => SourceError::TooFewRows {
            path: path.to_path_buf(),
        },
    })
}

#[derive(Debug)]
enum ReaderError {
    Csv(csv::Error),
    TooFewRows,
}

impl From<csv::Error> for ReaderError {
    fn from(err: csv::Error) -> Self {
        ReaderError::Csv(err)
    }
}

fn load_dataset_from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Dataset, ReaderError> {
    // Headers are read as an ordinary row so an empty file reports too few rows.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut rows = rdr.records();
    let header: Vec<String> = match rows.next() {
        Some(row) => row?.iter().map(str::to_string).collect(),
        None => return Err(ReaderError::TooFewRows),
    };

    let mut records = Vec::new();
    for row in rows {
        let row = row?;
        records.push(Record::from_pairs(
            header.iter().map(String::as_str).zip(row.iter()),
        ));
    }

    if records.is_empty() {
        return Err(ReaderError::TooFewRows);
    }

    log::debug!(
        "read {} field(s) and {} record(s)",
        header.len(),
        records.len()
    );
    Ok(Dataset { header, records })
}
