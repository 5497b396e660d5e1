use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

/// Failure loading a fixture or production dataset from CSV.
#[derive(Debug)]
pub enum DatasetError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io(err) => write!(f, "failed to read dataset: {}", err),
            DatasetError::Csv(err) => write!(f, "invalid dataset CSV: {}", err),
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Io(err) => Some(err),
            DatasetError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for DatasetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Deserialize every row of a headed CSV document.
pub(crate) fn read_rows<T, R>(reader: R) -> Result<Vec<T>, DatasetError>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for row in csv_reader.deserialize::<T>() {
        rows.push(row?);
    }

    Ok(rows)
}

pub(crate) fn open(path: &Path) -> Result<File, DatasetError> {
    Ok(File::open(path)?)
}
