//! Row source over delimited text
//!
//! Parses the header row eagerly and yields data rows lazily, one record at a
//! time, so memory use does not grow with the size of the input.

use std::io::Read;

use indexmap::IndexMap;
use tracing::warn;

use super::LoaderError;

/// A header-keyed data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    index: usize,
    values: IndexMap<String, String>,
}

impl Row {
    /// Build a row from `(column, value)` pairs. Later duplicates overwrite
    /// earlier values but keep the first position.
    pub fn new<K, V>(index: usize, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            index,
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 0-based position of this row among the data rows
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Fields in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Lazily parsed rows of a delimited text source
pub struct RowSource<R: Read> {
    reader: csv::Reader<R>,
    headers: Vec<String>,
    record: csv::StringRecord,
    next_index: usize,
}

impl<R: Read> RowSource<R> {
    /// Read the header row from `input`
    pub fn new(input: R, delimiter: u8) -> Result<Self, LoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers = reader
            .headers()
            .map_err(|e| LoaderError::Parse(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        Ok(Self {
            reader,
            headers,
            record: csv::StringRecord::new(),
            next_index: 0,
        })
    }

    /// Header names in column order, or `None` when the source has no header row
    pub fn headers(&self) -> Option<&[String]> {
        if self.headers.is_empty() {
            None
        } else {
            Some(&self.headers)
        }
    }

    fn build_row(&self) -> Row {
        let index = self.next_index;
        if self.record.len() > self.headers.len() {
            warn!(
                "Row {} has {} fields but only {} headers; ignoring the surplus",
                index,
                self.record.len(),
                self.headers.len()
            );
        }

        // Short rows are padded with empty strings
        let values = self
            .headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), self.record.get(i).unwrap_or("")));
        Row::new(index, values)
    }
}

impl<R: Read> Iterator for RowSource<R> {
    type Item = Result<Row, LoaderError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let row = self.build_row();
                self.next_index += 1;
                Some(Ok(row))
            }
            Err(e) => Some(Err(LoaderError::Parse(e.to_string()))),
        }
    }
}
