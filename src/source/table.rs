//! Raw tabular input.
//!
//! A [`RawTable`] is the untyped, row/column shaped form of a dataset as it
//! arrives from a source. Cells are kept as strings; typing happens later in
//! the coercion stage.

use std::io::Read;

use crate::error::PipelineError;

/// Untyped table: a header row plus rows of optional cells.
///
/// Every row has exactly `headers.len()` cells. Blank cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    /// Build a table from in-memory rows.
    ///
    /// Rows shorter than the header are padded with `None`, longer rows are
    /// truncated. Used by embedders that already hold parsed data.
    pub fn from_rows<H, R>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = Vec<Option<String>>>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Parse CSV text with a header row.
    ///
    /// Ragged rows and broken quoting are structural errors. Individual cell
    /// values are never inspected here.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, PipelineError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let header_record = reader.headers()?.clone();
        if header_record.is_empty() {
            return Err(PipelineError::MissingHeader);
        }

        let headers: Vec<String> = header_record
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let h = h.trim_start_matches('\u{feff}').trim();
                if h.is_empty() {
                    format!("Unnamed: {}", i)
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = record
                .iter()
                .map(|cell| {
                    if cell.trim().is_empty() {
                        None
                    } else {
                        Some(cell.to_string())
                    }
                })
                .collect();
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    /// Parse CSV from a string.
    pub fn parse_csv(content: &str) -> Result<Self, PipelineError> {
        Self::from_csv(content.as_bytes())
    }

    /// Index of the column with the given header, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
