//! One-shot reader source.
//!
//! Reads a whole CSV stream (stdin, a pipe, an HTTP body the caller already
//! fetched) on the first poll and never again.

use std::fmt;
use std::io::Read;

use super::{DataSource, RawTable};

/// A data source that parses CSV from any [`Read`] implementation once.
pub struct ReaderSource {
    reader: Option<Box<dyn Read + Send>>,
    description: String,
    last_error: Option<String>,
}

impl ReaderSource {
    /// Create a source over `reader`, labelled with `source_description`.
    pub fn new<R: Read + Send + 'static>(reader: R, source_description: &str) -> Self {
        Self {
            reader: Some(Box::new(reader)),
            description: format!("stream: {}", source_description),
            last_error: None,
        }
    }

    /// Convenience constructor for standard input.
    pub fn stdin() -> Self {
        Self::new(std::io::stdin(), "stdin")
    }
}

impl fmt::Debug for ReaderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderSource")
            .field("description", &self.description)
            .field("consumed", &self.reader.is_none())
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl DataSource for ReaderSource {
    fn poll(&mut self) -> Option<RawTable> {
        let reader = self.reader.take()?;
        match RawTable::from_csv(reader) {
            Ok(table) => {
                self.last_error = None;
                Some(table)
            }
            Err(e) => {
                self.last_error = Some(format!("Parse error: {}", e));
                None
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reader_source_reads_once() {
        let data = "names,revenue\nHeat,187436818\n";
        let mut source = ReaderSource::new(Cursor::new(data.as_bytes().to_vec()), "test");

        assert_eq!(source.description(), "stream: test");
        let table = source.poll().unwrap();
        assert_eq!(table.len(), 1);
        assert!(source.poll().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_reader_source_reports_parse_error() {
        let mut source = ReaderSource::new(Cursor::new(Vec::new()), "empty");
        assert!(source.poll().is_none());
        assert!(source.error().unwrap().starts_with("Parse error"));
    }
}
