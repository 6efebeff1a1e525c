//! In-memory data source.
//!
//! Hands over a table the caller already holds. Replacing the table marks
//! the source as changed so the next poll returns it.

use super::{DataSource, RawTable};

/// A data source backed by an in-memory [`RawTable`].
///
/// # Example
///
/// ```
/// use marquee::{DataSource, MemorySource, RawTable};
///
/// let table = RawTable::from_rows(["name", "revenue"], vec![vec![Some("Heat".into()), None]]);
/// let mut source = MemorySource::new(table, "fixture");
/// assert!(source.poll().is_some());
/// assert!(source.poll().is_none());
/// ```
#[derive(Debug)]
pub struct MemorySource {
    table: RawTable,
    description: String,
    changed: bool,
}

impl MemorySource {
    pub fn new(table: RawTable, source_description: &str) -> Self {
        Self {
            table,
            description: format!("memory: {}", source_description),
            changed: true,
        }
    }

    /// Swap in a new table; the next poll returns it.
    pub fn replace(&mut self, table: RawTable) {
        self.table = table;
        self.changed = true;
    }
}

impl DataSource for MemorySource {
    fn poll(&mut self) -> Option<RawTable> {
        if self.changed {
            self.changed = false;
            Some(self.table.clone())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        None
    }
}
