//! Data source abstraction for receiving raw datasets.
//!
//! This module provides a trait-based abstraction for obtaining the raw
//! table from various places (files, byte streams, memory). Loading is the
//! only I/O in the crate; everything downstream is a pure transform.

mod file;
mod memory;
mod reader;
mod table;

pub use file::FileSource;
pub use memory::MemorySource;
pub use reader::ReaderSource;
pub use table::RawTable;

use std::fmt::Debug;

/// Trait for receiving raw tables from various sources.
///
/// Implementations decide for themselves when a table counts as "new";
/// callers poll and rerun the pipeline only when something comes back.
///
/// # Example
///
/// ```
/// use marquee::{DataSource, FileSource};
///
/// let mut source = FileSource::new("imdb_movies.csv");
/// if let Some(table) = source.poll() {
///     println!("Got {} rows", table.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest table.
    ///
    /// Returns `Some(table)` if new data is available, `None` otherwise.
    fn poll(&mut self) -> Option<RawTable>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message from the last poll, if it failed.
    fn error(&self) -> Option<&str>;
}
