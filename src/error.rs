//! Error types for the pipeline.
//!
//! Only structural problems surface as errors. Bad values inside an otherwise
//! well-formed table are substituted during coercion and never reach this type.

use thiserror::Error;

/// Errors that can occur while turning raw input into a [`RawTable`](crate::source::RawTable).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Reading the underlying file or stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not row/column shaped (ragged rows, broken quoting, invalid UTF-8).
    #[error("Malformed table: {0}")]
    Csv(String),

    /// The input has no header row to map columns against.
    #[error("Input has no header row")]
    MissingHeader,
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            match err.into_kind() {
                csv::ErrorKind::Io(io) => PipelineError::Io(io),
                other => PipelineError::Csv(format!("{:?}", other)),
            }
        } else {
            PipelineError::Csv(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(PipelineError::MissingHeader.to_string(), "Input has no header row");
        assert_eq!(
            PipelineError::Csv("found record with 2 fields".into()).to_string(),
            "Malformed table: found record with 2 fields"
        );
    }
}
