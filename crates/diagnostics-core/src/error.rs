//! Crate-wide error type.
//!
//! Every fallible operation in `diagnostics-core` fails synchronously at the
//! violating call and leaves no partially applied state behind: a failed span
//! or builder call means the caller either retries with corrected input or
//! discards the report under construction. There is no degraded rendering
//! mode — a [`crate::Report`] is rendered only once fully and validly built.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while constructing sources, spans, or reports.
#[derive(Debug, Error)]
pub enum DiagnosticError {
    /// The source file does not exist.
    #[error("source file not found: {}", .path.display())]
    NotFound {
        /// Path that was passed to [`crate::FileSource::open`].
        path: PathBuf,
    },

    /// The source file exists but could not be read.
    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    /// A row, column, or byte index lies outside the source contents.
    #[error("{path}: {message}")]
    OutOfRange {
        /// Display path of the source the lookup ran against.
        path: String,
        /// Which coordinate was out of bounds, and the valid range.
        message: String,
    },

    /// A span's end location precedes its start location.
    #[error("span end (byte {end}) precedes its start (byte {start})")]
    InvalidSpan {
        /// Start byte index of the rejected span.
        start: usize,
        /// End byte index of the rejected span.
        end: usize,
    },

    /// A label was built with an empty message.
    #[error("label text must not be empty")]
    EmptyLabelText,

    /// Two labels on the same line of the same source have intersecting spans.
    #[error("overlapping labels on line {}", .line + 1)]
    OverlappingLabels {
        /// 0-based line number the conflicting labels share.
        line: usize,
    },

    /// [`crate::ReportBuilder::build`] was called without a message.
    #[error("report is missing a message")]
    IncompleteReport,
}
