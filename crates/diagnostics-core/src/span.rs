//! Byte ranges over a source.
//!
//! A [`Span`] is a half-open range `[start, end)` of bytes in one
//! [`Source`](crate::Source), carrying full [`Location`] endpoints. Both
//! constructors funnel through the source's coordinate mapping, so a span
//! that exists is always in bounds; only the ordering of its endpoints needs
//! checking here.

use std::fmt;
use std::sync::Arc;

use crate::error::DiagnosticError;
use crate::source::{Location, SharedSource, Source};

/// An immutable half-open byte range over a shared [`Source`].
///
/// Zero-width spans (`start == end`) are permitted and mark a caret /
/// insertion point.
#[derive(Debug, Clone)]
pub struct Span {
    source: SharedSource,
    start: Location,
    end: Location,
}

impl Span {
    /// Create a span from two locations previously obtained from `source`.
    ///
    /// Fails with [`DiagnosticError::InvalidSpan`] if `end` precedes
    /// `start`.
    pub fn new(
        source: SharedSource,
        start: Location,
        end: Location,
    ) -> Result<Self, DiagnosticError> {
        if start.index() > end.index() {
            return Err(DiagnosticError::InvalidSpan {
                start: start.index(),
                end: end.index(),
            });
        }

        Ok(Self { source, start, end })
    }

    /// Create a span from absolute byte offsets (end exclusive).
    pub fn from_indices(
        source: SharedSource,
        start: usize,
        end: usize,
    ) -> Result<Self, DiagnosticError> {
        let start = source.from_index(start)?;
        let end = source.from_index(end)?;
        Self::new(source, start, end)
    }

    /// Create a span from `(row, column)` pairs (end exclusive).
    pub fn from_coords(
        source: SharedSource,
        start_row: usize,
        start_column: usize,
        end_row: usize,
        end_column: usize,
    ) -> Result<Self, DiagnosticError> {
        let start = source.from_coords(start_row, start_column)?;
        let end = source.from_coords(end_row, end_column)?;
        Self::new(source, start, end)
    }

    /// The smallest span enclosing both `self` and `other`.
    ///
    /// Both spans must come from the same source.
    pub fn join(&self, other: &Span) -> Span {
        debug_assert_eq!(
            self.source.id(),
            other.source.id(),
            "joined spans must share a source"
        );

        let start = if self.start.index() <= other.start.index() {
            self.start
        } else {
            other.start
        };
        let end = if self.end.index() >= other.end.index() {
            self.end
        } else {
            other.end
        };

        Span {
            source: Arc::clone(&self.source),
            start,
            end,
        }
    }

    /// Half-open interval overlap test.
    ///
    /// Adjacent spans (`[a, b)` and `[b, c)`) do not intersect; a zero-width
    /// span intersects exactly the spans whose interior contains it.
    pub fn intersects(&self, other: &Span) -> bool {
        self.start.index() < other.end.index() && other.start.index() < self.end.index()
    }

    /// The text this span covers.
    pub fn substr(&self) -> String {
        self.source.substr(&self.start, &self.end)
    }

    /// Width in bytes.
    pub fn width(&self) -> usize {
        self.end.index() - self.start.index()
    }

    /// 0-based line the span starts on.
    pub fn line(&self) -> usize {
        self.start.row()
    }

    /// The source this span refers to.
    pub fn source(&self) -> &SharedSource {
        &self.source
    }

    /// Inclusive start location.
    pub fn start(&self) -> Location {
        self.start
    }

    /// Exclusive end location.
    pub fn end(&self) -> Location {
        self.end
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Self) -> bool {
        self.source.id() == other.source.id()
            && self.start == other.start
            && self.end == other.end
    }
}

impl Eq for Span {}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" at {}..{} in {}",
            self.substr().escape_debug(),
            self.start,
            self.end,
            self.source.path()
        )
    }
}
